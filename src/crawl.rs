use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use url::Url;

use crate::discovery::{self, DEFAULT_MAX_PAGES};
use crate::error::ScrapeError;
use crate::parser::{self, noise::NoiseClassifier};
use crate::profile::{self, CompanyProfile, PageResult};
use crate::fetch::Fetcher;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_pages: usize,
    /// Pages fetched at once. Results are merged in discovery order regardless.
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: 1,
            show_progress: false,
        }
    }
}

/// Crawl stats returned alongside the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub discovered: usize,
    pub ok: usize,
    pub errors: usize,
}

pub struct Crawler<F> {
    fetcher: F,
    noise: NoiseClassifier,
    config: CrawlConfig,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            noise: NoiseClassifier::default(),
            config,
        }
    }

    pub fn with_noise(mut self, noise: NoiseClassifier) -> Self {
        self.noise = noise;
        self
    }

    /// Discover → fetch each → extract → merge. Never fails: page-level errors
    /// are logged and the page is skipped.
    pub async fn crawl(&self, base_url: &Url) -> (CompanyProfile, CrawlStats) {
        info!("Starting crawl from {}", base_url);
        let urls = discovery::discover(&self.fetcher, base_url, self.config.max_pages).await;
        let discovered = urls.len();

        let bodies = self.fetch_all(urls).await;
        let results = self.extract_off_runtime(bodies).await;

        let ok = results.iter().filter(|r| r.is_some()).count();
        let stats = CrawlStats {
            discovered,
            ok,
            errors: discovered - ok,
        };

        let pages: Vec<PageResult> = results.into_iter().flatten().collect();
        if !pages.iter().any(PageResult::has_data) {
            warn!("No page on {} yielded usable data", base_url);
        }

        let profile = profile::fold_pages(base_url.as_str(), pages);
        info!(
            "Crawl complete: {} pages ({} ok, {} errors)",
            stats.discovered, stats.ok, stats.errors
        );
        (profile, stats)
    }

    /// Fetches in discovery order; `buffered` keeps output order fixed.
    async fn fetch_all(&self, urls: Vec<Url>) -> Vec<(Url, Result<String, ScrapeError>)> {
        let pb = self.progress_bar(urls.len());

        let fetched = stream::iter(urls)
            .map(|url| {
                let pb = pb.clone();
                async move {
                    info!("Scraping {}", url);
                    let body = self.fetcher.fetch(&url).await;
                    pb.inc(1);
                    (url, body)
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        pb.finish_and_clear();
        fetched
    }

    /// Parsing and extraction are CPU-bound; they run on rayon from the
    /// blocking pool, never on a runtime worker.
    async fn extract_off_runtime(
        &self,
        bodies: Vec<(Url, Result<String, ScrapeError>)>,
    ) -> Vec<Option<PageResult>> {
        let count = bodies.len();
        let noise = self.noise.clone();
        match tokio::task::spawn_blocking(move || extract_pages(bodies, &noise)).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Extraction task failed: {}", e);
                vec![None; count]
            }
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        pb
    }
}

/// Order-preserving parallel extraction; failed pages become `None`.
fn extract_pages(
    bodies: Vec<(Url, Result<String, ScrapeError>)>,
    noise: &NoiseClassifier,
) -> Vec<Option<PageResult>> {
    bodies
        .into_par_iter()
        .map(|(url, body)| {
            match body.and_then(|html| parser::process_page(&url, &html, noise)) {
                Ok(page) => {
                    debug!("Extracted {} (data: {})", page.url, page.has_data());
                    Some(page)
                }
                Err(e) => {
                    warn!("Skipping page: {}", e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UNKNOWN_COMPANY;
    use crate::fetch::testing::StaticFetcher;

    const HOME: &str = r#"<html><head><title>Acme Lawn | Austin</title></head><body>
        <a href="/about">About</a>
        <a href="/team">Team</a>
        <a href="/broken-team">Team (old)</a>
        <a href="/services">Services</a>
        <p>Call <a href="tel:512-555-0100">512-555-0100</a></p>
    </body></html>"#;

    const ABOUT: &str = r#"<html><head>
        <meta name="description" content="Acme keeps Austin lawns healthy.">
        </head><body>
        <h3>Jane Doe</h3><span>Founder</span>
        <p>Jane opened Acme after years of landscaping for other companies.</p>
        <a href="mailto:jane@acme.com">Email Jane</a>
    </body></html>"#;

    const TEAM: &str = r#"<html><body>
        <h3>Jane Doe</h3><span>Founder</span>
        <p>Jane opened Acme after years of landscaping for other companies.</p>
        <h3>Mark Lee</h3><span>Lawn Technician</span>
        <a href="tel:512-555-0199">Call Mark</a>
    </body></html>"#;

    fn site() -> StaticFetcher {
        StaticFetcher::new()
            .page("https://acme.com/", HOME)
            .page("https://acme.com/about", ABOUT)
            .page("https://acme.com/team", TEAM)
    }

    #[tokio::test]
    async fn crawls_merges_and_skips_failures() {
        let crawler = Crawler::new(site(), CrawlConfig::default());
        let (profile, stats) = crawler.crawl(&Url::parse("https://acme.com/").unwrap()).await;

        assert_eq!(
            stats,
            CrawlStats {
                discovered: 4,
                ok: 3,
                errors: 1
            }
        );
        assert_eq!(profile.company_name, "Acme Lawn");
        assert_eq!(profile.url, "https://acme.com/");
        assert_eq!(profile.about.as_deref(), Some("Acme keeps Austin lawns healthy."));

        // Jane appears on two pages with identical fields.
        assert_eq!(profile.founders.len(), 1);
        assert_eq!(profile.founders[0].name, "Jane Doe");

        let team: Vec<&str> = profile.team_members.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(team, vec!["Jane Doe", "Mark Lee"]);

        assert_eq!(profile.contact_info.email.as_deref(), Some("jane@acme.com"));
        assert_eq!(profile.contact_info.phone.as_deref(), Some("512-555-0199"));
    }

    #[tokio::test]
    async fn concurrency_does_not_change_the_result() {
        let url = Url::parse("https://acme.com/").unwrap();
        let (sequential, _) = Crawler::new(site(), CrawlConfig::default()).crawl(&url).await;
        let config = CrawlConfig {
            concurrency: 4,
            ..CrawlConfig::default()
        };
        let (parallel, _) = Crawler::new(site(), config).crawl(&url).await;

        assert_eq!(sequential.company_name, parallel.company_name);
        assert_eq!(sequential.founders, parallel.founders);
        assert_eq!(sequential.team_members, parallel.team_members);
        assert_eq!(sequential.contact_info, parallel.contact_info);
    }

    #[tokio::test]
    async fn unreachable_site_yields_empty_profile() {
        let crawler = Crawler::new(StaticFetcher::new(), CrawlConfig::default());
        let (profile, stats) = crawler.crawl(&Url::parse("https://down.example/").unwrap()).await;

        assert_eq!(stats.discovered, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(profile.company_name, UNKNOWN_COMPANY);
        assert!(profile.is_empty());
    }

    #[tokio::test]
    async fn max_pages_limits_the_crawl() {
        let config = CrawlConfig {
            max_pages: 2,
            ..CrawlConfig::default()
        };
        let (profile, stats) = Crawler::new(site(), config)
            .crawl(&Url::parse("https://acme.com/").unwrap())
            .await;
        assert_eq!(stats.discovered, 2);
        assert_eq!(stats.ok, 2);
        assert!(profile.team_members.iter().all(|t| t.name != "Mark Lee"));
    }

    #[test]
    fn extraction_keeps_input_order_and_marks_failures() {
        let bodies: Vec<(Url, Result<String, ScrapeError>)> = vec![
            (Url::parse("https://acme.com/").unwrap(), Ok(HOME.to_string())),
            (
                Url::parse("https://acme.com/gone").unwrap(),
                Err(ScrapeError::HttpStatus {
                    url: "https://acme.com/gone".into(),
                    status: 404,
                }),
            ),
            (Url::parse("https://acme.com/empty").unwrap(), Ok(String::new())),
            (Url::parse("https://acme.com/team").unwrap(), Ok(TEAM.to_string())),
        ];
        let results = extract_pages(bodies, &NoiseClassifier::default());

        let urls: Vec<Option<&str>> = results
            .iter()
            .map(|r| r.as_ref().map(|p| p.url.as_str()))
            .collect();
        assert_eq!(
            urls,
            vec![Some("https://acme.com/"), None, None, Some("https://acme.com/team")]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn crawl_runs_on_a_single_threaded_runtime() {
        let config = CrawlConfig {
            concurrency: 3,
            ..CrawlConfig::default()
        };
        let (profile, stats) = Crawler::new(site(), config)
            .crawl(&Url::parse("https://acme.com/").unwrap())
            .await;
        assert_eq!(stats.ok, 3);
        assert_eq!(profile.founders.len(), 1);
    }

    #[tokio::test]
    async fn disabled_noise_rule_changes_extraction() {
        let html = r#"<html><body>
            <h3>Jane Doe</h3><span>Owner</span>
            <p>Learn more about how Jane built the company from a single truck.</p>
        </body></html>"#;
        let fetcher = StaticFetcher::new().page("https://solo.com/", html);
        let url = Url::parse("https://solo.com/").unwrap();

        let (strict, _) = Crawler::new(fetcher, CrawlConfig::default()).crawl(&url).await;
        assert!(strict.team_members[0].bio.is_empty());

        let fetcher = StaticFetcher::new().page("https://solo.com/", html);
        let (relaxed, _) = Crawler::new(fetcher, CrawlConfig::default())
            .with_noise(NoiseClassifier::default().without("marketing_phrase"))
            .crawl(&url)
            .await;
        assert!(relaxed.team_members[0].bio.starts_with("Learn more"));
    }
}
