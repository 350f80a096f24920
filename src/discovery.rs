use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::parser::page::flatten_text;
use crate::fetch::Fetcher;

pub const DEFAULT_MAX_PAGES: usize = 5;

/// Matched against the lower-cased URL path and anchor text.
pub const PAGE_KEYWORDS: &[&str] = &[
    "about",
    "team",
    "our-team",
    "leadership",
    "our-story",
    "who-we-are",
    "meet",
    "people",
    "staff",
    "founders",
    "management",
    "executives",
    "board",
    "our-people",
];

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Same-site pages worth visiting, `base_url` first, at most `limit` entries
/// and never more than [`DEFAULT_MAX_PAGES`].
/// A homepage that cannot be fetched degrades to `[base_url]`.
pub async fn discover<F: Fetcher + ?Sized>(fetcher: &F, base_url: &Url, limit: usize) -> Vec<Url> {
    info!("Looking for relevant pages on {}", base_url);

    match fetcher.fetch(base_url).await {
        Ok(body) => {
            let urls = relevant_links(base_url, &body, limit);
            info!("Found {} relevant page(s)", urls.len());
            urls
        }
        Err(e) => {
            warn!("Discovery failed, crawling {} only: {}", base_url, e);
            vec![base_url.clone()]
        }
    }
}

/// Keyword-matching same-origin links in encounter order, deduplicated.
pub fn relevant_links(base_url: &Url, html: &str, limit: usize) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let mut urls = vec![base_url.clone()];

    for anchor in doc.select(&ANCHOR_SEL) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut url) = base_url.join(href.trim()) else {
            continue;
        };
        url.set_fragment(None);

        if url.origin() != base_url.origin() || urls.contains(&url) {
            continue;
        }

        let path = url.path().to_lowercase();
        let text = flatten_text(anchor).to_lowercase();
        if PAGE_KEYWORDS
            .iter()
            .any(|kw| path.contains(kw) || text.contains(kw))
        {
            debug!("Found: {}", url);
            urls.push(url);
        }
    }

    urls.truncate(limit.clamp(1, DEFAULT_MAX_PAGES));
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticFetcher;

    const BASE: &str = "https://acme.com/";

    fn base() -> Url {
        Url::parse(BASE).unwrap()
    }

    fn strings(urls: &[Url]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn keeps_matching_links_in_encounter_order() {
        let html = r#"<body>
            <a href="/services">Services</a>
            <a href="/about-us">Who we serve</a>
            <a href="/pricing">Pricing</a>
            <a href="/crew">Meet the crew</a>
            <a href="/contact">Contact</a>
            <a href="https://acme.com/team">Our people</a>
            <a href="/gallery">Gallery</a>
            <a href="/blog">Blog</a>
            <a href="/about-us">About again</a>
        </body>"#;
        let fetcher = StaticFetcher::new().page(BASE, html);
        let urls = discover(&fetcher, &base(), DEFAULT_MAX_PAGES).await;
        assert_eq!(
            strings(&urls),
            vec![
                "https://acme.com/",
                "https://acme.com/about-us",
                "https://acme.com/crew",
                "https://acme.com/team",
            ]
        );
    }

    #[tokio::test]
    async fn failed_homepage_degrades_to_base() {
        let fetcher = StaticFetcher::new();
        let urls = discover(&fetcher, &base(), DEFAULT_MAX_PAGES).await;
        assert_eq!(urls, vec![base()]);
    }

    #[test]
    fn other_origins_and_schemes_are_ignored() {
        let html = r#"<body>
            <a href="https://other.com/about">About them</a>
            <a href="http://acme.com/about">Insecure about</a>
            <a href="https://blog.acme.com/team">Team blog</a>
            <a href="mailto:team@acme.com">Email the team</a>
            <a href="javascript:void(0)">About</a>
            <a href="/leadership#ceo">Leadership</a>
            <a href="/leadership">Leadership again</a>
        </body>"#;
        let urls = relevant_links(&base(), html, DEFAULT_MAX_PAGES);
        assert_eq!(
            strings(&urls),
            vec!["https://acme.com/", "https://acme.com/leadership"]
        );
    }

    #[test]
    fn base_is_not_repeated_and_result_is_capped() {
        let html = r#"<body>
            <a href="/">About home</a>
            <a href="/about">About</a>
            <a href="/team">Team</a>
            <a href="/staff">Staff</a>
            <a href="/board">Board</a>
            <a href="/management">Management</a>
            <a href="/founders">Founders</a>
        </body>"#;
        let urls = relevant_links(&base(), html, DEFAULT_MAX_PAGES);
        assert_eq!(urls.len(), DEFAULT_MAX_PAGES);
        assert_eq!(urls[0], base());
        assert_eq!(urls[4].path(), "/board");
    }

    #[test]
    fn limit_cannot_raise_the_cap() {
        let html: String = ["about", "team", "staff", "board", "management", "founders"]
            .iter()
            .map(|p| format!(r#"<a href="/{p}">{p}</a>"#))
            .collect();
        assert_eq!(relevant_links(&base(), &html, 50).len(), DEFAULT_MAX_PAGES);
        assert_eq!(relevant_links(&base(), &html, 0), vec![base()]);
    }

    #[test]
    fn homepage_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/home.html").unwrap();
        let base = Url::parse("https://www.greenleaflawn.com/").unwrap();
        let urls = relevant_links(&base, &html, DEFAULT_MAX_PAGES);
        assert_eq!(
            strings(&urls),
            vec![
                "https://www.greenleaflawn.com/",
                "https://www.greenleaflawn.com/about",
                "https://www.greenleaflawn.com/our-team",
            ]
        );
    }
}
