use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::crawl::CrawlStats;
use crate::profile::CompanyProfile;

const EXCERPT_CHARS: usize = 500;

/// `<safe_name>_<YYYYmmdd_HHMMSS>.json`: lower-cased, spaces to `_`, then
/// only alphanumerics, `-` and `_` kept.
pub fn default_filename(profile: &CompanyProfile) -> String {
    let safe: String = profile
        .company_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let safe = if safe.is_empty() { "company".to_string() } else { safe };
    format!("{}_{}.json", safe, profile.scraped_at.format("%Y%m%d_%H%M%S"))
}

/// Writes pretty JSON to `path`, or to [`default_filename`] in the working directory.
pub fn save_json(profile: &CompanyProfile, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_filename(profile)),
    };
    let json = serde_json::to_string_pretty(profile)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("Saved profile to {}", path.display());
    Ok(path)
}

pub fn print_summary(profile: &CompanyProfile, stats: &CrawlStats) {
    println!("\n=== {} ===", profile.company_name);
    println!("URL:          {}", profile.url);
    println!(
        "Pages:        {} ({} ok, {} errors)",
        stats.discovered, stats.ok, stats.errors
    );

    println!("Founders:     {}", profile.founders.len());
    for f in &profile.founders {
        println!("  - {} ({})", f.name, or_dash(&f.title));
    }
    println!("Team members: {}", profile.team_members.len());
    for t in &profile.team_members {
        println!("  - {} ({})", t.name, or_dash(&t.title));
    }
    println!("Testimonials: {}", profile.testimonials.len());
    for t in &profile.testimonials {
        println!("  - \"{}\" ({})", truncate(&t.text, 60), t.author);
    }

    if let Some(about) = &profile.about {
        println!("About:        {}", truncate(about, EXCERPT_CHARS));
    }
    if let Some(mission) = &profile.mission {
        println!("Mission:      {}", truncate(mission, EXCERPT_CHARS));
    }
    if let Some(email) = &profile.contact_info.email {
        println!("Email:        {}", email);
    }
    if let Some(phone) = &profile.contact_info.phone {
        println!("Phone:        {}", phone);
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
