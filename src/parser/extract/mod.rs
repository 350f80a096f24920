pub mod about;
pub mod company;
pub mod contact;
pub mod founders;
pub mod mission;
pub mod team;
pub mod testimonials;

use super::noise::NoiseClassifier;
use super::page::Page;
use crate::profile::PageResult;

/// Runs every extractor over one parsed page.
pub fn extract_all(page: &Page, noise: &NoiseClassifier) -> PageResult {
    let elements = page.elements();

    PageResult {
        url: page.url.to_string(),
        company_name: company::extract(page),
        founders: founders::extract(&elements, noise),
        team_members: team::extract(&elements, noise),
        testimonials: testimonials::extract(page, noise),
        about: about::extract(page),
        mission: mission::extract(page),
        contact: contact::extract(page),
    }
}

// ── Tests ──
