use std::sync::LazyLock;

use scraper::Selector;

use crate::parser::page::{class_of, flatten_text, truncate_chars, Page};

static SECTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, section, p").unwrap());

/// Searched in order; the first keyword with a usable element wins.
pub const MISSION_KEYWORDS: &[&str] = &["mission", "vision", "values", "purpose", "why we"];
const MIN_MISSION_CHARS: usize = 20;
const MAX_MISSION_CHARS: usize = 500;

pub fn extract(page: &Page) -> Option<String> {
    MISSION_KEYWORDS.iter().find_map(|kw| {
        page.document()
            .select(&SECTION_SEL)
            .filter(|el| class_of(*el).contains(kw))
            .map(flatten_text)
            .find(|text| text.chars().count() > MIN_MISSION_CHARS)
            .map(|text| truncate_chars(&text, MAX_MISSION_CHARS))
    })
}
