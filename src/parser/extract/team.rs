use crate::parser::blocks::{segment, TEAM_WINDOW};
use crate::parser::noise::NoiseClassifier;
use crate::parser::page::Element;
use crate::profile::PersonRecord;

pub const MAX_TEAM_PER_PAGE: usize = 15;

/// Every block that survives segmentation, no role filter.
pub fn extract(elements: &[Element], noise: &NoiseClassifier) -> Vec<PersonRecord> {
    segment(elements, &TEAM_WINDOW, noise)
        .into_iter()
        .filter_map(|b| b.into_person())
        .take(MAX_TEAM_PER_PAGE)
        .collect()
}
