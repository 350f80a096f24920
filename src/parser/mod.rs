pub mod blocks;
pub mod extract;
pub mod noise;
pub mod page;

use url::Url;

use crate::error::ScrapeError;
use crate::profile::PageResult;
use noise::NoiseClassifier;
use page::Page;

/// Markup → element tree → extracted page record.
pub fn process_page(url: &Url, body: &str, noise: &NoiseClassifier) -> Result<PageResult, ScrapeError> {
    let page = Page::parse(url, body)?;
    Ok(extract::extract_all(&page, noise))
}
