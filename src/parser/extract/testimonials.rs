use std::collections::HashSet;

use scraper::ElementRef;

use crate::parser::noise::NoiseClassifier;
use crate::parser::page::{class_matches, flatten_text, Page};
use crate::profile::TestimonialRecord;

pub const QUOTE_CLASSES: &[&str] = &["testimonial", "review", "feedback", "quote"];
pub const AUTHOR_CLASSES: &[&str] = &["author", "name", "client"];
pub const MAX_TESTIMONIALS_PER_PAGE: usize = 5;

pub fn extract(page: &Page, noise: &NoiseClassifier) -> Vec<TestimonialRecord> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for container in page.with_class(QUOTE_CLASSES) {
        let inner: Vec<ElementRef> = container
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect();

        for (idx, quote) in inner.iter().enumerate() {
            if !is_quote(*quote) || contains_quote(*quote) {
                continue;
            }
            let text = flatten_text(*quote);
            if noise.is_noise(&text) || !seen.insert(text.clone()) {
                continue;
            }

            // Nearest author-classed element after the quote, in document order.
            let author = inner[idx + 1..]
                .iter()
                .find(|el| class_matches(**el, AUTHOR_CLASSES))
                .map(|el| flatten_text(*el));

            if let Some(record) = TestimonialRecord::new(&text, author.as_deref()) {
                out.push(record);
                if out.len() >= MAX_TESTIMONIALS_PER_PAGE {
                    return out;
                }
            }
        }
    }

    out
}

fn is_quote(el: ElementRef) -> bool {
    class_matches(el, QUOTE_CLASSES) && !class_matches(el, AUTHOR_CLASSES)
}

// Only the innermost quote-classed element carries the text.
fn contains_quote(el: ElementRef) -> bool {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(is_quote)
}
