use url::Url;

use crate::parser::page::Page;

/// Open Graph site name, then the leading segment of `<title>`, then the
/// capitalised domain label.
pub fn extract(page: &Page) -> Option<String> {
    page.meta("property", "og:site_name")
        .or_else(|| page.title().and_then(|t| leading_title_segment(&t)))
        .or_else(|| name_from_url(&page.url))
}

fn leading_title_segment(title: &str) -> Option<String> {
    let first = title.split('|').next()?.split('-').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

pub fn name_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next()?;
    (!label.is_empty()).then(|| title_case(label))
}

/// Upper-cases the first letter of every alphabetic run.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
