use std::sync::LazyLock;

use scraper::Selector;

use crate::parser::page::Page;
use crate::profile::ContactInfo;

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// First `mailto:` and first `tel:` anchor on the page. Values are not validated.
pub fn extract(page: &Page) -> ContactInfo {
    ContactInfo {
        email: first_href(page, "mailto:"),
        phone: first_href(page, "tel:"),
    }
}

fn first_href(page: &Page, scheme: &str) -> Option<String> {
    page.document()
        .select(&ANCHOR_SEL)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| {
            href.get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
        .map(|href| {
            // mailto:a@x.com?subject=Hi
            let value = &href[scheme.len()..];
            value.split('?').next().unwrap_or("").trim().to_string()
        })
        .find(|v| !v.is_empty())
}
