use std::sync::LazyLock;

use scraper::Selector;

use crate::parser::page::{flatten_text, Page};

static PARAGRAPH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

const ABOUT_CLASSES: &[&str] = &["about"];
const ABOUT_PARAGRAPHS: usize = 2;

/// Meta description, then Open Graph description, then the opening
/// paragraphs of an about-classed container. First hit wins.
pub fn extract(page: &Page) -> Option<String> {
    page.meta("name", "description")
        .or_else(|| page.meta("property", "og:description"))
        .or_else(|| from_about_container(page))
}

fn from_about_container(page: &Page) -> Option<String> {
    page.with_class(ABOUT_CLASSES).find_map(|container| {
        let paragraphs: Vec<String> = container
            .select(&PARAGRAPH_SEL)
            .map(flatten_text)
            .filter(|t| !t.is_empty())
            .take(ABOUT_PARAGRAPHS)
            .collect();
        let joined = paragraphs.join(" ");
        (!joined.is_empty()).then_some(joined)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn about(html: &str) -> Option<String> {
        let page = Page::parse(&Url::parse("https://example.com/").unwrap(), html).unwrap();
        extract(&page)
    }

    #[test]
    fn meta_description_first() {
        let html = r#"<head>
            <meta property="og:description" content="OG text">
            <meta name="description" content="Meta text"></head>
            <body><div class="about"><p>Container text</p></div></body>"#;
        assert_eq!(about(html).as_deref(), Some("Meta text"));
    }

    #[test]
    fn open_graph_second() {
        let html = r#"<head><meta property="og:description" content="OG text"></head>
            <body><div class="about"><p>Container text</p></div></body>"#;
        assert_eq!(about(html).as_deref(), Some("OG text"));
    }

    #[test]
    fn first_two_paragraphs_of_about_container() {
        let html = r#"<body>
            <section class="hero"><p>Hero copy</p></section>
            <section class="About-Us">
              <h2>Who we are</h2>
              <p>Family owned since 1998.</p>
              <p>We serve all of Central Texas.</p>
              <p>Third paragraph is ignored.</p>
            </section></body>"#;
        assert_eq!(
            about(html).as_deref(),
            Some("Family owned since 1998. We serve all of Central Texas.")
        );
    }

    #[test]
    fn nothing_found() {
        assert!(about("<body><p>Plain page</p></body>").is_none());
    }
}
