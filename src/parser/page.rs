use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ScrapeError;

static STREAM_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h2, h3, h4, h5, p, div, section, article, li, span, strong, b").unwrap()
});
static META_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static CLASSED_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[class]").unwrap());

/// Subtrees whose text never reaches the element stream.
const SKIPPED_ANCESTORS: &[&str] = &["nav", "footer", "script", "style", "noscript", "template"];
/// Containers that already carry the text of their inline children.
const TEXT_CONTAINERS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];
const BLOCK_LEVEL: &[&str] = &[
    "p", "div", "section", "article", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "table",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    Block,
    Emphasis,
    Anchor,
    Other,
}

impl Tag {
    pub fn from_name(name: &str) -> Tag {
        match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "div" | "section" | "article" | "li" | "span" => Tag::Block,
            "strong" | "b" => Tag::Emphasis,
            "a" => Tag::Anchor,
            _ => Tag::Other,
        }
    }
}

/// One node of the flattened element stream the segmenter walks.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub text: String,
}

impl Element {
    pub fn new(tag: Tag, text: &str) -> Self {
        Self {
            tag,
            text: normalize_whitespace(text),
        }
    }

    fn from_ref(el: ElementRef) -> Self {
        Self {
            tag: Tag::from_name(el.value().name()),
            text: flatten_text(el),
        }
    }

    /// Heading levels 2-4.
    pub fn is_heading(&self) -> bool {
        matches!(self.tag, Tag::Heading(2..=4))
    }

    /// Headings plus strong/bold runs: the elements that can carry a name.
    pub fn is_heading_like(&self) -> bool {
        self.is_heading() || self.tag == Tag::Emphasis
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A parsed page. Wraps the document tree; extractors only read it.
pub struct Page {
    pub url: Url,
    doc: Html,
}

impl Page {
    pub fn parse(url: &Url, body: &str) -> Result<Self, ScrapeError> {
        if body.trim().is_empty() {
            return Err(ScrapeError::parse(url.as_str(), "empty document"));
        }

        let doc = Html::parse_document(body);
        let has_text = doc.root_element().text().any(|t| !t.trim().is_empty());
        let has_meta = doc.select(&META_SEL).next().is_some();
        if !has_text && !has_meta {
            return Err(ScrapeError::parse(url.as_str(), "document has no content"));
        }

        Ok(Self {
            url: url.clone(),
            doc,
        })
    }

    pub fn document(&self) -> &Html {
        &self.doc
    }

    /// Ordered element stream for segmentation, in document order. A bold run
    /// that opens a paragraph is emitted just before that paragraph.
    pub fn elements(&self) -> Vec<Element> {
        let mut out = Vec::new();
        for el in self.doc.select(&STREAM_SEL) {
            if inside_skipped(&el) || is_wrapper(&el) || inside_text_container(&el) {
                continue;
            }
            let element = Element::from_ref(el);
            if let Some(lead) = leading_emphasis(el, &element.text) {
                let whole = lead.text == element.text;
                out.push(lead);
                if whole {
                    continue;
                }
            }
            out.push(element);
        }
        out.retain(|e| !e.text.is_empty());
        out
    }

    /// Content of the first `<meta>` whose `key_attr` equals `key`.
    pub fn meta(&self, key_attr: &str, key: &str) -> Option<String> {
        self.doc
            .select(&META_SEL)
            .filter(|m| {
                m.value()
                    .attr(key_attr)
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
            })
            .find_map(|m| m.value().attr("content"))
            .map(normalize_whitespace)
            .filter(|c| !c.is_empty())
    }

    pub fn title(&self) -> Option<String> {
        self.doc
            .select(&TITLE_SEL)
            .next()
            .map(flatten_text)
            .filter(|t| !t.is_empty())
    }

    /// Elements whose class attribute contains any of `vocab`, case-insensitive.
    pub fn with_class<'a>(
        &'a self,
        vocab: &'a [&'a str],
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.doc
            .select(&CLASSED_SEL)
            .filter(move |el| class_matches(*el, vocab))
    }
}

/// Visible text of an element, whitespace-normalised.
pub fn flatten_text(el: ElementRef) -> String {
    let parts: Vec<&str> = el
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|p| matches!(p.value().name(), "script" | "style" | "noscript"));
            (!hidden).then_some(&**text)
        })
        .collect();
    normalize_whitespace(&parts.join(" "))
}

pub fn class_of(el: ElementRef) -> String {
    el.value().attr("class").unwrap_or("").to_lowercase()
}

pub fn class_matches(el: ElementRef, vocab: &[&str]) -> bool {
    let class = class_of(el);
    !class.is_empty() && vocab.iter().any(|kw| class.contains(kw))
}

pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn inside_skipped(el: &ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| SKIPPED_ANCESTORS.contains(&a.value().name()))
}

/// Generic blocks that only group other stream elements. Their children are
/// emitted instead, so no text enters the stream twice.
fn is_wrapper(el: &ElementRef) -> bool {
    if Tag::from_name(el.value().name()) != Tag::Block {
        return false;
    }
    let mut has_stream_child = false;
    for d in el.descendants().skip(1).filter_map(ElementRef::wrap) {
        let name = d.value().name();
        if BLOCK_LEVEL.contains(&name) {
            return true;
        }
        has_stream_child |= is_stream_inline(name);
    }
    has_stream_child && !has_loose_text(el)
}

fn is_stream_inline(name: &str) -> bool {
    matches!(Tag::from_name(name), Tag::Block | Tag::Emphasis)
}

/// Text directly under `el` that no stream child carries.
fn has_loose_text(el: &ElementRef) -> bool {
    el.children().any(|child| match ElementRef::wrap(child) {
        Some(c) => !is_stream_inline(c.value().name()) && !flatten_text(c).is_empty(),
        None => child.value().as_text().is_some_and(|t| !t.trim().is_empty()),
    })
}

// Paragraphs, headings and leaf blocks already carry their descendants' text.
fn inside_text_container(el: &ElementRef) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|a| {
        let name = a.value().name();
        TEXT_CONTAINERS.contains(&name) || (Tag::from_name(name) == Tag::Block && !is_wrapper(&a))
    })
}

/// First bold run of a paragraph or leaf block, when the text opens with it.
fn leading_emphasis(el: ElementRef, text: &str) -> Option<Element> {
    if !matches!(Tag::from_name(el.value().name()), Tag::Paragraph | Tag::Block) {
        return None;
    }
    let lead = el
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|d| Tag::from_name(d.value().name()) == Tag::Emphasis)
        .map(Element::from_ref)?;
    (!lead.text.is_empty() && text.starts_with(&lead.text)).then_some(lead)
}
