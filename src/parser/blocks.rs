use super::noise::NoiseClassifier;
use super::page::{truncate_chars, Element};
use crate::profile::{PersonRecord, MAX_BIO_CHARS};

/// Short texts in a window are title candidates, longer ones bio fragments.
const TITLE_MAX_CHARS: usize = 50;
const FRAGMENT_MIN_CHARS: usize = 20;
/// Without a title, a block needs at least this much bio to be kept.
const MIN_BIO_WITHOUT_TITLE: usize = 30;

/// How far a block may extend past its name and what ends it.
#[derive(Debug, Clone, Copy)]
pub struct WindowMode {
    pub min_name_chars: usize,
    pub max_name_chars: usize,
    /// Elements scanned after the name; `None` scans to the next heading.
    pub lookahead: Option<usize>,
    pub max_fragments: Option<usize>,
    /// Any h2-h4 closes the block, whatever its length.
    pub stop_at_any_heading: bool,
}

pub const TEAM_WINDOW: WindowMode = WindowMode {
    min_name_chars: 2,
    max_name_chars: 30,
    lookahead: Some(10),
    max_fragments: None,
    stop_at_any_heading: false,
};

pub const FOUNDER_WINDOW: WindowMode = WindowMode {
    min_name_chars: 2,
    max_name_chars: 50,
    lookahead: None,
    max_fragments: Some(5),
    stop_at_any_heading: true,
};

impl WindowMode {
    fn fits_name(&self, el: &Element) -> bool {
        el.is_heading_like()
            && (self.min_name_chars..=self.max_name_chars).contains(&el.char_len())
    }

    fn ends_block(&self, el: &Element) -> bool {
        self.fits_name(el) || (self.stop_at_any_heading && el.is_heading())
    }

    fn window_open(&self, start: usize, j: usize) -> bool {
        self.lookahead.map_or(true, |n| j - start <= n)
    }
}

/// A segmented candidate: name, title, and the bio fragments under it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub name: String,
    pub title: String,
    pub fragments: Vec<String>,
}

impl RawBlock {
    pub fn bio(&self) -> String {
        truncate_chars(&self.fragments.join(" "), MAX_BIO_CHARS)
    }

    /// Blocks with neither a title nor a substantial bio carry too little signal.
    fn has_signal(&self) -> bool {
        !self.title.is_empty() || self.bio().chars().count() >= MIN_BIO_WITHOUT_TITLE
    }

    pub fn into_person(self) -> Option<PersonRecord> {
        PersonRecord::new(&self.name, &self.title, &self.bio())
    }
}

/// Left-to-right scan. Each name opens a window; the pointer resumes where the
/// window stopped, so no element is attributed to two names.
pub fn segment(elements: &[Element], mode: &WindowMode, noise: &NoiseClassifier) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < elements.len() {
        let el = &elements[i];
        if !mode.fits_name(el) || noise.is_noise(&el.text) {
            i += 1;
            continue;
        }

        let mut block = RawBlock {
            name: el.text.clone(),
            title: String::new(),
            fragments: Vec::new(),
        };

        let mut j = i + 1;
        while j < elements.len() && mode.window_open(i, j) {
            let next = &elements[j];
            if mode.ends_block(next) {
                break;
            }
            j += 1;

            if noise.is_noise(&next.text) {
                continue;
            }
            let len = next.char_len();
            if block.title.is_empty() && len < TITLE_MAX_CHARS {
                block.title = next.text.clone();
            } else if len > FRAGMENT_MIN_CHARS
                && mode.max_fragments.map_or(true, |max| block.fragments.len() < max)
            {
                block.fragments.push(next.text.clone());
            }
        }

        if block.has_signal() {
            blocks.push(block);
        }
        i = j;
    }

    blocks
}
