use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// A capitalised word glued onto at least three lower-case letters
/// ("VanessaCustomer"). Shorter runs are surname prefixes (Mc, Mac, De).
static GLUED_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Ll}{3}\p{Lu}\p{Ll}").unwrap());

/// Marketing and filler phrases, matched as lower-case substrings.
pub const MARKETING_PHRASES: &[&str] = &[
    "free fast quote",
    "free quote",
    "free estimate",
    "get a quote",
    "request a quote",
    "click here",
    "learn more",
    "read more",
    "see more",
    "view all",
    "call now",
    "call today",
    "call us today",
    "book now",
    "schedule now",
    "contact us",
    "get in touch",
    "sign up",
    "subscribe",
    "follow us",
    "all rights reserved",
    "privacy policy",
    "terms of service",
    "satisfaction guaranteed",
    "limited time",
    "special offer",
    "meet the team",
    "meet our team",
];

/// Navigation and section labels, matched against the whole text.
pub const SECTION_LABELS: &[&str] = &[
    "about",
    "about us",
    "our team",
    "team",
    "the team",
    "our people",
    "leadership",
    "our leadership",
    "our story",
    "who we are",
    "management",
    "staff",
    "our staff",
    "founders",
    "testimonials",
    "reviews",
    "our mission",
    "our values",
    "services",
    "our services",
    "contact",
    "home",
    "menu",
];

pub type Predicate = fn(&str) -> bool;

/// A named, independently testable noise predicate.
#[derive(Clone, Copy)]
pub struct NoiseRule {
    pub name: &'static str,
    pub check: Predicate,
}

impl std::fmt::Debug for NoiseRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

pub const DEFAULT_RULES: &[NoiseRule] = &[
    NoiseRule { name: "too_short", check: too_short },
    NoiseRule { name: "digit_heavy", check: digit_heavy },
    NoiseRule { name: "marketing_phrase", check: marketing_phrase },
    NoiseRule { name: "section_label", check: section_label },
    NoiseRule { name: "degenerate_repetition", check: degenerate_repetition },
    NoiseRule { name: "short_repetitive_phrase", check: short_repetitive_phrase },
    NoiseRule { name: "shouted_concatenation", check: shouted_concatenation },
    NoiseRule { name: "long_mixed_case_runs", check: long_mixed_case_runs },
    NoiseRule { name: "name_glued_to_title", check: name_glued_to_title },
];

/// Layered false-positive filter. Text is noise when any rule matches.
#[derive(Debug, Clone)]
pub struct NoiseClassifier {
    rules: Vec<NoiseRule>,
}

impl Default for NoiseClassifier {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl NoiseClassifier {
    /// Drop a rule by name. Unknown names are ignored.
    pub fn without(mut self, name: &str) -> Self {
        self.rules.retain(|r| r.name != name);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn is_noise(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// Name of the first rule that flags `text`.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        let text = text.trim();
        self.rules.iter().find(|r| (r.check)(text)).map(|r| r.name)
    }
}

pub fn is_known_rule(name: &str) -> bool {
    DEFAULT_RULES.iter().any(|r| r.name == name)
}

fn lower_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn too_short(text: &str) -> bool {
    text.chars().count() < 3
}

// Phone numbers and street addresses.
fn digit_heavy(text: &str) -> bool {
    text.chars().filter(char::is_ascii_digit).count() > 5
}

fn marketing_phrase(text: &str) -> bool {
    let lower = text.to_lowercase();
    MARKETING_PHRASES.iter().any(|p| lower.contains(p))
}

fn section_label(text: &str) -> bool {
    let lower = text.to_lowercase();
    let lower = lower.trim_end_matches([':', '.', '!']);
    SECTION_LABELS.contains(&lower)
}

fn degenerate_repetition(text: &str) -> bool {
    let words = lower_words(text);
    if words.len() <= 3 {
        return false;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for w in &words {
        *counts.entry(w.as_str()).or_default() += 1;
    }
    let top = counts.values().copied().max().unwrap_or(0);
    top * 2 > words.len()
}

fn short_repetitive_phrase(text: &str) -> bool {
    if text.chars().count() >= 50 {
        return false;
    }
    let words = lower_words(text);
    match words.first() {
        Some(first) => words.iter().filter(|w| *w == first).count() > 2,
        None => false,
    }
}

// "MOWINGEDGINGBLOWING"
fn shouted_concatenation(text: &str) -> bool {
    text.chars().count() > 20
        && text
            .split_whitespace()
            .any(|w| w.chars().count() > 10 && is_shouted(w))
}

// Every cased character upper-case, and at least one cased; punctuation and
// digits are ignored.
fn is_shouted(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

fn long_mixed_case_runs(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    let long = words
        .iter()
        .filter(|w| w.chars().count() > 15 && w.chars().any(char::is_uppercase))
        .count();
    long * 2 > words.len()
}

fn name_glued_to_title(text: &str) -> bool {
    text.split_whitespace()
        .any(|w| w.chars().count() > 8 && GLUED_WORD_RE.is_match(w))
}
