use crate::parser::blocks::{segment, FOUNDER_WINDOW};
use crate::parser::noise::NoiseClassifier;
use crate::parser::page::Element;
use crate::profile::PersonRecord;

pub const FOUNDER_KEYWORDS: &[&str] = &[
    "founder",
    "ceo",
    "president",
    "owner",
    "co-founder",
    "partner",
    "general manager",
    "operations manager",
];

/// Blocks whose title or bio names a founding or leadership role.
pub fn extract(elements: &[Element], noise: &NoiseClassifier) -> Vec<PersonRecord> {
    segment(elements, &FOUNDER_WINDOW, noise)
        .into_iter()
        .filter(|b| has_founder_role(&b.title, &b.bio()))
        .filter_map(|b| b.into_person())
        .collect()
}

fn has_founder_role(title: &str, bio: &str) -> bool {
    let haystack = format!("{} {}", title, bio).to_lowercase();
    FOUNDER_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::page::Tag;

    #[test]
    fn role_keyword_gate() {
        let els = vec![
            Element::new(Tag::Heading(3), "Jane Doe"),
            Element::new(Tag::Block, "Co-Founder"),
            Element::new(Tag::Heading(3), "Mark Lee"),
            Element::new(Tag::Block, "Lawn Technician"),
            Element::new(Tag::Heading(3), "Ana Ruiz"),
            Element::new(Tag::Block, "Account Lead"),
            Element::new(
                Tag::Paragraph,
                "Ana became a partner in the business when it opened its second branch.",
            ),
        ];
        let founders = extract(&els, &NoiseClassifier::default());
        let names: Vec<&str> = founders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "Ana Ruiz"]);
        assert_eq!(founders[0].title, "Co-Founder");
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(has_founder_role("GENERAL MANAGER", ""));
        assert!(has_founder_role("", "She has been CEO since 2015."));
        assert!(!has_founder_role("Lawn Technician", "Mows on Tuesdays."));
    }
}
