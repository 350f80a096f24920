use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::parser::page::truncate_chars;

pub const MAX_BIO_CHARS: usize = 500;
pub const MAX_TESTIMONIAL_CHARS: usize = 500;
pub const MIN_TESTIMONIAL_CHARS: usize = 20;
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

pub const MAX_FOUNDERS: usize = 10;
pub const MAX_TEAM_MEMBERS: usize = 20;
pub const MAX_TESTIMONIALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub title: String,
    pub bio: String,
}

impl PersonRecord {
    /// `None` unless the name is 2-50 characters. The bio is cut to 500.
    pub fn new(name: &str, title: &str, bio: &str) -> Option<Self> {
        let name = name.trim();
        if !(2..=50).contains(&name.chars().count()) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            title: title.trim().to_string(),
            bio: truncate_chars(bio.trim(), MAX_BIO_CHARS),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestimonialRecord {
    pub text: String,
    pub author: String,
}

impl TestimonialRecord {
    /// `None` for quotes of 20 characters or fewer.
    pub fn new(text: &str, author: Option<&str>) -> Option<Self> {
        let text = text.trim();
        if text.chars().count() <= MIN_TESTIMONIAL_CHARS {
            return None;
        }
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);
        Some(Self {
            text: truncate_chars(text, MAX_TESTIMONIAL_CHARS),
            author: author.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactInfo {
    /// Keys present in `later` overwrite ours.
    pub fn overwrite_with(&mut self, later: ContactInfo) {
        if later.email.is_some() {
            self.email = later.email;
        }
        if later.phone.is_some() {
            self.phone = later.phone;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// What one page contributed. Consumed immediately by [`CompanyProfile::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub url: String,
    pub company_name: Option<String>,
    pub founders: Vec<PersonRecord>,
    pub team_members: Vec<PersonRecord>,
    pub testimonials: Vec<TestimonialRecord>,
    pub about: Option<String>,
    pub mission: Option<String>,
    pub contact: ContactInfo,
}

impl PageResult {
    pub fn has_data(&self) -> bool {
        !self.founders.is_empty()
            || !self.team_members.is_empty()
            || !self.testimonials.is_empty()
            || self.about.is_some()
            || self.mission.is_some()
            || !self.contact.is_empty()
    }
}

/// Aggregate for one site: the ordered fold of its [`PageResult`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub url: String,
    pub founders: Vec<PersonRecord>,
    pub team_members: Vec<PersonRecord>,
    pub testimonials: Vec<TestimonialRecord>,
    pub about: Option<String>,
    pub mission: Option<String>,
    pub contact_info: ContactInfo,
    pub scraped_at: NaiveDateTime,
}

impl CompanyProfile {
    pub fn empty(url: &str) -> Self {
        Self {
            company_name: String::new(),
            url: url.to_string(),
            founders: Vec::new(),
            team_members: Vec::new(),
            testimonials: Vec::new(),
            about: None,
            mission: None,
            contact_info: ContactInfo::default(),
            scraped_at: Local::now().naive_local(),
        }
    }

    /// Reducer: first non-empty name/about/mission wins, people and
    /// testimonials append with structural dedup up to their caps, contact
    /// keys are last-writer-wins.
    pub fn merge(mut self, page: PageResult) -> Self {
        if self.company_name.is_empty() {
            if let Some(name) = page.company_name.filter(|n| !n.trim().is_empty()) {
                self.company_name = name;
            }
        }
        if self.about.is_none() {
            self.about = page.about.filter(|a| !a.is_empty());
        }
        if self.mission.is_none() {
            self.mission = page.mission.filter(|m| !m.is_empty());
        }

        append_unique(&mut self.founders, page.founders, MAX_FOUNDERS);
        append_unique(&mut self.team_members, page.team_members, MAX_TEAM_MEMBERS);
        append_unique(&mut self.testimonials, page.testimonials, MAX_TESTIMONIALS);

        self.contact_info.overwrite_with(page.contact);
        self
    }

    /// Applies the fallback name and stamps the completion time.
    pub fn finish(mut self) -> Self {
        if self.company_name.trim().is_empty() {
            self.company_name = UNKNOWN_COMPANY.to_string();
        }
        self.scraped_at = Local::now().naive_local();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.founders.is_empty()
            && self.team_members.is_empty()
            && self.testimonials.is_empty()
            && self.about.is_none()
            && self.mission.is_none()
            && self.contact_info.is_empty()
    }
}

/// Folds pages in the given order into a finished profile.
pub fn fold_pages(url: &str, pages: impl IntoIterator<Item = PageResult>) -> CompanyProfile {
    pages
        .into_iter()
        .fold(CompanyProfile::empty(url), CompanyProfile::merge)
        .finish()
}

// Dedup happens before the cap: a duplicate never takes a slot.
fn append_unique<T: PartialEq>(acc: &mut Vec<T>, items: Vec<T>, cap: usize) {
    for item in items {
        if acc.len() >= cap {
            break;
        }
        if !acc.contains(&item) {
            acc.push(item);
        }
    }
}
