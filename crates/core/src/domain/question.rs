use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::normalize::{join_tags, strip_markup};

/// Placeholder substituted with the question slug in problem URL templates.
pub const SLUG_PLACEHOLDER: &str = "{slug}";

pub const DEFAULT_PROBLEM_URL_TEMPLATE: &str = "https://leetcode.com/problems/{slug}/description/";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionSlug(pub String);

impl QuestionSlug {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for QuestionSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub slug: QuestionSlug,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown(String),
}

impl Difficulty {
    /// Labels are matched exactly as LeetCode spells them; anything else is kept verbatim.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Easy" => Self::Easy,
            "Medium" => Self::Medium,
            "Hard" => Self::Hard,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unknown(label) => label,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Difficulty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicTag {
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionDetail {
    pub id: String,
    pub frontend_id: String,
    pub title: String,
    pub slug: QuestionSlug,
    pub raw_content: Option<String>,
    pub is_paid_only: bool,
    pub difficulty: Difficulty,
    pub likes: i64,
    pub dislikes: i64,
    pub tags: Vec<TopicTag>,
}

impl QuestionDetail {
    /// The number shown on the problem page, falling back to the internal id.
    pub fn display_id(&self) -> &str {
        if self.frontend_id.trim().is_empty() {
            &self.id
        } else {
            &self.frontend_id
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub id: String,
    pub title: String,
    pub slug: QuestionSlug,
    pub content: Option<String>,
    pub is_paid_only: bool,
    pub difficulty: Difficulty,
    pub likes: i64,
    pub dislikes: i64,
    pub tags: String,
    pub question_url: String,
}

impl DisplayRecord {
    pub fn from_detail(detail: QuestionDetail, url_template: &str) -> Self {
        let question_url = problem_url(url_template, &detail.slug);
        Self {
            id: detail.display_id().to_owned(),
            content: strip_markup(detail.raw_content.as_deref()),
            tags: join_tags(&detail.tags),
            title: detail.title,
            slug: detail.slug,
            is_paid_only: detail.is_paid_only,
            difficulty: detail.difficulty,
            likes: detail.likes,
            dislikes: detail.dislikes,
            question_url,
        }
    }
}

pub fn problem_url(template: &str, slug: &QuestionSlug) -> String {
    template.replace(SLUG_PLACEHOLDER, slug.as_str())
}
