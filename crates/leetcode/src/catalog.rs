use leetdraw_core::{QuestionSlug, QuestionSummary};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    pub stat_status_pairs: Vec<StatStatusPair>,
}

#[derive(Debug, Deserialize)]
pub struct StatStatusPair {
    pub stat: QuestionStat,
}

#[derive(Debug, Deserialize)]
pub struct QuestionStat {
    #[serde(rename = "question__title_slug")]
    pub title_slug: String,
}

impl CatalogResponse {
    /// Blank slugs are dropped; catalog order is kept.
    pub fn into_summaries(self) -> Vec<QuestionSummary> {
        self.stat_status_pairs
            .into_iter()
            .map(|pair| QuestionSlug::new(pair.stat.title_slug))
            .filter(|slug| !slug.is_blank())
            .map(|slug| QuestionSummary { slug })
            .collect()
    }

    pub fn into_slugs(self) -> Vec<QuestionSlug> {
        self.into_summaries().into_iter().map(|summary| summary.slug).collect()
    }
}
