//! Input model for the score audit report.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::input::{lenient, lenient_map, lenient_seq};

/// Top-level score audit payload.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreReport {
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub analyzed_at: String,
    #[serde(deserialize_with = "lenient")]
    pub total_score: f64,
    #[serde(deserialize_with = "lenient")]
    pub grade: String,
    #[serde(deserialize_with = "lenient_seq")]
    pub pages: Vec<Page>,
    /// Categories keyed by their identifier, in input order.
    #[serde(deserialize_with = "lenient_map")]
    pub categories: IndexMap<String, Category>,
    #[serde(deserialize_with = "lenient_seq")]
    pub recommendations: Vec<Recommendation>,
}

impl ScoreReport {
    /// Grade shown on the report; `F` when the payload does not carry one.
    pub fn grade_or_default(&self) -> &str {
        if self.grade.is_empty() {
            "F"
        } else {
            &self.grade
        }
    }
}

/// A crawled page and its per-category scores.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub scores: PageScores,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageScores {
    #[serde(deserialize_with = "lenient")]
    pub structure: f64,
    #[serde(deserialize_with = "lenient")]
    pub schema: f64,
    #[serde(deserialize_with = "lenient")]
    pub url: f64,
    #[serde(deserialize_with = "lenient")]
    pub meta: f64,
    #[serde(deserialize_with = "lenient")]
    pub total: f64,
}

/// Aggregated score of one analysis category.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "lenient")]
    pub score: f64,
    #[serde(deserialize_with = "lenient")]
    pub max_score: f64,
    #[serde(deserialize_with = "lenient")]
    pub percentage: f64,
    #[serde(deserialize_with = "lenient_seq")]
    pub items: Vec<CategoryItem>,
}

/// A single check inside a category.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryItem {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub score: f64,
    #[serde(deserialize_with = "lenient")]
    pub max_score: f64,
    #[serde(deserialize_with = "lenient")]
    pub passed: bool,
    #[serde(deserialize_with = "lenient")]
    pub detail: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    #[serde(deserialize_with = "lenient")]
    pub priority: String,
    #[serde(deserialize_with = "lenient")]
    pub category: String,
    #[serde(deserialize_with = "lenient")]
    pub issue: String,
}
