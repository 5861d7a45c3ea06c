//! Input model for the AI insights report.

use serde::Deserialize;
use serde_json::Value;

use crate::input::{lenient, lenient_seq};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightsReport {
    #[serde(deserialize_with = "lenient")]
    pub brand_name: String,
    #[serde(deserialize_with = "lenient")]
    pub metadata: InsightsMetadata,
    #[serde(deserialize_with = "lenient_seq")]
    pub common_keywords: Vec<Keyword>,
    #[serde(deserialize_with = "lenient_seq")]
    pub category_insights: Vec<CategoryInsight>,
    #[serde(deserialize_with = "lenient")]
    pub citation_patterns: CitationPatterns,
    #[serde(deserialize_with = "lenient_seq")]
    pub content_gaps: Vec<ContentGap>,
    #[serde(deserialize_with = "lenient_seq")]
    pub actionable_insights: Vec<ActionableInsight>,
}

impl InsightsReport {
    /// Share of cited responses, rounded to a whole percent; 0 without responses.
    pub fn citation_rate(&self) -> f64 {
        let total = self.metadata.total_responses;
        if total > 0.0 {
            (self.metadata.cited_responses / total * 100.0).round()
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightsMetadata {
    #[serde(deserialize_with = "lenient")]
    pub analyzed_at: String,
    #[serde(deserialize_with = "lenient")]
    pub total_responses: f64,
    #[serde(deserialize_with = "lenient")]
    pub cited_responses: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Keyword {
    #[serde(deserialize_with = "lenient")]
    pub keyword: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryInsight {
    #[serde(deserialize_with = "lenient")]
    pub category: String,
    #[serde(deserialize_with = "lenient")]
    pub recommendation: String,
}

/// Response patterns observed with and without a citation.
///
/// Entries are usually strings but the producer sometimes emits objects, so
/// they are kept as raw JSON values.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CitationPatterns {
    #[serde(deserialize_with = "lenient_seq")]
    pub cited_patterns: Vec<Value>,
    #[serde(deserialize_with = "lenient_seq")]
    pub uncited_patterns: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentGap {
    #[serde(deserialize_with = "lenient")]
    pub area: String,
    #[serde(deserialize_with = "lenient")]
    pub recommendation: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionableInsight {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub priority: String,
}
