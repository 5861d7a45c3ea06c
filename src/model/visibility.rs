//! Input model for the visibility audit report.

use serde::Deserialize;

use crate::input::{lenient, lenient_option, lenient_seq};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisibilityReport {
    /// `monthly` or `weekly`; anything else is treated as weekly.
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: String,
    #[serde(deserialize_with = "lenient")]
    pub period: String,
    #[serde(deserialize_with = "lenient")]
    pub generated_at: String,
    #[serde(deserialize_with = "lenient")]
    pub metrics: VisibilityMetrics,
    #[serde(deserialize_with = "lenient_seq")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "lenient_seq")]
    pub engine_performance: Vec<EnginePerformance>,
    #[serde(deserialize_with = "lenient_seq")]
    pub top_queries: Vec<QueryPerformance>,
    #[serde(deserialize_with = "lenient_seq")]
    pub worst_queries: Vec<QueryPerformance>,
    #[serde(deserialize_with = "lenient_option")]
    pub ai_analysis: Option<AiAnalysis>,
}

impl VisibilityReport {
    pub fn is_monthly(&self) -> bool {
        self.kind == "monthly"
    }

    /// The AI analysis block, if present and carrying any content.
    pub fn ai(&self) -> Option<&AiAnalysis> {
        self.ai_analysis.as_ref().filter(|ai| !ai.is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisibilityMetrics {
    #[serde(deserialize_with = "lenient")]
    pub citation_rate: f64,
    #[serde(deserialize_with = "lenient")]
    pub citation_rate_change: f64,
    #[serde(deserialize_with = "lenient")]
    pub total_tests: f64,
    #[serde(deserialize_with = "lenient")]
    pub share_of_voice: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnginePerformance {
    #[serde(deserialize_with = "lenient")]
    pub engine: String,
    #[serde(deserialize_with = "lenient")]
    pub citation_rate: f64,
    #[serde(deserialize_with = "lenient")]
    pub total_tests: f64,
    #[serde(deserialize_with = "lenient")]
    pub change: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryPerformance {
    #[serde(deserialize_with = "lenient")]
    pub query: String,
    #[serde(deserialize_with = "lenient")]
    pub citation_rate: f64,
}

/// Narrative analysis produced by an LLM for the reporting period.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiAnalysis {
    #[serde(deserialize_with = "lenient")]
    pub summary: String,
    #[serde(deserialize_with = "lenient_seq")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "lenient_seq")]
    pub category_analysis: Vec<CategoryAnalysis>,
    #[serde(deserialize_with = "lenient")]
    pub competitor_analysis: String,
    #[serde(deserialize_with = "lenient_seq")]
    pub action_items: Vec<String>,
}

impl AiAnalysis {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.highlights.is_empty()
            && self.category_analysis.is_empty()
            && self.competitor_analysis.is_empty()
            && self.action_items.is_empty()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryAnalysis {
    #[serde(deserialize_with = "lenient")]
    pub category: String,
    #[serde(deserialize_with = "lenient")]
    pub citation_rate: f64,
    #[serde(deserialize_with = "lenient")]
    pub insight: String,
}
