//! Input model for the chart program.
//!
//! The series keys accept two shapes: an object of parallel arrays
//! (`{"engines": [...], "citationRates": [...]}`) or an array of row objects
//! (`[{"engine": "gpt", "citationRate": 61}]`).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ReportError;
use crate::input::{lenient_option, value_text};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartInput {
    #[serde(deserialize_with = "lenient_option")]
    pub trend: Option<SeriesInput>,
    #[serde(deserialize_with = "lenient_option")]
    pub engine_performance: Option<SeriesInput>,
    #[serde(deserialize_with = "lenient_option")]
    pub category_distribution: Option<SeriesInput>,
    #[serde(deserialize_with = "lenient_option")]
    pub top_queries: Option<SeriesInput>,
    #[serde(deserialize_with = "lenient_option")]
    pub metrics: Option<Map<String, Value>>,
}

/// One labelled value of a chart series.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SeriesInput {
    Rows(Vec<SeriesRow>),
    Columns(SeriesColumns),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeriesRow {
    #[serde(alias = "date", alias = "engine", alias = "category", alias = "query")]
    pub label: Value,
    #[serde(alias = "citationRate")]
    pub value: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeriesColumns {
    #[serde(
        alias = "dates",
        alias = "engines",
        alias = "categories",
        alias = "queries"
    )]
    pub labels: Vec<Value>,
    #[serde(alias = "citationRates")]
    pub values: Vec<f64>,
}

impl SeriesInput {
    /// Flattens either shape into data points.
    ///
    /// Parallel arrays of different lengths are rejected.
    pub fn points(&self) -> Result<Vec<DataPoint>, ReportError> {
        match self {
            SeriesInput::Rows(rows) => Ok(rows
                .iter()
                .map(|row| DataPoint::new(value_text(&row.label), row.value))
                .collect()),
            SeriesInput::Columns(columns) => {
                if columns.labels.len() != columns.values.len() {
                    return Err(ReportError::render(format!(
                        "{} labels but {} values",
                        columns.labels.len(),
                        columns.values.len()
                    )));
                }
                Ok(columns
                    .labels
                    .iter()
                    .zip(&columns.values)
                    .map(|(label, value)| DataPoint::new(value_text(label), *value))
                    .collect())
            }
        }
    }
}

/// Resolves an optional series, reporting `None` when it is absent or empty.
pub fn resolve_series(series: Option<&SeriesInput>) -> Result<Option<Vec<DataPoint>>, ReportError> {
    match series {
        None => Ok(None),
        Some(series) => {
            let points = series.points()?;
            Ok(if points.is_empty() { None } else { Some(points) })
        }
    }
}

/// Headline numbers for the metrics summary chart.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryMetrics {
    pub citation_rate: f64,
    pub citation_rate_change: f64,
    pub total_tests: f64,
    pub avg_rank: f64,
    pub share_of_voice: f64,
}

impl SummaryMetrics {
    const KEYS: [&'static str; 5] = [
        "citationRate",
        "citationRateChange",
        "totalTests",
        "avgRank",
        "shareOfVoice",
    ];

    pub fn sample() -> Self {
        Self {
            citation_rate: 58.0,
            citation_rate_change: 5.2,
            total_tests: 156.0,
            avg_rank: 3.2,
            share_of_voice: 42.0,
        }
    }

    /// Reads the metrics object, accepting both `{"metrics": {...}}` and a flat
    /// object. Returns `None` when no known metric key is present.
    ///
    /// Missing keys fall back to the sample values, except the change which
    /// defaults to zero once real metrics are given.
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let values = match object.get("metrics") {
            Some(Value::Object(nested)) => nested,
            _ => object,
        };
        if !Self::KEYS.iter().any(|key| values.contains_key(*key)) {
            return None;
        }
        let number = |key: &str, fallback: f64| values.get(key).and_then(Value::as_f64).unwrap_or(fallback);
        let sample = Self::sample();
        Some(Self {
            citation_rate: number("citationRate", sample.citation_rate),
            citation_rate_change: number("citationRateChange", 0.0),
            total_tests: number("totalTests", sample.total_tests),
            avg_rank: number("avgRank", sample.avg_rank),
            share_of_voice: number("shareOfVoice", sample.share_of_voice),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_json;

    #[test]
    fn column_and_row_shapes_agree() {
        let input: ChartInput = parse_json(
            r#"{
                "enginePerformance": {"engines": ["gpt", "claude"], "citationRates": [61, 44]},
                "topQueries": [{"query": "best crm", "citationRate": 72}, {"query": "crm pricing", "citationRate": 28}]
            }"#,
        )
        .expect("parse succeeds");

        let engines = resolve_series(input.engine_performance.as_ref())
            .expect("valid series")
            .expect("series present");
        assert_eq!(engines, vec![DataPoint::new("gpt", 61.0), DataPoint::new("claude", 44.0)]);

        let queries = resolve_series(input.top_queries.as_ref())
            .expect("valid series")
            .expect("series present");
        assert_eq!(queries[1], DataPoint::new("crm pricing", 28.0));
    }

    #[test]
    fn missing_or_empty_series_resolve_to_none() {
        let input: ChartInput =
            parse_json(r#"{"trend": {"dates": [], "citationRates": []}}"#).expect("parse succeeds");
        assert!(resolve_series(input.trend.as_ref()).expect("valid").is_none());
        assert!(resolve_series(input.category_distribution.as_ref())
            .expect("valid")
            .is_none());
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let input: ChartInput =
            parse_json(r#"{"trend": {"dates": ["w1", "w2"], "citationRates": [40]}}"#)
                .expect("parse succeeds");
        assert!(resolve_series(input.trend.as_ref()).is_err());
    }

    #[test]
    fn metrics_accept_nested_and_flat_objects() {
        let nested: ChartInput =
            parse_json(r#"{"metrics": {"metrics": {"citationRate": 61, "totalTests": 20}}}"#)
                .expect("parse succeeds");
        let metrics = SummaryMetrics::from_object(nested.metrics.as_ref().expect("present"))
            .expect("known keys");
        assert_eq!(metrics.citation_rate, 61.0);
        assert_eq!(metrics.total_tests, 20.0);
        assert_eq!(metrics.citation_rate_change, 0.0);
        assert_eq!(metrics.share_of_voice, 42.0);

        let flat: ChartInput =
            parse_json(r#"{"metrics": {"shareOfVoice": 12}}"#).expect("parse succeeds");
        let metrics = SummaryMetrics::from_object(flat.metrics.as_ref().expect("present"))
            .expect("known keys");
        assert_eq!(metrics.share_of_voice, 12.0);
    }

    #[test]
    fn metrics_without_known_keys_are_absent() {
        let input: ChartInput = parse_json(r#"{"metrics": {"other": 1}}"#).expect("parse succeeds");
        assert!(SummaryMetrics::from_object(input.metrics.as_ref().expect("present")).is_none());
    }
}
