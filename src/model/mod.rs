//! Typed, read-only views over the report input payloads.
//!
//! Every struct derives `Default` and deserializes each field through
//! [`crate::input::lenient`], so a payload with missing, `null` or mistyped
//! keys still produces a usable value. Lists and keyed maps drop only their
//! unusable entries.

pub mod charts;
pub mod insights;
pub mod score;
pub mod visibility;

pub use charts::ChartInput;
pub use insights::InsightsReport;
pub use score::ScoreReport;
pub use visibility::VisibilityReport;
