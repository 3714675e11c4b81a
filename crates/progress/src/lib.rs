//! Milestone progress and recommendations.
//!
//! Age filtering, weighted readiness scoring, recommendation rules and the
//! historical summary. Every function here is a pure computation over a
//! catalog and an observation snapshot; [`tracker`] wires them to storage.

#![warn(missing_docs)]

pub mod filter;
pub mod recommend;
pub mod report;
pub mod scoring;
pub mod summary;
pub mod tracker;
pub mod warning;

#[cfg(test)]
mod fixtures;

pub use filter::{age_appropriate, checklist, ChecklistEntry};
pub use recommend::{
    area_stats, display_name, recommend, AreaStats, Completion, Recommendation, RecommendationKind,
    OVERALL_AREA,
};
pub use report::{Overview, ProgressReport};
pub use scoring::{format_percent, importance_breakdown, score, AreaCount, ImportanceBreakdown, ReadinessScore, TierCount};
pub use summary::{summarize, AgeBucketCount, AreaObservations, RecentUpdate, Summary};
pub use tracker::{BasicProgressTracker, ProgressTracker};
pub use warning::DataWarning;
