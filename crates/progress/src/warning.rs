//! Data-integrity warnings surfaced alongside computed results.

use serde::Serialize;
use sprout_core::AgeMonths;

/// A recoverable data problem found while computing a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// Catalog entry with an importance outside high/medium/low. Scored with weight 1.
    UnknownImportance {
        /// Area key
        area: String,
        /// Milestone key
        milestone: String,
        /// The unrecognized value
        value: String,
    },

    /// Recorded observation whose area or milestone is not in the catalog.
    OrphanObservation {
        /// Age bucket
        age: AgeMonths,
        /// Area key
        area: String,
        /// Milestone key
        milestone: String,
    },
}

impl std::fmt::Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataWarning::UnknownImportance { area, milestone, value } => {
                write!(f, "milestone {}/{} has unknown importance '{}'", area, milestone, value)
            }
            DataWarning::OrphanObservation { age, area, milestone } => {
                write!(f, "observation {}m/{}/{} is not in the catalog", age, area, milestone)
            }
        }
    }
}
