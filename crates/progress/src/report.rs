//! Combined progress report for the current child.

use serde::Serialize;
use sprout_core::{AgeMonths, ChildProfile, FullState, MilestoneCatalog};
use crate::recommend::{area_stats, recommend, AreaStats, Completion, Recommendation};
use crate::scoring::{importance_breakdown, score, ImportanceBreakdown, ReadinessScore};

/// Age-appropriate progress at the child's current age.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overview {
    /// Age bucket
    pub age: Option<AgeMonths>,
    /// Age-appropriate milestones achieved
    pub achieved: usize,
    /// Age-appropriate milestones
    pub total: usize,
    /// `100 * achieved / total`, 0 when total is 0
    pub completion_rate: f64,
}

/// Everything derived for the current child in one pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProgressReport {
    /// Profile the report was built for; `None` means nothing to show
    pub profile: Option<ChildProfile>,
    /// Age-appropriate overview
    pub overview: Overview,
    /// Weighted readiness over the full catalog
    pub readiness: ReadinessScore,
    /// Per-tier achieved counts
    pub importance: ImportanceBreakdown,
    /// Age-appropriate per-area statistics
    pub areas: Vec<AreaStats>,
    /// Recommendations, area ones first then overall
    pub recommendations: Vec<Recommendation>,
}

impl ProgressReport {
    /// Build a report from a state snapshot.
    ///
    /// Without a child profile the report is empty: zero scores, no areas
    /// and no recommendations.
    pub fn build(catalog: &MilestoneCatalog, state: &FullState) -> Self {
        let Some(profile) = state.child_info.clone() else {
            return Self::default();
        };
        let age = profile.current_age_months;
        let store = &state.tracking_data;

        let areas = area_stats(catalog, store, age);
        let completion = Completion::from_areas(&areas);

        Self {
            overview: Overview {
                age: Some(age),
                achieved: completion.achieved,
                total: completion.total,
                completion_rate: completion.percentage(),
            },
            readiness: score(catalog, store, age),
            importance: importance_breakdown(catalog, store, age),
            recommendations: recommend(catalog, store, age),
            areas,
            profile: Some(profile),
        }
    }

    /// Whether a profile was available.
    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }
}
