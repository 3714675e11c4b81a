//! Recommendation generation.
//!
//! Unlike scoring, everything here looks only at age-appropriate milestones.

use serde::Serialize;
use sprout_core::{AgeMonths, Importance, MilestoneCatalog, ObservationStatus, ObservationStore};
use tracing::debug;
use crate::scoring::{format_percent, ratio_percent};

/// Area label used for the overall recommendation.
pub const OVERALL_AREA: &str = "overall";

/// Category of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Area is below half completion
    Warning,
    /// High importance milestones still open in an area
    Priority,
    /// Overall completion at or above 75%
    Success,
    /// Overall completion below 40%
    Alert,
}

impl RecommendationKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Warning => "warning",
            RecommendationKind::Priority => "priority",
            RecommendationKind::Success => "success",
            RecommendationKind::Alert => "alert",
        }
    }
}

/// A single recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Category
    pub kind: RecommendationKind,
    /// Area key, or [`OVERALL_AREA`]
    pub area: String,
    /// Message text
    pub message: String,
    /// Milestone descriptions, for priority recommendations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

/// Age-appropriate statistics for one area.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AreaStats {
    /// Area key
    pub area: String,
    /// Age-appropriate milestones
    pub total: usize,
    /// Of those, achieved
    pub achieved: usize,
    /// Descriptions of open milestones below high importance
    pub pending: Vec<String>,
    /// Descriptions of open high importance milestones
    pub critical: Vec<String>,
}

impl AreaStats {
    /// Completion percentage, 0 when the area has nothing age-appropriate.
    pub fn percentage(&self) -> f64 {
        ratio_percent(self.achieved, self.total)
    }

    /// Strictly below half complete.
    pub fn needs_focus(&self) -> bool {
        self.achieved * 2 < self.total
    }
}

/// Per-area statistics over age-appropriate milestones, in catalog order.
///
/// Every catalog area is listed, including areas with nothing age-appropriate.
pub fn area_stats(catalog: &MilestoneCatalog, store: &ObservationStore, age: AgeMonths) -> Vec<AreaStats> {
    catalog
        .areas()
        .iter()
        .map(|area| {
            let mut stats = AreaStats {
                area: area.key.clone(),
                ..Default::default()
            };
            for milestone in area.milestones.iter().filter(|m| m.typical_age_range.contains(age)) {
                stats.total += 1;
                match store.status(age, &area.key, &milestone.key) {
                    ObservationStatus::Achieved => stats.achieved += 1,
                    ObservationStatus::NotYet | ObservationStatus::NotApplicable | ObservationStatus::Unset => {
                        if milestone.importance == Importance::High {
                            stats.critical.push(milestone.description.clone());
                        } else {
                            stats.pending.push(milestone.description.clone());
                        }
                    }
                }
            }
            stats
        })
        .collect()
}

/// Age-appropriate completion across the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Completion {
    /// Age-appropriate milestones
    pub total: usize,
    /// Of those, achieved
    pub achieved: usize,
}

impl Completion {
    /// Sum the per-area statistics.
    pub fn from_areas(stats: &[AreaStats]) -> Self {
        stats.iter().fold(Self::default(), |acc, s| Self {
            total: acc.total + s.total,
            achieved: acc.achieved + s.achieved,
        })
    }

    /// Completion percentage, 0 when nothing is age-appropriate.
    pub fn percentage(&self) -> f64 {
        ratio_percent(self.achieved, self.total)
    }

    /// At or above 75%.
    pub fn is_success(&self) -> bool {
        self.total > 0 && self.achieved * 4 >= self.total * 3
    }

    /// Below 40%. An empty total counts as 0%.
    pub fn is_alert(&self) -> bool {
        self.achieved * 5 < self.total * 2 || self.total == 0
    }
}

/// Build recommendations for a child at `age`.
///
/// Area recommendations come first in catalog order, the overall one last.
/// An empty list means nothing needs attention.
pub fn recommend(catalog: &MilestoneCatalog, store: &ObservationStore, age: AgeMonths) -> Vec<Recommendation> {
    let stats = area_stats(catalog, store, age);
    let mut recommendations = Vec::new();

    for area in stats.iter().filter(|s| s.total > 0) {
        let name = display_name(&area.area);

        if area.needs_focus() {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Warning,
                area: area.area.clone(),
                message: format!(
                    "Focus needed in {}. Only {}% of age-appropriate milestones achieved.",
                    name,
                    format_percent(area.achieved, area.total)
                ),
                items: None,
            });
        }

        if !area.critical.is_empty() {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Priority,
                area: area.area.clone(),
                message: format!("Priority milestones to work on in {}:", name),
                items: Some(area.critical.clone()),
            });
        }
    }

    let overall = Completion::from_areas(&stats);
    if overall.is_success() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Success,
            area: OVERALL_AREA.to_string(),
            message: format!(
                "Great progress! {}% of age-appropriate milestones achieved.",
                format_percent(overall.achieved, overall.total)
            ),
            items: None,
        });
    } else if overall.is_alert() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Alert,
            area: OVERALL_AREA.to_string(),
            message: format!(
                "Consider consulting a development specialist. Overall progress is {}%.",
                format_percent(overall.achieved, overall.total)
            ),
            items: None,
        });
    }

    debug!(
        "Generated {} recommendations at {} months ({}/{} age-appropriate achieved)",
        recommendations.len(),
        age,
        overall.achieved,
        overall.total
    );
    recommendations
}

/// `gross_motor` → `gross motor`.
pub fn display_name(area: &str) -> String {
    area.replace('_', " ").to_lowercase()
}
