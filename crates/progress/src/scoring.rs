//! Readiness scoring.
//!
//! Two numbers come out of here and they are not interchangeable: the
//! readiness percentage is weighted by importance, while the per-area counts
//! are raw achieved/total tallies. Both run over the whole catalog, not only
//! the age-appropriate part.

use serde::Serialize;
use sprout_core::{AgeMonths, Importance, MilestoneCatalog, ObservationStore};
use tracing::{debug, warn};
use crate::warning::DataWarning;

/// Raw achieved/total count for one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaCount {
    /// Area key
    pub area: String,
    /// Milestones defined for the area
    pub total: usize,
    /// Milestones achieved
    pub achieved: usize,
}

impl AreaCount {
    /// Completion percentage, 0 when the area is empty.
    pub fn percentage(&self) -> f64 {
        ratio_percent(self.achieved, self.total)
    }
}

/// Weighted readiness result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReadinessScore {
    /// Sum of weights of achieved milestones
    pub score: u32,
    /// Sum of all weights
    pub max_score: u32,
    /// `round(100 * score / max_score)`, 0 when `max_score` is 0
    pub percentage: u32,
    /// Raw counts per area in catalog order
    pub per_area: Vec<AreaCount>,
    /// Data problems found while scoring
    pub warnings: Vec<DataWarning>,
}

impl ReadinessScore {
    /// Counts for one area.
    pub fn area(&self, key: &str) -> Option<&AreaCount> {
        self.per_area.iter().find(|a| a.area == key)
    }
}

/// Score the catalog against observations recorded at `age`.
pub fn score(catalog: &MilestoneCatalog, store: &ObservationStore, age: AgeMonths) -> ReadinessScore {
    let mut result = ReadinessScore::default();

    for area in catalog.areas() {
        let mut count = AreaCount {
            area: area.key.clone(),
            total: 0,
            achieved: 0,
        };

        for milestone in &area.milestones {
            if let Importance::Unknown(value) = &milestone.importance {
                warn!("Milestone {}/{} has unknown importance '{}'", area.key, milestone.key, value);
                result.warnings.push(DataWarning::UnknownImportance {
                    area: area.key.clone(),
                    milestone: milestone.key.clone(),
                    value: value.clone(),
                });
            }

            let weight = milestone.importance.weight();
            result.max_score += weight;
            count.total += 1;

            if store.status(age, &area.key, &milestone.key).is_achieved() {
                result.score += weight;
                count.achieved += 1;
            }
        }

        result.per_area.push(count);
    }

    result.percentage = if result.max_score > 0 {
        (f64::from(result.score) * 100.0 / f64::from(result.max_score)).round() as u32
    } else {
        0
    };

    debug!(
        "Readiness at {} months: {}/{} ({}%)",
        age, result.score, result.max_score, result.percentage
    );
    result
}

/// Achieved/total for one importance tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TierCount {
    /// Milestones in the tier
    pub total: usize,
    /// Milestones achieved
    pub achieved: usize,
}

/// Per-tier counts over the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImportanceBreakdown {
    /// High importance
    pub high: TierCount,
    /// Medium importance
    pub medium: TierCount,
    /// Low importance, including unrecognized tiers
    pub low: TierCount,
}

/// Count achieved milestones per importance tier at `age`.
pub fn importance_breakdown(
    catalog: &MilestoneCatalog,
    store: &ObservationStore,
    age: AgeMonths,
) -> ImportanceBreakdown {
    let mut breakdown = ImportanceBreakdown::default();
    for (area, milestone) in catalog.iter() {
        let tier = match milestone.importance {
            Importance::High => &mut breakdown.high,
            Importance::Medium => &mut breakdown.medium,
            Importance::Low | Importance::Unknown(_) => &mut breakdown.low,
        };
        tier.total += 1;
        if store.status(age, area, &milestone.key).is_achieved() {
            tier.achieved += 1;
        }
    }
    breakdown
}

/// `100 * part / whole`, 0 when `whole` is 0.
pub(crate) fn ratio_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part * 100) as f64 / whole as f64
    }
}

/// `100 * part / whole` to one decimal, halves rounded up. `"0.0"` when `whole` is 0.
///
/// Works in integer tenths, so `1/16` reads `6.3` rather than the `6.2`
/// that float formatting gives for the exact tie.
pub fn format_percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0".to_string();
    }
    let tenths = (part * 2000 + whole) / (2 * whole);
    format!("{}.{}", tenths / 10, tenths % 10)
}
