//! Age filtering - which milestones apply at a given age.

use serde::Serialize;
use sprout_core::{
    AgeMonths, AgeRange, Importance, MilestoneCatalog, MilestoneDefinition, ObservationRecord,
    ObservationStore,
};

/// Milestones whose typical range contains `age`, as `(area, milestone)`.
///
/// Grouped by area in catalog order, then milestone declaration order.
pub fn age_appropriate(catalog: &MilestoneCatalog, age: AgeMonths) -> Vec<(&str, &MilestoneDefinition)> {
    catalog
        .iter()
        .filter(|(_, m)| m.typical_age_range.contains(age))
        .collect()
}

/// One row of the age-appropriate checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistEntry {
    /// Area key
    pub area: String,
    /// Milestone key
    pub milestone: String,
    /// Milestone description
    pub description: String,
    /// Typical age range
    pub typical_age_range: AgeRange,
    /// Importance tier
    pub importance: Importance,
    /// Current record at this age, default when nothing was recorded
    pub record: ObservationRecord,
}

/// Age-appropriate milestones joined with what was recorded at `age`.
pub fn checklist(catalog: &MilestoneCatalog, store: &ObservationStore, age: AgeMonths) -> Vec<ChecklistEntry> {
    age_appropriate(catalog, age)
        .into_iter()
        .map(|(area, m)| ChecklistEntry {
            area: area.to_string(),
            milestone: m.key.clone(),
            description: m.description.clone(),
            typical_age_range: m.typical_age_range,
            importance: m.importance.clone(),
            record: store.get(age, area, &m.key).cloned().unwrap_or_default(),
        })
        .collect()
}
