//! Historical summary over every recorded observation.

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::Serialize;
use sprout_core::{AgeMonths, MilestoneCatalog, ObservationStatus, ObservationStore};
use tracing::warn;
use crate::warning::DataWarning;

/// Observation counts for one area, across all age buckets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AreaObservations {
    /// Records in the area
    pub total: usize,
    /// Records marked achieved
    pub achieved: usize,
    /// Records marked not yet
    pub not_yet: usize,
}

/// Observation counts for one age bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AgeBucketCount {
    /// Records at this age
    pub total: usize,
    /// Records marked achieved
    pub achieved: usize,
}

/// A dated observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentUpdate {
    /// Day recorded
    pub date: NaiveDate,
    /// Age bucket
    pub age: AgeMonths,
    /// Area key
    pub area: String,
    /// Milestone key
    pub milestone: String,
    /// Catalog description, absent for observations the catalog no longer defines
    pub description: Option<String>,
}

/// Aggregate view of the observation history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Number of records
    pub total_observations: usize,
    /// Counts per area
    pub per_area: BTreeMap<String, AreaObservations>,
    /// Dated records, newest first
    pub recent_updates: Vec<RecentUpdate>,
    /// Counts per age bucket
    pub per_age_bucket: BTreeMap<AgeMonths, AgeBucketCount>,
    /// Data problems found while aggregating
    pub warnings: Vec<DataWarning>,
}

impl Summary {
    /// Number of areas with at least one record.
    pub fn areas_tracked(&self) -> usize {
        self.per_area.len()
    }

    /// The `n` most recent updates.
    pub fn latest(&self, n: usize) -> &[RecentUpdate] {
        &self.recent_updates[..n.min(self.recent_updates.len())]
    }
}

/// Aggregate every recorded observation, whatever the child's current age.
///
/// Observations missing from the catalog are counted but carry no
/// description, and each produces a warning.
pub fn summarize(catalog: &MilestoneCatalog, store: &ObservationStore) -> Summary {
    let mut summary = Summary::default();

    for (age, area, milestone, record) in store.iter() {
        summary.total_observations += 1;

        let area_count = summary.per_area.entry(area.to_string()).or_default();
        let bucket = summary.per_age_bucket.entry(age).or_default();
        area_count.total += 1;
        bucket.total += 1;
        match record.observed {
            ObservationStatus::Achieved => {
                area_count.achieved += 1;
                bucket.achieved += 1;
            }
            ObservationStatus::NotYet => area_count.not_yet += 1,
            ObservationStatus::NotApplicable | ObservationStatus::Unset => {}
        }

        let definition = catalog.milestone(area, milestone);
        if definition.is_none() {
            warn!("Observation {}m/{}/{} is not in the catalog", age, area, milestone);
            summary.warnings.push(DataWarning::OrphanObservation {
                age,
                area: area.to_string(),
                milestone: milestone.to_string(),
            });
        }

        if let Some(date) = record.date_observed {
            summary.recent_updates.push(RecentUpdate {
                date,
                age,
                area: area.to_string(),
                milestone: milestone.to_string(),
                description: definition.map(|d| d.description.clone()),
            });
        }
    }

    summary.recent_updates.sort_by(|a, b| b.date.cmp(&a.date));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{day, motor_catalog, record, record_on};
    use sprout_core::FullState;

    #[test]
    fn test_counts_every_age_bucket() {
        let catalog = motor_catalog();
        let mut store = ObservationStore::new();
        record(&catalog, &mut store, 10, "motor", "walk", ObservationStatus::NotYet);
        record(&catalog, &mut store, 12, "motor", "walk", ObservationStatus::Achieved);
        record(&catalog, &mut store, 12, "motor", "kick", ObservationStatus::NotApplicable);

        let summary = summarize(&catalog, &store);
        assert_eq!(summary.total_observations, 3);
        assert_eq!(summary.areas_tracked(), 1);
        assert_eq!(
            summary.per_area["motor"],
            AreaObservations { total: 3, achieved: 1, not_yet: 1 }
        );
        assert_eq!(summary.per_age_bucket[&AgeMonths::new(10)], AgeBucketCount { total: 1, achieved: 0 });
        assert_eq!(summary.per_age_bucket[&AgeMonths::new(12)], AgeBucketCount { total: 2, achieved: 1 });
        // only the achieved record carries a date
        assert_eq!(summary.recent_updates.len(), 1);
        assert_eq!(summary.recent_updates[0].description.as_deref(), Some("Walks independently"));
    }

    #[test]
    fn test_recent_updates_newest_first_stable_on_ties() {
        let catalog = motor_catalog();
        let mut store = ObservationStore::new();
        record_on(&catalog, &mut store, 10, "motor", "kick", ObservationStatus::Achieved, day(3));
        record_on(&catalog, &mut store, 11, "motor", "walk", ObservationStatus::Achieved, day(5));
        record_on(&catalog, &mut store, 12, "motor", "kick", ObservationStatus::Achieved, day(3));
        record_on(&catalog, &mut store, 13, "motor", "walk", ObservationStatus::Achieved, day(1));

        let summary = summarize(&catalog, &store);
        let order: Vec<_> = summary
            .recent_updates
            .iter()
            .map(|u| (u.date, u.age.get()))
            .collect();
        assert_eq!(order, vec![(day(5), 11), (day(3), 10), (day(3), 12), (day(1), 13)]);

        assert_eq!(summary.latest(2).len(), 2);
        assert_eq!(summary.latest(10).len(), 4);
    }

    #[test]
    fn test_orphans_counted_without_description() {
        let json = r#"{
            "tracking_data": {
                "12": {
                    "motor": {"walk": {"observed": "achieved", "date_observed": "2025-06-02"}},
                    "swimming": {"float": {"observed": "achieved", "date_observed": "2025-06-04"}}
                }
            }
        }"#;
        let state: FullState = serde_json::from_str(json).unwrap();
        let summary = summarize(&motor_catalog(), &state.tracking_data);

        assert_eq!(summary.total_observations, 2);
        assert_eq!(summary.per_area["swimming"].achieved, 1);
        assert_eq!(summary.recent_updates[0].area, "swimming");
        assert_eq!(summary.recent_updates[0].description, None);
        assert_eq!(summary.recent_updates[1].description.as_deref(), Some("Walks independently"));
        assert_eq!(
            summary.warnings,
            vec![DataWarning::OrphanObservation {
                age: AgeMonths::new(12),
                area: "swimming".to_string(),
                milestone: "float".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_store() {
        let summary = summarize(&motor_catalog(), &ObservationStore::new());
        assert_eq!(summary, Summary::default());
        assert!(summary.latest(5).is_empty());
    }
}
