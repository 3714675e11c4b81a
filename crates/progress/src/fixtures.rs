//! Shared builders for unit tests.

use chrono::NaiveDate;
use sprout_core::{
    AgeMonths, AgeRange, DevelopmentArea, Importance, MilestoneCatalog, MilestoneDefinition,
    ObservationKey, ObservationStatus, ObservationStore,
};

pub fn milestone(key: &str, min: u32, max: u32, importance: Importance) -> MilestoneDefinition {
    MilestoneDefinition::new(key, format!("{} milestone", key), AgeRange::new(min, max), importance)
}

pub fn catalog_of(areas: Vec<(&str, Vec<MilestoneDefinition>)>) -> MilestoneCatalog {
    MilestoneCatalog::new(
        areas
            .into_iter()
            .map(|(key, milestones)| DevelopmentArea::new(key, milestones))
            .collect(),
    )
    .unwrap()
}

/// A day in June 2025.
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

pub fn record(
    catalog: &MilestoneCatalog,
    store: &mut ObservationStore,
    age: u32,
    area: &str,
    milestone: &str,
    status: ObservationStatus,
) {
    record_on(catalog, store, age, area, milestone, status, day(1));
}

pub fn record_on(
    catalog: &MilestoneCatalog,
    store: &mut ObservationStore,
    age: u32,
    area: &str,
    milestone: &str,
    status: ObservationStatus,
    on: NaiveDate,
) {
    store
        .set_observation(
            catalog,
            &ObservationKey::new(AgeMonths::new(age), area, milestone),
            status,
            None,
            on,
        )
        .unwrap();
}

/// The motor scenario: one high and one low milestone, both [10, 14].
pub fn motor_catalog() -> MilestoneCatalog {
    catalog_of(vec![(
        "motor",
        vec![
            MilestoneDefinition::new("walk", "Walks independently", AgeRange::new(10, 14), Importance::High),
            MilestoneDefinition::new("kick", "Kicks a ball", AgeRange::new(10, 14), Importance::Low),
        ],
    )])
}
