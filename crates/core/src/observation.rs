//! Observation records keyed by age bucket, area and milestone.

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::age::AgeMonths;
use crate::catalog::MilestoneCatalog;
use crate::error::{CoreError, Result};

/// Observed state of a milestone.
///
/// Serialized as a snake_case string. Deserialization also accepts the
/// older flag encoding: `true` is achieved, `false` not yet, `null` not
/// applicable. A missing field means `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawStatus")]
pub enum ObservationStatus {
    /// Milestone has been achieved
    Achieved,
    /// Observed but not achieved yet
    NotYet,
    /// Marked as not applicable
    NotApplicable,
    /// Never recorded
    #[default]
    Unset,
}

impl ObservationStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationStatus::Achieved => "achieved",
            ObservationStatus::NotYet => "not_yet",
            ObservationStatus::NotApplicable => "not_applicable",
            ObservationStatus::Unset => "unset",
        }
    }

    /// Whether this counts as achieved.
    pub fn is_achieved(&self) -> bool {
        matches!(self, ObservationStatus::Achieved)
    }
}

impl std::fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObservationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "achieved" => Ok(ObservationStatus::Achieved),
            "not_yet" => Ok(ObservationStatus::NotYet),
            "not_applicable" | "n/a" | "na" => Ok(ObservationStatus::NotApplicable),
            "unset" => Ok(ObservationStatus::Unset),
            other => Err(format!("unknown observation status '{}'", other)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Flag(Option<bool>),
    Named(String),
}

impl TryFrom<RawStatus> for ObservationStatus {
    type Error = String;

    fn try_from(raw: RawStatus) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawStatus::Flag(Some(true)) => Ok(ObservationStatus::Achieved),
            RawStatus::Flag(Some(false)) => Ok(ObservationStatus::NotYet),
            RawStatus::Flag(None) => Ok(ObservationStatus::NotApplicable),
            RawStatus::Named(name) => name.parse(),
        }
    }
}

/// A recorded observation for one milestone at one age bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Observed state
    #[serde(default)]
    pub observed: ObservationStatus,

    /// Day the milestone was marked achieved
    #[serde(default)]
    pub date_observed: Option<NaiveDate>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Address of an observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationKey {
    /// Age bucket in months
    pub age: AgeMonths,
    /// Area key
    pub area: String,
    /// Milestone key
    pub milestone: String,
}

impl ObservationKey {
    /// Create a new key.
    pub fn new(age: AgeMonths, area: impl Into<String>, milestone: impl Into<String>) -> Self {
        Self {
            age,
            area: area.into(),
            milestone: milestone.into(),
        }
    }
}

impl std::fmt::Display for ObservationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m/{}/{}", self.age, self.area, self.milestone)
    }
}

type AreaRecords = BTreeMap<String, BTreeMap<String, ObservationRecord>>;

/// All observations, nested as age bucket → area → milestone.
///
/// Records are created on first write and updated in place afterwards.
/// Writes are checked against the catalog; records loaded from disk are
/// taken as-is, so stale keys can still appear when reading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationStore {
    records: BTreeMap<AgeMonths, AreaRecords>,
}

impl ObservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a record.
    pub fn get(&self, age: AgeMonths, area: &str, milestone: &str) -> Option<&ObservationRecord> {
        self.records.get(&age)?.get(area)?.get(milestone)
    }

    /// Observed state, `Unset` when nothing was recorded.
    pub fn status(&self, age: AgeMonths, area: &str, milestone: &str) -> ObservationStatus {
        self.get(age, area, milestone)
            .map(|r| r.observed)
            .unwrap_or_default()
    }

    /// Record a status.
    ///
    /// `date_observed` is set to `today` when the status is `Achieved` and
    /// cleared otherwise. `notes` replaces existing notes when given.
    pub fn set_observation(
        &mut self,
        catalog: &MilestoneCatalog,
        key: &ObservationKey,
        status: ObservationStatus,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<&ObservationRecord> {
        let record = self.entry(catalog, key)?;
        record.observed = status;
        record.date_observed = status.is_achieved().then_some(today);
        if notes.is_some() {
            record.notes = notes;
        }
        Ok(record)
    }

    /// Replace the notes of a record, creating it if needed. Status is untouched.
    pub fn set_notes(
        &mut self,
        catalog: &MilestoneCatalog,
        key: &ObservationKey,
        notes: impl Into<String>,
    ) -> Result<&ObservationRecord> {
        let record = self.entry(catalog, key)?;
        record.notes = Some(notes.into());
        Ok(record)
    }

    fn entry(&mut self, catalog: &MilestoneCatalog, key: &ObservationKey) -> Result<&mut ObservationRecord> {
        if !catalog.contains(&key.area, &key.milestone) {
            return Err(CoreError::UnknownMilestone {
                area: key.area.clone(),
                milestone: key.milestone.clone(),
            });
        }
        Ok(self
            .records
            .entry(key.age)
            .or_default()
            .entry(key.area.clone())
            .or_default()
            .entry(key.milestone.clone())
            .or_default())
    }

    /// Every record as `(age, area, milestone, record)`, ordered by age then key.
    pub fn iter(&self) -> impl Iterator<Item = (AgeMonths, &str, &str, &ObservationRecord)> + '_ {
        self.records.iter().flat_map(|(age, areas)| {
            areas.iter().flat_map(move |(area, milestones)| {
                milestones
                    .iter()
                    .map(move |(milestone, record)| (*age, area.as_str(), milestone.as_str(), record))
            })
        })
    }

    /// Age buckets that hold at least one area map.
    pub fn ages(&self) -> impl Iterator<Item = AgeMonths> + '_ {
        self.records.keys().copied()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no record exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AgeRange, DevelopmentArea, Importance, MilestoneDefinition};

    fn catalog() -> MilestoneCatalog {
        MilestoneCatalog::new(vec![DevelopmentArea::new(
            "motor",
            vec![MilestoneDefinition::new("walk", "Walks", AgeRange::new(10, 14), Importance::High)],
        )])
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_missing_record_is_unset() {
        let store = ObservationStore::new();
        assert_eq!(store.status(AgeMonths::new(12), "motor", "walk"), ObservationStatus::Unset);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_observation_stamps_date_only_when_achieved() {
        let catalog = catalog();
        let mut store = ObservationStore::new();
        let key = ObservationKey::new(AgeMonths::new(12), "motor", "walk");

        let record = store
            .set_observation(&catalog, &key, ObservationStatus::Achieved, None, today())
            .unwrap();
        assert_eq!(record.date_observed, Some(today()));

        let record = store
            .set_observation(&catalog, &key, ObservationStatus::NotYet, None, today())
            .unwrap();
        assert_eq!(record.observed, ObservationStatus::NotYet);
        assert_eq!(record.date_observed, None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_notes_survive_status_change() {
        let catalog = catalog();
        let mut store = ObservationStore::new();
        let key = ObservationKey::new(AgeMonths::new(12), "motor", "walk");

        store.set_notes(&catalog, &key, "wobbly steps").unwrap();
        assert_eq!(store.status(key.age, "motor", "walk"), ObservationStatus::Unset);

        let record = store
            .set_observation(&catalog, &key, ObservationStatus::Achieved, None, today())
            .unwrap();
        assert_eq!(record.notes.as_deref(), Some("wobbly steps"));
    }

    #[test]
    fn test_rejects_unknown_milestone() {
        let catalog = catalog();
        let mut store = ObservationStore::new();
        let key = ObservationKey::new(AgeMonths::new(12), "motor", "fly");
        let err = store
            .set_observation(&catalog, &key, ObservationStatus::Achieved, None, today())
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownMilestone { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reads_legacy_flag_encoding() {
        let json = r#"{
            "12": {"motor": {
                "walk": {"observed": true, "date_observed": "2025-05-01", "notes": ""},
                "run": {"observed": false, "date_observed": null},
                "hop": {"observed": null},
                "skip": {"notes": "later"}
            }}
        }"#;
        let store: ObservationStore = serde_json::from_str(json).unwrap();
        let age = AgeMonths::new(12);
        assert_eq!(store.status(age, "motor", "walk"), ObservationStatus::Achieved);
        assert_eq!(store.status(age, "motor", "run"), ObservationStatus::NotYet);
        assert_eq!(store.status(age, "motor", "hop"), ObservationStatus::NotApplicable);
        assert_eq!(store.status(age, "motor", "skip"), ObservationStatus::Unset);
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        let json = serde_json::to_string(&ObservationStatus::NotApplicable).unwrap();
        assert_eq!(json, "\"not_applicable\"");
        let back: ObservationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ObservationStatus::NotApplicable);
        assert!(serde_json::from_str::<ObservationStatus>("\"maybe\"").is_err());
    }
}
