//! Full persisted state exchanged with storage and import/export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::age::AgeMonths;
use crate::catalog::MilestoneCatalog;
use crate::error::Result;
use crate::observation::{ObservationKey, ObservationRecord, ObservationStatus, ObservationStore};
use crate::profile::ChildProfile;

/// Complete snapshot of profile and observations.
///
/// The catalog is not part of this state; it is loaded separately and is
/// immutable for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FullState {
    /// Child profile, if one has been set up. A blank placeholder reads as `None`.
    #[serde(default, deserialize_with = "crate::profile::deserialize_optional")]
    pub child_info: Option<ChildProfile>,

    /// Recorded observations
    #[serde(default)]
    pub tracking_data: ObservationStore,
}

impl FullState {
    /// Empty state with no profile and no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// The child's current age bucket, if a profile exists.
    pub fn current_age(&self) -> Option<AgeMonths> {
        self.child_info.as_ref().map(|c| c.current_age_months)
    }

    /// Replace the child profile.
    pub fn set_profile(&mut self, profile: ChildProfile) {
        self.child_info = Some(profile);
    }

    /// Record an observation. See [`ObservationStore::set_observation`].
    pub fn set_observation(
        &mut self,
        catalog: &MilestoneCatalog,
        key: &ObservationKey,
        status: ObservationStatus,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<&ObservationRecord> {
        self.tracking_data.set_observation(catalog, key, status, notes, today)
    }

    /// Replace notes on an observation. See [`ObservationStore::set_notes`].
    pub fn set_notes(
        &mut self,
        catalog: &MilestoneCatalog,
        key: &ObservationKey,
        notes: impl Into<String>,
    ) -> Result<&ObservationRecord> {
        self.tracking_data.set_notes(catalog, key, notes)
    }
}
