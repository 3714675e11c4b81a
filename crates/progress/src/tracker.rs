//! Progress tracking service.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sprout_core::{ChildProfile, FullState, ObservationKey, ObservationRecord, ObservationStatus};
use sprout_storage::{mutation, Result, Storage, StorageError};
use tracing::{debug, info};
use crate::filter::{checklist, ChecklistEntry};
use crate::report::ProgressReport;
use crate::summary::{summarize, Summary};

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Create or replace the child profile.
    async fn set_profile(&self, profile: ChildProfile) -> Result<ChildProfile>;

    /// Record an observed status, optionally replacing notes.
    async fn record_observation(
        &self,
        key: ObservationKey,
        status: ObservationStatus,
        notes: Option<String>,
    ) -> Result<ObservationRecord>;

    /// Replace notes without touching the status.
    async fn record_notes(&self, key: ObservationKey, notes: String) -> Result<ObservationRecord>;

    /// Report for the current child. Empty when no profile is set.
    async fn report(&self) -> Result<ProgressReport>;

    /// Age-appropriate checklist for the current child. Empty when no profile is set.
    async fn checklist(&self) -> Result<Vec<ChecklistEntry>>;

    /// Historical summary of every observation.
    async fn summary(&self) -> Result<Summary>;

    /// Snapshot of the full state for export.
    async fn export(&self) -> Result<FullState>;

    /// Replace the full state. Returns the summary of the imported data so
    /// stale entries can be reported.
    async fn import(&self, state: FullState) -> Result<Summary>;

    /// Restore the seed catalog and an empty state.
    async fn reset(&self) -> Result<()>;
}

/// Basic progress tracker over a storage backend.
pub struct BasicProgressTracker<S: Storage> {
    storage: Arc<S>,
    today: fn() -> NaiveDate,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker.
    pub fn new(storage: S) -> Self {
        Self::from_shared(Arc::new(storage))
    }

    /// Create a tracker over storage shared with other writers.
    pub fn from_shared(storage: Arc<S>) -> Self {
        Self {
            storage,
            today: || Utc::now().date_naive(),
        }
    }

    /// Override the date used to stamp achieved observations.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Underlying storage.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    fn record_from(state: &FullState, key: &ObservationKey) -> Result<ObservationRecord> {
        state
            .tracking_data
            .get(key.age, &key.area, &key.milestone)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn set_profile(&self, profile: ChildProfile) -> Result<ChildProfile> {
        let stored = profile.clone();
        self.storage
            .update(mutation(move |state| {
                state.set_profile(stored);
                Ok(())
            }))
            .await?;
        info!("Profile set for {} ({} months)", profile.name, profile.current_age_months);
        Ok(profile)
    }

    async fn record_observation(
        &self,
        key: ObservationKey,
        status: ObservationStatus,
        notes: Option<String>,
    ) -> Result<ObservationRecord> {
        let catalog = self.storage.load_catalog().await?;
        let today = (self.today)();
        let target = key.clone();
        let state = self
            .storage
            .update(mutation(move |state| {
                state.set_observation(&catalog, &target, status, notes, today)?;
                Ok(())
            }))
            .await?;
        debug!("Recorded {} as {}", key, status);
        Self::record_from(&state, &key)
    }

    async fn record_notes(&self, key: ObservationKey, notes: String) -> Result<ObservationRecord> {
        let catalog = self.storage.load_catalog().await?;
        let target = key.clone();
        let state = self
            .storage
            .update(mutation(move |state| {
                state.set_notes(&catalog, &target, notes)?;
                Ok(())
            }))
            .await?;
        debug!("Updated notes on {}", key);
        Self::record_from(&state, &key)
    }

    async fn report(&self) -> Result<ProgressReport> {
        let catalog = self.storage.load_catalog().await?;
        let state = self.storage.load().await?;
        Ok(ProgressReport::build(&catalog, &state))
    }

    async fn checklist(&self) -> Result<Vec<ChecklistEntry>> {
        let catalog = self.storage.load_catalog().await?;
        let state = self.storage.load().await?;
        Ok(match state.current_age() {
            Some(age) => checklist(&catalog, &state.tracking_data, age),
            None => Vec::new(),
        })
    }

    async fn summary(&self) -> Result<Summary> {
        let catalog = self.storage.load_catalog().await?;
        let state = self.storage.load().await?;
        Ok(summarize(&catalog, &state.tracking_data))
    }

    async fn export(&self) -> Result<FullState> {
        self.storage.load().await
    }

    async fn import(&self, state: FullState) -> Result<Summary> {
        let catalog = self.storage.load_catalog().await?;
        let summary = summarize(&catalog, &state.tracking_data);
        self.storage.save(&state).await?;
        info!(
            "Imported {} observations ({} not in catalog)",
            summary.total_observations,
            summary.warnings.len()
        );
        Ok(summary)
    }

    async fn reset(&self) -> Result<()> {
        self.storage.reset().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{day, motor_catalog};
    use crate::recommend::RecommendationKind;
    use sprout_core::{AgeMonths, CoreError};
    use sprout_storage::MemoryStorage;

    fn tracker() -> BasicProgressTracker<MemoryStorage> {
        BasicProgressTracker::new(MemoryStorage::new(motor_catalog())).with_today(|| day(7))
    }

    fn profile(age: u32) -> ChildProfile {
        ChildProfile::new("Ari", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), AgeMonths::new(age)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_profile_reports_nothing() {
        let tracker = tracker();
        let report = tracker.report().await.unwrap();
        assert!(!report.has_profile());
        assert!(report.recommendations.is_empty());
        assert!(tracker.checklist().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_and_report() {
        let tracker = tracker();
        tracker.set_profile(profile(12)).await.unwrap();

        let record = tracker
            .record_observation(
                ObservationKey::new(AgeMonths::new(12), "motor", "walk"),
                ObservationStatus::Achieved,
                Some("first steps".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(record.date_observed, Some(day(7)));
        assert_eq!(record.notes.as_deref(), Some("first steps"));

        let report = tracker.report().await.unwrap();
        assert_eq!(report.readiness.score, 3);
        assert_eq!(report.readiness.percentage, 75);
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.kind != RecommendationKind::Priority));

        let checklist = tracker.checklist().await.unwrap();
        assert_eq!(checklist.len(), 2);
        assert_eq!(checklist[0].record.observed, ObservationStatus::Achieved);
    }

    #[tokio::test]
    async fn test_unknown_milestone_is_rejected() {
        let tracker = tracker();
        let err = tracker
            .record_observation(
                ObservationKey::new(AgeMonths::new(12), "motor", "juggle"),
                ObservationStatus::Achieved,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Core(CoreError::UnknownMilestone { .. })));
        assert!(tracker.export().await.unwrap().tracking_data.is_empty());
    }

    #[tokio::test]
    async fn test_notes_only_update() {
        let tracker = tracker();
        let record = tracker
            .record_notes(ObservationKey::new(AgeMonths::new(12), "motor", "kick"), "tries with left foot".to_string())
            .await
            .unwrap();
        assert_eq!(record.observed, ObservationStatus::Unset);
        assert_eq!(record.date_observed, None);
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let source = tracker();
        source.set_profile(profile(13)).await.unwrap();
        source
            .record_observation(
                ObservationKey::new(AgeMonths::new(13), "motor", "kick"),
                ObservationStatus::NotYet,
                None,
            )
            .await
            .unwrap();
        source
            .record_notes(ObservationKey::new(AgeMonths::new(13), "motor", "walk"), "holds the sofa".to_string())
            .await
            .unwrap();
        source
            .record_observation(
                ObservationKey::new(AgeMonths::new(12), "motor", "walk"),
                ObservationStatus::NotApplicable,
                Some("in a cast".to_string()),
            )
            .await
            .unwrap();
        source
            .record_observation(
                ObservationKey::new(AgeMonths::new(12), "motor", "kick"),
                ObservationStatus::Achieved,
                None,
            )
            .await
            .unwrap();
        let exported = source.export().await.unwrap();
        let statuses: Vec<_> = exported.tracking_data.iter().map(|(_, _, _, r)| r.observed).collect();
        assert_eq!(
            statuses,
            vec![
                ObservationStatus::Achieved,
                ObservationStatus::NotApplicable,
                ObservationStatus::NotYet,
                ObservationStatus::Unset,
            ]
        );

        let json = serde_json::to_string(&exported).unwrap();
        let parsed: FullState = serde_json::from_str(&json).unwrap();

        let target = tracker();
        let summary = target.import(parsed).await.unwrap();
        assert_eq!(summary.total_observations, 4);
        assert!(summary.warnings.is_empty());
        assert_eq!(target.export().await.unwrap(), exported);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let tracker = tracker();
        tracker.set_profile(profile(12)).await.unwrap();
        tracker.reset().await.unwrap();
        assert_eq!(tracker.export().await.unwrap(), FullState::new());
    }
}
