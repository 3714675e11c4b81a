//! Sprout core data models.
//!
//! This crate defines the milestone catalog, observation records, the child
//! profile and the serializable state shared by storage and the progress
//! engine.

#![warn(missing_docs)]

mod age;
mod catalog;
mod error;
mod observation;
mod profile;
mod state;

pub use age::{age_in_months, AgeMonths};
pub use catalog::{AgeRange, DevelopmentArea, Importance, MilestoneCatalog, MilestoneDefinition};
pub use error::{CoreError, Result};
pub use observation::{ObservationKey, ObservationRecord, ObservationStatus, ObservationStore};
pub use profile::ChildProfile;
pub use state::FullState;
