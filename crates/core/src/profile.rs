//! Child profile.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use crate::age::{age_in_months, AgeMonths};
use crate::error::{CoreError, Result};

/// The tracked child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredProfile")]
pub struct ChildProfile {
    /// Display name
    pub name: String,

    /// Date of birth
    pub birth_date: NaiveDate,

    /// Age bucket used for filtering and scoring
    pub current_age_months: AgeMonths,
}

/// Profile as found on disk or in an import. Older exports keep a
/// placeholder profile with an empty name and birth date.
#[derive(Deserialize)]
struct StoredProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    current_age_months: Option<f64>,
}

impl StoredProfile {
    /// `None` when the name or birth date is blank.
    fn into_profile(self) -> Result<Option<ChildProfile>> {
        let name = self.name.unwrap_or_default();
        let birth_date = self.birth_date.unwrap_or_default();
        if name.trim().is_empty() || birth_date.trim().is_empty() {
            return Ok(None);
        }

        let birth_date = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d")
            .map_err(|e| CoreError::InvalidProfile(format!("birth_date '{}': {}", birth_date, e)))?;
        let age = self
            .current_age_months
            .ok_or_else(|| CoreError::InvalidProfile("current_age_months is required".to_string()))
            .and_then(AgeMonths::from_f64)?;
        ChildProfile::new(name, birth_date, age).map(Some)
    }
}

impl TryFrom<StoredProfile> for ChildProfile {
    type Error = CoreError;

    fn try_from(stored: StoredProfile) -> Result<Self> {
        stored
            .into_profile()?
            .ok_or_else(|| CoreError::InvalidProfile("name and birth_date are required".to_string()))
    }
}

/// Deserialize an optional profile, reading a blank placeholder as no profile.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> std::result::Result<Option<ChildProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StoredProfile>::deserialize(deserializer)? {
        Some(stored) => stored.into_profile().map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl ChildProfile {
    /// Create a validated profile.
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        current_age_months: AgeMonths,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidProfile("name is required".to_string()));
        }
        Ok(Self {
            name,
            birth_date,
            current_age_months,
        })
    }

    /// Create a profile whose age is derived from the birth date.
    pub fn from_birth_date(name: impl Into<String>, birth_date: NaiveDate, today: NaiveDate) -> Result<Self> {
        let age = age_in_months(birth_date, today)?;
        Self::new(name, birth_date, age)
    }
}
