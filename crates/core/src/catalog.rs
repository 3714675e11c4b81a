//! Milestone catalog - reference data grouped by developmental area.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::age::AgeMonths;
use crate::error::{CoreError, Result};

const DEFAULT_CATALOG: &str = include_str!("../data/default_catalog.json");

/// How much a milestone counts towards readiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Importance {
    /// Weight 3
    High,
    /// Weight 2
    Medium,
    /// Weight 1
    Low,
    /// A value outside the known tiers. Kept so scoring can flag it.
    Unknown(String),
}

impl Importance {
    /// Scoring weight for this tier. Unknown tiers weigh the same as `Low`.
    pub fn weight(&self) -> u32 {
        match self {
            Importance::High => 3,
            Importance::Medium => 2,
            Importance::Low | Importance::Unknown(_) => 1,
        }
    }

    /// Whether this is one of the known tiers.
    pub fn is_known(&self) -> bool {
        !matches!(self, Importance::Unknown(_))
    }

    /// Get string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
            Importance::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Importance {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "high" => Importance::High,
            "medium" => Importance::Medium,
            "low" => Importance::Low,
            _ => Importance::Unknown(raw),
        }
    }
}

impl From<Importance> for String {
    fn from(importance: Importance) -> Self {
        importance.as_str().to_string()
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive age range in months, written as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct AgeRange {
    /// Lower bound (inclusive)
    pub min: u32,
    /// Upper bound (inclusive)
    pub max: u32,
}

impl AgeRange {
    /// Create a range. Ordering of the bounds is checked by catalog validation.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `age` falls within the range, both ends included.
    pub fn contains(&self, age: AgeMonths) -> bool {
        self.min <= age.get() && age.get() <= self.max
    }
}

impl From<[u32; 2]> for AgeRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<AgeRange> for [u32; 2] {
    fn from(range: AgeRange) -> Self {
        [range.min, range.max]
    }
}

/// A single milestone definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDefinition {
    /// Key, unique within its area
    pub key: String,

    /// Human readable description
    pub description: String,

    /// Typical age range in months
    pub typical_age_range: AgeRange,

    /// Importance tier
    pub importance: Importance,
}

impl MilestoneDefinition {
    /// Create a new milestone definition.
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        typical_age_range: AgeRange,
        importance: Importance,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            typical_age_range,
            importance,
        }
    }
}

/// A developmental area and its milestones in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentArea {
    /// Area key, e.g. `gross_motor`
    pub key: String,

    /// Milestones in declaration order
    pub milestones: Vec<MilestoneDefinition>,
}

impl DevelopmentArea {
    /// Create an area.
    pub fn new(key: impl Into<String>, milestones: Vec<MilestoneDefinition>) -> Self {
        Self {
            key: key.into(),
            milestones,
        }
    }

    /// Look up a milestone by key.
    pub fn milestone(&self, key: &str) -> Option<&MilestoneDefinition> {
        self.milestones.iter().find(|m| m.key == key)
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    areas: Vec<DevelopmentArea>,
}

impl TryFrom<CatalogDocument> for MilestoneCatalog {
    type Error = CoreError;

    fn try_from(doc: CatalogDocument) -> Result<Self> {
        MilestoneCatalog::new(doc.areas)
    }
}

/// Validated, ordered milestone catalog.
///
/// Areas and milestones keep their declaration order, which drives display
/// order everywhere downstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct MilestoneCatalog {
    areas: Vec<DevelopmentArea>,
}

impl MilestoneCatalog {
    /// Build a catalog, rejecting duplicate keys and inverted age ranges.
    pub fn new(areas: Vec<DevelopmentArea>) -> Result<Self> {
        let mut area_keys = HashSet::new();
        for area in &areas {
            if area.key.trim().is_empty() {
                return Err(CoreError::InvalidCatalog("area key must not be empty".to_string()));
            }
            if !area_keys.insert(area.key.as_str()) {
                return Err(CoreError::InvalidCatalog(format!("duplicate area '{}'", area.key)));
            }

            let mut milestone_keys = HashSet::new();
            for milestone in &area.milestones {
                if milestone.key.trim().is_empty() {
                    return Err(CoreError::InvalidCatalog(format!(
                        "empty milestone key in area '{}'",
                        area.key
                    )));
                }
                if !milestone_keys.insert(milestone.key.as_str()) {
                    return Err(CoreError::InvalidCatalog(format!(
                        "duplicate milestone '{}' in area '{}'",
                        milestone.key, area.key
                    )));
                }
                let range = milestone.typical_age_range;
                if range.min > range.max {
                    return Err(CoreError::InvalidCatalog(format!(
                        "milestone '{}/{}' has age range [{}, {}] with min > max",
                        area.key, milestone.key, range.min, range.max
                    )));
                }
            }
        }
        Ok(Self { areas })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_CATALOG)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))
    }

    /// Areas in declaration order.
    pub fn areas(&self) -> &[DevelopmentArea] {
        &self.areas
    }

    /// Look up an area by key.
    pub fn area(&self, key: &str) -> Option<&DevelopmentArea> {
        self.areas.iter().find(|a| a.key == key)
    }

    /// Look up a milestone definition.
    pub fn milestone(&self, area: &str, milestone: &str) -> Option<&MilestoneDefinition> {
        self.area(area).and_then(|a| a.milestone(milestone))
    }

    /// Whether the catalog defines `area/milestone`.
    pub fn contains(&self, area: &str, milestone: &str) -> bool {
        self.milestone(area, milestone).is_some()
    }

    /// Every `(area key, milestone)` pair in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MilestoneDefinition)> + '_ {
        self.areas
            .iter()
            .flat_map(|a| a.milestones.iter().map(move |m| (a.key.as_str(), m)))
    }

    /// Total number of milestones.
    pub fn len(&self) -> usize {
        self.areas.iter().map(|a| a.milestones.len()).sum()
    }

    /// Whether the catalog has no milestones.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
