//! Child age in whole months.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use crate::error::{CoreError, Result};

/// A child's age in whole months.
///
/// Construction rejects negative, fractional and non-finite values, so any
/// `AgeMonths` in hand is a valid input to filtering and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeMonths(u32);

impl AgeMonths {
    /// Create from an unsigned month count.
    pub const fn new(months: u32) -> Self {
        Self(months)
    }

    /// Create from a signed month count.
    pub fn from_i64(months: i64) -> Result<Self> {
        u32::try_from(months)
            .map(Self)
            .map_err(|_| CoreError::InvalidAge(format!("{} months is out of range", months)))
    }

    /// Create from a floating point month count, as received from loosely typed input.
    pub fn from_f64(months: f64) -> Result<Self> {
        if !months.is_finite() {
            return Err(CoreError::InvalidAge(format!("{} is not a finite number", months)));
        }
        if months.fract() != 0.0 {
            return Err(CoreError::InvalidAge(format!("{} is not a whole number of months", months)));
        }
        if months < 0.0 || months > f64::from(u32::MAX) {
            return Err(CoreError::InvalidAge(format!("{} months is out of range", months)));
        }
        Ok(Self(months as u32))
    }

    /// Month count.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for AgeMonths {
    fn from(months: u32) -> Self {
        Self(months)
    }
}

impl std::fmt::Display for AgeMonths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for AgeMonths {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let months: i64 = s
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidAge(format!("'{}' is not a whole number", s)))?;
        Self::from_i64(months)
    }
}

/// Whole months elapsed between `birth_date` and `today`.
///
/// A month only counts once the day of month has been reached. Returns an
/// error when `today` precedes the birth date.
pub fn age_in_months(birth_date: NaiveDate, today: NaiveDate) -> Result<AgeMonths> {
    let mut months = (i64::from(today.year()) - i64::from(birth_date.year())) * 12;
    months -= i64::from(birth_date.month());
    months += i64::from(today.month());
    if today.day() < birth_date.day() {
        months -= 1;
    }
    AgeMonths::from_i64(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_negative_age() {
        assert!(matches!(AgeMonths::from_i64(-1), Err(CoreError::InvalidAge(_))));
        assert!(matches!(AgeMonths::from_f64(-3.0), Err(CoreError::InvalidAge(_))));
    }

    #[test]
    fn test_rejects_non_finite_and_fractional() {
        assert!(AgeMonths::from_f64(f64::NAN).is_err());
        assert!(AgeMonths::from_f64(f64::INFINITY).is_err());
        assert!(AgeMonths::from_f64(12.5).is_err());
        assert_eq!(AgeMonths::from_f64(12.0).unwrap().get(), 12);
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("18".parse::<AgeMonths>().unwrap(), AgeMonths::new(18));
        assert!("-2".parse::<AgeMonths>().is_err());
        assert!("ten".parse::<AgeMonths>().is_err());
    }

    #[test]
    fn test_age_in_months_counts_whole_months() {
        assert_eq!(age_in_months(date(2024, 1, 15), date(2025, 1, 15)).unwrap().get(), 12);
        assert_eq!(age_in_months(date(2024, 1, 15), date(2025, 1, 14)).unwrap().get(), 11);
        assert_eq!(age_in_months(date(2024, 11, 30), date(2025, 2, 28)).unwrap().get(), 2);
        assert_eq!(age_in_months(date(2025, 3, 1), date(2025, 3, 20)).unwrap().get(), 0);
    }

    #[test]
    fn test_age_in_months_before_birth() {
        assert!(age_in_months(date(2025, 3, 1), date(2025, 1, 1)).is_err());
    }
}
