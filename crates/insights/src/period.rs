use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InsightsError;

/// Analytics look-back window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "6months")]
    #[default]
    SixMonths,
    #[serde(rename = "12months")]
    TwelveMonths,
    #[serde(rename = "all")]
    All,
}

impl Period {
    /// Calendar months covered, `None` for no lower bound.
    pub fn months(self) -> Option<u32> {
        match self {
            Self::SixMonths => Some(6),
            Self::TwelveMonths => Some(12),
            Self::All => None,
        }
    }

    /// Number of points in the monthly revenue series.
    pub fn series_len(self) -> usize {
        self.months().unwrap_or(12) as usize
    }

    /// `now − N months` by calendar subtraction (Aug 31 − 6 months = Feb 28).
    pub fn lower_bound(self, now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        self.months().and_then(|n| now.checked_sub_months(Months::new(n)))
    }

    /// Whether a reservation created at `created_at` falls inside the window.
    ///
    /// Bounded periods need a creation date. `All` admits undated records
    /// since it imposes no bound to check against.
    pub fn admits(self, created_at: Option<&DateTime<Utc>>, now: &DateTime<FixedOffset>) -> bool {
        match self.lower_bound(now) {
            None => true,
            Some(bound) => created_at.is_some_and(|c| *c >= bound),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SixMonths => "6months",
            Self::TwelveMonths => "12months",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "6months" | "6m" => Ok(Self::SixMonths),
            "12months" | "12m" => Ok(Self::TwelveMonths),
            "all" => Ok(Self::All),
            other => Err(InsightsError::UnknownPeriod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn parse() {
        assert_eq!("6months".parse::<Period>().unwrap(), Period::SixMonths);
        assert_eq!("12MONTHS".parse::<Period>().unwrap(), Period::TwelveMonths);
        assert_eq!("all".parse::<Period>().unwrap(), Period::All);
        assert!("3months".parse::<Period>().is_err());
    }

    #[test]
    fn calendar_subtraction_clamps_day() {
        let now = at("2026-08-31T10:00:00Z");
        assert_eq!(Period::SixMonths.lower_bound(&now), Some(at("2026-02-28T10:00:00Z")));
        assert_eq!(Period::TwelveMonths.lower_bound(&now), Some(at("2025-08-31T10:00:00Z")));
        assert_eq!(Period::All.lower_bound(&now), None);
    }

    #[test]
    fn admits_is_inclusive_at_bound() {
        let now = at("2026-07-15T00:00:00Z");
        let bound = at("2026-01-15T00:00:00Z").with_timezone(&Utc);
        let before = at("2026-01-14T23:59:59Z").with_timezone(&Utc);
        assert!(Period::SixMonths.admits(Some(&bound), &now));
        assert!(!Period::SixMonths.admits(Some(&before), &now));
        assert!(!Period::SixMonths.admits(None, &now));
        assert!(Period::All.admits(None, &now));
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Period::TwelveMonths).unwrap(), "\"12months\"");
        let p: Period = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(p, Period::All);
    }
}
