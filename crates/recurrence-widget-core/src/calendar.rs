//! Weekday and month names used by the by-weekday / by-month groups and
//! the RFC-5545 rule strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;

/// Day of the week, Monday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
    #[serde(rename = "SU")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Display order of the weekday checkboxes.
    pub const SUNDAY_FIRST: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
            Weekday::Sunday => "SU",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl FromStr for Weekday {
    type Err = RuleError;

    /// Accepts `MO`, `monday`, or the numeric index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u8>() {
            return Self::from_index(index).ok_or_else(|| RuleError::invalid("weekday", s));
        }
        Self::ALL
            .into_iter()
            .find(|d| d.abbrev().eq_ignore_ascii_case(s) || d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RuleError::invalid("weekday", s))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// Month of the year, January = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Month {
    pub fn new(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Month(number))
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.0 - 1) as usize]
    }

    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl TryFrom<u8> for Month {
    type Error = RuleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Month::new(value).ok_or_else(|| RuleError::invalid("month", value.to_string()))
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl FromStr for Month {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Month::try_from(n);
        }
        Month::all()
            .find(|m| m.name().eq_ignore_ascii_case(s) || m.short_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RuleError::invalid("month", s))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parses_codes_names_and_indexes() {
        assert_eq!("MO".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("wednesday".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert_eq!("6".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("7".parse::<Weekday>().is_err());
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_index_matches_monday_zero() {
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Sunday.index(), 6);
        assert_eq!(Weekday::from_index(1), Some(Weekday::Tuesday));
    }

    #[test]
    fn month_bounds_and_names() {
        assert!(Month::new(0).is_none());
        assert!(Month::new(13).is_none());
        let may = Month::new(5).unwrap();
        assert_eq!(may.name(), "May");
        assert_eq!(may.short_name(), "May");
        assert_eq!("sep".parse::<Month>().unwrap().number(), 9);
        assert_eq!(Month::all().count(), 12);
    }

    #[test]
    fn month_serde_uses_number() {
        let json = serde_json::to_string(&Month::new(3).unwrap()).unwrap();
        assert_eq!(json, "3");
        assert!(serde_json::from_str::<Month>("13").is_err());
    }
}
