//! Recurrence rule model and its RFC-5545 text form.
//!
//! A [`Recurrence`] is what one widget instance edits. It renders to and
//! parses from the `FREQ=...;INTERVAL=...` grammar:
//!
//! ```text
//! FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE;COUNT=5
//! RRULE:FREQ=MONTHLY;BYMONTHDAY=1,15;UNTIL=20251231
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::{Month, Weekday};
use crate::error::RuleError;
use crate::frequency::Frequency;

/// How a rule terminates. COUNT and UNTIL are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    #[default]
    Never,
    Count(u32),
    Until(NaiveDate),
}

impl Ending {
    /// Value of the ending radio that selects this variant.
    pub fn choice(&self) -> Option<&'static str> {
        match self {
            Ending::Never => None,
            Ending::Count(_) => Some("count"),
            Ending::Until(_) => Some("until"),
        }
    }
}

/// A recurrence rule as edited by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(default)]
    pub dtstart: Option<NaiveDate>,
    #[serde(default)]
    pub freq: Option<Frequency>,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub wkst: Option<Weekday>,
    #[serde(default)]
    pub ending: Ending,
    #[serde(default)]
    pub by_month: Vec<Month>,
    #[serde(default)]
    pub by_month_day: Vec<i32>,
    #[serde(default)]
    pub by_year_day: Vec<i32>,
    #[serde(default)]
    pub by_weekday: Vec<Weekday>,
}

fn default_interval() -> u32 {
    1
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            dtstart: None,
            freq: None,
            interval: default_interval(),
            wkst: None,
            ending: Ending::Never,
            by_month: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_weekday: Vec::new(),
        }
    }
}

impl Recurrence {
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq: Some(freq),
            ..Self::default()
        }
    }

    /// Frequency as shown by the select control; unset reads as NEVER.
    pub fn frequency(&self) -> Frequency {
        self.freq.unwrap_or(Frequency::Never)
    }

    /// A rule recurs when it has a repeating frequency and does not end on
    /// its own start date.
    pub fn is_recurring(&self) -> bool {
        if !self.frequency().is_recurring() {
            return false;
        }
        match (self.ending, self.dtstart) {
            (Ending::Until(until), Some(start)) => until != start,
            _ => true,
        }
    }

    /// Render as an RFC-5545 RRULE value. `None` for non-recurring
    /// frequencies.
    pub fn to_rrule(&self) -> Option<String> {
        let freq = self.freq.and_then(Frequency::rrule_name)?;
        let mut parts = vec![format!("FREQ={freq}")];

        if self.interval > 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }
        if !self.by_month.is_empty() {
            parts.push(format!("BYMONTH={}", join(self.by_month.iter().map(|m| m.number()))));
        }
        if !self.by_month_day.is_empty() {
            parts.push(format!("BYMONTHDAY={}", join(self.by_month_day.iter())));
        }
        if !self.by_year_day.is_empty() {
            parts.push(format!("BYYEARDAY={}", join(self.by_year_day.iter())));
        }
        if !self.by_weekday.is_empty() {
            parts.push(format!("BYDAY={}", join(self.by_weekday.iter())));
        }
        if let Some(wkst) = self.wkst {
            parts.push(format!("WKST={wkst}"));
        }
        match self.ending {
            Ending::Never => {}
            Ending::Count(n) => parts.push(format!("COUNT={n}")),
            Ending::Until(date) => parts.push(format!("UNTIL={}", date.format("%Y%m%d"))),
        }

        Some(parts.join(";"))
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rrule() {
            Some(rule) => f.write_str(&rule),
            None => f.write_str("never"),
        }
    }
}

impl FromStr for Recurrence {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim();
        let body = body
            .strip_prefix("RRULE:")
            .or_else(|| body.strip_prefix("rrule:"))
            .unwrap_or(body);

        let mut rule = Recurrence::default();
        let mut saw_freq = false;

        for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RuleError::MalformedPart(part.to_string()))?;
            let value = value.trim();

            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => {
                    rule.freq = Some(
                        Frequency::from_rrule_name(value)
                            .ok_or_else(|| RuleError::invalid("freq", value))?,
                    );
                    saw_freq = true;
                }
                "INTERVAL" => rule.interval = parse_interval(value)?,
                "COUNT" => {
                    if matches!(rule.ending, Ending::Until(_)) {
                        return Err(RuleError::ConflictingEnding);
                    }
                    rule.ending = Ending::Count(parse_count(value)?);
                }
                "UNTIL" => {
                    if matches!(rule.ending, Ending::Count(_)) {
                        return Err(RuleError::ConflictingEnding);
                    }
                    rule.ending = Ending::Until(parse_date(value)?);
                }
                "BYMONTH" => rule.by_month = parse_list(value, |v| v.parse::<Month>())?,
                "BYMONTHDAY" => rule.by_month_day = parse_day_list("bymonthday", value, 31)?,
                "BYYEARDAY" => rule.by_year_day = parse_day_list("byyearday", value, 366)?,
                "BYDAY" => rule.by_weekday = parse_list(value, parse_rrule_weekday)?,
                "WKST" => rule.wkst = Some(parse_rrule_weekday(value)?),
                _ => return Err(RuleError::UnknownPart(key.to_string())),
            }
        }

        if !saw_freq {
            return Err(RuleError::MissingFrequency);
        }
        Ok(rule)
    }
}

fn join<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

fn parse_list<T>(
    value: &str,
    parse: impl Fn(&str) -> Result<T, RuleError>,
) -> Result<Vec<T>, RuleError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse)
        .collect()
}

/// Rule strings only carry two-letter weekday codes.
fn parse_rrule_weekday(value: &str) -> Result<Weekday, RuleError> {
    Weekday::ALL
        .into_iter()
        .find(|d| d.abbrev().eq_ignore_ascii_case(value.trim()))
        .ok_or_else(|| RuleError::invalid("weekday", value))
}

pub(crate) fn parse_interval(value: &str) -> Result<u32, RuleError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(RuleError::invalid("interval", value)),
    }
}

pub(crate) fn parse_count(value: &str) -> Result<u32, RuleError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(RuleError::invalid("count", value)),
    }
}

/// Day offsets are non-zero and within `-bound..=bound`.
pub(crate) fn parse_day_list(field: &str, value: &str, bound: i32) -> Result<Vec<i32>, RuleError> {
    parse_list(value, |v| match v.parse::<i32>() {
        Ok(n) if n != 0 && n.abs() <= bound => Ok(n),
        _ => Err(RuleError::invalid(field, v)),
    })
}

/// Parse an UNTIL value: `YYYYMMDD`, `YYYYMMDDTHHMMSS[Z]`, or the
/// `YYYY-MM-DD` form a date input produces.
pub fn parse_date(value: &str) -> Result<NaiveDate, RuleError> {
    let v = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(v, "%Y%m%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(v, "%Y-%m-%d") {
        return Ok(date);
    }
    NaiveDateTime::parse_from_str(v.trim_end_matches('Z'), "%Y%m%dT%H%M%S")
        .map(|dt| dt.date())
        .map_err(|_| RuleError::invalid("until", value))
}
