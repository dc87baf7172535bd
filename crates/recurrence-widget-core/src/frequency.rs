//! Frequency values, field groups and the visibility table.
//!
//! The widget encodes frequency as an integer in the select control:
//!
//! ```text
//! NEVER = -1, YEARLY = 0, MONTHLY = 1, WEEKLY = 2, DAILY = 3
//! ```
//!
//! [`VisibilityPlan::for_value`] is the single source of truth for which
//! field groups a frequency shows and which interval unit it labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Never,
    Yearly,
    Monthly,
    Weekly,
    Daily,
}

impl Frequency {
    /// Order used by the select control.
    pub const CHOICES: [Frequency; 5] = [
        Frequency::Never,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn code(self) -> i32 {
        match self {
            Frequency::Never => -1,
            Frequency::Yearly => 0,
            Frequency::Monthly => 1,
            Frequency::Weekly => 2,
            Frequency::Daily => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Frequency::Never),
            0 => Some(Frequency::Yearly),
            1 => Some(Frequency::Monthly),
            2 => Some(Frequency::Weekly),
            3 => Some(Frequency::Daily),
            _ => None,
        }
    }

    /// Parse the raw value of a select control. Surrounding whitespace is
    /// ignored; anything that is not one of the five codes yields `None`.
    pub fn from_value(value: &str) -> Option<Self> {
        value.trim().parse::<i32>().ok().and_then(Self::from_code)
    }

    /// RFC-5545 `FREQ` name. NEVER has none.
    pub fn rrule_name(self) -> Option<&'static str> {
        match self {
            Frequency::Never => None,
            Frequency::Yearly => Some("YEARLY"),
            Frequency::Monthly => Some("MONTHLY"),
            Frequency::Weekly => Some("WEEKLY"),
            Frequency::Daily => Some("DAILY"),
        }
    }

    pub fn from_rrule_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "YEARLY" => Some(Frequency::Yearly),
            "MONTHLY" => Some(Frequency::Monthly),
            "WEEKLY" => Some(Frequency::Weekly),
            "DAILY" => Some(Frequency::Daily),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Never => "Never",
            Frequency::Yearly => "Yearly",
            Frequency::Monthly => "Monthly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Frequency::Never
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named region of fields inside one widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Frequency,
    Interval,
    Ending,
    ByYearDay,
    ByMonth,
    ByMonthDay,
    ByWeekday,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 7] = [
        FieldGroup::Frequency,
        FieldGroup::Interval,
        FieldGroup::Ending,
        FieldGroup::ByYearDay,
        FieldGroup::ByMonth,
        FieldGroup::ByMonthDay,
        FieldGroup::ByWeekday,
    ];

    /// Class carried by the group's region in the markup.
    pub fn marker(self) -> &'static str {
        match self {
            FieldGroup::Frequency => "recurrence-freq",
            FieldGroup::Interval => "recurrence-interval",
            FieldGroup::Ending => "recurrence-ending",
            FieldGroup::ByYearDay => "recurrence-byyearday",
            FieldGroup::ByMonth => "recurrence-bymonth",
            FieldGroup::ByMonthDay => "recurrence-bymonthday",
            FieldGroup::ByWeekday => "recurrence-byweekday",
        }
    }

    /// Rule field name the group edits (also used in element ids).
    pub fn field_name(self) -> &'static str {
        match self {
            FieldGroup::Frequency => "freq",
            FieldGroup::Interval => "interval",
            FieldGroup::Ending => "ending",
            FieldGroup::ByYearDay => "byyearday",
            FieldGroup::ByMonth => "bymonth",
            FieldGroup::ByMonthDay => "bymonthday",
            FieldGroup::ByWeekday => "byweekday",
        }
    }

    /// Groups whose checkbox labels carry the selected marker.
    pub fn has_checkbox_labels(self) -> bool {
        matches!(self, FieldGroup::ByMonth | FieldGroup::ByWeekday)
    }
}

/// Text for the interval-unit label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Years,
    Months,
    Weeks,
    Days,
}

impl IntervalUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            IntervalUnit::Years => "years",
            IntervalUnit::Months => "months",
            IntervalUnit::Weeks => "weeks",
            IntervalUnit::Days => "days",
        }
    }
}

/// Groups shown and unit label set for one frequency value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPlan {
    pub frequency: Option<Frequency>,
    /// Visible groups, in [`FieldGroup::ALL`] order.
    pub visible: Vec<FieldGroup>,
    /// `None` leaves the label untouched.
    pub interval_unit: Option<IntervalUnit>,
}

impl VisibilityPlan {
    /// Derive the plan for a raw select value.
    pub fn for_value(value: &str) -> Self {
        Self::for_frequency(Frequency::from_value(value))
    }

    /// Derive the plan for a frequency. `None` stands for an unrecognized
    /// value and behaves like NEVER.
    pub fn for_frequency(frequency: Option<Frequency>) -> Self {
        use FieldGroup as G;

        let base: &[FieldGroup] = match frequency {
            Some(f) if f.is_recurring() => &[G::Frequency, G::Interval, G::Ending],
            _ => &[G::Frequency],
        };

        let (extra, interval_unit): (&[FieldGroup], Option<IntervalUnit>) = match frequency {
            Some(Frequency::Yearly) => (&[G::ByYearDay, G::ByMonth], Some(IntervalUnit::Years)),
            Some(Frequency::Monthly) => (
                &[G::ByMonth, G::ByMonthDay, G::ByWeekday],
                Some(IntervalUnit::Months),
            ),
            Some(Frequency::Weekly) => (&[G::ByWeekday], Some(IntervalUnit::Weeks)),
            Some(Frequency::Daily) => (&[], Some(IntervalUnit::Days)),
            Some(Frequency::Never) | None => (&[], None),
        };

        let visible = FieldGroup::ALL
            .into_iter()
            .filter(|g| base.contains(g) || extra.contains(g))
            .collect();

        Self {
            frequency,
            visible,
            interval_unit,
        }
    }

    pub fn is_visible(&self, group: FieldGroup) -> bool {
        self.visible.contains(&group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for f in Frequency::CHOICES {
            assert_eq!(Frequency::from_code(f.code()), Some(f));
        }
        assert_eq!(Frequency::from_code(4), None);
    }

    #[test]
    fn from_value_trims_and_rejects_garbage() {
        assert_eq!(Frequency::from_value(" 2 "), Some(Frequency::Weekly));
        assert_eq!(Frequency::from_value("-1"), Some(Frequency::Never));
        assert_eq!(Frequency::from_value("weekly"), None);
        assert_eq!(Frequency::from_value(""), None);
    }

    #[test]
    fn yearly_plan() {
        let plan = VisibilityPlan::for_frequency(Some(Frequency::Yearly));
        assert_eq!(
            plan.visible,
            vec![
                FieldGroup::Frequency,
                FieldGroup::Interval,
                FieldGroup::Ending,
                FieldGroup::ByYearDay,
                FieldGroup::ByMonth,
            ]
        );
        assert_eq!(plan.interval_unit, Some(IntervalUnit::Years));
    }

    #[test]
    fn monthly_plan() {
        let plan = VisibilityPlan::for_value("1");
        assert!(plan.is_visible(FieldGroup::ByMonth));
        assert!(plan.is_visible(FieldGroup::ByMonthDay));
        assert!(plan.is_visible(FieldGroup::ByWeekday));
        assert!(!plan.is_visible(FieldGroup::ByYearDay));
        assert_eq!(plan.interval_unit, Some(IntervalUnit::Months));
    }

    #[test]
    fn daily_plan_has_no_by_groups() {
        let plan = VisibilityPlan::for_value("3");
        assert_eq!(
            plan.visible,
            vec![FieldGroup::Frequency, FieldGroup::Interval, FieldGroup::Ending]
        );
        assert_eq!(plan.interval_unit, Some(IntervalUnit::Days));
    }

    #[test]
    fn never_and_unknown_show_only_frequency() {
        for value in ["-1", "7", "abc"] {
            let plan = VisibilityPlan::for_value(value);
            assert_eq!(plan.visible, vec![FieldGroup::Frequency], "value {value}");
            assert_eq!(plan.interval_unit, None);
        }
    }

    #[test]
    fn rrule_names() {
        assert_eq!(Frequency::Never.rrule_name(), None);
        assert_eq!(Frequency::from_rrule_name("weekly"), Some(Frequency::Weekly));
        assert_eq!(Frequency::from_rrule_name("HOURLY"), None);
    }
}
