//! Reads the current state of a widget instance back into a [`Recurrence`].
//!
//! Only visible field groups contribute, so values left behind in groups
//! the current frequency hides are not submitted. Blank fields are
//! skipped; malformed numbers or dates are errors.

use crate::calendar::{Month, Weekday};
use crate::config::MarkerConfig;
use crate::dom::{Document, NodeId, Selector};
use crate::ending;
use crate::error::RuleError;
use crate::frequency::{FieldGroup, Frequency};
use crate::rrule::{self, Ending, Recurrence};
use crate::visibility;

fn visible_region(doc: &Document, instance: NodeId, group: FieldGroup) -> Option<NodeId> {
    doc.find_first(instance, &Selector::Class(group.marker()))
        .filter(|region| !doc.is_hidden(*region))
}

fn first_input_value(doc: &Document, region: NodeId) -> Option<String> {
    let input = doc.find_first(region, &Selector::Tag("input"))?;
    let value = doc.value(input)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn field_value(doc: &Document, region: NodeId, class: &str) -> Option<String> {
    let field = doc.find_first(region, &Selector::Class(class))?;
    let value = doc.value(field)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn checked_values(doc: &Document, region: NodeId) -> Vec<String> {
    doc.find_all(region, &Selector::InputType("checkbox"))
        .into_iter()
        .filter(|cb| doc.is_checked(*cb))
        .filter_map(|cb| doc.value(cb).map(str::to_string))
        .collect()
}

fn read_ending(doc: &Document, region: NodeId) -> Result<Ending, RuleError> {
    let Some(radio) = doc
        .find_all(region, &Selector::InputType("radio"))
        .into_iter()
        .find(|r| doc.is_checked(*r))
    else {
        return Ok(Ending::Never);
    };

    let value = ending::companion_of(doc, radio)
        .and_then(|c| doc.value(c))
        .map(str::trim)
        .unwrap_or_default();
    if value.is_empty() {
        return Ok(Ending::Never);
    }

    match doc.value(radio).unwrap_or_default() {
        "count" => Ok(Ending::Count(rrule::parse_count(value)?)),
        "until" => Ok(Ending::Until(rrule::parse_date(value)?)),
        _ => Ok(Ending::Never),
    }
}

/// Read the rule one widget instance currently describes.
///
/// NEVER or an unrecognized frequency yields the empty rule.
pub fn read_recurrence(
    doc: &Document,
    instance: NodeId,
    markers: &MarkerConfig,
) -> Result<Recurrence, RuleError> {
    let freq = visibility::frequency_value(doc, instance, markers)
        .as_deref()
        .and_then(Frequency::from_value);
    let Some(freq) = freq.filter(|f| f.is_recurring()) else {
        return Ok(Recurrence::default());
    };

    let mut rule = Recurrence::new(freq);

    if let Some(region) = visible_region(doc, instance, FieldGroup::Frequency) {
        if let Some(value) = field_value(doc, region, "dtstart") {
            rule.dtstart = Some(rrule::parse_date(&value)?);
        }
        if let Some(value) = field_value(doc, region, "wkst") {
            rule.wkst = Some(value.parse::<Weekday>()?);
        }
    }

    if let Some(value) =
        visible_region(doc, instance, FieldGroup::Interval).and_then(|r| first_input_value(doc, r))
    {
        rule.interval = rrule::parse_interval(&value)?;
    }

    if let Some(region) = visible_region(doc, instance, FieldGroup::Ending) {
        rule.ending = read_ending(doc, region)?;
    }

    if let Some(region) = visible_region(doc, instance, FieldGroup::ByWeekday) {
        let mut days = checked_values(doc, region)
            .iter()
            .map(|v| v.parse::<Weekday>())
            .collect::<Result<Vec<_>, _>>()?;
        days.sort();
        rule.by_weekday = days;
    }

    if let Some(region) = visible_region(doc, instance, FieldGroup::ByMonth) {
        rule.by_month = checked_values(doc, region)
            .iter()
            .map(|v| v.parse::<Month>())
            .collect::<Result<Vec<_>, _>>()?;
    }

    if let Some(value) =
        visible_region(doc, instance, FieldGroup::ByMonthDay).and_then(|r| first_input_value(doc, r))
    {
        rule.by_month_day = rrule::parse_day_list("bymonthday", &value, 31)?;
    }

    if let Some(value) =
        visible_region(doc, instance, FieldGroup::ByYearDay).and_then(|r| first_input_value(doc, r))
    {
        rule.by_year_day = rrule::parse_day_list("byyearday", &value, 366)?;
    }

    Ok(rule)
}
