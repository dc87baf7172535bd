//! Builds the widget markup the behaviors attach to.
//!
//! ```text
//! div.recurrence-widget.{name}-recurrence
//!   div.recurrence-field.recurrence-freq        select.freq, input.dtstart, select.wkst
//!   div.recurrence-field.recurrence-interval    input.interval + span.interval-lbl
//!   div.recurrence-field.recurrence-byyearday   input
//!   div.recurrence-field.recurrence-bymonth     ul > li > label > checkbox
//!   div.recurrence-field.recurrence-bymonthday  input
//!   div.recurrence-field.recurrence-byweekday   ul > li > label > checkbox
//!   div.recurrence-field.recurrence-ending      div > radio + label[for] > input (x2)
//! ```
//!
//! Element ids follow `id_{name}_{field}`.

use crate::calendar::{Month, Weekday};
use crate::config::WidgetConfig;
use crate::dom::{Document, Element, NodeId};
use crate::frequency::{FieldGroup, Frequency, IntervalUnit};
use crate::rrule::{Ending, Recurrence};

/// Ending choices rendered in the ending group, in order.
pub const ENDING_CHOICES: [&str; 2] = ["count", "until"];

/// Builder for one widget instance.
#[derive(Debug, Clone, Copy)]
pub struct WidgetMarkup<'a> {
    name: &'a str,
    config: &'a WidgetConfig,
}

/// Id of a field element: `id_{name}_{field}`.
pub fn element_id(name: &str, field: &str) -> String {
    format!("id_{name}_{field}")
}

/// Id of a weekday checkbox.
pub fn weekday_id(name: &str, day: Weekday) -> String {
    format!("id_{name}_byweekday_{}", day.index())
}

/// Id of a month checkbox.
pub fn month_id(name: &str, month: Month) -> String {
    format!("id_{name}_bymonth_{}", month.number())
}

/// Id of an ending radio (`count` or `until`).
pub fn ending_radio_id(name: &str, choice: &str) -> String {
    format!("id_{name}_ending_{choice}")
}

fn default_caption(field: &str) -> Option<&'static str> {
    match field {
        "freq" => Some("Frequency"),
        "dtstart" => Some("Starting"),
        "wkst" => Some("Week Start"),
        "interval" => Some("Every"),
        "bymonth" | "byweekday" => Some("on"),
        "bymonthday" => Some("By month day"),
        "byyearday" => Some("By year day"),
        "ending" => Some("Ending"),
        _ => None,
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

impl<'a> WidgetMarkup<'a> {
    pub fn new(name: &'a str, config: &'a WidgetConfig) -> Self {
        Self { name, config }
    }

    fn id(&self, field: &str) -> String {
        element_id(self.name, field)
    }

    fn field_name(&self, field: &str) -> String {
        format!("{}_{field}", self.name)
    }

    /// Append a widget for `rule` under `parent`; returns the container.
    pub fn build(&self, doc: &mut Document, parent: NodeId, rule: &Recurrence) -> NodeId {
        let markers = &self.config.markers;
        let container = doc.append(
            parent,
            Element::new("div")
                .class(&markers.container)
                .class(&format!("{}-recurrence", self.name)),
        );

        let freq = self.group(doc, container, FieldGroup::Frequency);
        let select = doc.append(
            freq,
            Element::new("select")
                .id(&self.id("freq"))
                .attr("name", &self.field_name("freq"))
                .class("form-control")
                .class(&markers.frequency_select)
                .value(&rule.frequency().code().to_string()),
        );
        for choice in Frequency::CHOICES {
            let option = doc.append(
                select,
                Element::new("option").attr("value", &choice.code().to_string()),
            );
            doc.append_text(option, choice.label());
        }
        self.start_fields(doc, freq, rule);

        let interval = self.group(doc, container, FieldGroup::Interval);
        doc.append(
            interval,
            Element::input("number")
                .id(&self.id("interval"))
                .attr("name", &self.field_name("interval"))
                .attr("min", "1")
                .class("interval")
                .value(&rule.interval.to_string()),
        );
        let unit = doc.append(
            interval,
            Element::new("span")
                .id(&format!("{}-interval-lbl", self.name))
                .class(&markers.interval_label),
        );
        doc.append_text(unit, IntervalUnit::Weeks.as_str());

        let byyearday = self.group(doc, container, FieldGroup::ByYearDay);
        self.text_field(doc, byyearday, "byyearday", &join(rule.by_year_day.iter()));

        let bymonth = self.group(doc, container, FieldGroup::ByMonth);
        let ul = doc.append(bymonth, Element::new("ul").id(&self.id("bymonth")).class("bymonth"));
        for month in Month::all() {
            self.checkbox_item(
                doc,
                ul,
                &month_id(self.name, month),
                "bymonth",
                &month.number().to_string(),
                month.short_name(),
                rule.by_month.contains(&month),
            );
        }

        let bymonthday = self.group(doc, container, FieldGroup::ByMonthDay);
        self.text_field(doc, bymonthday, "bymonthday", &join(rule.by_month_day.iter()));

        let byweekday = self.group(doc, container, FieldGroup::ByWeekday);
        let ul = doc.append(
            byweekday,
            Element::new("ul").id(&self.id("byweekday")).class("byweekday"),
        );
        for day in Weekday::SUNDAY_FIRST {
            self.checkbox_item(
                doc,
                ul,
                &weekday_id(self.name, day),
                "byweekday",
                &day.index().to_string(),
                day.name(),
                rule.by_weekday.contains(&day),
            );
        }

        let ending = self.group(doc, container, FieldGroup::Ending);
        self.ending_choices(doc, ending, rule.ending);

        container
    }

    fn group(&self, doc: &mut Document, container: NodeId, group: FieldGroup) -> NodeId {
        let region = doc.append(
            container,
            Element::new("div")
                .class(&self.config.markers.field)
                .class(group.marker()),
        );
        let points_at_field = group != FieldGroup::Ending && !group.has_checkbox_labels();
        self.caption(doc, region, group.field_name(), points_at_field);
        region
    }

    /// Label for `field`, unless its caption is suppressed in config.
    fn caption(&self, doc: &mut Document, region: NodeId, field: &str, points_at_field: bool) {
        let Some(caption) = default_caption(field).and_then(|d| self.config.label_for(field, d))
        else {
            return;
        };
        let mut label = Element::new("label");
        if points_at_field {
            label = label.attr("for", &self.id(field));
        }
        let label = doc.append(region, label);
        if !caption.is_empty() {
            doc.append_text(label, caption);
        }
    }

    /// Start date and week start, rendered next to the frequency select.
    fn start_fields(&self, doc: &mut Document, region: NodeId, rule: &Recurrence) {
        self.caption(doc, region, "dtstart", true);
        let dtstart = rule
            .dtstart
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        doc.append(
            region,
            Element::input("date")
                .id(&self.id("dtstart"))
                .attr("name", &self.field_name("dtstart"))
                .class("form-control")
                .class("dtstart")
                .value(&dtstart),
        );

        self.caption(doc, region, "wkst", true);
        let wkst = doc.append(
            region,
            Element::new("select")
                .id(&self.id("wkst"))
                .attr("name", &self.field_name("wkst"))
                .class("form-control")
                .class("wkst")
                .value(rule.wkst.map(Weekday::abbrev).unwrap_or_default()),
        );
        doc.append(wkst, Element::new("option").attr("value", ""));
        for day in Weekday::ALL {
            let option = doc.append(wkst, Element::new("option").attr("value", day.abbrev()));
            doc.append_text(option, day.name());
        }
    }

    fn text_field(&self, doc: &mut Document, region: NodeId, field: &str, value: &str) {
        doc.append(
            region,
            Element::input("text")
                .id(&self.id(field))
                .attr("name", &self.field_name(field))
                .class("form-control")
                .class(field)
                .value(value),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn checkbox_item(
        &self,
        doc: &mut Document,
        ul: NodeId,
        id: &str,
        field: &str,
        value: &str,
        caption: &str,
        checked: bool,
    ) {
        let li = doc.append(ul, Element::new("li"));
        let label = doc.append(li, Element::new("label"));
        doc.append(
            label,
            Element::input("checkbox")
                .id(id)
                .attr("name", &self.field_name(field))
                .value(value)
                .checked(checked),
        );
        doc.append_text(label, &format!(" {caption}"));
    }

    fn ending_choices(&self, doc: &mut Document, region: NodeId, ending: Ending) {
        for choice in ENDING_CHOICES {
            let div = doc.append(region, Element::new("div"));
            let radio_id = ending_radio_id(self.name, choice);
            doc.append(
                div,
                Element::input("radio")
                    .id(&radio_id)
                    .attr("name", &self.field_name("ending"))
                    .value(choice)
                    .checked(ending.choice() == Some(choice)),
            );
            let label = doc.append(div, Element::new("label").attr("for", &radio_id));

            let (before, input_type, value, after) = match (choice, ending) {
                ("count", Ending::Count(n)) => ("After ", "number", n.to_string(), " occurrences"),
                ("count", _) => ("After ", "number", String::new(), " occurrences"),
                (_, Ending::Until(date)) => ("On ", "date", date.format("%Y-%m-%d").to_string(), ""),
                _ => ("On ", "date", String::new(), ""),
            };
            doc.append_text(label, before);
            doc.append(
                label,
                Element::input(input_type)
                    .id(&self.id(choice))
                    .attr("name", &self.field_name(choice))
                    .attr("tabindex", "1")
                    .value(&value),
            );
            if !after.is_empty() {
                doc.append_text(label, after);
            }
        }
    }
}
