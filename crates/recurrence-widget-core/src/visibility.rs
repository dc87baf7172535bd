//! Field visibility controller.
//!
//! Reads the frequency select of one widget instance, hides every field
//! group, then shows exactly the groups [`VisibilityPlan`] lists and
//! writes the interval unit label. Runs on every frequency change and
//! once per instance at attach time.

use crate::config::MarkerConfig;
use crate::dom::{Document, NodeId, Selector};
use crate::frequency::VisibilityPlan;

/// Current raw value of the instance's frequency select, if present.
pub fn frequency_value(doc: &Document, instance: NodeId, markers: &MarkerConfig) -> Option<String> {
    let select = doc.find_first(instance, &Selector::Class(&markers.frequency_select))?;
    doc.value(select).map(str::to_string)
}

/// Apply the visibility policy to the instance rooted at `instance`.
///
/// A missing frequency select reads as an unrecognized value, leaving only
/// the frequency group visible. A missing unit label is skipped.
pub fn apply(doc: &mut Document, instance: NodeId, markers: &MarkerConfig) -> VisibilityPlan {
    let value = frequency_value(doc, instance, markers).unwrap_or_default();
    let plan = VisibilityPlan::for_value(&value);

    for field in doc.find_all(instance, &Selector::Class(&markers.field)) {
        doc.set_hidden(field, true);
    }
    for group in &plan.visible {
        for region in doc.find_all(instance, &Selector::Class(group.marker())) {
            doc.set_hidden(region, false);
        }
    }

    if let Some(unit) = plan.interval_unit {
        match doc.find_first(instance, &Selector::Class(&markers.interval_label)) {
            Some(label) => doc.set_text(label, unit.as_str()),
            None => tracing::debug!(?instance, "no interval label; unit text skipped"),
        }
    }

    tracing::debug!(?instance, value = %value, visible = ?plan.visible, "field visibility updated");
    plan
}

/// Resolve the enclosing instance of `origin` and apply the policy to it.
pub fn update_from(
    doc: &mut Document,
    origin: NodeId,
    markers: &MarkerConfig,
) -> Option<VisibilityPlan> {
    let Some(instance) = doc.closest(origin, &Selector::Class(&markers.container)) else {
        tracing::debug!(?origin, "frequency change outside any widget instance");
        return None;
    };
    Some(apply(doc, instance, markers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::frequency::FieldGroup;

    fn bare_widget(freq: &str) -> (Document, NodeId) {
        let markers = MarkerConfig::default();
        let mut doc = Document::new();
        let root = doc.root();
        let w = doc.append(root, Element::new("div").class(&markers.container));
        for group in FieldGroup::ALL {
            let region = doc.append(
                w,
                Element::new("div").class(&markers.field).class(group.marker()),
            );
            match group {
                FieldGroup::Frequency => {
                    doc.append(region, Element::new("select").class("freq").value(freq));
                }
                FieldGroup::Interval => {
                    let lbl = doc.append(region, Element::new("span").class("interval-lbl"));
                    doc.append_text(lbl, "weeks");
                }
                _ => {}
            }
        }
        (doc, w)
    }

    fn visible(doc: &Document, w: NodeId) -> Vec<FieldGroup> {
        FieldGroup::ALL
            .into_iter()
            .filter(|g| {
                doc.find_first(w, &Selector::Class(g.marker()))
                    .is_some_and(|n| !doc.is_hidden(n))
            })
            .collect()
    }

    #[test]
    fn weekly_shows_weekday_group_and_weeks() {
        let (mut doc, w) = bare_widget("2");
        apply(&mut doc, w, &MarkerConfig::default());
        assert_eq!(
            visible(&doc, w),
            vec![
                FieldGroup::Frequency,
                FieldGroup::Interval,
                FieldGroup::Ending,
                FieldGroup::ByWeekday
            ]
        );
        let lbl = doc.find_first(w, &Selector::Class("interval-lbl")).unwrap();
        assert_eq!(doc.text(lbl), "weeks");
    }

    #[test]
    fn never_leaves_label_untouched() {
        let (mut doc, w) = bare_widget("-1");
        apply(&mut doc, w, &MarkerConfig::default());
        assert_eq!(visible(&doc, w), vec![FieldGroup::Frequency]);
        let lbl = doc.find_first(w, &Selector::Class("interval-lbl")).unwrap();
        assert_eq!(doc.text(lbl), "weeks");
    }

    #[test]
    fn missing_select_degrades_to_frequency_only() {
        let markers = MarkerConfig::default();
        let mut doc = Document::new();
        let root = doc.root();
        let w = doc.append(root, Element::new("div").class(&markers.container));
        let region = doc.append(
            w,
            Element::new("div").class(&markers.field).class("recurrence-interval"),
        );
        let plan = apply(&mut doc, w, &markers);
        assert_eq!(plan.visible, vec![FieldGroup::Frequency]);
        assert!(doc.is_hidden(region));
    }

    #[test]
    fn update_from_outside_instance_is_noop() {
        let mut doc = Document::new();
        let root = doc.root();
        let stray = doc.append(root, Element::new("select").class("freq").value("0"));
        assert!(update_from(&mut doc, stray, &MarkerConfig::default()).is_none());
    }
}
