//! Selection style sync for checkbox labels.
//!
//! Labels in the by-weekday and by-month lists (`li > label > checkbox`)
//! carry the selected marker exactly when their checkbox is checked.

use crate::dom::{Document, NodeId, Selector};
use crate::frequency::FieldGroup;

/// Set the marker on `label` from its checkbox. Returns the checked state,
/// or `None` when the label wraps no checkbox.
pub fn sync_label(doc: &mut Document, label: NodeId, selected_class: &str) -> Option<bool> {
    let checkbox = doc.find_first(label, &Selector::InputType("checkbox"))?;
    let checked = doc.is_checked(checkbox);
    doc.set_class(label, selected_class, checked);
    Some(checked)
}

fn is_list_label(doc: &Document, label: NodeId) -> bool {
    doc.matches(label, &Selector::Tag("label"))
        && doc
            .parent(label)
            .is_some_and(|p| doc.matches(p, &Selector::Tag("li")))
        && doc
            .find_first(label, &Selector::InputType("checkbox"))
            .is_some()
}

/// All checkbox labels of the instance, in document order.
pub fn checkbox_labels(doc: &Document, instance: NodeId) -> Vec<NodeId> {
    let mut labels = Vec::new();
    for group in FieldGroup::ALL.into_iter().filter(|g| g.has_checkbox_labels()) {
        for region in doc.find_all(instance, &Selector::Class(group.marker())) {
            labels.extend(
                doc.find_all(region, &Selector::Tag("label"))
                    .into_iter()
                    .filter(|l| is_list_label(doc, *l)),
            );
        }
    }
    labels
}

/// Checkbox label a click on `target` landed in, if it belongs to
/// `instance`.
pub fn label_for_click(doc: &Document, instance: NodeId, target: NodeId) -> Option<NodeId> {
    let label = doc.closest(target, &Selector::Tag("label"))?;
    if !doc.contains(instance, label) || !is_list_label(doc, label) {
        return None;
    }
    let in_group = FieldGroup::ALL
        .into_iter()
        .filter(|g| g.has_checkbox_labels())
        .any(|g| doc.closest(label, &Selector::Class(g.marker())).is_some());
    in_group.then_some(label)
}

/// Sync every checkbox label of the instance. Returns how many were synced.
pub fn sync_all(doc: &mut Document, instance: NodeId, selected_class: &str) -> usize {
    let labels = checkbox_labels(doc, instance);
    labels
        .into_iter()
        .filter_map(|label| sync_label(doc, label, selected_class))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn weekday_list(checked: &[bool]) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.root();
        let w = doc.append(root, Element::new("div").class("recurrence-widget"));
        let region = doc.append(w, Element::new("div").class("recurrence-byweekday"));
        let ul = doc.append(region, Element::new("ul"));
        let mut labels = Vec::new();
        for on in checked {
            let li = doc.append(ul, Element::new("li"));
            let label = doc.append(li, Element::new("label"));
            doc.append(label, Element::input("checkbox").checked(*on));
            labels.push(label);
        }
        (doc, w, labels)
    }

    #[test]
    fn initial_sync_marks_checked_labels() {
        let (mut doc, w, labels) = weekday_list(&[true, false, true]);
        assert_eq!(sync_all(&mut doc, w, "selected"), 3);
        assert!(doc.has_class(labels[0], "selected"));
        assert!(!doc.has_class(labels[1], "selected"));
        assert!(doc.has_class(labels[2], "selected"));
    }

    #[test]
    fn sync_is_idempotent() {
        let (mut doc, _w, labels) = weekday_list(&[true]);
        sync_label(&mut doc, labels[0], "selected");
        sync_label(&mut doc, labels[0], "selected");
        let classes = &doc.get(labels[0]).unwrap().classes;
        assert_eq!(classes.iter().filter(|c| *c == "selected").count(), 1);
    }

    #[test]
    fn click_target_resolves_to_list_label() {
        let (doc, w, labels) = weekday_list(&[false]);
        let checkbox = doc.find_first(labels[0], &Selector::InputType("checkbox")).unwrap();
        assert_eq!(label_for_click(&doc, w, checkbox), Some(labels[0]));
        assert_eq!(label_for_click(&doc, w, labels[0]), Some(labels[0]));
        assert_eq!(label_for_click(&doc, w, w), None);
    }

    #[test]
    fn label_without_checkbox_is_skipped() {
        let mut doc = Document::new();
        let root = doc.root();
        let label = doc.append(root, Element::new("label"));
        assert_eq!(sync_label(&mut doc, label, "selected"), None);
    }
}
