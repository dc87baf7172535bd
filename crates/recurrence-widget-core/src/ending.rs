//! Exclusive ending-choice handling.
//!
//! The ending group holds choices shaped like:
//!
//! ```text
//! <div>
//!   <input type="radio" id="id_rule_ending_count" name="rule_ending" value="count">
//!   <label for="id_rule_ending_count">After <input id="id_rule_count"> occurrences</label>
//! </div>
//! ```
//!
//! Only the active choice keeps its companion value. Selecting a radio
//! captures its companion's value, clears every companion in the region,
//! then writes the captured value back. That order is load-bearing: a
//! restore before the full clear pass would be wiped by it.

use crate::dom::{Document, NodeId, Selector};
use crate::frequency::FieldGroup;

/// What a radio selection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOutcome {
    /// Companion text field of the selected radio, if it has one.
    pub companion: Option<NodeId>,
    /// Whether focus moved to the companion (a focus event is due).
    pub focus_moved: bool,
}

/// Ending region containing `node`, if any.
pub fn region_of(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.closest(node, &Selector::Class(FieldGroup::Ending.marker()))
}

/// Companion field paired with `radio` through `label[for=radio id]`,
/// looked up among the radio's siblings.
pub fn companion_of(doc: &Document, radio: NodeId) -> Option<NodeId> {
    let radio_id = doc.attr(radio, "id")?;
    let choice = doc.parent(radio)?;
    let label = doc.find_first(choice, &Selector::LabelFor(radio_id))?;
    doc.find_first(label, &Selector::Tag("input"))
}

/// Every text field nested in a label inside the region.
pub fn companion_fields(doc: &Document, region: NodeId) -> Vec<NodeId> {
    let mut fields = Vec::new();
    for label in doc.find_all(region, &Selector::Tag("label")) {
        for input in doc.find_all(label, &Selector::Tag("input")) {
            if !fields.contains(&input) {
                fields.push(input);
            }
        }
    }
    fields
}

/// Handle change-or-focus on an ending radio.
///
/// Focuses the companion, clears every companion in the region, and
/// restores the companion's own prior value. A radio without a companion
/// still clears the region. Returns `None` when the radio is not inside an
/// ending region.
pub fn select_choice(doc: &mut Document, radio: NodeId) -> Option<ChoiceOutcome> {
    let region = region_of(doc, radio)?;
    let companion = companion_of(doc, radio);
    let kept = companion
        .and_then(|c| doc.value(c))
        .unwrap_or_default()
        .to_string();

    let focus_moved = companion.is_some_and(|c| doc.focus(c));

    for field in companion_fields(doc, region) {
        doc.set_value(field, "");
    }

    match companion {
        Some(c) => doc.set_value(c, &kept),
        None => tracing::debug!(?radio, "ending choice has no companion field"),
    }

    Some(ChoiceOutcome {
        companion,
        focus_moved,
    })
}

/// Radio that a focused companion field belongs to.
///
/// The field must sit inside a label inside an ending region; the radio is
/// the first one in the field's nearest enclosing `div`.
pub fn radio_for_companion(doc: &Document, field: NodeId) -> Option<NodeId> {
    if doc.matches(field, &Selector::InputType("radio")) {
        return None;
    }
    let region = region_of(doc, field)?;
    let label = doc.closest(field, &Selector::Tag("label"))?;
    if !doc.contains(region, label) {
        return None;
    }
    let choice = doc.closest(label, &Selector::Tag("div"))?;
    if !doc.contains(region, choice) {
        return None;
    }
    doc.find_first(choice, &Selector::InputType("radio"))
}
