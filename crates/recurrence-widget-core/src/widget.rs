//! Widget instances and event dispatch.
//!
//! [`Page`] owns the document, discovers every widget instance at attach
//! time, and routes user interactions to the three behaviors:
//!
//! ```text
//! Change on the frequency select      -> visibility::apply
//! Change | Focus on an ending radio   -> ending::select_choice
//! Focus on a companion field          -> click its radio
//! Click in a weekday/month label      -> selection::sync_label
//! ```
//!
//! Dispatch is run-to-completion: each handler finishes before the next
//! queued event is processed, and every handler is scoped to the nearest
//! enclosing instance of its target.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::config::WidgetConfig;
use crate::dom::{Document, NodeId, Selector};
use crate::ending;
use crate::events::DomEvent;
use crate::frequency::{FieldGroup, Frequency};
use crate::selection;
use crate::visibility;

/// Observable state of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub frequency_value: Option<String>,
    pub frequency: Option<Frequency>,
    /// Field groups currently shown, in declaration order.
    pub visible_groups: Vec<FieldGroup>,
    pub interval_label: Option<String>,
    /// Value of the checked ending radio.
    pub ending_choice: Option<String>,
    /// Companion field values keyed by field name (or id).
    pub ending_values: BTreeMap<String, String>,
    /// Text of the checkbox labels carrying the selected marker.
    pub selected_labels: Vec<String>,
}

/// A document with attached widget behavior.
#[derive(Debug, Clone)]
pub struct Page {
    doc: Document,
    config: WidgetConfig,
    instances: Vec<NodeId>,
    log: Vec<DomEvent>,
}

impl Page {
    /// Attach to every widget instance in `doc` and bring each one into its
    /// initial state.
    pub fn attach(doc: Document, config: WidgetConfig) -> Self {
        let instances = doc.find_all(doc.root(), &Selector::Class(&config.markers.container));
        let mut page = Self {
            doc,
            config,
            instances,
            log: Vec::new(),
        };
        for instance in page.instances.clone() {
            page.init_instance(instance);
        }
        tracing::debug!(instances = page.instances.len(), "widget attached");
        page
    }

    fn init_instance(&mut self, instance: NodeId) {
        visibility::apply(&mut self.doc, instance, &self.config.markers);
        let synced = selection::sync_all(&mut self.doc, instance, &self.config.markers.selected);
        tracing::debug!(?instance, synced, "widget instance initialized");
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn instances(&self) -> &[NodeId] {
        &self.instances
    }

    /// Recently dispatched events, oldest first. At most
    /// `dispatch.event_log_limit` are kept.
    pub fn events(&self) -> &[DomEvent] {
        &self.log
    }

    /// Nearest enclosing widget instance of `node`.
    pub fn instance_of(&self, node: NodeId) -> Option<NodeId> {
        self.doc
            .closest(node, &Selector::Class(&self.config.markers.container))
    }

    pub fn snapshot(&self, instance: NodeId) -> Option<WidgetSnapshot> {
        let doc = &self.doc;
        let markers = &self.config.markers;
        doc.get(instance)?;

        let frequency_value = visibility::frequency_value(doc, instance, markers);
        let frequency = frequency_value.as_deref().and_then(Frequency::from_value);

        let visible_groups = FieldGroup::ALL
            .into_iter()
            .filter(|g| {
                doc.find_first(instance, &Selector::Class(g.marker()))
                    .is_some_and(|region| !doc.is_hidden(region))
            })
            .collect();

        let interval_label = doc
            .find_first(instance, &Selector::Class(&markers.interval_label))
            .map(|lbl| doc.text(lbl));

        let mut ending_choice = None;
        let mut ending_values = BTreeMap::new();
        if let Some(region) = doc.find_first(instance, &Selector::Class(FieldGroup::Ending.marker())) {
            ending_choice = doc
                .find_all(region, &Selector::InputType("radio"))
                .into_iter()
                .find(|r| doc.is_checked(*r))
                .and_then(|r| doc.value(r))
                .map(str::to_string);
            for field in ending::companion_fields(doc, region) {
                let key = doc
                    .attr(field, "name")
                    .or_else(|| doc.attr(field, "id"))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("node-{}", field.index()));
                ending_values.insert(key, doc.value(field).unwrap_or_default().to_string());
            }
        }

        let selected_labels = selection::checkbox_labels(doc, instance)
            .into_iter()
            .filter(|l| doc.has_class(*l, &markers.selected))
            .map(|l| doc.text(l).trim().to_string())
            .collect();

        Some(WidgetSnapshot {
            frequency_value,
            frequency,
            visible_groups,
            interval_label,
            ending_choice,
            ending_values,
            selected_labels,
        })
    }

    // ── User actions ─────────────────────────────────────────────────
    //
    // Each returns the number of events dispatched.

    /// Set a control's value (e.g. pick a frequency) and fire Change.
    pub fn select(&mut self, node: NodeId, value: &str) -> usize {
        if self.doc.get(node).is_none() {
            return 0;
        }
        self.doc.set_value(node, value);
        self.run(VecDeque::from([DomEvent::Change { target: node }]))
    }

    /// Type into a field the way a user does: focus it first (which lets a
    /// companion field activate its ending radio), then set its value and
    /// fire Change.
    ///
    /// To pre-fill values without user semantics, call
    /// [`Document::set_value`] before [`Page::attach`].
    pub fn input(&mut self, node: NodeId, text: &str) -> usize {
        if self.doc.get(node).is_none() {
            return 0;
        }
        let focused = self.focus(node);
        focused + self.select(node, text)
    }

    /// Click `node`: run its default action, then fire Click and, when a
    /// control's checked state changed, Change on that control.
    ///
    /// A click does not move focus. A browser would also focus a clicked
    /// radio, so clicking an already-checked ending radio there re-runs the
    /// ending handler; here that only happens through [`Page::focus`].
    pub fn click(&mut self, node: NodeId) -> usize {
        let mut queue = VecDeque::new();
        self.perform_click(node, &mut queue);
        self.run(queue)
    }

    /// Move focus to `node`, firing Focus only if focus actually moved.
    pub fn focus(&mut self, node: NodeId) -> usize {
        let mut queue = VecDeque::new();
        self.perform_focus(node, &mut queue);
        self.run(queue)
    }

    fn perform_click(&mut self, node: NodeId, queue: &mut VecDeque<DomEvent>) {
        if self.doc.get(node).is_none() {
            return;
        }
        let changed = self.doc.activate(node);
        queue.push_back(DomEvent::Click { target: node });
        if let Some(control) = changed {
            queue.push_back(DomEvent::Change { target: control });
        }
    }

    fn perform_focus(&mut self, node: NodeId, queue: &mut VecDeque<DomEvent>) {
        if self.doc.focus(node) {
            queue.push_back(DomEvent::Focus { target: node });
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    fn run(&mut self, mut queue: VecDeque<DomEvent>) -> usize {
        let cap = self.config.dispatch.max_events_per_action as usize;
        let mut processed = 0;
        while let Some(event) = queue.pop_front() {
            if processed >= cap {
                tracing::warn!(
                    cap,
                    dropped = queue.len() + 1,
                    "event cap reached; dropping remaining events"
                );
                break;
            }
            processed += 1;
            self.record(event);
            self.handle(event, &mut queue);
        }
        processed
    }

    fn record(&mut self, event: DomEvent) {
        let limit = self.config.dispatch.event_log_limit as usize;
        if limit == 0 {
            return;
        }
        if self.log.len() >= limit {
            let excess = self.log.len() + 1 - limit;
            self.log.drain(..excess);
        }
        self.log.push(event);
    }

    fn handle(&mut self, event: DomEvent, queue: &mut VecDeque<DomEvent>) {
        let target = event.target();
        let Some(instance) = self.instance_of(target) else {
            tracing::debug!(?event, "event outside any widget instance");
            return;
        };

        match event {
            DomEvent::Change { .. } if self.is_frequency_select(target) => {
                visibility::apply(&mut self.doc, instance, &self.config.markers);
            }
            DomEvent::Change { .. } | DomEvent::Focus { .. } if self.is_ending_radio(instance, target) => {
                if let Some(outcome) = ending::select_choice(&mut self.doc, target) {
                    if let (true, Some(companion)) = (outcome.focus_moved, outcome.companion) {
                        queue.push_back(DomEvent::Focus { target: companion });
                    }
                }
            }
            DomEvent::Focus { .. } => {
                let radio = ending::radio_for_companion(&self.doc, target)
                    .filter(|r| self.doc.contains(instance, *r));
                if let Some(radio) = radio {
                    tracing::debug!(?target, ?radio, "companion focused; selecting its radio");
                    self.perform_click(radio, queue);
                }
            }
            DomEvent::Click { .. } => {
                if let Some(label) = selection::label_for_click(&self.doc, instance, target) {
                    selection::sync_label(&mut self.doc, label, &self.config.markers.selected);
                }
            }
            DomEvent::Change { .. } => {}
        }
    }

    fn is_frequency_select(&self, node: NodeId) -> bool {
        self.doc.matches(
            node,
            &Selector::All(vec![
                Selector::Tag("select"),
                Selector::Class(&self.config.markers.frequency_select),
            ]),
        )
    }

    fn is_ending_radio(&self, instance: NodeId, node: NodeId) -> bool {
        self.doc.matches(node, &Selector::InputType("radio"))
            && ending::region_of(&self.doc, node).is_some_and(|r| self.doc.contains(instance, r))
    }
}
