//! Headless element tree.
//!
//! A small arena of elements standing in for the page the widget is
//! embedded in. Handlers address elements by [`NodeId`] and query with
//! typed [`Selector`]s scoped to a subtree, so a lookup can never escape
//! the widget instance it started from.
//!
//! Every operation tolerates stale or foreign ids: reads return `None` or
//! an empty result and writes are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TEXT_TAG: &str = "#text";
const VOID_TAGS: [&str; 4] = ["input", "br", "hr", "img"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One element (or text run) in the tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    /// Current form value (inputs and selects).
    pub value: String,
    pub checked: bool,
    pub hidden: bool,
    /// Content of `#text` nodes.
    pub text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Shorthand for `<input type="...">`.
    pub fn input(input_type: &str) -> Self {
        Self::new("input").attr("type", input_type)
    }

    pub fn text_node(text: &str) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        for c in class.split_whitespace() {
            if !self.classes.iter().any(|existing| existing == c) {
                self.classes.push(c.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn input_type(&self) -> Option<&str> {
        if self.tag == "input" {
            Some(self.get_attr("type").unwrap_or("text"))
        } else {
            None
        }
    }

    pub fn is_checkbox(&self) -> bool {
        self.input_type() == Some("checkbox")
    }

    pub fn is_radio(&self) -> bool {
        self.input_type() == Some("radio")
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Element matcher used by the scoped queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Any element (text runs never match).
    Any,
    Class(&'a str),
    Tag(&'a str),
    Id(&'a str),
    /// `input[type=...]`; an input without a type is `text`.
    InputType(&'a str),
    /// `label[for=...]`
    LabelFor(&'a str),
    /// Every inner selector must match.
    All(Vec<Selector<'a>>),
}

impl Selector<'_> {
    pub fn matches(&self, el: &Element) -> bool {
        if el.is_text() {
            return false;
        }
        match self {
            Selector::Any => true,
            Selector::Class(c) => el.has_class(c),
            Selector::Tag(t) => el.tag.eq_ignore_ascii_case(t),
            Selector::Id(id) => el.get_attr("id") == Some(*id),
            Selector::InputType(t) => el.input_type() == Some(*t),
            Selector::LabelFor(id) => el.tag == "label" && el.get_attr("for") == Some(*id),
            Selector::All(parts) => parts.iter().all(|s| s.matches(el)),
        }
    }
}

/// The element arena. Node 0 is the `body` root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Element>,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            focused: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }

    // ── Building ─────────────────────────────────────────────────────

    /// Append `element` as the last child of `parent`. An unknown parent
    /// leaves the new node detached.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        element.children.clear();
        element.parent = None;
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
            element.parent = Some(parent);
        }
        self.nodes.push(element);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, Element::text_node(text))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|el| el.parent)
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.find_first(self.root(), &Selector::Id(id))
    }

    /// Nearest ancestor-or-self matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            let el = self.get(id)?;
            if selector.matches(el) {
                return Some(id);
            }
            current = el.parent;
        }
        None
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Pre-order descendants of `scope`, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(el) = self.get(scope) else {
            return out;
        };
        let mut stack: Vec<NodeId> = el.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(child) = self.get(id) {
                stack.extend(child.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn find_all(&self, scope: NodeId, selector: &Selector<'_>) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|el| selector.matches(el)))
            .collect()
    }

    pub fn find_first(&self, scope: NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|el| selector.matches(el)))
    }

    pub fn matches(&self, node: NodeId, selector: &Selector<'_>) -> bool {
        self.get(node).is_some_and(|el| selector.matches(el))
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node).and_then(|el| el.get_attr(name))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node).is_some_and(|el| el.has_class(class))
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|el| el.value.as_str())
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|el| el.checked)
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|el| el.hidden)
    }

    /// Concatenated text of every text run under `node`.
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(el) = self.get(node) {
            if el.is_text() {
                out.push_str(&el.text);
            }
        }
        for id in self.descendants(node) {
            if let Some(el) = self.get(id) {
                if el.is_text() {
                    out.push_str(&el.text);
                }
            }
        }
        out
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    // ── Mutation ─────────────────────────────────────────────────────

    pub fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if let Some(el) = self.get_mut(node) {
            let present = el.has_class(class);
            if on && !present {
                el.classes.push(class.to_string());
            } else if !on && present {
                el.classes.retain(|c| c != class);
            }
        }
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(el) = self.get_mut(node) {
            el.hidden = hidden;
        }
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.get_mut(node) {
            el.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(el) = self.get_mut(node) {
            el.checked = checked;
        }
    }

    /// Make `node` hold a single text run.
    ///
    /// An existing text child is rewritten in place and any other children
    /// are detached. A new text node is only appended when `node` has no
    /// text child, so repeated calls never grow the document.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        let Some(el) = self.get(node) else {
            return;
        };
        if el.is_text() {
            if let Some(el) = self.get_mut(node) {
                el.text = text.to_string();
            }
            return;
        }

        let children = el.children.clone();
        let keep = children
            .iter()
            .copied()
            .find(|c| self.get(*c).is_some_and(Element::is_text));
        for child in children.iter().copied().filter(|c| Some(*c) != keep) {
            if let Some(c) = self.get_mut(child) {
                c.parent = None;
            }
        }

        match keep {
            Some(run) => {
                if let Some(el) = self.get_mut(node) {
                    el.children = vec![run];
                }
                if let Some(t) = self.get_mut(run) {
                    t.text = text.to_string();
                }
            }
            None => {
                if let Some(el) = self.get_mut(node) {
                    el.children.clear();
                }
                self.append_text(node, text);
            }
        }
    }

    /// Move focus to `node`. Returns `false` when it already had focus or
    /// does not exist, in which case no focus event should be raised.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if self.get(node).is_none() || self.focused == Some(node) {
            return false;
        }
        self.focused = Some(node);
        true
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Native default action of a click on `node`.
    ///
    /// Checkboxes toggle; radios become checked and uncheck the other
    /// radios sharing their `name` inside the same form (or document). A
    /// label forwards the click to its `for` target, or to the first
    /// checkbox/radio it wraps. Returns the control whose checked state
    /// changed.
    pub fn activate(&mut self, node: NodeId) -> Option<NodeId> {
        let el = self.get(node)?;
        let target = if el.tag == "label" {
            match el.get_attr("for") {
                Some(for_id) => self.by_id(for_id)?,
                None => self.descendants(node).into_iter().find(|id| {
                    self.get(*id)
                        .is_some_and(|c| c.is_checkbox() || c.is_radio())
                })?,
            }
        } else {
            node
        };

        let control = self.get(target)?;
        if control.is_checkbox() {
            let checked = !control.checked;
            self.set_checked(target, checked);
            Some(target)
        } else if control.is_radio() {
            if control.checked {
                return None;
            }
            if let Some(name) = control.get_attr("name").map(str::to_string) {
                let scope = self
                    .closest(target, &Selector::Tag("form"))
                    .unwrap_or_else(|| self.root());
                for other in self.find_all(scope, &Selector::InputType("radio")) {
                    if self.attr(other, "name") == Some(name.as_str()) {
                        self.set_checked(other, false);
                    }
                }
            }
            self.set_checked(target, true);
            Some(target)
        } else {
            None
        }
    }

    // ── Serialization ────────────────────────────────────────────────

    /// Serialize `node` and its subtree to HTML.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, None, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, select_value: Option<&str>, out: &mut String) {
        let Some(el) = self.get(node) else {
            return;
        };
        if el.is_text() {
            out.push_str(&escape(&el.text));
            return;
        }

        out.push('<');
        out.push_str(&el.tag);
        if !el.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape(&el.classes.join(" "))));
        }
        for (name, value) in &el.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
        if el.tag == "input" && !el.value.is_empty() {
            out.push_str(&format!(" value=\"{}\"", escape(&el.value)));
        }
        if el.checked {
            out.push_str(" checked");
        }
        if el.tag == "option" && select_value.is_some() && el.get_attr("value") == select_value {
            out.push_str(" selected");
        }
        if el.hidden {
            out.push_str(" style=\"display: none;\"");
        }
        out.push('>');

        if VOID_TAGS.contains(&el.tag.as_str()) {
            return;
        }

        let inner_select = if el.tag == "select" {
            Some(el.value.as_str())
        } else {
            None
        };
        for child in &el.children {
            self.write_html(*child, inner_select, out);
        }
        out.push_str(&format!("</{}>", el.tag));
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.append(root, Element::new("div").class("outer"));
        let label = doc.append(div, Element::new("label"));
        let cb = doc.append(label, Element::input("checkbox").id("cb"));
        (doc, div, label, cb)
    }

    #[test]
    fn closest_walks_up_from_self() {
        let (doc, div, _label, cb) = sample();
        assert_eq!(doc.closest(cb, &Selector::Class("outer")), Some(div));
        assert_eq!(doc.closest(div, &Selector::Class("outer")), Some(div));
        assert_eq!(doc.closest(cb, &Selector::Class("missing")), None);
    }

    #[test]
    fn find_is_scoped_to_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append(root, Element::new("div"));
        let b = doc.append(root, Element::new("div"));
        doc.append(a, Element::new("span").class("x"));
        let in_b = doc.append(b, Element::new("span").class("x"));
        assert_eq!(doc.find_all(b, &Selector::Class("x")), vec![in_b]);
        assert_eq!(doc.find_all(root, &Selector::Class("x")).len(), 2);
    }

    #[test]
    fn label_click_toggles_wrapped_checkbox() {
        let (mut doc, _div, label, cb) = sample();
        assert_eq!(doc.activate(label), Some(cb));
        assert!(doc.is_checked(cb));
        assert_eq!(doc.activate(label), Some(cb));
        assert!(!doc.is_checked(cb));
    }

    #[test]
    fn radio_group_is_exclusive() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append(root, Element::input("radio").attr("name", "g"));
        let b = doc.append(root, Element::input("radio").attr("name", "g"));
        assert_eq!(doc.activate(a), Some(a));
        assert_eq!(doc.activate(b), Some(b));
        assert!(!doc.is_checked(a));
        assert!(doc.is_checked(b));
        // Already checked: nothing changes.
        assert_eq!(doc.activate(b), None);
    }

    #[test]
    fn focus_reports_movement_only() {
        let (mut doc, _div, _label, cb) = sample();
        assert!(doc.focus(cb));
        assert!(!doc.focus(cb));
        assert_eq!(doc.focused(), Some(cb));
    }

    #[test]
    fn set_text_replaces_children() {
        let mut doc = Document::new();
        let root = doc.root();
        let span = doc.append(root, Element::new("span"));
        doc.append_text(span, "weeks");
        doc.set_text(span, "days");
        assert_eq!(doc.text(span), "days");
    }

    #[test]
    fn set_text_reuses_existing_run() {
        let mut doc = Document::new();
        let root = doc.root();
        let span = doc.append(root, Element::new("span"));
        doc.set_text(span, "weeks");
        let len = doc.len();
        for unit in ["days", "months", "days", "years"] {
            doc.set_text(span, unit);
        }
        assert_eq!(doc.len(), len);
        assert_eq!(doc.get(span).unwrap().children().len(), 1);
        assert_eq!(doc.text(span), "years");
    }

    #[test]
    fn set_text_drops_element_children() {
        let mut doc = Document::new();
        let root = doc.root();
        let label = doc.append(root, Element::new("label"));
        let input = doc.append(label, Element::input("text"));
        doc.append_text(label, " caption");
        doc.set_text(label, "plain");
        assert_eq!(doc.text(label), "plain");
        assert_eq!(doc.parent(input), None);
        assert!(!doc.contains(label, input));
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut doc = Document::new();
        let bogus = NodeId(99);
        doc.set_hidden(bogus, true);
        doc.set_value(bogus, "x");
        assert_eq!(doc.value(bogus), None);
        assert_eq!(doc.activate(bogus), None);
        assert!(!doc.focus(bogus));
    }

    #[test]
    fn html_marks_selected_option_and_hidden() {
        let mut doc = Document::new();
        let root = doc.root();
        let select = doc.append(root, Element::new("select").class("freq").value("2"));
        doc.append(select, Element::new("option").attr("value", "1"));
        doc.append(select, Element::new("option").attr("value", "2"));
        let div = doc.append(root, Element::new("div").hidden(true));
        let html = doc.to_html(select);
        assert!(html.contains("<option value=\"2\" selected>"));
        assert!(!html.contains("<option value=\"1\" selected>"));
        assert!(doc.to_html(div).contains("display: none"));
    }
}
