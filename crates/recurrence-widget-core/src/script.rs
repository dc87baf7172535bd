//! Scripted user interactions against a built widget.
//!
//! A script is a JSON array of actions addressed by field name, e.g.
//!
//! ```json
//! [
//!   { "action": "select_frequency", "value": "2" },
//!   { "action": "click_weekday", "weekday": "MO" },
//!   { "action": "type", "field": "count", "text": "5" },
//!   { "action": "choose_ending", "ending": "count" }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::calendar::{Month, Weekday};
use crate::dom::NodeId;
use crate::error::{CoreError, Result};
use crate::markup::{element_id, ending_radio_id, month_id, weekday_id};
use crate::widget::Page;

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Pick a raw frequency value in the select.
    SelectFrequency { value: String },
    /// Click the label of a weekday checkbox.
    ClickWeekday { weekday: String },
    /// Click the label of a month checkbox.
    ClickMonth { month: String },
    /// Click an ending radio (`count` or `until`).
    ChooseEnding { ending: String },
    /// Focus a field by name (`count`, `until`, `interval`, ...).
    FocusField { field: String },
    /// Focus a field, then replace its text.
    Type { field: String, text: String },
}

/// Runs actions against the instance built with field name `name`.
pub struct ScriptRunner<'a> {
    page: &'a mut Page,
    name: &'a str,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(page: &'a mut Page, name: &'a str) -> Self {
        Self { page, name }
    }

    fn lookup(&self, id: &str) -> Result<NodeId> {
        self.page
            .document()
            .by_id(id)
            .ok_or_else(|| CoreError::Custom(format!("no element with id '{id}'")))
    }

    /// Label wrapping the checkbox with `id`.
    fn checkbox_label(&self, id: &str) -> Result<NodeId> {
        let checkbox = self.lookup(id)?;
        self.page
            .document()
            .parent(checkbox)
            .ok_or_else(|| CoreError::Custom(format!("checkbox '{id}' has no label")))
    }

    /// Apply one action; returns the number of events it dispatched.
    pub fn apply(&mut self, action: &ScriptAction) -> Result<usize> {
        tracing::debug!(?action, "script action");
        let dispatched = match action {
            ScriptAction::SelectFrequency { value } => {
                let select = self.lookup(&element_id(self.name, "freq"))?;
                self.page.select(select, value)
            }
            ScriptAction::ClickWeekday { weekday } => {
                let day = weekday.parse::<Weekday>()?;
                let label = self.checkbox_label(&weekday_id(self.name, day))?;
                self.page.click(label)
            }
            ScriptAction::ClickMonth { month } => {
                let month = month.parse::<Month>()?;
                let label = self.checkbox_label(&month_id(self.name, month))?;
                self.page.click(label)
            }
            ScriptAction::ChooseEnding { ending } => {
                let radio = self.lookup(&ending_radio_id(self.name, ending))?;
                self.page.click(radio)
            }
            ScriptAction::FocusField { field } => {
                let node = self.lookup(&element_id(self.name, field))?;
                self.page.focus(node)
            }
            ScriptAction::Type { field, text } => {
                let node = self.lookup(&element_id(self.name, field))?;
                self.page.input(node, text)
            }
        };
        Ok(dispatched)
    }

    /// Apply every action in order, stopping at the first error.
    pub fn run(&mut self, actions: &[ScriptAction]) -> Result<usize> {
        let mut total = 0;
        for action in actions {
            total += self.apply(action)?;
        }
        Ok(total)
    }
}

/// Parse a JSON script.
pub fn parse_script(json: &str) -> Result<Vec<ScriptAction>> {
    Ok(serde_json::from_str(json)?)
}
