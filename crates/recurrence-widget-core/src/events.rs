use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// Every user interaction the widget reacts to is delivered as an Event.
/// Handlers may queue follow-up events; see [`crate::widget::Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomEvent {
    /// A control's value or checked state changed.
    Change { target: NodeId },
    /// Focus moved onto an element.
    Focus { target: NodeId },
    /// An element was clicked (after its default action ran).
    Click { target: NodeId },
}

impl DomEvent {
    pub fn target(&self) -> NodeId {
        match self {
            DomEvent::Change { target } | DomEvent::Focus { target } | DomEvent::Click { target } => {
                *target
            }
        }
    }
}
