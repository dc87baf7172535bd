//! # Recurrence Widget Core Library
//!
//! Behavior for a recurrence-rule editor embedded in a page. The page is
//! modeled as a headless element tree; every behavior reacts to user
//! events on pre-existing markup and never creates or removes elements.
//!
//! ## Architecture
//!
//! - **Field Visibility Controller**: shows the field groups relevant to
//!   the selected frequency and labels the interval unit
//! - **Exclusive Choice Focus Manager**: keeps only the active ending
//!   choice's companion value
//! - **Selection Style Sync**: mirrors checkbox state onto label classes
//! - **Page**: attaches to every widget instance and dispatches events
//!
//! ## Key Components
//!
//! - [`Page`]: event dispatch over one document
//! - [`VisibilityPlan`]: frequency -> visible groups table
//! - [`Recurrence`]: the rule a widget edits, with RFC-5545 text form
//! - [`WidgetConfig`]: markers and caption overrides

pub mod calendar;
pub mod config;
pub mod dom;
pub mod ending;
pub mod error;
pub mod events;
pub mod form;
pub mod frequency;
pub mod markup;
pub mod rrule;
pub mod script;
pub mod selection;
pub mod visibility;
pub mod widget;

pub use calendar::{Month, Weekday};
pub use config::{MarkerConfig, WidgetConfig};
pub use dom::{Document, Element, NodeId, Selector};
pub use error::{ConfigError, CoreError, RuleError};
pub use events::DomEvent;
pub use form::read_recurrence;
pub use frequency::{FieldGroup, Frequency, IntervalUnit, VisibilityPlan};
pub use markup::WidgetMarkup;
pub use rrule::{Ending, Recurrence};
pub use script::{ScriptAction, ScriptRunner};
pub use widget::{Page, WidgetSnapshot};
