pub mod config;
pub mod plan;
pub mod render;
pub mod rule;
pub mod simulate;

use recurrence_widget_core::{Document, NodeId, Page, Recurrence, WidgetConfig, WidgetMarkup};

/// Parse `--rule`, treating a missing rule or `never` as the empty rule.
pub fn parse_rule(rule: Option<&str>) -> Result<Recurrence, Box<dyn std::error::Error>> {
    match rule.map(str::trim) {
        None | Some("") => Ok(Recurrence::default()),
        Some(r) if r.eq_ignore_ascii_case("never") => Ok(Recurrence::default()),
        Some(r) => Ok(r.parse()?),
    }
}

/// Build one widget named `name` for `rule` and attach to it.
pub fn attached_page(name: &str, rule: &Recurrence) -> (Page, NodeId) {
    let config = WidgetConfig::load_or_default();
    let mut doc = Document::new();
    let root = doc.root();
    let container = WidgetMarkup::new(name, &config).build(&mut doc, root, rule);
    (Page::attach(doc, config), container)
}
