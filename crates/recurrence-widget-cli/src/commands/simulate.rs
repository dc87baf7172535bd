use clap::Args;
use std::path::PathBuf;

use recurrence_widget_core::script::parse_script;
use recurrence_widget_core::{read_recurrence, ScriptRunner};

use super::{attached_page, parse_rule};

#[derive(Args)]
pub struct SimulateArgs {
    /// Form field name of the widget
    #[arg(long, default_value = "recurrence")]
    name: String,
    /// RRULE to pre-fill before the script runs
    #[arg(long)]
    rule: Option<String>,
    /// JSON file holding an array of actions ("-" reads stdin)
    #[arg(long)]
    script: PathBuf,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rule = parse_rule(args.rule.as_deref())?;
    let json = if args.script.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(&args.script)?
    };
    let actions = parse_script(&json)?;
    tracing::info!(count = actions.len(), name = %args.name, "replaying script");

    let (mut page, container) = attached_page(&args.name, &rule);
    let dispatched = ScriptRunner::new(&mut page, &args.name).run(&actions)?;

    let snapshot = page
        .snapshot(container)
        .ok_or("widget instance disappeared")?;
    let read_back = read_recurrence(page.document(), container, &page.config().markers)?;

    let out = serde_json::json!({
        "actions": actions.len(),
        "events": dispatched,
        "state": snapshot,
        "rule": read_back.to_rrule(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
