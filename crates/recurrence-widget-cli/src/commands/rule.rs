use clap::Subcommand;
use recurrence_widget_core::Recurrence;

#[derive(Subcommand)]
pub enum RuleAction {
    /// Parse an RRULE and print it as JSON
    Parse {
        /// Rule text, e.g. "FREQ=DAILY;COUNT=3"
        rule: String,
    },
    /// Print whether an RRULE actually recurs
    Check {
        rule: String,
    },
}

pub fn run(action: RuleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RuleAction::Parse { rule } => {
            let parsed: Recurrence = rule.parse()?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        RuleAction::Check { rule } => {
            let parsed: Recurrence = rule.parse()?;
            let out = serde_json::json!({
                "rule": parsed.to_rrule(),
                "is_recurring": parsed.is_recurring(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
