use clap::Args;

use super::{attached_page, parse_rule};

#[derive(Args)]
pub struct RenderArgs {
    /// Form field name of the widget
    #[arg(long, default_value = "recurrence")]
    name: String,
    /// RRULE to pre-fill (e.g. "FREQ=WEEKLY;BYDAY=MO")
    #[arg(long)]
    rule: Option<String>,
}

pub fn run(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rule = parse_rule(args.rule.as_deref())?;
    let (page, container) = attached_page(&args.name, &rule);
    println!("{}", page.document().to_html(container));
    Ok(())
}
