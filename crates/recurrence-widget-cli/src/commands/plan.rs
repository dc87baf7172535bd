use clap::Args;
use recurrence_widget_core::{Frequency, VisibilityPlan};

#[derive(Args)]
pub struct PlanArgs {
    /// Frequency select value (-1..=3) or name (never, yearly, ...)
    #[arg(allow_hyphen_values = true)]
    frequency: String,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let by_name = Frequency::CHOICES
        .into_iter()
        .find(|f| f.label().eq_ignore_ascii_case(args.frequency.trim()));
    let plan = match by_name {
        Some(f) => VisibilityPlan::for_frequency(Some(f)),
        None => VisibilityPlan::for_value(&args.frequency),
    };
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
