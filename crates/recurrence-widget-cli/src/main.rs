use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "recurrence-widget", version, about = "Recurrence widget CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a widget for a rule and print its HTML
    Render(commands::render::RenderArgs),
    /// Replay a script of user actions and print the resulting state
    Simulate(commands::simulate::SimulateArgs),
    /// Show the visible field groups for a frequency value
    Plan(commands::plan::PlanArgs),
    /// Recurrence rule parsing
    Rule {
        #[command(subcommand)]
        action: commands::rule::RuleAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Rule { action } => commands::rule::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
