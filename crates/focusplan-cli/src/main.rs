use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusplan", version, about = "Plan fixed and flexible tasks onto your calendar")]
struct Cli {
    /// Log scheduling decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a schedule plan from a JSON request
    Plan(commands::plan::PlanArgs),
    /// List conflicts between fixed tasks and events
    Conflicts {
        /// Request file (stdin when omitted or "-")
        file: Option<std::path::PathBuf>,
    },
    /// Normalise raw text-translator output
    Intake(commands::intake::IntakeArgs),
    /// Default preference management
    Preference {
        #[command(subcommand)]
        action: commands::preference::PreferenceAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FOCUSPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Conflicts { file } => commands::conflicts::run(file),
        Commands::Intake(args) => commands::intake::run(args),
        Commands::Preference { action } => commands::preference::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
