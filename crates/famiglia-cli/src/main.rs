//! CLI binary entry point for famiglia.
//!
//! Usage:
//!   famiglia [OPTIONS] show --roster <FILE> [--format <FORMAT>]
//!   famiglia [OPTIONS] run --roster <FILE> --script <FILE> [--format <FORMAT>]
//!
//! Options:
//!   -c, --config <FILE>    Path to configuration TOML file
//!   -v, --verbose          Increase logging verbosity

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use famiglia_cli::config::{CliConfig, OutputFormat};
use famiglia_cli::script::{self, Script};
use famiglia_cli::{load_hierarchy, output};

/// Famiglia - succession and restoration for a rooted organization.
#[derive(Parser, Debug)]
#[command(name = "famiglia")]
#[command(about = "Load an organization roster and run incarceration/release scripts against it")]
#[command(version)]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the organization described by a roster.
    Show {
        /// Roster file (.toml or .json).
        #[arg(short, long, value_name = "FILE")]
        roster: PathBuf,

        /// Output format (overrides config).
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Run a script of commands against a roster.
    Run {
        /// Roster file (.toml or .json).
        #[arg(short, long, value_name = "FILE")]
        roster: PathBuf,

        /// Script file, one command per line.
        #[arg(short, long, value_name = "FILE")]
        script: PathBuf,

        /// Output format (overrides config).
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration.
    let config = CliConfig::load(cli.config.as_deref())?;

    // Adjust log level based on verbosity.
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    // Initialize logging. Logs go to stderr so stdout stays parseable.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show { roster, format } => {
            let format = format.unwrap_or(config.output.format);
            let hierarchy = load_hierarchy(&roster, config.journal.capacity)?;
            println!("{}", output::render_chart(&hierarchy.chart(), format)?);
        }
        Commands::Run {
            roster,
            script: script_path,
            format,
        } => {
            let format = format.unwrap_or(config.output.format);
            let mut hierarchy = load_hierarchy(&roster, config.journal.capacity)?;
            let content = std::fs::read_to_string(&script_path)
                .with_context(|| format!("reading script {}", script_path.display()))?;
            let parsed = Script::parse(&content)
                .with_context(|| format!("parsing script {}", script_path.display()))?;

            tracing::info!(
                script = %script_path.display(),
                steps = parsed.len(),
                format = %format,
                "Running script"
            );

            for step in &parsed.steps {
                let outcome = script::execute(&mut hierarchy, step)
                    .with_context(|| format!("running {}", script_path.display()))?;
                println!("{}", output::render(&outcome, format)?);
            }
        }
    }

    Ok(())
}
