//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::input::InputArgs;
use super::output::{Output, OutputFormat};
use super::{chart, groups, order};
use crate::storage::{Config, Project, ViewMode};

#[derive(Parser)]
#[command(name = "gantt")]
#[command(author, version, about = "Order Gantt tasks into project groups")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a gantt project (.gantt/config.toml)
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Default chart scale to store in the new config
        #[arg(long, value_enum)]
        view: Option<ViewMode>,
    },

    /// Print tasks in rendering order
    Order {
        #[command(flatten)]
        input: InputArgs,

        /// Write the ordered tasks to this file instead of printing them
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print a fingerprint of the ordering
        #[arg(long)]
        fingerprint: bool,
    },

    /// Show each group with its root, rolled-up dates and members
    Groups {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Draw a text Gantt chart
    Chart {
        #[command(flatten)]
        input: InputArgs,

        /// Chart scale (defaults to the configured view mode)
        #[arg(long, value_enum)]
        view: Option<ViewMode>,
    },
}

/// Sets up the stderr subscriber; `RUST_LOG` takes precedence over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "gantt_order=debug"
    } else {
        "gantt_order=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    debug!(
        in_project = config.is_in_project(),
        root = ?config.project_root,
        "configuration loaded"
    );

    let format = cli.format.unwrap_or(config.global.default_format);
    let output = Output::new(format, config.project.display.include_time);

    match cli.command {
        Commands::Init { path, view } => {
            let project = Project::init(&path)?;
            debug!(dir = %project.gantt_dir().display(), "project initialized");

            if let Some(view) = view {
                let mut project_config = project.config().clone();
                project_config.project.display.view_mode = view;
                project_config.save_project()?;
            }

            output.success(&format!(
                "Initialized gantt project at {}",
                project.root().display()
            ));
        }

        Commands::Order {
            input,
            output: out_path,
            fingerprint,
        } => order::run(&output, &config, &input, out_path, fingerprint)?,

        Commands::Groups { input } => groups::run(&output, &config, &input)?,

        Commands::Chart { input, view } => chart::run(&output, &config, &input, view)?,
    }

    debug!("command completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_order_flags() {
        let cli = Cli::try_parse_from([
            "gantt",
            "--format",
            "json",
            "order",
            "tasks.yaml",
            "--strict",
            "--collapse",
            "p1",
            "--fingerprint",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Order {
                input, fingerprint, ..
            } => {
                assert_eq!(input.file, PathBuf::from("tasks.yaml"));
                assert!(input.strict);
                assert!(!input.records);
                assert_eq!(input.collapse, vec!["p1".to_string()]);
                assert!(fingerprint);
            }
            _ => panic!("expected order command"),
        }
    }

    #[test]
    fn parses_init_view() {
        let cli = Cli::try_parse_from(["gantt", "init", "--view", "week"]).unwrap();

        match cli.command {
            Commands::Init { path, view } => {
                assert_eq!(path, PathBuf::from("."));
                assert_eq!(view, Some(ViewMode::Week));
            }
            _ => panic!("expected init command"),
        }
    }

    #[test]
    fn parses_chart_view() {
        let cli = Cli::try_parse_from(["gantt", "chart", "t.json", "--view", "half-day"]).unwrap();

        match cli.command {
            Commands::Chart { view, .. } => assert_eq!(view, Some(ViewMode::HalfDay)),
            _ => panic!("expected chart command"),
        }
    }
}
