//! pinmux CLI: list, describe and validate SoC and board pinmux descriptions.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pinmux", version, about = "Pinmux SoC and board description tool")]
struct Cli {
    /// Directory holding *.soc.toml and *.board.toml descriptions
    #[arg(long, global = true, default_value = "configs")]
    configs: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect SoC descriptions
    Soc {
        #[command(subcommand)]
        action: SocAction,
    },
    /// Inspect board descriptions
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum Format {
    #[default]
    Human,
    Json,
}

#[derive(Subcommand)]
enum SocAction {
    /// List available SoCs
    List,
    /// Show pins, groups and functions of an SoC
    Describe {
        /// SoC name (e.g., tegra124)
        name: String,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Load an SoC and report whether it is consistent
    Validate {
        /// SoC name
        name: String,
    },
}

#[derive(Subcommand)]
enum BoardAction {
    /// List available boards
    List,
    /// Show a board's pin configurations in numeric order
    Describe {
        /// Board name (e.g., jetson-tk1)
        name: String,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Load a board against its SoC and report unconfigured pins
    Validate {
        /// Board name
        name: String,
    },
    /// Validate an external pin table and write it as a board description
    Import {
        /// Board name to write
        name: String,
        /// Import table (TOML with soc, rsvd_base and [[row]] entries)
        #[arg(long)]
        table: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let configs = cli.configs.as_path();
    match cli.command {
        Commands::Soc { action } => match action {
            SocAction::List => commands::soc::list(configs),
            SocAction::Describe { name, format } => commands::soc::describe(configs, &name, format),
            SocAction::Validate { name } => commands::soc::validate(configs, &name),
        },
        Commands::Board { action } => match action {
            BoardAction::List => commands::board::list(configs),
            BoardAction::Describe { name, format } => {
                commands::board::describe(configs, &name, format)
            }
            BoardAction::Validate { name } => commands::board::validate(configs, &name),
            BoardAction::Import { name, table } => commands::board::import(configs, &name, &table),
        },
    }
}
