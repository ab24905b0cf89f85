//! Command-line parsing for the used-car shortlisting tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the cleaning/scoring code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::DEFAULT_TOP_N;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "carscout", version, about = "Used-car shortlisting by weighted desirability score")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one query and print the ranked shortlist.
    Search(SearchArgs),
    /// Print the catalog diagnostics report (duplicates, missing values,
    /// brand/year frequencies).
    Stats(StatsArgs),
    /// Write a synthetic demo catalog CSV.
    Sample(SampleArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying query pipeline as `carscout search`,
    /// but renders results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options for a single shortlist query.
#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    /// Maximum budget in whole currency units.
    pub budget: u64,

    /// Minimum model year.
    pub min_year: u32,

    /// Maximum odometer reading (same unit as the catalog's mileage column).
    pub max_km: u64,

    /// Catalog CSV to search.
    #[arg(long, default_value = "used_cars.csv")]
    pub csv: PathBuf,

    /// Shortlist length.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Also print the catalog diagnostics report.
    #[arg(long)]
    pub stats: bool,

    /// Export the shortlist to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the shortlist (rows + summary) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for the catalog report.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Catalog CSV to inspect.
    #[arg(long, default_value = "used_cars.csv")]
    pub csv: PathBuf,
}

/// Options for demo catalog generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Number of listings to generate.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub count: usize,

    /// Random seed (generation is deterministic per seed).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output path.
    #[arg(long, default_value = "used_cars.csv")]
    pub out: PathBuf,
}

/// Options for the interactive TUI.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Catalog CSV to search.
    #[arg(long, default_value = "used_cars.csv")]
    pub csv: PathBuf,

    /// Shortlist length.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,
}
