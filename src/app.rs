//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and normalizes the catalog
//! - runs the filter/score/rank pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, SampleArgs, SearchArgs, StatsArgs, TuiArgs};
use crate::domain::{QueryOutcome, QueryParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `carscout` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `carscout` (or `carscout --csv cars.csv`) to behave like
    // `carscout tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the convenient default.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Search(args) => handle_search(args),
        Command::Stats(args) => handle_stats(args),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let params = QueryParams {
        budget: args.budget as f64,
        min_year: args.min_year as f64,
        max_km: args.max_km as f64,
    };

    let run = pipeline::run_query(&args.csv, &params, args.top)?;

    if args.stats {
        println!("{}", crate::report::format_catalog_report(&run.catalog));
    }

    let shortlist = match run.outcome {
        QueryOutcome::Shortlist(shortlist) => shortlist,
        QueryOutcome::NoMatches => {
            println!("No cars match the given constraints.");
            return Ok(());
        }
        QueryOutcome::NoneWithinBudget => {
            println!("No cars within budget.");
            return Ok(());
        }
    };

    println!("{}", crate::report::format_shortlist(&shortlist));
    println!("{}", crate::report::format_summary(&shortlist));

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_shortlist_csv(path, &shortlist)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::export::write_shortlist_json(path, &shortlist)?;
    }

    Ok(())
}

fn handle_stats(args: StatsArgs) -> Result<(), AppError> {
    let catalog = crate::io::ingest::load_catalog(&args.csv)?;
    println!("{}", crate::report::format_catalog_report(&catalog));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    crate::data::sample::write_sample_catalog(&args.out, args.count, args.seed)?;
    println!(
        "Wrote {} sample listings to '{}'.",
        args.count,
        args.out.display()
    );
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

/// Rewrite argv so `carscout` defaults to `carscout tui`.
///
/// Rules:
/// - `carscout`                     -> `carscout tui`
/// - `carscout --csv cars.csv`      -> `carscout tui --csv cars.csv`
/// - `carscout --help/--version/-h` -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "search" | "stats" | "sample" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["carscout"])), argv(&["carscout", "tui"]));
    }

    #[test]
    fn leading_flag_defaults_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["carscout", "--csv", "cars.csv"])),
            argv(&["carscout", "tui", "--csv", "cars.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["carscout", "search", "15000", "2015", "60000"])),
            argv(&["carscout", "search", "15000", "2015", "60000"])
        );
        assert_eq!(rewrite_args(argv(&["carscout", "--help"])), argv(&["carscout", "--help"]));
    }
}
