//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during filtering/scoring
//! - exported to JSON/CSV
//! - rendered by any front-end (CLI, TUI)

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default shortlist length.
pub const DEFAULT_TOP_N: usize = 20;

/// One catalog listing after normalization.
///
/// A `CleanRecord` exists only if every required field parsed to a
/// non-missing value; rows failing that are dropped at ingest, never
/// repaired. `transmission` and `engine` are optional passthrough fields
/// and render as `-` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub brand: String,
    pub model: String,
    pub model_year: f64,
    /// Odometer reading with unit suffix and separators stripped.
    pub milage: f64,
    /// Asking price with currency symbols and thousands separators stripped.
    pub price: f64,
    pub fuel_type: String,
    pub transmission: Option<String>,
    pub accident: String,
    pub clean_title: String,
    pub engine: Option<String>,
}

/// A record that survived the constraint filter, extended with its
/// normalized terms and aggregate score.
///
/// Normalization bounds come from the filtered set of the current query
/// only, so scores are not comparable across queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: CleanRecord,
    pub norm_price: f64,
    pub norm_year: f64,
    pub norm_milage: f64,
    pub score: f64,
}

/// User-supplied query constraints. All three are required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryParams {
    pub budget: f64,
    pub min_year: f64,
    pub max_km: f64,
}

impl QueryParams {
    /// Build params from raw text input (TUI entry fields).
    ///
    /// Empty or non-numeric fields are a validation failure surfaced to the
    /// caller; the pipeline is never invoked with partial parameters.
    pub fn from_input(budget: &str, min_year: &str, max_km: &str) -> Result<Self, AppError> {
        if budget.trim().is_empty() || min_year.trim().is_empty() || max_km.trim().is_empty() {
            return Err(AppError::new(2, "All query fields must be filled in."));
        }

        Ok(Self {
            budget: parse_field(budget, "budget")? as f64,
            min_year: parse_field(min_year, "minimum year")? as f64,
            max_km: parse_field(max_km, "maximum mileage")? as f64,
        })
    }
}

fn parse_field(s: &str, name: &str) -> Result<u64, AppError> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| AppError::new(2, format!("Invalid {name} '{}': expected a whole number.", s.trim())))
}

/// The final top-N ranked subset for one query, plus summary aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shortlist {
    pub entries: Vec<ScoredRecord>,
    /// Sum of `price` over shortlisted rows.
    pub total_price: f64,
    /// Mean of `score` over shortlisted rows, as a percentage rounded to
    /// 2 decimal places.
    pub avg_score_percent: f64,
}

/// Result of one query.
///
/// The two empty variants are normal outcomes, not errors. They describe
/// the same underlying condition at different pipeline stages and carry
/// distinct user-facing text.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Shortlist(Shortlist),
    /// Nothing passed the year/mileage/budget constraint filter.
    NoMatches,
    /// Candidates existed but none survived the budget re-check at ranking.
    NoneWithinBudget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_from_valid_input() {
        let p = QueryParams::from_input("15000", "2015", "60000").unwrap();
        assert_eq!(p.budget, 15000.0);
        assert_eq!(p.min_year, 2015.0);
        assert_eq!(p.max_km, 60000.0);
    }

    #[test]
    fn params_reject_empty_field() {
        let err = QueryParams::from_input("15000", "", "60000").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn params_reject_non_numeric() {
        let err = QueryParams::from_input("15k", "2015", "60000").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("budget"));
    }
}
