//! Shared query pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> normalize -> constraint filter -> normalize scores -> rank
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use crate::domain::{QueryOutcome, QueryParams};
use crate::error::AppError;
use crate::io::ingest::{Catalog, load_catalog};
use crate::report::rank_outcome;
use crate::score::filter_and_score;

/// All computed outputs of a single query run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub catalog: Catalog,
    pub outcome: QueryOutcome,
}

/// Load the catalog fresh and execute the full query pipeline.
pub fn run_query(csv_path: &Path, params: &QueryParams, top_n: usize) -> Result<RunOutput, AppError> {
    let catalog = load_catalog(csv_path)?;
    let outcome = run_query_with_catalog(&catalog, params, top_n);
    Ok(RunOutput { catalog, outcome })
}

/// Execute the query pipeline against an already-loaded catalog.
///
/// This is useful for the TUI where we want to re-query without re-reading
/// the CSV: the normalizer is deterministic and the source file is static
/// for the session.
pub fn run_query_with_catalog(catalog: &Catalog, params: &QueryParams, top_n: usize) -> QueryOutcome {
    let scored = filter_and_score(&catalog.records, params);
    if scored.is_empty() {
        return QueryOutcome::NoMatches;
    }
    rank_outcome(&scored, params.budget, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_catalog;

    const CSV: &str = "\
brand,model,model_year,milage,fuel_type,engine,transmission,accident,clean_title,price
Toyota,Corolla,2018,\"50,000 mi.\",Gasoline,1.8L I4,Automatic,None reported,Yes,\"$10,000\"
Honda,Civic,2012,\"80,000 mi.\",Gasoline,2.0L I4,CVT,None reported,Yes,\"$7,000\"
";

    #[test]
    fn single_candidate_shortlist_scores_one() {
        let catalog = read_catalog(CSV.as_bytes()).unwrap();
        let params = QueryParams {
            budget: 15000.0,
            min_year: 2015.0,
            max_km: 60000.0,
        };
        let outcome = run_query_with_catalog(&catalog, &params, 20);
        let QueryOutcome::Shortlist(shortlist) = outcome else {
            panic!("expected a shortlist");
        };
        assert_eq!(shortlist.entries.len(), 1);
        assert_eq!(shortlist.entries[0].record.brand, "Toyota");
        // Only candidate: every normalized term is 1.0 by the
        // degenerate-range policy, so the score is exactly 1.0.
        assert_eq!(shortlist.entries[0].score, 1.0);
        assert_eq!(shortlist.avg_score_percent, 100.0);
        assert_eq!(shortlist.total_price, 10000.0);
    }

    #[test]
    fn budget_below_everything_is_no_matches() {
        let catalog = read_catalog(CSV.as_bytes()).unwrap();
        let params = QueryParams {
            budget: 1000.0,
            min_year: 2000.0,
            max_km: 100000.0,
        };
        assert!(matches!(
            run_query_with_catalog(&catalog, &params, 20),
            QueryOutcome::NoMatches
        ));
    }

    #[test]
    fn repeated_queries_yield_identical_shortlists() {
        let catalog = read_catalog(CSV.as_bytes()).unwrap();
        let params = QueryParams {
            budget: 15000.0,
            min_year: 2000.0,
            max_km: 100000.0,
        };
        let order = |outcome: QueryOutcome| match outcome {
            QueryOutcome::Shortlist(s) => s
                .entries
                .iter()
                .map(|e| (e.record.brand.clone(), e.score))
                .collect::<Vec<_>>(),
            _ => panic!("expected a shortlist"),
        };
        let first = order(run_query_with_catalog(&catalog, &params, 20));
        let second = order(run_query_with_catalog(&catalog, &params, 20));
        assert_eq!(first, second);
    }
}
