//! Ranking and result presentation.
//!
//! `rank` turns scored records into the final shortlist; `format` renders
//! shortlists and catalog diagnostics for terminal output. Formatting stays
//! in one place so output changes are localized.

use crate::domain::{QueryOutcome, ScoredRecord, Shortlist};

pub mod format;

pub use format::*;

/// Build the shortlist: re-apply the budget cap, sort by score descending
/// and truncate to `top_n`.
///
/// The budget re-check is redundant given the upstream filter, but it is an
/// explicit part of the ranking contract. The sort is stable, so rows with
/// equal scores keep their original input order.
pub fn rank(scored: &[ScoredRecord], budget: f64, top_n: usize) -> Option<Shortlist> {
    let mut within: Vec<ScoredRecord> = scored
        .iter()
        .filter(|s| s.record.price <= budget)
        .cloned()
        .collect();

    if within.is_empty() {
        return None;
    }

    within.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    within.truncate(top_n);

    let total_price = within.iter().map(|s| s.record.price).sum::<f64>();
    let mean_score = within.iter().map(|s| s.score).sum::<f64>() / within.len() as f64;

    Some(Shortlist {
        total_price,
        avg_score_percent: round2(mean_score * 100.0),
        entries: within,
    })
}

/// Convenience wrapper mapping an empty ranking to its outcome variant.
pub fn rank_outcome(scored: &[ScoredRecord], budget: f64, top_n: usize) -> QueryOutcome {
    match rank(scored, budget, top_n) {
        Some(shortlist) => QueryOutcome::Shortlist(shortlist),
        None => QueryOutcome::NoneWithinBudget,
    }
}

/// Round to 2 decimal places.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
