//! Terminal formatting for shortlists and catalog diagnostics.
//!
//! Display conventions follow the upstream tool: prices and odometer values
//! use `.` as the thousands separator, scores render as a percentage with
//! at most two decimals and trailing zeros trimmed.

use crate::domain::Shortlist;
use crate::io::ingest::Catalog;

/// Format the shortlist as a fixed-width table.
pub fn format_shortlist(shortlist: &Shortlist) -> String {
    let mut out = String::new();

    out.push_str(
        format!(
            "{:>3} {:<14} {:<20} {:>10} {:>6} {:>10} {:<10} {:<12} {:<18} {:<20} {:>8}\n",
            "#", "brand", "model", "price", "year", "km", "fuel", "transmission", "accident", "engine", "score"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:-<3} {:-<14} {:-<20} {:-<10} {:-<6} {:-<10} {:-<10} {:-<12} {:-<18} {:-<20} {:-<8}\n",
            "", "", "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (idx, entry) in shortlist.entries.iter().enumerate() {
        let r = &entry.record;
        out.push_str(
            format!(
                "{:>3} {:<14} {:<20} {:>10} {:>6} {:>10} {:<10} {:<12} {:<18} {:<20} {:>8}\n",
                idx + 1,
                truncate(&r.brand, 14),
                truncate(&r.model, 20),
                fmt_currency(r.price),
                r.model_year as i64,
                fmt_grouped(r.milage as i64),
                truncate(&r.fuel_type, 10),
                truncate(r.transmission.as_deref().unwrap_or("-"), 12),
                truncate(&r.accident, 18),
                truncate(r.engine.as_deref().unwrap_or("-"), 20),
                fmt_percent(entry.score),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// One-line summary pair for the shortlist.
pub fn format_summary(shortlist: &Shortlist) -> String {
    format!(
        "Total price: {} | Average score: {}",
        fmt_currency(shortlist.total_price),
        fmt_rounded_percent(shortlist.avg_score_percent),
    )
}

/// Format the catalog diagnostics report.
pub fn format_catalog_report(catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("=== Catalog report ===\n");
    out.push_str(&format!(
        "Rows: read={} | kept={} | dropped={}\n",
        catalog.rows_read,
        catalog.rows_used,
        catalog.rows_read - catalog.rows_used,
    ));
    out.push_str(&format!(
        "Duplicate rows: {}\n",
        catalog.diagnostics.duplicate_rows
    ));

    out.push_str("\nMissing values per column:\n");
    for (col, count) in &catalog.diagnostics.missing_by_column {
        out.push_str(&format!("  {col:<14} {count}\n"));
    }

    out.push_str("\nBrand frequencies:\n");
    out.push_str(&format_freq(
        catalog.diagnostics.brand_counts.iter().map(|(k, v)| (k.clone(), *v)),
    ));

    out.push_str("\nModel-year frequencies:\n");
    out.push_str(&format_freq(
        catalog.diagnostics.year_counts.iter().map(|(k, v)| (k.to_string(), *v)),
    ));

    out
}

const FREQ_DISPLAY_LIMIT: usize = 15;

fn format_freq(counts: impl Iterator<Item = (String, usize)>) -> String {
    let counts: Vec<(String, usize)> = counts.collect();
    let mut out = String::new();
    for (key, count) in counts.iter().take(FREQ_DISPLAY_LIMIT) {
        out.push_str(&format!("  {key:<20} {count}\n"));
    }
    if counts.len() > FREQ_DISPLAY_LIMIT {
        out.push_str(&format!("  (+{} more)\n", counts.len() - FREQ_DISPLAY_LIMIT));
    }
    out
}

/// `12345.0` -> `"$ 12.345"` (truncated to whole units, `.` separators).
pub fn fmt_currency(v: f64) -> String {
    format!("$ {}", fmt_grouped(v as i64))
}

/// `12345` -> `"12.345"`.
pub fn fmt_grouped(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a `[0,1]` score as a percentage: at most two decimals, trailing
/// zeros trimmed but at least one decimal kept. `1.0` -> `"100.0%"`,
/// `0.875` -> `"87.5%"`.
pub fn fmt_percent(score: f64) -> String {
    fmt_rounded_percent(super::round2(score * 100.0))
}

fn fmt_rounded_percent(pct: f64) -> String {
    let mut s = format!("{pct:.2}");
    while s.ends_with('0') && !s.ends_with(".0") {
        s.pop();
    }
    format!("{s}%")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
