//! Export a shortlist to CSV or JSON.
//!
//! The CSV export is meant to be easy to consume in spreadsheets or
//! downstream scripts, so it carries the raw numeric fields alongside the
//! normalized terms. The JSON export is the full `Shortlist` structure,
//! summary included.

use std::fs::File;
use std::path::Path;

use crate::domain::Shortlist;
use crate::error::AppError;

/// Write per-car shortlist rows to a CSV file.
pub fn write_shortlist_csv(path: &Path, shortlist: &Shortlist) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([
            "rank",
            "brand",
            "model",
            "price",
            "model_year",
            "milage",
            "fuel_type",
            "transmission",
            "accident",
            "clean_title",
            "engine",
            "norm_price",
            "norm_year",
            "norm_milage",
            "score",
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (idx, entry) in shortlist.entries.iter().enumerate() {
        let r = &entry.record;
        writer
            .write_record([
                (idx + 1).to_string(),
                r.brand.clone(),
                r.model.clone(),
                format!("{:.2}", r.price),
                format!("{}", r.model_year as i64),
                format!("{}", r.milage as i64),
                r.fuel_type.clone(),
                r.transmission.clone().unwrap_or_default(),
                r.accident.clone(),
                r.clean_title.clone(),
                r.engine.clone().unwrap_or_default(),
                format!("{:.6}", entry.norm_price),
                format!("{:.6}", entry.norm_year),
                format!("{:.6}", entry.norm_milage),
                format!("{:.6}", entry.score),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}

/// Write the shortlist (rows + summary) as pretty JSON.
pub fn write_shortlist_json(path: &Path, shortlist: &Shortlist) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, shortlist)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
