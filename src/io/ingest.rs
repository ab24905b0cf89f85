//! Catalog CSV ingest and normalization.
//!
//! This module is responsible for turning a raw used-car listing CSV into a
//! clean set of typed records that are safe to filter and score.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level cleanup** (drop bad rows silently, but count what happened)
//! - **Deterministic behavior** (no hidden state, no repairs)
//! - **Separation of concerns**: no filtering or scoring logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::CleanRecord;
use crate::error::AppError;

/// Columns that must be present and parse on every kept row.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "brand",
    "model",
    "model_year",
    "milage",
    "fuel_type",
    "accident",
    "clean_title",
    "price",
];

/// All recognized columns, in report order. `transmission` and `engine` are
/// optional passthrough fields.
pub const ALL_COLUMNS: [&str; 10] = [
    "brand",
    "model",
    "model_year",
    "milage",
    "fuel_type",
    "transmission",
    "accident",
    "clean_title",
    "engine",
    "price",
];

/// Informational counters gathered during ingest.
///
/// These never affect which records come out of the normalizer; they exist
/// so `carscout stats` can describe the catalog's quality.
#[derive(Debug, Clone, Default)]
pub struct CatalogDiagnostics {
    /// Clean rows that are exact duplicates of an earlier clean row.
    pub duplicate_rows: usize,
    /// Missing/unparseable values per column, over all data rows.
    pub missing_by_column: Vec<(&'static str, usize)>,
    /// Brand frequency table (count descending, then name).
    pub brand_counts: Vec<(String, usize)>,
    /// Model-year frequency table (count descending, then year).
    pub year_counts: Vec<(i64, usize)>,
}

/// Ingest output: normalized records + diagnostics.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub records: Vec<CleanRecord>,
    pub rows_read: usize,
    pub rows_used: usize,
    pub diagnostics: CatalogDiagnostics,
}

/// Load and normalize a catalog CSV.
///
/// Malformed rows are dropped, never repaired; only file-level problems
/// (unreadable file, bad headers, missing required columns) are errors.
pub fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open catalog CSV '{}': {e}", path.display()),
        )
    })?;
    read_catalog(file)
}

/// Normalize catalog CSV data from any reader.
///
/// `load_catalog` is the file-path convenience wrapper around this.
pub fn read_catalog<R: std::io::Read>(source: R) -> Result<Catalog, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut missing: HashMap<&'static str, usize> = HashMap::new();

    for result in reader.records() {
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            // A structurally broken line is just another bad row.
            Err(_) => continue,
        };

        if let Some(clean) = parse_row(&record, &header_map, &mut missing) {
            records.push(clean);
        }
    }

    let rows_used = records.len();
    let diagnostics = compute_diagnostics(&records, &missing);

    Ok(Catalog {
        records,
        rows_read,
        rows_used,
        diagnostics,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿brand"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for col in REQUIRED_COLUMNS {
        if !header_map.contains_key(col) {
            return Err(AppError::new(2, format!("Missing required column: `{col}`")));
        }
    }
    Ok(())
}

/// Parse one data row into a `CleanRecord`.
///
/// Returns `None` (and bumps the per-column missing counters) when any
/// required field is absent or fails to parse.
fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    missing: &mut HashMap<&'static str, usize>,
) -> Option<CleanRecord> {
    let brand = get_text(record, header_map, "brand");
    let model = get_text(record, header_map, "model");
    let fuel_type = get_text(record, header_map, "fuel_type");
    let accident = get_text(record, header_map, "accident");
    let clean_title = get_text(record, header_map, "clean_title");
    let transmission = get_text(record, header_map, "transmission");
    let engine = get_text(record, header_map, "engine");

    let model_year = get_value(record, header_map, "model_year").and_then(parse_year);
    let milage = get_value(record, header_map, "milage").and_then(parse_milage);
    let price = get_value(record, header_map, "price").and_then(parse_price);

    let mut note = |name: &'static str, absent: bool| {
        if absent {
            *missing.entry(name).or_insert(0) += 1;
        }
    };

    note("brand", brand.is_none());
    note("model", model.is_none());
    note("model_year", model_year.is_none());
    note("milage", milage.is_none());
    note("fuel_type", fuel_type.is_none());
    note("transmission", transmission.is_none());
    note("accident", accident.is_none());
    note("clean_title", clean_title.is_none());
    note("engine", engine.is_none());
    note("price", price.is_none());

    let dropped = brand.is_none()
        || model.is_none()
        || model_year.is_none()
        || milage.is_none()
        || fuel_type.is_none()
        || accident.is_none()
        || clean_title.is_none()
        || price.is_none();
    if dropped {
        return None;
    }

    Some(CleanRecord {
        brand: brand?,
        model: model?,
        model_year: model_year?,
        milage: milage?,
        price: price?,
        fuel_type: fuel_type?,
        transmission,
        accident: accident?,
        clean_title: clean_title?,
        engine,
    })
}

fn get_value<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn get_text(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<String> {
    get_value(record, header_map, name).map(str::to_string)
}

/// Parse a currency-formatted price like `"$12,345"`.
///
/// Strips `$` and `,` and parses the remainder as a decimal. Anything that
/// still fails to parse, or a negative amount, counts as missing.
fn parse_price(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    let v = cleaned.trim().parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 { Some(v) } else { None }
}

/// Coerce the model year to a number. Non-numeric values are missing, not
/// errors; the row is silently excluded downstream.
fn parse_year(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Parse a formatted odometer value like `"51,000 mi."`.
///
/// Strips the characters `,`, `.`, space, `m`, `i` anywhere in the string
/// and parses the remainder as a decimal. Note that stripping `.` also
/// removes decimal points from fractional mileage values; this matches the
/// upstream cleaning rule and is a known precision loss, not corrected here.
fn parse_milage(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| !",. mi".contains(*c)).collect();
    if cleaned.is_empty() {
        return None;
    }
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn compute_diagnostics(
    records: &[CleanRecord],
    missing: &HashMap<&'static str, usize>,
) -> CatalogDiagnostics {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut duplicate_rows = 0usize;
    for r in records {
        let count = seen.entry(record_key(r)).or_insert(0);
        if *count > 0 {
            duplicate_rows += 1;
        }
        *count += 1;
    }

    let mut brands: HashMap<&str, usize> = HashMap::new();
    let mut years: HashMap<i64, usize> = HashMap::new();
    for r in records {
        *brands.entry(r.brand.as_str()).or_insert(0) += 1;
        *years.entry(r.model_year as i64).or_insert(0) += 1;
    }

    let mut brand_counts: Vec<(String, usize)> =
        brands.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    brand_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut year_counts: Vec<(i64, usize)> = years.into_iter().collect();
    year_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let missing_by_column = ALL_COLUMNS
        .iter()
        .map(|col| (*col, missing.get(col).copied().unwrap_or(0)))
        .collect();

    CatalogDiagnostics {
        duplicate_rows,
        missing_by_column,
        brand_counts,
        year_counts,
    }
}

/// Exact-equality key for duplicate detection. Floats go through their bit
/// pattern so the key is stable and hashable.
fn record_key(r: &CleanRecord) -> String {
    format!(
        "{}\u{1f}{}\u{1f}{:x}\u{1f}{:x}\u{1f}{:x}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
        r.brand,
        r.model,
        r.model_year.to_bits(),
        r.milage.to_bits(),
        r.price.to_bits(),
        r.fuel_type,
        r.transmission.as_deref().unwrap_or(""),
        r.accident,
        r.clean_title,
        r.engine.as_deref().unwrap_or(""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "brand,model,model_year,milage,fuel_type,engine,transmission,accident,clean_title,price\n";

    fn catalog_from(rows: &str) -> Catalog {
        let data = format!("{HEADER}{rows}");
        read_catalog(data.as_bytes()).unwrap()
    }

    #[test]
    fn fully_valid_rows_round_trip() {
        let cat = catalog_from(
            "Toyota,Corolla,2018,\"51,000 mi.\",Gasoline,1.8L I4,Automatic,None reported,Yes,\"$12,345\"\n\
             Honda,Civic,2020,\"23,000 mi.\",Gasoline,2.0L I4,CVT,None reported,Yes,\"$18,900\"\n",
        );
        assert_eq!(cat.rows_read, 2);
        assert_eq!(cat.rows_used, 2);

        let first = &cat.records[0];
        assert_eq!(first.brand, "Toyota");
        assert_eq!(first.price, 12345.0);
        assert_eq!(first.model_year, 2018.0);
        assert_eq!(first.milage, 51000.0);
        assert_eq!(first.transmission.as_deref(), Some("Automatic"));
    }

    #[test]
    fn malformed_price_drops_row() {
        let cat = catalog_from(
            "Toyota,Corolla,2018,\"51,000 mi.\",Gasoline,,,None reported,Yes,call us\n",
        );
        assert_eq!(cat.rows_read, 1);
        assert_eq!(cat.rows_used, 0);
        let price_missing = cat
            .diagnostics
            .missing_by_column
            .iter()
            .find(|(c, _)| *c == "price")
            .unwrap()
            .1;
        assert_eq!(price_missing, 1);
    }

    #[test]
    fn non_numeric_year_drops_row() {
        let cat = catalog_from(
            "Toyota,Corolla,unknown,\"51,000 mi.\",Gasoline,,,None reported,Yes,\"$9,000\"\n",
        );
        assert_eq!(cat.rows_used, 0);
    }

    #[test]
    fn missing_required_field_drops_row() {
        // No accident value.
        let cat = catalog_from(
            "Toyota,Corolla,2018,\"51,000 mi.\",Gasoline,,,,Yes,\"$9,000\"\n",
        );
        assert_eq!(cat.rows_used, 0);
    }

    #[test]
    fn missing_optional_field_keeps_row() {
        let cat = catalog_from(
            "Toyota,Corolla,2018,\"51,000 mi.\",Gasoline,,,None reported,Yes,\"$9,000\"\n",
        );
        assert_eq!(cat.rows_used, 1);
        assert!(cat.records[0].transmission.is_none());
        assert!(cat.records[0].engine.is_none());
    }

    #[test]
    fn missing_required_column_is_load_error() {
        let data = "brand,model,model_year,milage,fuel_type,accident,clean_title\nToyota,Corolla,2018,1000,Gas,None,Yes\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn duplicate_rows_are_counted_not_removed() {
        let row = "Toyota,Corolla,2018,\"51,000 mi.\",Gasoline,1.8L I4,Automatic,None reported,Yes,\"$12,345\"\n";
        let cat = catalog_from(&format!("{row}{row}{row}"));
        assert_eq!(cat.rows_used, 3);
        assert_eq!(cat.diagnostics.duplicate_rows, 2);
    }

    #[test]
    fn frequency_tables_sorted_by_count() {
        let cat = catalog_from(
            "Honda,Civic,2020,\"10,000 mi.\",Gasoline,,,None,Yes,$10\n\
             Toyota,Corolla,2018,\"10,000 mi.\",Gasoline,,,None,Yes,$10\n\
             Toyota,Camry,2018,\"10,000 mi.\",Gasoline,,,None,Yes,$10\n",
        );
        assert_eq!(cat.diagnostics.brand_counts[0], ("Toyota".to_string(), 2));
        assert_eq!(cat.diagnostics.year_counts[0], (2018, 2));
    }

    #[test]
    fn parse_price_strips_currency_formatting() {
        assert_eq!(parse_price("$12,345"), Some(12345.0));
        assert_eq!(parse_price("12345.50"), Some(12345.5));
        assert_eq!(parse_price("n/a"), None);
        assert_eq!(parse_price("$-500"), None);
    }

    #[test]
    fn parse_milage_strips_unit_and_separators() {
        assert_eq!(parse_milage("51,000 mi."), Some(51000.0));
        assert_eq!(parse_milage("7500 mi"), Some(7500.0));
        // Stripping `.` also removes decimal points; documented precision loss.
        assert_eq!(parse_milage("1234.5 mi"), Some(12345.0));
        assert_eq!(parse_milage("120 km"), None);
    }

    #[test]
    fn bom_on_first_header_is_tolerated() {
        let data = "\u{feff}brand,model,model_year,milage,fuel_type,accident,clean_title,price\nToyota,Corolla,2018,1000,Gas,None,Yes,$10\n";
        let cat = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(cat.rows_used, 1);
    }
}
