//! Synthetic demo catalog generation.
//!
//! Produces a used-car listing CSV in the same messy shape real exports
//! arrive in: currency-formatted prices (`"$24,500"`), odometer strings with
//! unit suffixes (`"36,000 mi."`), and a small share of malformed rows so
//! the ingest diagnostics have something to report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

const BRANDS: [(&str, &[&str]); 6] = [
    ("Toyota", &["Corolla", "Camry", "RAV4"]),
    ("Honda", &["Civic", "Accord", "CR-V"]),
    ("Ford", &["Focus", "Fusion", "Escape"]),
    ("BMW", &["320i", "X3", "530i"]),
    ("Hyundai", &["Elantra", "Sonata", "Tucson"]),
    ("Mazda", &["Mazda3", "CX-5", "Mazda6"]),
];

const FUEL_TYPES: [&str; 3] = ["Gasoline", "Diesel", "Hybrid"];
const TRANSMISSIONS: [&str; 3] = ["Automatic", "Manual", "CVT"];
const ENGINES: [&str; 4] = ["1.6L I4", "2.0L I4", "2.5L I4", "3.0L V6"];
const ACCIDENTS: [&str; 2] = ["None reported", "At least 1 accident or damage reported"];

/// Share of rows emitted with a deliberately unparseable field.
const MALFORMED_SHARE: f64 = 0.04;
/// Share of rows emitted as an exact copy of the previous row.
const DUPLICATE_SHARE: f64 = 0.02;

/// Generate a demo catalog as CSV text.
///
/// Deterministic for a given `(count, seed)` pair.
pub fn generate_catalog_csv(count: usize, seed: u64) -> Result<String, AppError> {
    if count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mileage_noise = Normal::new(0.0, 8000.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    let price_noise = Normal::new(0.0, 2500.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut out = String::new();
    out.push_str(
        "brand,model,model_year,milage,fuel_type,engine,transmission,accident,clean_title,price\n",
    );

    let mut previous: Option<String> = None;
    for _ in 0..count {
        if let Some(prev) = &previous {
            if rng.gen_bool(DUPLICATE_SHARE) {
                out.push_str(prev);
                continue;
            }
        }

        let (brand, models) = BRANDS[rng.gen_range(0..BRANDS.len())];
        let model = models[rng.gen_range(0..models.len())];
        let year = rng.gen_range(2008..=2024);
        let age = (2025 - year) as f64;

        let mileage = (age * 12_000.0 + mileage_noise.sample(&mut rng)).max(1_000.0);
        let price = (42_000.0 * 0.88_f64.powf(age) + price_noise.sample(&mut rng)).max(1_500.0);

        let fuel = FUEL_TYPES[rng.gen_range(0..FUEL_TYPES.len())];
        let engine = ENGINES[rng.gen_range(0..ENGINES.len())];
        let transmission = TRANSMISSIONS[rng.gen_range(0..TRANSMISSIONS.len())];
        let accident = ACCIDENTS[if rng.gen_bool(0.8) { 0 } else { 1 }];

        let mut price_text = format!("\"${}\"", group_commas(price as i64));
        let mut mileage_text = format!("\"{} mi.\"", group_commas(mileage as i64));
        if rng.gen_bool(MALFORMED_SHARE) {
            // Alternate between the two fields real exports most often mangle.
            if rng.gen_bool(0.5) {
                price_text = "not priced".to_string();
            } else {
                mileage_text = "unknown".to_string();
            }
        }

        let row = format!(
            "{brand},{model},{year},{mileage_text},{fuel},{engine},{transmission},{accident},Yes,{price_text}\n",
        );
        out.push_str(&row);
        previous = Some(row);
    }

    Ok(out)
}

/// Write a demo catalog CSV to `path`.
pub fn write_sample_catalog(path: &Path, count: usize, seed: u64) -> Result<(), AppError> {
    let csv = generate_catalog_csv(count, seed)?;
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create sample CSV '{}': {e}", path.display()),
        )
    })?;
    file.write_all(csv.as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV: {e}")))?;
    Ok(())
}

fn group_commas(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_catalog;

    #[test]
    fn generation_is_deterministic() {
        let a = generate_catalog_csv(50, 42).unwrap();
        let b = generate_catalog_csv(50, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_count_rejected() {
        assert!(generate_catalog_csv(0, 42).is_err());
    }

    #[test]
    fn sample_round_trips_through_ingest() {
        let csv = generate_catalog_csv(200, 7).unwrap();
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.rows_read, 200);
        // Most rows are clean; the malformed share is dropped.
        assert!(catalog.rows_used > 150);
        assert!(catalog.rows_used <= catalog.rows_read);
        for r in &catalog.records {
            assert!(r.price >= 0.0);
            assert!(r.milage >= 1_000.0);
        }
    }
}
