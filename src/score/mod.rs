//! Constraint filtering and desirability scoring.
//!
//! This is a pure, single-pass computation over in-memory records:
//! filter by the query constraints, min-max normalize price/year/mileage
//! over the *filtered* set, then combine the normalized terms into one
//! weighted score.

use crate::domain::{CleanRecord, QueryParams, ScoredRecord};

/// Fixed score weights. They sum to 1.0, so `score` stays in `[0, 1]`.
pub const WEIGHT_PRICE: f64 = 0.5;
pub const WEIGHT_YEAR: f64 = 0.3;
pub const WEIGHT_MILAGE: f64 = 0.2;

/// Filter the catalog by the query constraints and score every survivor.
///
/// Returns an empty vec when nothing passes the filter; normalization is
/// never attempted over an empty set (the bounds would be undefined).
pub fn filter_and_score(records: &[CleanRecord], params: &QueryParams) -> Vec<ScoredRecord> {
    let kept: Vec<&CleanRecord> = records
        .iter()
        .filter(|r| {
            r.model_year >= params.min_year
                && r.milage <= params.max_km
                && r.price <= params.budget
        })
        .collect();

    if kept.is_empty() {
        return Vec::new();
    }

    let price = Bounds::over(&kept, |r| r.price);
    let year = Bounds::over(&kept, |r| r.model_year);
    let milage = Bounds::over(&kept, |r| r.milage);

    kept.into_iter()
        .map(|r| {
            let norm_price = price.inverted(r.price);
            let norm_year = year.direct(r.model_year);
            let norm_milage = milage.inverted(r.milage);
            let score =
                WEIGHT_PRICE * norm_price + WEIGHT_YEAR * norm_year + WEIGHT_MILAGE * norm_milage;
            ScoredRecord {
                record: r.clone(),
                norm_price,
                norm_year,
                norm_milage,
                score,
            }
        })
        .collect()
}

/// Min-max bounds for one field over the filtered set.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    fn over(records: &[&CleanRecord], field: impl Fn(&CleanRecord) -> f64) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for r in records {
            let v = field(r);
            min = min.min(v);
            max = max.max(v);
        }
        Self { min, max }
    }

    /// `(x - min) / (max - min)`, where higher raw values are better.
    ///
    /// Degenerate range (`max == min`): every row gets `1.0`. There is no
    /// information to discriminate on, and dividing by zero is not an
    /// acceptable alternative. This is an explicit policy choice.
    fn direct(&self, x: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 1.0;
        }
        (x - self.min) / span
    }

    /// `1 - (x - min) / (max - min)`, where lower raw values are better.
    /// Same degenerate-range policy as `direct`: every row gets `1.0`.
    fn inverted(&self, x: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 1.0;
        }
        1.0 - (x - self.min) / span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(brand: &str, year: f64, milage: f64, price: f64) -> CleanRecord {
        CleanRecord {
            brand: brand.to_string(),
            model: "M".to_string(),
            model_year: year,
            milage,
            price,
            fuel_type: "Gasoline".to_string(),
            transmission: None,
            accident: "None reported".to_string(),
            clean_title: "Yes".to_string(),
            engine: None,
        }
    }

    fn params(budget: f64, min_year: f64, max_km: f64) -> QueryParams {
        QueryParams {
            budget,
            min_year,
            max_km,
        }
    }

    #[test]
    fn filter_applies_all_three_constraints() {
        let records = vec![
            record("ok", 2018.0, 40000.0, 12000.0),
            record("too-old", 2010.0, 40000.0, 12000.0),
            record("too-worn", 2018.0, 90000.0, 12000.0),
            record("too-dear", 2018.0, 40000.0, 20000.0),
        ];
        let scored = filter_and_score(&records, &params(15000.0, 2015.0, 60000.0));
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].record.brand, "ok");
    }

    #[test]
    fn empty_filter_short_circuits() {
        let records = vec![record("a", 2018.0, 40000.0, 50000.0)];
        let scored = filter_and_score(&records, &params(1000.0, 2015.0, 60000.0));
        assert!(scored.is_empty());
    }

    #[test]
    fn normalization_bounds_and_inversion() {
        let records = vec![
            record("cheap-new-fresh", 2020.0, 10000.0, 8000.0),
            record("mid", 2018.0, 30000.0, 10000.0),
            record("dear-old-worn", 2016.0, 50000.0, 12000.0),
        ];
        let scored = filter_and_score(&records, &params(15000.0, 2015.0, 60000.0));
        assert_eq!(scored.len(), 3);

        for s in &scored {
            assert!((0.0..=1.0).contains(&s.norm_price));
            assert!((0.0..=1.0).contains(&s.norm_year));
            assert!((0.0..=1.0).contains(&s.norm_milage));
            assert!((0.0..=1.0).contains(&s.score));
        }

        // Min price scores 1, max price scores 0 (inverted); symmetric for
        // mileage, direct for year.
        assert_eq!(scored[0].norm_price, 1.0);
        assert_eq!(scored[2].norm_price, 0.0);
        assert_eq!(scored[0].norm_milage, 1.0);
        assert_eq!(scored[2].norm_milage, 0.0);
        assert_eq!(scored[0].norm_year, 1.0);
        assert_eq!(scored[2].norm_year, 0.0);

        let mid = &scored[1];
        assert!((mid.norm_price - 0.5).abs() < 1e-12);
        let expected =
            WEIGHT_PRICE * mid.norm_price + WEIGHT_YEAR * mid.norm_year + WEIGHT_MILAGE * mid.norm_milage;
        assert!((mid.score - expected).abs() < 1e-12);
    }

    #[test]
    fn single_candidate_scores_one() {
        let records = vec![record("only", 2018.0, 50000.0, 10000.0)];
        let scored = filter_and_score(&records, &params(15000.0, 2015.0, 60000.0));
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, 1.0);
    }

    #[test]
    fn degenerate_field_normalizes_to_one() {
        // Same price everywhere, other fields spread out.
        let records = vec![
            record("a", 2016.0, 10000.0, 9000.0),
            record("b", 2020.0, 50000.0, 9000.0),
        ];
        let scored = filter_and_score(&records, &params(15000.0, 2015.0, 60000.0));
        assert_eq!(scored[0].norm_price, 1.0);
        assert_eq!(scored[1].norm_price, 1.0);
        assert_ne!(scored[0].norm_year, scored[1].norm_year);
    }

    #[test]
    fn identical_rows_get_identical_scores() {
        let records = vec![
            record("first", 2018.0, 30000.0, 10000.0),
            record("second", 2018.0, 30000.0, 10000.0),
            record("other", 2016.0, 50000.0, 12000.0),
        ];
        let scored = filter_and_score(&records, &params(15000.0, 2015.0, 60000.0));
        assert_eq!(scored[0].score, scored[1].score);
        // Input order is preserved by the filter.
        assert_eq!(scored[0].record.brand, "first");
        assert_eq!(scored[1].record.brand, "second");
    }
}
