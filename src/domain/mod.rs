//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the query contract (`QueryParams`, `QueryOutcome`)
//! - cleaned catalog records (`CleanRecord`)
//! - scored/ranked outputs (`ScoredRecord`, `Shortlist`)

pub mod types;

pub use types::*;
