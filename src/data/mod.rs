//! Synthetic data helpers.

pub mod sample;

pub use sample::*;
