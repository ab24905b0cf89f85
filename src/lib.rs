//! `car-scout` library crate.
//!
//! The binary (`carscout`) is a thin wrapper around this library so that:
//!
//! - the cleaning/scoring pipeline is testable without spawning processes
//! - modules are reusable (e.g., future GUI/web front-ends)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod score;
pub mod tui;
