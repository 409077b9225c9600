//! # ULG Checks Library
//!
//! Validate PX4 ULog flight logs against flight-behaviour invariants.
//!
//! A run validates the log file path once, then lets every check load the
//! topics it needs onto one aligned timeline and assert its invariant over
//! every row.

pub mod config;
pub mod error;
pub mod harness;
pub mod ulog;
pub mod dataframe;
pub mod math;
pub mod checks;
pub mod report;
