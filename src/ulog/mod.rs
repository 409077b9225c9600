//! # ULog Module
//!
//! Reader for PX4 ULog (`.ulg`) flight logs.
//!
//! This module handles:
//! - File header and message stream framing
//! - Message format definitions, including nested and array fields
//! - Subscriptions and logged data samples
//! - Initial parameter values and string info messages

pub mod protocol;
pub mod decoder;

pub use decoder::{decode, read_file, Dataset, ULog};
