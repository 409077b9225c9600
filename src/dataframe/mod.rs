//! # Dataframe Module
//!
//! Turns a log file into an [`AlignedTable`] scoped to the topics one check
//! asks for.
//!
//! This module handles:
//! - Topic projections and per-topic resampling policy
//! - Resampling topics onto one common timeline
//! - The loader seam and its `.ulg` implementation
//! - Mapping data-acquisition failures to a skip result

pub mod projection;
pub mod table;
pub mod resample;
pub mod loader;

pub use loader::{get_param, LogLoader, UlogFrame, UlogLoader};
pub use projection::{ResamplePolicy, TopicFields, TopicProjection};
pub use table::{AlignedTable, ColumnKey, Series};

use tracing::debug;

use crate::error::Result;
use crate::harness::LogFile;

/// Result of asking the loader for a check's table
#[derive(Debug)]
pub enum Acquisition {
    /// Table built for every requested topic
    Ready(UlogFrame),

    /// This log cannot provide the data; the check is skipped
    Unavailable(String),
}

/// Build the table for one check
///
/// Acquisition errors (unreadable or malformed file, missing topic or
/// column) become [`Acquisition::Unavailable`]; anything else is returned
/// as an error.
pub fn setup_dataframe(
    loader: &dyn LogLoader,
    log_file: &LogFile,
    projection: &TopicProjection,
) -> Result<Acquisition> {
    match loader.create(log_file.path(), projection) {
        Ok(frame) => Ok(Acquisition::Ready(frame)),
        Err(e) if e.is_acquisition() => {
            debug!("Could not create dataframe for {:?}: {}", projection.topics, e);
            Ok(Acquisition::Unavailable(format!("Could not create dataframe: {}", e)))
        }
        Err(e) => Err(e),
    }
}
