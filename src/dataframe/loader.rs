//! Trait abstraction over the log loader so checks can be tested without files

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use super::projection::TopicProjection;
use super::resample::align;
use super::table::AlignedTable;
use crate::error::Result;
use crate::ulog::protocol::ParamValue;
use crate::ulog::read_file;

/// An aligned table together with the parameters of the log it came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UlogFrame {
    pub table: AlignedTable,
    params: BTreeMap<String, ParamValue>,
}

impl UlogFrame {
    pub fn new(table: AlignedTable, params: BTreeMap<String, ParamValue>) -> Self {
        Self { table, params }
    }

    /// Initial value of a logged parameter
    pub fn param(&self, name: &str) -> Option<ParamValue> {
        self.params.get(name).copied()
    }
}

/// Value of a logged parameter, or `default` when the log does not carry it
pub fn get_param(frame: &UlogFrame, name: &str, default: f64) -> f64 {
    match frame.param(name) {
        Some(value) => value.as_f64(),
        None => {
            debug!("Parameter {} not in log, using default {}", name, default);
            default
        }
    }
}

/// Builds an aligned table for a projection
#[cfg_attr(test, mockall::automock)]
pub trait LogLoader {
    /// Load `path` and align the projected topics
    fn create(&self, path: &Path, projection: &TopicProjection) -> Result<UlogFrame>;
}

/// Loads `.ulg` files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct UlogLoader;

impl LogLoader for UlogLoader {
    fn create(&self, path: &Path, projection: &TopicProjection) -> Result<UlogFrame> {
        let ulog = read_file(path, &projection.topics)?;

        if ulog.dropout_count > 0 {
            warn!(
                "{} dropouts ({} ms) in {}",
                ulog.dropout_count,
                ulog.dropout_total_ms,
                path.display()
            );
        }

        let table = align(&ulog, projection)?;
        Ok(UlogFrame::new(table, ulog.initial_params))
    }
}
