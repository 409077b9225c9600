//! # Invariant Checks
//!
//! Each check is a [`Check`] record: the topics it needs and a free function
//! that returns the rows breaking its invariant. A check passes when that
//! set is empty.

pub mod attitude;
pub mod yaw;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::dataframe::{setup_dataframe, Acquisition, LogLoader, TopicProjection, UlogFrame};
use crate::error::{Result, UlgCheckError};
use crate::harness::Session;

/// One row breaking an invariant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Row index in the aligned table
    pub row: usize,

    /// Row timestamp in microseconds
    pub timestamp_us: u64,

    /// Assertion(s) the row breaks
    pub rule: String,

    /// Values involved, by column name (NaN serializes as null)
    pub values: BTreeMap<String, f64>,
}

/// A named invariant over an aligned table
#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub description: &'static str,

    /// Topics and resampling policy the check needs
    pub projection: fn(&Config) -> TopicProjection,

    /// Rows breaking the invariant
    pub evaluate: fn(&UlogFrame, &Config) -> Result<Vec<Violation>>,
}

/// How one check ended
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Passed,
    Failed { violations: Vec<Violation> },
    /// The log could not provide the data; inconclusive, not a failure
    Skipped { reason: String },
    /// The check itself could not be evaluated
    Errored { reason: String },
}

impl CheckOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Passed => "passed",
            CheckOutcome::Failed { .. } => "failed",
            CheckOutcome::Skipped { .. } => "skipped",
            CheckOutcome::Errored { .. } => "errored",
        }
    }
}

/// Outcome of one check in a run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub name: &'static str,
    pub outcome: CheckOutcome,
}

/// Every check, in run order
pub fn registry() -> Vec<Check> {
    vec![attitude::TILT_DESIRED, yaw::YAW_VALIDITY]
}

/// Checks by name, in run order; all checks when `names` is empty
///
/// # Errors
///
/// Returns [`UlgCheckError::UnknownCheck`] for a name not in the registry
pub fn select(names: &[String]) -> Result<Vec<Check>> {
    let all = registry();
    if let Some(unknown) = names.iter().find(|n| !all.iter().any(|c| c.name == n.as_str())) {
        return Err(UlgCheckError::UnknownCheck(unknown.clone()));
    }

    Ok(all
        .into_iter()
        .filter(|c| names.is_empty() || names.iter().any(|n| n == c.name))
        .collect())
}

/// Run one check: build its table, evaluate, classify
pub fn run_check(check: &Check, loader: &dyn LogLoader, session: &Session) -> CheckReport {
    let projection = (check.projection)(session.config());

    let outcome = match setup_dataframe(loader, session.log_file(), &projection) {
        Ok(Acquisition::Ready(frame)) => match (check.evaluate)(&frame, session.config()) {
            Ok(violations) if violations.is_empty() => CheckOutcome::Passed,
            Ok(violations) => CheckOutcome::Failed { violations },
            Err(e) => CheckOutcome::Errored {
                reason: e.to_string(),
            },
        },
        Ok(Acquisition::Unavailable(reason)) => CheckOutcome::Skipped { reason },
        Err(e) => CheckOutcome::Errored {
            reason: e.to_string(),
        },
    };

    match &outcome {
        CheckOutcome::Passed => info!("{} ... passed", check.name),
        CheckOutcome::Failed { violations } => {
            warn!("{} ... FAILED ({} violating rows)", check.name, violations.len())
        }
        CheckOutcome::Skipped { reason } => warn!("{} ... skipped: {}", check.name, reason),
        CheckOutcome::Errored { reason } => warn!("{} ... ERROR: {}", check.name, reason),
    }

    CheckReport {
        name: check.name,
        outcome,
    }
}

/// Run checks one after another
pub fn run_all(checks: &[Check], loader: &dyn LogLoader, session: &Session) -> Vec<CheckReport> {
    info!("Running {} checks on {}", checks.len(), session.log_file());
    checks
        .iter()
        .map(|check| run_check(check, loader, session))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::dataframe::{AlignedTable, ColumnKey};
    use crate::ulog::protocol::ParamValue;

    /// Frame with the given columns on timestamps 0, 1, 2, ...
    pub fn frame(
        columns: Vec<(ColumnKey, Vec<f64>)>,
        params: &[(&str, ParamValue)],
    ) -> UlogFrame {
        let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut table = AlignedTable::new((0..rows as u64).collect());
        for (key, values) in columns {
            table.insert(key, values).unwrap();
        }

        let params = params
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        UlogFrame::new(table, params)
    }
}
