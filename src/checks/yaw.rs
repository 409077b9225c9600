//! Yaw setpoint consistency checks.

use std::collections::BTreeMap;

use super::{Check, Violation};
use crate::config::Config;
use crate::dataframe::{ColumnKey, TopicFields, TopicProjection, UlogFrame};
use crate::error::Result;

const YAW_FIELD: &str = "current.yaw";
const YAW_VALID_FIELD: &str = "current.yaw_valid";

const RULE_VALID_IMPLIES_FINITE: &str = "yaw_valid implies finite yaw";
const RULE_NON_FINITE_IMPLIES_INVALID: &str = "non-finite yaw implies not yaw_valid";

/// Yaw value and its validity flag agree
pub const YAW_VALIDITY: Check = Check {
    name: "yaw_validity",
    description: "A valid yaw setpoint is finite and a non-finite yaw setpoint is flagged invalid",
    projection: yaw_projection,
    evaluate: yaw_validity,
};

fn keys(config: &Config) -> (ColumnKey, ColumnKey) {
    (
        ColumnKey::new(config.yaw.topic.clone(), 0, YAW_FIELD),
        ColumnKey::new(config.yaw.topic.clone(), 0, YAW_VALID_FIELD),
    )
}

/// Setpoints are only meaningful where published, so no interpolation
pub fn yaw_projection(config: &Config) -> TopicProjection {
    let (yaw, valid) = keys(config);
    TopicProjection::new([config.yaw.topic.as_str()])
        .with_nan(TopicFields::all(config.yaw.topic.as_str()))
        .require(yaw)
        .require(valid)
}

/// Rows where the yaw value and its validity flag disagree
///
/// Two assertions are evaluated per row:
/// - `yaw_valid == 1` implies `yaw` is finite
/// - `yaw` not finite implies `yaw_valid != 1`
///
/// A row breaking either is reported once, naming the assertions it breaks.
pub fn yaw_validity(frame: &UlogFrame, config: &Config) -> Result<Vec<Violation>> {
    let table = &frame.table;
    let (yaw_key, valid_key) = keys(config);
    let yaw = table.column(&yaw_key)?;
    let valid = table.column(&valid_key)?;

    let mut violations = Vec::new();
    for row in 0..table.len() {
        let finite = yaw[row].is_finite();
        let flagged_valid = valid[row] == 1.0;

        let mut broken = Vec::new();
        if flagged_valid && !finite {
            broken.push(RULE_VALID_IMPLIES_FINITE);
        }
        // The source grouped this one as `(!isfinite(yaw) & valid) == 1`, which
        // reads either way; this is the "non-finite means not valid" reading,
        // and therefore the contrapositive of the rule above.
        if !finite && flagged_valid {
            broken.push(RULE_NON_FINITE_IMPLIES_INVALID);
        }

        if !broken.is_empty() {
            violations.push(Violation {
                row,
                timestamp_us: table.timestamps()[row],
                rule: broken.join("; "),
                values: BTreeMap::from([
                    (yaw_key.to_string(), yaw[row]),
                    (valid_key.to_string(), valid[row]),
                ]),
            });
        }
    }

    Ok(violations)
}
