//! Attitude checks.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Check, Violation};
use crate::config::Config;
use crate::dataframe::{get_param, ColumnKey, TopicFields, TopicProjection, UlogFrame};
use crate::error::Result;
use crate::math::tilt_from_attitude;

const VEHICLE_ATTITUDE: &str = "vehicle_attitude";
const VEHICLE_ATTITUDE_SETPOINT: &str = "vehicle_attitude_setpoint";
const VEHICLE_STATUS: &str = "vehicle_status";

/// Commanded tilt stays within the manual tilt limit
pub const TILT_DESIRED: Check = Check {
    name: "tilt_desired",
    description: "Commanded tilt never exceeds the manual tilt limit in manual-type flight modes",
    projection: tilt_projection,
    evaluate: tilt_desired,
};

fn setpoint_q(index: usize) -> ColumnKey {
    ColumnKey::new(VEHICLE_ATTITUDE_SETPOINT, 0, format!("q_d[{}]", index))
}

fn nav_state() -> ColumnKey {
    ColumnKey::new(VEHICLE_STATUS, 0, "nav_state")
}

/// Vehicle status changes rarely, so it is held between updates
pub fn tilt_projection(_config: &Config) -> TopicProjection {
    let projection = TopicProjection::new([
        VEHICLE_ATTITUDE,
        VEHICLE_ATTITUDE_SETPOINT,
        VEHICLE_STATUS,
    ])
    .with_zoh(TopicFields::all(VEHICLE_STATUS))
    .require(nav_state());

    (0..4).fold(projection, |p, i| p.require(setpoint_q(i)))
}

/// Rows in a manual-type nav state whose commanded tilt exceeds the limit
pub fn tilt_desired(frame: &UlogFrame, config: &Config) -> Result<Vec<Violation>> {
    let table = &frame.table;

    let tilt = tilt_from_attitude(
        table.column(&setpoint_q(0))?,
        table.column(&setpoint_q(1))?,
        table.column(&setpoint_q(2))?,
        table.column(&setpoint_q(3))?,
        "tilt_desired",
    )?;

    let max_tilt =
        get_param(frame, &config.tilt.param_name, config.tilt.default_max_deg).to_radians();
    debug!("{} = {:.4} rad", config.tilt.param_name, max_tilt);

    let nav_state_key = nav_state();
    let nav_states = table.column(&nav_state_key)?;

    let violations = (0..table.len())
        .filter(|&row| {
            config
                .tilt
                .nav_states
                .iter()
                .any(|&code| nav_states[row] == f64::from(code))
                && tilt.values[row] > max_tilt
        })
        .map(|row| Violation {
            row,
            timestamp_us: table.timestamps()[row],
            rule: format!("tilt <= {}", config.tilt.param_name),
            values: BTreeMap::from([
                (nav_state_key.to_string(), nav_states[row]),
                (tilt.name.clone(), tilt.values[row]),
                (format!("{}_rad", config.tilt.param_name), max_tilt),
            ]),
        })
        .collect();

    Ok(violations)
}
