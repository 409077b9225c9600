//! # Attitude Math
//!
//! Quantities derived row by row from attitude quaternions.

use crate::dataframe::Series;
use crate::error::{Result, UlgCheckError};

/// Cosine of the angle between the body z axis and world vertical
///
/// Third diagonal element of the rotation matrix of the unit quaternion
/// `(w, x, y, z)`.
pub fn body_z_cosine(w: f64, x: f64, y: f64, z: f64) -> f64 {
    w * w - x * x - y * y + z * z
}

/// Tilt in radians of the body z axis against world vertical
///
/// The cosine is clamped to its saturation bound `[-1, 1]` so quaternions
/// that are unit length only up to rounding still give a finite angle.
/// Rows with a non-finite component yield NaN.
///
/// # Arguments
///
/// * `qw`, `qx`, `qy`, `qz` - Quaternion component columns
/// * `name` - Name of the produced series
///
/// # Errors
///
/// Returns error if the four columns differ in length
///
/// # Examples
///
/// ```
/// use ulg_checks::math::tilt_from_attitude;
///
/// let tilt = tilt_from_attitude(&[1.0], &[0.0], &[0.0], &[0.0], "tilt").unwrap();
/// assert_eq!(tilt.values, vec![0.0]);
/// ```
pub fn tilt_from_attitude(
    qw: &[f64],
    qx: &[f64],
    qy: &[f64],
    qz: &[f64],
    name: &str,
) -> Result<Series> {
    let len = qw.len();
    if qx.len() != len || qy.len() != len || qz.len() != len {
        return Err(UlgCheckError::LengthMismatch(format!(
            "quaternion columns for {} have lengths {}, {}, {}, {}",
            name,
            len,
            qx.len(),
            qy.len(),
            qz.len()
        )));
    }

    let values = (0..len)
        .map(|i| {
            let cos = body_z_cosine(qw[i], qx[i], qy[i], qz[i]);
            if cos.is_finite() {
                cos.clamp(-1.0, 1.0).acos()
            } else {
                f64::NAN
            }
        })
        .collect();

    Ok(Series {
        name: name.to_string(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_level_attitude() {
        let tilt = tilt_from_attitude(&[1.0, 1.0], &[0.0, 0.0], &[0.0, 0.0], &[0.0, 0.0], "tilt")
            .unwrap();
        assert_eq!(tilt.values, vec![0.0, 0.0]);
        assert_eq!(tilt.name, "tilt");
    }

    #[test]
    fn test_pure_yaw_is_level() {
        // 90 degrees about z
        let tilt =
            tilt_from_attitude(&[FRAC_1_SQRT_2], &[0.0], &[0.0], &[FRAC_1_SQRT_2], "tilt").unwrap();
        assert!(tilt.values[0].abs() < 1e-6);
    }

    #[test]
    fn test_roll_ninety_degrees() {
        let tilt =
            tilt_from_attitude(&[FRAC_1_SQRT_2], &[FRAC_1_SQRT_2], &[0.0], &[0.0], "tilt").unwrap();
        assert!((tilt.values[0] - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_forty_five_degrees() {
        let half = FRAC_PI_4 / 2.0;
        let tilt = tilt_from_attitude(&[half.cos()], &[0.0], &[half.sin()], &[0.0], "tilt").unwrap();
        assert!((tilt.values[0] - FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_upside_down() {
        let tilt = tilt_from_attitude(&[0.0], &[1.0], &[0.0], &[0.0], "tilt").unwrap();
        assert!((tilt.values[0] - PI).abs() < EPS);
    }

    #[test]
    fn test_cosine_saturation_clamped() {
        // Slightly longer than unit length
        let tilt = tilt_from_attitude(&[1.0 + 1e-7], &[0.0], &[0.0], &[0.0], "tilt").unwrap();
        assert_eq!(tilt.values, vec![0.0]);
    }

    #[test]
    fn test_nan_component() {
        let tilt = tilt_from_attitude(&[f64::NAN], &[0.0], &[0.0], &[0.0], "tilt").unwrap();
        assert!(tilt.values[0].is_nan());
    }

    #[test]
    fn test_length_mismatch() {
        let result = tilt_from_attitude(&[1.0, 1.0], &[0.0], &[0.0, 0.0], &[0.0, 0.0], "tilt");
        assert!(result.is_err());
    }
}
