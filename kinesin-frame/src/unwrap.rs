//! Phase unwrapping of periodic angle series.

use core::f64::consts::{PI, TAU};

/// Unwrap a radian series with period 2π.
///
/// Whenever two consecutive values differ by at least π, the later values are
/// shifted by the multiple of 2π that brings the step back into `[-π, π]`.
/// Series of length 0 or 1 are returned unchanged, and unwrapping an already
/// continuous series is the identity.
pub fn unwrap(angles: &[f64]) -> Vec<f64> {
    unwrap_with_period(angles, TAU)
}

/// Unwrap a series with an arbitrary period.
///
/// The discontinuity threshold is `period / 2`.
pub fn unwrap_with_period(angles: &[f64], period: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(angles.len());
    let Some(&first) = angles.first() else {
        return out;
    };
    out.push(first);

    let half = period / 2.0;
    let mut correction = 0.0;
    for pair in angles.windows(2) {
        let step = pair[1] - pair[0];
        if step.abs() >= half {
            let mut wrapped = (step + half).rem_euclid(period) - half;
            if wrapped == -half && step > 0.0 {
                wrapped = half;
            }
            correction += wrapped - step;
        }
        out.push(pair[1] + correction);
    }
    out
}

/// Wrap a single angle into `(-π, π]`.
pub fn wrap_to_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}
