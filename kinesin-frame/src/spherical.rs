//! Spherical angles of a direction vector in a rotated frame.
//!
//! The vector is rotated into the frame with `v' = Rᵀ v`, where `R` has the
//! basis vectors as columns. Then
//!
//! - `theta = arccos(v'_z / |v|)`, the polar angle from `z'`, in `[0, π]`
//! - `phi = atan2(v'_y, v'_x)`, the azimuth from `x'` toward `y'`, in `(-π, π]`

use kinesin_core::{KinesinError, Result};

use crate::basis::{Basis, ORTHONORMAL_TOLERANCE};
use crate::types::{Vector3, NORM_EPSILON};

/// Polar and azimuthal angle, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphericalAngles {
    /// Polar angle from `z'`.
    pub theta: f64,
    /// Azimuth in the `x'y'` plane.
    pub phi: f64,
}

/// Project `v` into `basis` using [`ORTHONORMAL_TOLERANCE`].
///
/// `v` need not be unit length.
///
/// # Errors
///
/// Fails if the basis is not orthonormal (see [`Basis::validate`]) or if `v`
/// has zero length.
pub fn spherical_angles(v: &Vector3, basis: &Basis) -> Result<SphericalAngles> {
    spherical_angles_with_tolerance(v, basis, ORTHONORMAL_TOLERANCE)
}

/// Project `v` into `basis` with an explicit orthonormality tolerance.
pub fn spherical_angles_with_tolerance(
    v: &Vector3,
    basis: &Basis,
    tol: f64,
) -> Result<SphericalAngles> {
    basis.validate(tol)?;

    let norm = v.norm();
    if !norm.is_finite() || norm < NORM_EPSILON {
        return Err(KinesinError::DegenerateVector(format!(
            "direction vector has norm {}",
            norm
        )));
    }

    let local = basis.to_local(v);
    // Clamp for numerical safety
    let theta = (local.z / norm).clamp(-1.0, 1.0).acos();
    let phi = local.y.atan2(local.x);

    Ok(SphericalAngles { theta, phi })
}
