//! Per-frame orthonormal reference frames built from three microtubule markers.
//!
//! Three subunit centroids `p1`, `p2`, `p3` span a plane. The frame is
//!
//! ```text
//! p21 = p1 - p2
//! p23 = p3 - p2
//! z'  = normalize(p23 × p21)
//! x'  = normalize(p21 × z')
//! y'  = normalize(z' × x')
//! ```
//!
//! which is right-handed and fixed by the plane and the point order. Swapping
//! `p1` and `p3` flips `z'`.

use kinesin_core::{KinesinError, Result};

use crate::linalg::Matrix3x3;
use crate::types::Vector3;

/// Default absolute tolerance for unit-norm and orthogonality checks.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// Axis labels used in error messages.
pub const AXIS_NAMES: [&str; 3] = ["x'", "y'", "z'"];

/// A triple of basis vectors (x', y', z') expressed in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Basis {
    pub x: Vector3,
    pub y: Vector3,
    pub z: Vector3,
}

impl Basis {
    /// Wrap three caller-supplied vectors without checking them.
    ///
    /// Use [`Basis::validate`] (or the projector, which validates) before relying
    /// on orthonormality.
    pub fn new(x: Vector3, y: Vector3, z: Vector3) -> Self {
        Self { x, y, z }
    }

    /// The global frame.
    pub fn identity() -> Self {
        Self {
            x: Vector3::new(1.0, 0.0, 0.0),
            y: Vector3::new(0.0, 1.0, 0.0),
            z: Vector3::new(0.0, 0.0, 1.0),
        }
    }

    /// Build the frame defined by three plane points.
    ///
    /// # Errors
    ///
    /// Returns [`KinesinError::DegenerateVector`] if the points are collinear or
    /// coincident, since a cross product then has zero length.
    pub fn from_plane_points(p1: &Vector3, p2: &Vector3, p3: &Vector3) -> Result<Basis> {
        let p21 = p1.sub(p2);
        let p23 = p3.sub(p2);

        let z = normalize_axis(&p23.cross(&p21), "z'")?;
        let x = normalize_axis(&p21.cross(&z), "x'")?;
        let y = normalize_axis(&z.cross(&x), "y'")?;

        Ok(Basis { x, y, z })
    }

    /// The basis vectors in (x', y', z') order.
    pub fn axes(&self) -> [Vector3; 3] {
        [self.x, self.y, self.z]
    }

    /// Check unit norms first, then pairwise orthogonality.
    ///
    /// # Errors
    ///
    /// [`KinesinError::NonUnitBasis`] names the first axis whose norm is off by
    /// more than `tol`; [`KinesinError::NonOrthogonalBasis`] names the first pair
    /// whose dot product exceeds `tol` in magnitude.
    pub fn validate(&self, tol: f64) -> Result<()> {
        let axes = self.axes();
        for (axis, name) in axes.iter().zip(AXIS_NAMES) {
            let norm = axis.norm();
            if !((norm - 1.0).abs() <= tol) {
                return Err(KinesinError::NonUnitBasis { axis: name, norm });
            }
        }
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let dot = axes[i].dot(&axes[j]);
            if !(dot.abs() <= tol) {
                return Err(KinesinError::NonOrthogonalBasis {
                    first: AXIS_NAMES[i],
                    second: AXIS_NAMES[j],
                    dot,
                });
            }
        }
        Ok(())
    }

    /// Whether `x' × y'` points along `z'`.
    pub fn is_right_handed(&self) -> bool {
        self.matrix().determinant() > 0.0
    }

    /// Rotation matrix `R = [x'|y'|z']` (basis vectors as columns), row-major.
    pub fn rotation(&self) -> [[f64; 3]; 3] {
        self.matrix().data
    }

    /// Express a global vector in this frame: `Rᵀ v`.
    pub fn to_local(&self, v: &Vector3) -> Vector3 {
        self.matrix().transpose().apply(v)
    }

    pub(crate) fn matrix(&self) -> Matrix3x3 {
        Matrix3x3::from_columns(&self.x, &self.y, &self.z)
    }
}

fn normalize_axis(v: &Vector3, axis: &str) -> Result<Vector3> {
    v.try_normalize().ok_or_else(|| {
        KinesinError::DegenerateVector(format!(
            "{} axis vanishes; plane points are collinear or coincident",
            axis
        ))
    })
}
