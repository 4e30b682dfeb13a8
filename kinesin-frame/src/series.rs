//! Per-trajectory stalk orientation series.
//!
//! Each frame contributes five centroids: the stalk `top` and `bottom` groups
//! and three microtubule subunit markers. The stalk direction is projected into
//! the frame's own basis, giving one (theta, phi) pair per frame.

use kinesin_core::{KinesinError, Result, Summarizable};
use tracing::debug;

use crate::basis::Basis;
use crate::geometry::{centroid, stalk_direction};
use crate::spherical::{spherical_angles, SphericalAngles};
use crate::types::Vector3;
use crate::unwrap::unwrap;

/// Centroids extracted from one trajectory frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameMarkers {
    /// Centroid of the upper stalk group.
    pub top: Vector3,
    /// Centroid of the lower stalk group.
    pub bottom: Vector3,
    /// Microtubule subunit centroids `p1`, `p2`, `p3`.
    pub plane: [Vector3; 3],
}

impl FrameMarkers {
    /// Create markers from precomputed centroids.
    pub fn new(top: Vector3, bottom: Vector3, plane: [Vector3; 3]) -> Self {
        Self { top, bottom, plane }
    }

    /// Reduce raw point groups to centroids.
    ///
    /// # Errors
    ///
    /// Returns an error if any group is empty.
    pub fn from_groups(
        top: &[Vector3],
        bottom: &[Vector3],
        plane: [&[Vector3]; 3],
    ) -> Result<Self> {
        Ok(Self {
            top: centroid(top)?,
            bottom: centroid(bottom)?,
            plane: [centroid(plane[0])?, centroid(plane[1])?, centroid(plane[2])?],
        })
    }

    /// The microtubule reference frame for this timestep.
    pub fn basis(&self) -> Result<Basis> {
        Basis::from_plane_points(&self.plane[0], &self.plane[1], &self.plane[2])
    }

    /// Stalk orientation in this frame's basis.
    pub fn angles(&self) -> Result<SphericalAngles> {
        let direction = stalk_direction(&self.top, &self.bottom)?;
        spherical_angles(&direction, &self.basis()?)
    }
}

/// Theta and phi per frame, in time order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleSeries {
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
}

impl AngleSeries {
    /// Build from parallel theta and phi vectors.
    ///
    /// # Errors
    ///
    /// Returns [`KinesinError::SeriesLengthMismatch`] if the lengths differ.
    pub fn new(theta: Vec<f64>, phi: Vec<f64>) -> Result<Self> {
        if theta.len() != phi.len() {
            return Err(KinesinError::SeriesLengthMismatch {
                what: "phi series",
                expected: theta.len(),
                found: phi.len(),
            });
        }
        Ok(Self { theta, phi })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    /// Whether the series has no frames.
    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    /// A copy with theta and phi unwrapped independently.
    pub fn unwrapped(&self) -> AngleSeries {
        AngleSeries {
            theta: unwrap(&self.theta),
            phi: unwrap(&self.phi),
        }
    }

    /// Frames `[start, end)` as a new series.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Result<AngleSeries> {
        if start > end || end > self.len() {
            return Err(KinesinError::InvalidInput(format!(
                "frame range {}..{} out of bounds for {} frames",
                start,
                end,
                self.len()
            )));
        }
        Ok(AngleSeries {
            theta: self.theta[start..end].to_vec(),
            phi: self.phi[start..end].to_vec(),
        })
    }
}

impl FromIterator<SphericalAngles> for AngleSeries {
    fn from_iter<I: IntoIterator<Item = SphericalAngles>>(iter: I) -> Self {
        let (theta, phi) = iter.into_iter().map(|a| (a.theta, a.phi)).unzip();
        AngleSeries { theta, phi }
    }
}

impl Summarizable for AngleSeries {
    fn summary(&self) -> String {
        match (self.phi.first(), self.phi.last()) {
            (Some(first), Some(last)) => format!(
                "AngleSeries: {} frame(s), phi {:.3} → {:.3} rad",
                self.len(),
                first,
                last,
            ),
            _ => "AngleSeries: empty".into(),
        }
    }
}

/// Compute the raw (wrapped) angle series for a trajectory.
///
/// Frames are independent; with the `parallel` feature they are processed
/// with rayon. Results keep frame order.
///
/// # Errors
///
/// The first failing frame is reported as [`KinesinError::Frame`] with its index.
pub fn angle_series(frames: &[FrameMarkers]) -> Result<AngleSeries> {
    #[cfg(feature = "parallel")]
    let angles: Result<Vec<SphericalAngles>> = {
        use rayon::prelude::*;
        frames
            .par_iter()
            .enumerate()
            .map(|(i, f)| f.angles().map_err(|e| e.at_frame(i)))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let angles: Result<Vec<SphericalAngles>> = frames
        .iter()
        .enumerate()
        .map(|(i, f)| f.angles().map_err(|e| e.at_frame(i)))
        .collect();

    let series: AngleSeries = angles?.into_iter().collect();
    debug!(frames = series.len(), "computed stalk angle series");
    Ok(series)
}

/// Compute the angle series and unwrap it in one step.
pub fn unwrapped_angle_series(frames: &[FrameMarkers]) -> Result<AngleSeries> {
    Ok(angle_series(frames)?.unwrapped())
}
