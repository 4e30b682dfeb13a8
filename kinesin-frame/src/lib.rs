//! Microtubule-relative stalk orientation for kinesin MD trajectories.
//!
//! - **Vectors and centroids** — [`Vector3`], [`geometry::centroid`], [`geometry::stalk_direction`]
//! - **Reference frames** — per-frame orthonormal bases in [`basis`]
//! - **Spherical angles** — (theta, phi) of a direction in a basis, in [`spherical`]
//! - **Unwrapping** — removal of 2π jumps from angle series, in [`unwrap`]
//! - **Series** — whole-trajectory angle series from per-frame markers, in [`series`]
//!
//! # Quick start
//!
//! ```
//! use kinesin_frame::{Basis, Vector3, spherical_angles};
//!
//! let basis = Basis::from_plane_points(
//!     &Vector3::new(0.0, 1.0, 0.0),
//!     &Vector3::new(0.0, 0.0, 0.0),
//!     &Vector3::new(1.0, 0.0, 0.0),
//! )
//! .unwrap();
//! let angles = spherical_angles(&Vector3::new(1.0, 1.0, 1.0), &basis).unwrap();
//! assert!((angles.phi - std::f64::consts::FRAC_PI_4).abs() < 1e-10);
//! ```

pub mod basis;
pub mod geometry;
mod linalg;
pub mod series;
pub mod spherical;
pub mod types;
pub mod unwrap;

pub use basis::{Basis, ORTHONORMAL_TOLERANCE};
pub use geometry::{centroid, stalk_direction};
pub use series::{angle_series, unwrapped_angle_series, AngleSeries, FrameMarkers};
pub use spherical::{spherical_angles, spherical_angles_with_tolerance, SphericalAngles};
pub use types::Vector3;
pub use unwrap::{unwrap, unwrap_with_period, wrap_to_pi};
