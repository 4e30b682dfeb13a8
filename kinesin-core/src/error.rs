//! Structured error types for kinesin CV analysis.

use thiserror::Error;

/// Unified error type for all kinesin CV operations.
#[derive(Debug, Error)]
pub enum KinesinError {
    /// Invalid input (empty series, non-finite values, out-of-range arguments)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A vector that must be normalized has (near) zero length
    #[error("degenerate vector: {0}")]
    DegenerateVector(String),

    /// A basis vector is not unit length
    #[error("basis vector {axis} is not unit length (norm = {norm})")]
    NonUnitBasis { axis: &'static str, norm: f64 },

    /// Two basis vectors are not orthogonal
    #[error("basis vectors {first} and {second} are not orthogonal (dot = {dot})")]
    NonOrthogonalBasis {
        first: &'static str,
        second: &'static str,
        dot: f64,
    },

    /// Two series that must be index-aligned have different lengths
    #[error("{what} has {found} entries, expected {expected}")]
    SeriesLengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The final phi value lies between the two path thresholds.
    ///
    /// Trajectories are expected to resolve to one side; landing here means the
    /// input or the threshold assumptions are wrong, so no label is guessed.
    #[error("final phi {last_phi} lies in the dead zone between path thresholds")]
    DeadZone { last_phi: f64 },

    /// Failure while processing a specific frame
    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: Box<KinesinError>,
    },

    /// Failure attributed to a named trajectory
    #[error("trajectory {id}: {source}")]
    Trajectory {
        id: String,
        #[source]
        source: Box<KinesinError>,
    },
}

impl KinesinError {
    /// Attach a frame index to this error.
    pub fn at_frame(self, index: usize) -> Self {
        KinesinError::Frame {
            index,
            source: Box::new(self),
        }
    }

    /// Attach a trajectory identifier to this error.
    pub fn in_trajectory(self, id: impl Into<String>) -> Self {
        KinesinError::Trajectory {
            id: id.into(),
            source: Box::new(self),
        }
    }

    /// Move any frame index carried by this error forward by `offset`.
    ///
    /// Used when an error raised on a slice is reported against the series the
    /// slice was taken from.
    pub fn offset_frames(self, offset: usize) -> Self {
        match self {
            KinesinError::Frame { index, source } => KinesinError::Frame {
                index: index + offset,
                source,
            },
            KinesinError::Trajectory { id, source } => KinesinError::Trajectory {
                id,
                source: Box::new(source.offset_frames(offset)),
            },
            other => other,
        }
    }

    /// Whether this error (or the error it wraps) is a dead-zone classification failure.
    pub fn is_dead_zone(&self) -> bool {
        match self {
            KinesinError::DeadZone { .. } => true,
            KinesinError::Frame { source, .. } | KinesinError::Trajectory { source, .. } => {
                source.is_dead_zone()
            }
            _ => false,
        }
    }
}

/// Convenience alias used throughout the kinesin crates.
pub type Result<T> = std::result::Result<T, KinesinError>;
