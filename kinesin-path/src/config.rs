//! Classifier configuration.
//!
//! The three classification variants used in the kinesin analyses differ only
//! in where the transition signal comes from and how much of the series is
//! kept around it. Both are expressed as tagged variants here, so one state
//! machine serves every variant.

use kinesin_core::{KinesinError, Result};

/// Contact-ratio level treated as a formed neck-mimic contact.
pub const DEFAULT_CONTACT_CUTOFF: f64 = 0.99;
/// Frames kept before the transition in the centered window.
pub const DEFAULT_PREVIOUS_STEPS: usize = 50;
/// Frames kept after the transition in the centered window.
pub const DEFAULT_POST_STEPS: usize = 20;
/// Angle-only variant: phi above this marks a Path1 transition.
pub const ANGLE_PATH1_CUTOFF: f64 = 2.0;
/// Angle-only variant: phi below this marks a Path2 transition.
pub const ANGLE_PATH2_CUTOFF: f64 = -4.0;

/// Signal whose first strict threshold crossing marks the transition frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Activation {
    /// `contact_ratio[i] > cutoff`
    ContactRatioAbove { cutoff: f64 },
    /// `phi[i] > cutoff`
    PhiAbove { cutoff: f64 },
    /// `phi[i] < cutoff`
    PhiBelow { cutoff: f64 },
}

impl Activation {
    /// Whether this signal reads the contact-ratio series.
    pub fn needs_contacts(&self) -> bool {
        matches!(self, Activation::ContactRatioAbove { .. })
    }

    /// First index where the signal is true, or `None` if it never is.
    ///
    /// Returns `None` for a contact-based signal when no contact series is given.
    pub fn first_crossing(&self, phi: &[f64], contacts: Option<&[f64]>) -> Option<usize> {
        match *self {
            Activation::ContactRatioAbove { cutoff } => {
                contacts?.iter().position(|&c| c > cutoff)
            }
            Activation::PhiAbove { cutoff } => phi.iter().position(|&p| p > cutoff),
            Activation::PhiBelow { cutoff } => phi.iter().position(|&p| p < cutoff),
        }
    }
}

/// Which frames to keep around the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum WindowPolicy {
    /// `[idx - previous_steps, idx + post_steps]`; must fit entirely.
    Centered {
        previous_steps: usize,
        post_steps: usize,
    },
    /// `[0, idx]`
    Prefix,
    /// The whole series.
    Full,
}

impl WindowPolicy {
    /// Rows a fitting window contains, if fixed.
    pub fn requested_rows(&self) -> Option<usize> {
        match *self {
            WindowPolicy::Centered {
                previous_steps,
                post_steps,
            } => Some(previous_steps + post_steps + 1),
            WindowPolicy::Prefix | WindowPolicy::Full => None,
        }
    }
}

/// How one candidate path is resolved into a subsequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchRule {
    pub activation: Activation,
    pub window: WindowPolicy,
}

/// Thresholds and branch rules for the path classifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierConfig {
    /// Reject the whole series if any phi falls strictly below this value.
    pub reject_below: Option<f64>,
    /// A final phi strictly above this is a Path1 candidate.
    pub path1_above: f64,
    /// A final phi strictly below this is a Path2 candidate.
    pub path2_below: f64,
    pub path1: BranchRule,
    pub path2: BranchRule,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::contact_window(DEFAULT_PREVIOUS_STEPS, DEFAULT_POST_STEPS)
    }
}

impl ClassifierConfig {
    /// Contact-triggered variant with a centered Path1 window.
    ///
    /// Series that ever dip below phi = 0 are rejected. Path1 keeps
    /// `previous_steps` frames before and `post_steps` after the first frame
    /// with contact ratio above 0.99; Path2 keeps everything up to that frame.
    pub fn contact_window(previous_steps: usize, post_steps: usize) -> Self {
        let activation = Activation::ContactRatioAbove {
            cutoff: DEFAULT_CONTACT_CUTOFF,
        };
        Self {
            reject_below: Some(0.0),
            path1_above: 0.0,
            path2_below: -1.0,
            path1: BranchRule {
                activation,
                window: WindowPolicy::Centered {
                    previous_steps,
                    post_steps,
                },
            },
            path2: BranchRule {
                activation,
                window: WindowPolicy::Prefix,
            },
        }
    }

    /// Contact-triggered variant without global rejection; both paths keep the
    /// prefix up to contact formation.
    pub fn contact_prefix() -> Self {
        let rule = BranchRule {
            activation: Activation::ContactRatioAbove {
                cutoff: DEFAULT_CONTACT_CUTOFF,
            },
            window: WindowPolicy::Prefix,
        };
        Self {
            reject_below: None,
            path1_above: 0.0,
            path2_below: -1.0,
            path1: rule,
            path2: rule,
        }
    }

    /// Angle-only variant: transitions are located from phi alone and the whole
    /// series is kept.
    pub fn angle_only() -> Self {
        Self {
            reject_below: Some(0.0),
            path1_above: 0.0,
            path2_below: -1.0,
            path1: BranchRule {
                activation: Activation::PhiAbove {
                    cutoff: ANGLE_PATH1_CUTOFF,
                },
                window: WindowPolicy::Full,
            },
            path2: BranchRule {
                activation: Activation::PhiBelow {
                    cutoff: ANGLE_PATH2_CUTOFF,
                },
                window: WindowPolicy::Full,
            },
        }
    }

    /// Whether either branch reads the contact-ratio series.
    pub fn needs_contacts(&self) -> bool {
        self.path1.activation.needs_contacts() || self.path2.activation.needs_contacts()
    }

    /// Check that thresholds are finite and the two path regions do not overlap.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("path1_above", Some(self.path1_above)),
            ("path2_below", Some(self.path2_below)),
            ("reject_below", self.reject_below),
        ];
        for (name, value) in thresholds {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(KinesinError::InvalidInput(format!(
                        "{} must be finite, got {}",
                        name, v
                    )));
                }
            }
        }
        if self.path2_below > self.path1_above {
            return Err(KinesinError::InvalidInput(format!(
                "path2_below ({}) must not exceed path1_above ({})",
                self.path2_below, self.path1_above
            )));
        }
        Ok(())
    }
}
