//! Transition-path classification of an unwrapped phi series.
//!
//! The classifier is a small state machine:
//!
//! ```text
//! Start ──(any phi < reject_below)──────────────▶ Rejected
//!   │
//!   ├──(last phi > path1_above)──▶ Evaluating(Path1) ─▶ Path1 | Rejected
//!   ├──(last phi < path2_below)──▶ Evaluating(Path2) ─▶ Path2 | Rejected
//!   └──(otherwise)───────────────▶ DeadZone error
//! ```
//!
//! Rules are checked in this order; the global rejection dominates the final
//! value. Inside `Evaluating`, the branch rule locates the transition frame and
//! cuts the window around it.

use core::ops::Range;

use kinesin_core::{KinesinError, Result, Summarizable};
use tracing::{debug, error};

use crate::config::{BranchRule, ClassifierConfig, WindowPolicy};

/// Which transition route a trajectory took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathLabel {
    Path1,
    Path2,
    Rejected,
}

impl PathLabel {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PathLabel::Path1 => "path1",
            PathLabel::Path2 => "path2",
            PathLabel::Rejected => "rejected",
        }
    }
}

/// Frames `[start, end)` kept for a classified trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subsequence {
    pub start: usize,
    pub end: usize,
    /// Frame where the activation signal first crossed its threshold.
    pub transition: usize,
}

impl Subsequence {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the window holds no frames.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The rows of `data` covered by this window, or `None` if out of bounds.
    pub fn slice<'a, T>(&self, data: &'a [T]) -> Option<&'a [T]> {
        data.get(self.range())
    }

    /// The same window with every index moved forward by `offset`.
    pub fn shifted(&self, offset: usize) -> Subsequence {
        Subsequence {
            start: self.start + offset,
            end: self.end + offset,
            transition: self.transition + offset,
        }
    }

    /// Position of the transition frame within the window.
    pub fn transition_offset(&self) -> usize {
        self.transition.saturating_sub(self.start)
    }
}

/// Why a trajectory was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    /// phi dipped below the rejection threshold (an excursion toward Path2).
    NegativeExcursion { index: usize, phi: f64 },
    /// The centered window does not fit inside the series.
    WindowTruncated {
        transition: usize,
        requested: usize,
        available: usize,
    },
    /// The activation signal never crossed its threshold.
    NoTransition { candidate: PathLabel },
}

/// Outcome of classifying one series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Classification {
    Path1(Subsequence),
    Path2(Subsequence),
    Rejected(RejectReason),
}

impl Classification {
    pub fn label(&self) -> PathLabel {
        match self {
            Classification::Path1(_) => PathLabel::Path1,
            Classification::Path2(_) => PathLabel::Path2,
            Classification::Rejected(_) => PathLabel::Rejected,
        }
    }

    /// The kept window; always `None` for rejections.
    pub fn subsequence(&self) -> Option<&Subsequence> {
        match self {
            Classification::Path1(s) | Classification::Path2(s) => Some(s),
            Classification::Rejected(_) => None,
        }
    }

    /// The same outcome with indices moved forward by `offset`.
    pub fn shifted(self, offset: usize) -> Classification {
        match self {
            Classification::Path1(s) => Classification::Path1(s.shifted(offset)),
            Classification::Path2(s) => Classification::Path2(s.shifted(offset)),
            Classification::Rejected(RejectReason::NegativeExcursion { index, phi }) => {
                Classification::Rejected(RejectReason::NegativeExcursion {
                    index: index + offset,
                    phi,
                })
            }
            Classification::Rejected(RejectReason::WindowTruncated {
                transition,
                requested,
                available,
            }) => Classification::Rejected(RejectReason::WindowTruncated {
                transition: transition + offset,
                requested,
                available,
            }),
            rejected @ Classification::Rejected(RejectReason::NoTransition { .. }) => rejected,
        }
    }
}

impl Summarizable for Classification {
    fn summary(&self) -> String {
        match self {
            Classification::Path1(s) | Classification::Path2(s) => format!(
                "{}: frames {}..{} ({} rows), transition at {}",
                self.label().as_str(),
                s.start,
                s.end,
                s.len(),
                s.transition,
            ),
            Classification::Rejected(reason) => format!("rejected: {:?}", reason),
        }
    }
}

enum State {
    Start,
    Evaluating(PathLabel),
    Done(Classification),
}

/// Configured path classifier.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    config: ClassifierConfig,
}

impl PathClassifier {
    /// Create a classifier, validating the configuration.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one unwrapped phi series.
    ///
    /// `contacts`, when given, must be index-aligned with `phi`; it is required
    /// if either branch is triggered by the contact ratio.
    ///
    /// # Errors
    ///
    /// - [`KinesinError::InvalidInput`] for an empty phi series or a missing
    ///   contact series
    /// - [`KinesinError::Frame`] wrapping `InvalidInput` at the first
    ///   non-finite phi
    /// - [`KinesinError::SeriesLengthMismatch`] if the series are not aligned
    /// - [`KinesinError::DeadZone`] if the final phi resolves to neither path
    pub fn classify(&self, phi: &[f64], contacts: Option<&[f64]>) -> Result<Classification> {
        self.check_inputs(phi, contacts)?;

        let mut state = State::Start;
        loop {
            state = match state {
                State::Start => self.start(phi)?,
                State::Evaluating(candidate) => self.evaluate(candidate, phi, contacts),
                State::Done(outcome) => {
                    debug!(label = outcome.label().as_str(), frames = phi.len(), "classified");
                    return Ok(outcome);
                }
            };
        }
    }

    fn check_inputs(&self, phi: &[f64], contacts: Option<&[f64]>) -> Result<()> {
        if phi.is_empty() {
            return Err(KinesinError::InvalidInput(
                "cannot classify an empty phi series".into(),
            ));
        }
        if let Some(i) = phi.iter().position(|p| !p.is_finite()) {
            let message = format!("phi is not finite ({})", phi[i]);
            return Err(KinesinError::InvalidInput(message).at_frame(i));
        }
        match contacts {
            Some(c) if c.len() != phi.len() => Err(KinesinError::SeriesLengthMismatch {
                what: "contact ratio series",
                expected: phi.len(),
                found: c.len(),
            }),
            None if self.config.needs_contacts() => Err(KinesinError::InvalidInput(
                "classifier is triggered by the contact ratio but no contact series was given"
                    .into(),
            )),
            _ => Ok(()),
        }
    }

    fn start(&self, phi: &[f64]) -> Result<State> {
        if let Some(threshold) = self.config.reject_below {
            if let Some(index) = phi.iter().position(|&p| p < threshold) {
                return Ok(State::Done(Classification::Rejected(
                    RejectReason::NegativeExcursion {
                        index,
                        phi: phi[index],
                    },
                )));
            }
        }

        // non-empty, checked by the caller
        let last_phi = phi[phi.len() - 1];
        if last_phi > self.config.path1_above {
            Ok(State::Evaluating(PathLabel::Path1))
        } else if last_phi < self.config.path2_below {
            Ok(State::Evaluating(PathLabel::Path2))
        } else {
            error!(
                last_phi,
                path1_above = self.config.path1_above,
                path2_below = self.config.path2_below,
                "final phi resolves to neither path"
            );
            Err(KinesinError::DeadZone { last_phi })
        }
    }

    fn evaluate(&self, candidate: PathLabel, phi: &[f64], contacts: Option<&[f64]>) -> State {
        let rule: &BranchRule = match candidate {
            PathLabel::Path1 => &self.config.path1,
            _ => &self.config.path2,
        };

        let Some(transition) = rule.activation.first_crossing(phi, contacts) else {
            return State::Done(Classification::Rejected(RejectReason::NoTransition {
                candidate,
            }));
        };

        let window = match cut_window(rule.window, transition, phi.len()) {
            Ok(w) => w,
            Err(reason) => {
                debug!(?reason, "window does not fit");
                return State::Done(Classification::Rejected(reason));
            }
        };

        State::Done(match candidate {
            PathLabel::Path1 => Classification::Path1(window),
            _ => Classification::Path2(window),
        })
    }
}

fn cut_window(
    policy: WindowPolicy,
    transition: usize,
    len: usize,
) -> core::result::Result<Subsequence, RejectReason> {
    match policy {
        WindowPolicy::Centered {
            previous_steps,
            post_steps,
        } => {
            let requested = previous_steps + post_steps + 1;
            let start = transition.checked_sub(previous_steps);
            let last = transition
                .checked_add(post_steps)
                .filter(|&last| last < len);
            match (start, last) {
                (Some(start), Some(last)) => Ok(Subsequence {
                    start,
                    end: last + 1,
                    transition,
                }),
                _ => {
                    let lo = transition.saturating_sub(previous_steps);
                    let hi = transition.saturating_add(post_steps).min(len - 1);
                    Err(RejectReason::WindowTruncated {
                        transition,
                        requested,
                        available: hi - lo + 1,
                    })
                }
            }
        }
        WindowPolicy::Prefix => Ok(Subsequence {
            start: 0,
            end: transition + 1,
            transition,
        }),
        WindowPolicy::Full => Ok(Subsequence {
            start: 0,
            end: len,
            transition,
        }),
    }
}

/// Classify with a one-off configuration.
pub fn classify(
    phi: &[f64],
    contacts: Option<&[f64]>,
    config: &ClassifierConfig,
) -> Result<Classification> {
    PathClassifier::new(config.clone())?.classify(phi, contacts)
}
