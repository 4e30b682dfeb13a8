//! Classification of many trajectories.
//!
//! Each trajectory is split into stages, the analyzed stage is unwrapped and
//! classified on its own. Window-fit and missing-transition outcomes are
//! ordinary rejections. Malformed trajectories are recorded and skipped. A
//! dead-zone final phi aborts the whole batch.

use kinesin_core::{Annotated, KinesinError, Result, Summarizable};
use kinesin_frame::AngleSeries;
use tracing::{error, info, warn};

use crate::classify::{Classification, PathClassifier, PathLabel, Subsequence};
use crate::config::ClassifierConfig;
use crate::stage::{StageLayout, DEFAULT_ANALYZED_STAGE};

/// Per-frame CVs of one trajectory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryCv {
    pub id: String,
    /// Raw polar angle per frame.
    pub theta: Vec<f64>,
    /// Raw azimuth per frame.
    pub phi: Vec<f64>,
    /// Contact ratio per frame, when available.
    pub contact_ratio: Option<Vec<f64>>,
}

impl TrajectoryCv {
    pub fn new(
        id: impl Into<String>,
        angles: AngleSeries,
        contact_ratio: Option<Vec<f64>>,
    ) -> Self {
        Self {
            id: id.into(),
            theta: angles.theta,
            phi: angles.phi,
            contact_ratio,
        }
    }

    pub fn len(&self) -> usize {
        self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }

    fn check_alignment(&self) -> Result<()> {
        if self.theta.len() != self.phi.len() {
            return Err(KinesinError::SeriesLengthMismatch {
                what: "theta series",
                expected: self.phi.len(),
                found: self.theta.len(),
            });
        }
        if let Some(c) = &self.contact_ratio {
            if c.len() != self.phi.len() {
                return Err(KinesinError::SeriesLengthMismatch {
                    what: "contact ratio series",
                    expected: self.phi.len(),
                    found: c.len(),
                });
            }
        }
        Ok(())
    }
}

impl Annotated for TrajectoryCv {
    fn name(&self) -> &str {
        &self.id
    }
}

/// Which per-frame column to read from an analyzed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Theta,
    Phi,
    ContactRatio,
}

/// Rows of one trajectory kept by its classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeptRows {
    /// Trajectory frame of the first row.
    pub offset: usize,
    /// Unwrapped polar angle.
    pub theta: Vec<f64>,
    /// Unwrapped azimuth.
    pub phi: Vec<f64>,
    pub contact_ratio: Option<Vec<f64>>,
}

impl KeptRows {
    pub fn len(&self) -> usize {
        self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }

    pub fn column(&self, column: Column) -> Option<&[f64]> {
        match column {
            Column::Theta => Some(self.theta.as_slice()),
            Column::Phi => Some(self.phi.as_slice()),
            Column::ContactRatio => self.contact_ratio.as_deref(),
        }
    }
}

/// The unwrapped, analyzed stage of one trajectory. Dropped once classified.
struct StageCv {
    /// First frame of the stage in the full trajectory.
    offset: usize,
    angles: AngleSeries,
    contact_ratio: Option<Vec<f64>>,
}

impl StageCv {
    /// Copy out the rows of a stage-local window.
    fn keep(&self, sub: &Subsequence) -> Option<KeptRows> {
        Some(KeptRows {
            offset: self.offset + sub.start,
            theta: sub.slice(&self.angles.theta)?.to_vec(),
            phi: sub.slice(&self.angles.phi)?.to_vec(),
            contact_ratio: match &self.contact_ratio {
                Some(c) => Some(sub.slice(c)?.to_vec()),
                None => None,
            },
        })
    }
}

/// Settings for a batch run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchConfig {
    pub stages: StageLayout,
    /// Zero-based index of the stage to classify.
    pub analyzed_stage: usize,
    pub classifier: ClassifierConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            stages: StageLayout::default(),
            analyzed_stage: DEFAULT_ANALYZED_STAGE,
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Result for one trajectory.
#[derive(Debug)]
pub struct TrajectoryOutcome {
    pub id: String,
    /// Rows of the kept window; `None` for rejections and failures.
    pub kept: Option<KeptRows>,
    /// Classification with indices in full-trajectory frames.
    pub result: Result<Classification>,
}

impl TrajectoryOutcome {
    pub fn label(&self) -> Option<PathLabel> {
        self.result.as_ref().ok().map(Classification::label)
    }

    /// Rows of `column` kept by the classification, if it kept any.
    pub fn window(&self, column: Column) -> Option<&[f64]> {
        self.kept.as_ref()?.column(column)
    }
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTally {
    pub path1: usize,
    pub path2: usize,
    pub rejected: usize,
    /// Trajectories that could not be classified.
    pub failed: usize,
}

impl PathTally {
    pub fn total(&self) -> usize {
        self.path1 + self.path2 + self.rejected + self.failed
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<TrajectoryOutcome>,
}

impl BatchReport {
    pub fn tally(&self) -> PathTally {
        let mut tally = PathTally::default();
        for outcome in &self.outcomes {
            match outcome.label() {
                Some(PathLabel::Path1) => tally.path1 += 1,
                Some(PathLabel::Path2) => tally.path2 += 1,
                Some(PathLabel::Rejected) => tally.rejected += 1,
                None => tally.failed += 1,
            }
        }
        tally
    }

    /// Outcomes carrying the given label.
    pub fn with_label(&self, label: PathLabel) -> impl Iterator<Item = &TrajectoryOutcome> {
        self.outcomes
            .iter()
            .filter(move |o| o.label() == Some(label))
    }

    /// Kept windows of `column` for every trajectory with the given label.
    pub fn windows(&self, label: PathLabel, column: Column) -> Vec<&[f64]> {
        self.with_label(label)
            .filter_map(|o| o.window(column))
            .collect()
    }

    /// Outcomes that ended in an error.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &KinesinError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.id.as_str(), e)))
    }
}

impl Summarizable for BatchReport {
    fn summary(&self) -> String {
        let t = self.tally();
        format!(
            "BatchReport({} trajectories): {} path1, {} path2, {} rejected, {} failed",
            t.total(),
            t.path1,
            t.path2,
            t.rejected,
            t.failed,
        )
    }
}

/// Classify one trajectory.
///
/// Errors are kept in the outcome rather than returned. Frame indices in both
/// the classification and the error refer to the full trajectory.
pub fn classify_trajectory(
    trajectory: &TrajectoryCv,
    config: &BatchConfig,
    classifier: &PathClassifier,
) -> TrajectoryOutcome {
    let stage = match extract_stage(trajectory, config) {
        Ok(stage) => stage,
        Err(e) => {
            warn!(trajectory = %trajectory.id, error = %e, "skipping trajectory");
            return TrajectoryOutcome {
                id: trajectory.id.clone(),
                kept: None,
                result: Err(e),
            };
        }
    };

    let result = classifier.classify(&stage.angles.phi, stage.contact_ratio.as_deref());
    let kept = result
        .as_ref()
        .ok()
        .and_then(Classification::subsequence)
        .and_then(|sub| stage.keep(sub));
    let offset = stage.offset;
    drop(stage);

    let result = result
        .map(|c| c.shifted(offset))
        .map_err(|e| e.offset_frames(offset));
    if let Err(e) = &result {
        if !e.is_dead_zone() {
            warn!(trajectory = %trajectory.id, error = %e, "classification failed");
        }
    }

    TrajectoryOutcome {
        id: trajectory.id.clone(),
        kept,
        result,
    }
}

fn extract_stage(trajectory: &TrajectoryCv, config: &BatchConfig) -> Result<StageCv> {
    trajectory.check_alignment()?;
    let window = config
        .stages
        .stage(config.analyzed_stage, trajectory.len())?;

    let raw = AngleSeries::new(
        trajectory.theta[window.start..window.end].to_vec(),
        trajectory.phi[window.start..window.end].to_vec(),
    )?;
    let contact_ratio = trajectory
        .contact_ratio
        .as_ref()
        .and_then(|c| window.slice(c))
        .map(<[f64]>::to_vec);

    Ok(StageCv {
        offset: window.start,
        angles: raw.unwrapped(),
        contact_ratio,
    })
}

/// Classify every trajectory, keeping input order.
///
/// With the `parallel` feature, trajectories are processed with rayon.
///
/// # Errors
///
/// Returns [`KinesinError::Trajectory`] wrapping [`KinesinError::DeadZone`]
/// for the first trajectory (in input order) whose final phi resolves to
/// neither path, or an error if the classifier configuration is invalid.
pub fn classify_batch(trajectories: &[TrajectoryCv], config: &BatchConfig) -> Result<BatchReport> {
    let classifier = PathClassifier::new(config.classifier.clone())?;

    let outcomes = classify_all(trajectories, config, &classifier);

    let mut report = BatchReport {
        outcomes: Vec::with_capacity(outcomes.len()),
    };
    for outcome in outcomes {
        match outcome.result {
            Err(e) if e.is_dead_zone() => {
                error!(trajectory = %outcome.id, error = %e, "aborting batch");
                return Err(e.in_trajectory(outcome.id));
            }
            result => report.outcomes.push(TrajectoryOutcome { result, ..outcome }),
        }
    }

    info!(summary = %report.summary(), "batch classified");
    Ok(report)
}

#[cfg(feature = "parallel")]
fn classify_all(
    trajectories: &[TrajectoryCv],
    config: &BatchConfig,
    classifier: &PathClassifier,
) -> Vec<TrajectoryOutcome> {
    use rayon::prelude::*;
    trajectories
        .par_iter()
        .map(|t| classify_trajectory(t, config, classifier))
        .collect()
}

/// Serial run; stops after the first dead-zone outcome.
#[cfg(not(feature = "parallel"))]
fn classify_all(
    trajectories: &[TrajectoryCv],
    config: &BatchConfig,
    classifier: &PathClassifier,
) -> Vec<TrajectoryOutcome> {
    let mut outcomes = Vec::with_capacity(trajectories.len());
    for t in trajectories {
        let outcome = classify_trajectory(t, config, classifier);
        let dead_zone = outcome.result.as_ref().is_err_and(KinesinError::is_dead_zone);
        outcomes.push(outcome);
        if dead_zone {
            break;
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageLayout;
    use core::f64::consts::PI;
    use kinesin_frame::wrap_to_pi;

    fn small_config(classifier: ClassifierConfig) -> BatchConfig {
        BatchConfig {
            stages: StageLayout::new(vec![5, 40, 5]).unwrap(),
            analyzed_stage: 1,
            classifier,
        }
    }

    /// 50 frames; the analyzed stage (frames 5..45) follows `stage_phi`.
    fn trajectory(id: &str, stage_phi: impl Fn(usize) -> f64, contact_at: usize) -> TrajectoryCv {
        let phi: Vec<f64> = (0..50)
            .map(|i| if (5..45).contains(&i) { stage_phi(i - 5) } else { -2.0 })
            .collect();
        let contact_ratio = (0..50)
            .map(|i| if i >= 5 + contact_at { 1.0 } else { 0.3 })
            .collect();
        TrajectoryCv {
            id: id.into(),
            theta: vec![1.0; 50],
            phi,
            contact_ratio: Some(contact_ratio),
        }
    }

    #[test]
    fn classifies_and_shifts_to_trajectory_frames() {
        let t = trajectory("a", |i| 0.05 * i as f64, 20);
        let report = classify_batch(&[t], &small_config(ClassifierConfig::contact_window(5, 3))).unwrap();
        let outcome = &report.outcomes[0];
        let sub = *outcome.result.as_ref().unwrap().subsequence().unwrap();
        assert_eq!(sub.transition, 25);
        assert_eq!(sub.range(), 20..29);

        let phi = outcome.window(Column::Phi).unwrap();
        assert_eq!(phi.len(), 9);
        assert!((phi[5] - 1.0).abs() < 1e-12);
        let contacts = outcome.window(Column::ContactRatio).unwrap();
        assert_eq!(contacts[5], 1.0);
        assert_eq!(contacts[4], 0.3);
    }

    #[test]
    fn keeps_only_window_rows() {
        let trajectories = vec![
            trajectory("p1", |i| 0.05 * i as f64, 20),
            trajectory("excursion", |i| if i == 3 { -0.2 } else { 0.05 * i as f64 }, 20),
        ];
        let report = classify_batch(&trajectories, &small_config(ClassifierConfig::contact_window(5, 3))).unwrap();

        let kept = report.outcomes[0].kept.as_ref().unwrap();
        assert_eq!(kept.offset, 20);
        assert_eq!(kept.len(), 9);
        assert_eq!(kept.theta.len(), 9);
        assert_eq!(kept.contact_ratio.as_ref().map(Vec::len), Some(9));

        assert_eq!(report.outcomes[1].label(), Some(PathLabel::Rejected));
        assert!(report.outcomes[1].kept.is_none());
        assert!(report.outcomes[1].window(Column::Phi).is_none());
    }

    #[test]
    fn non_finite_phi_reported_in_trajectory_frames() {
        let n = StageLayout::default().total_frames();
        let mut phi: Vec<f64> = (0..n).map(|i| 0.0001 * i as f64).collect();
        phi[2305] = f64::NAN;
        let t = TrajectoryCv {
            id: "nan".into(),
            theta: vec![1.0; n],
            phi,
            contact_ratio: Some(vec![1.0; n]),
        };
        let report = classify_batch(&[t], &BatchConfig::default()).unwrap();
        let (id, err) = report.failures().next().unwrap();
        assert_eq!(id, "nan");
        assert!(matches!(err, KinesinError::Frame { index: 2305, .. }));
        assert!(err.to_string().starts_with("frame 2305:"));
        assert!(report.outcomes[0].kept.is_none());
    }

    #[test]
    fn unwraps_stage_before_classifying() {
        // Stage phi keeps rising past π; wrapped it would look negative.
        let t = trajectory("wrap", |i| wrap_to_pi(0.15 * i as f64), 30);
        let report = classify_batch(&[t], &small_config(ClassifierConfig::contact_window(5, 3))).unwrap();
        assert_eq!(report.outcomes[0].label(), Some(PathLabel::Path1));
        let phi = report.outcomes[0].window(Column::Phi).unwrap();
        assert!(phi.iter().all(|&p| p > PI / 2.0));
    }

    #[test]
    fn mixed_batch_tally() {
        let trajectories = vec![
            trajectory("p1", |i| 0.05 * i as f64, 20),
            trajectory("early", |i| 0.05 * i as f64, 1),
            trajectory("excursion", |i| if i == 3 { -0.2 } else { 0.05 * i as f64 }, 20),
            TrajectoryCv {
                id: "misaligned".into(),
                theta: vec![0.0; 49],
                phi: vec![0.0; 50],
                contact_ratio: None,
            },
        ];
        let report = classify_batch(&trajectories, &small_config(ClassifierConfig::contact_window(5, 3))).unwrap();
        let tally = report.tally();
        assert_eq!(
            tally,
            PathTally {
                path1: 1,
                path2: 0,
                rejected: 2,
                failed: 1
            }
        );
        assert_eq!(report.windows(PathLabel::Path1, Column::Phi).len(), 1);
        let failures: Vec<&str> = report.failures().map(|(id, _)| id).collect();
        assert_eq!(failures, vec!["misaligned"]);
        assert!(report.summary().contains("4 trajectory"));
    }

    #[test]
    fn short_trajectory_fails_without_aborting() {
        let short = TrajectoryCv {
            id: "short".into(),
            theta: vec![0.0; 4],
            phi: vec![0.0; 4],
            contact_ratio: Some(vec![0.0; 4]),
        };
        let ok = trajectory("ok", |i| 0.05 * i as f64, 20);
        let report = classify_batch(&[short, ok], &small_config(ClassifierConfig::default())).unwrap();
        assert!(report.outcomes[0].result.is_err());
        assert!(report.outcomes[0].kept.is_none());
        assert_eq!(report.outcomes[1].label(), Some(PathLabel::Rejected));
    }

    #[test]
    fn dead_zone_aborts_batch() {
        let trajectories = vec![
            trajectory("fine", |i| 0.05 * i as f64, 20),
            trajectory("stuck", |i| if i == 39 { 0.0 } else { 0.5 }, 20),
        ];
        let err = classify_batch(&trajectories, &small_config(ClassifierConfig::default())).unwrap_err();
        assert!(err.is_dead_zone());
        match err {
            KinesinError::Trajectory { id, .. } => assert_eq!(id, "stuck"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn serial_run_stops_at_dead_zone() {
        let config = small_config(ClassifierConfig::default());
        let classifier = PathClassifier::new(config.classifier.clone()).unwrap();
        let trajectories = vec![
            trajectory("fine", |i| 0.05 * i as f64, 20),
            trajectory("stuck", |i| if i == 39 { 0.0 } else { 0.5 }, 20),
            trajectory("after", |i| 0.05 * i as f64, 20),
        ];
        let outcomes = classify_all(&trajectories, &config, &classifier);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[1].id, "stuck");
    }

    #[test]
    fn path2_prefix_batch() {
        let t = trajectory("down", |i| -0.1 * i as f64, 30);
        let report = classify_batch(&[t], &small_config(ClassifierConfig::contact_prefix())).unwrap();
        let sub = *report.outcomes[0].result.as_ref().unwrap().subsequence().unwrap();
        assert_eq!(report.outcomes[0].label(), Some(PathLabel::Path2));
        assert_eq!(sub.range(), 5..36);
        assert_eq!(report.outcomes[0].window(Column::Theta).unwrap().len(), 31);
    }

    #[test]
    fn invalid_classifier_config() {
        let mut cfg = small_config(ClassifierConfig::default());
        cfg.classifier.path2_below = 3.0;
        assert!(classify_batch(&[], &cfg).is_err());
    }

    #[test]
    fn empty_batch() {
        let report = classify_batch(&[], &BatchConfig::default()).unwrap();
        assert_eq!(report.tally().total(), 0);
    }
}
