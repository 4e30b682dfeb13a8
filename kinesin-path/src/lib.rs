//! Transition-path classification of kinesin stalk orientation trajectories.
//!
//! - **Configuration** — thresholds and branch rules in [`config`]
//! - **Classifier** — the path state machine in [`classify`]
//! - **Stages** — splitting concatenated simulation stages in [`stage`]
//! - **Batches** — many trajectories at once in [`batch`]
//! - **Aggregation** — per-step statistics over kept windows in [`aggregate`]
//!
//! # Quick start
//!
//! ```
//! use kinesin_path::{classify, ClassifierConfig, PathLabel};
//!
//! let phi: Vec<f64> = (0..100).map(|i| 0.03 * i as f64).collect();
//! let contacts: Vec<f64> = (0..100).map(|i| if i >= 60 { 1.0 } else { 0.4 }).collect();
//!
//! let outcome = classify(&phi, Some(&contacts[..]), &ClassifierConfig::contact_window(50, 20)).unwrap();
//! assert_eq!(outcome.label(), PathLabel::Path1);
//! assert_eq!(outcome.subsequence().unwrap().range(), 10..81);
//! ```

pub mod aggregate;
pub mod batch;
pub mod classify;
pub mod config;
pub mod stage;

pub use aggregate::{summarize_steps, StepSummary};
pub use batch::{
    classify_batch, classify_trajectory, BatchConfig, BatchReport, Column, KeptRows, PathTally,
    TrajectoryCv, TrajectoryOutcome,
};
pub use classify::{
    classify, Classification, PathClassifier, PathLabel, RejectReason, Subsequence,
};
pub use config::{Activation, BranchRule, ClassifierConfig, WindowPolicy};
pub use stage::{StageLayout, StageWindow};

#[cfg(test)]
mod tests {
    use super::*;
    use kinesin_core::Summarizable;
    use kinesin_frame::{angle_series, FrameMarkers, Vector3};

    /// Markers for a stalk swinging from azimuth `start` by `rate` rad/frame.
    fn swinging_stalk(n: usize, start: f64, rate: f64) -> Vec<FrameMarkers> {
        let plane = [
            Vector3::new(0.0, 30.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(30.0, 0.0, 0.0),
        ];
        (0..n)
            .map(|i| {
                let a = start + rate * i as f64;
                let top = Vector3::new(0.0, 0.0, 50.0);
                let bottom = Vector3::new(8.0 * a.cos(), 8.0 * a.sin(), 45.0);
                FrameMarkers::new(top, bottom, plane)
            })
            .collect()
    }

    #[test]
    fn integration_markers_to_summary() {
        let config = BatchConfig {
            stages: StageLayout::new(vec![10, 120]).unwrap(),
            analyzed_stage: 1,
            classifier: ClassifierConfig::contact_window(20, 10),
        };

        let mut trajectories = Vec::new();
        for (k, contact_at) in [40usize, 60, 80].into_iter().enumerate() {
            // crosses +π around frame 100, which only unwrapping keeps positive
            let angles = angle_series(&swinging_stalk(130, 0.1, 0.03)).unwrap();
            let contacts = (0..130)
                .map(|i| if i >= 10 + contact_at { 1.0 } else { 0.2 })
                .collect();
            trajectories.push(TrajectoryCv::new(format!("run-{k}"), angles, Some(contacts)));
        }
        let backwards = angle_series(&swinging_stalk(130, -0.1, -0.03)).unwrap();
        trajectories.push(TrajectoryCv::new("backwards", backwards, Some(vec![1.0; 130])));

        let report = classify_batch(&trajectories, &config).unwrap();
        let tally = report.tally();
        assert_eq!(tally.path1, 3);
        assert_eq!(tally.rejected, 1);
        assert!(report.summary().contains("3 path1"));

        let windows = report.windows(PathLabel::Path1, Column::Phi);
        assert_eq!(windows.len(), 3);
        assert!(windows.iter().all(|w| w.len() == 31));

        let steps = summarize_steps(&windows, 10.0, None).unwrap();
        assert_eq!(steps.len(), 31);
        assert!(steps.iter().all(|s| s.count == 3 && s.lower <= s.median && s.median <= s.upper));
        // windows start at different phases of the same swing
        assert!(steps[0].upper - steps[0].lower > 0.5);
    }
}
