//! Splitting a concatenated trajectory into its simulation stages.

use kinesin_core::{KinesinError, Result};

/// Frame counts of the five concatenated simulation stages.
pub const DEFAULT_STAGE_LENGTHS: [usize; 5] = [2000, 300, 20000, 300, 20000];

/// Zero-based index of the stage that is classified by default.
pub const DEFAULT_ANALYZED_STAGE: usize = 2;

/// Consecutive stage lengths, in frames.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<usize>", into = "Vec<usize>"))]
pub struct StageLayout {
    lengths: Vec<usize>,
}

impl TryFrom<Vec<usize>> for StageLayout {
    type Error = KinesinError;

    fn try_from(lengths: Vec<usize>) -> Result<Self> {
        StageLayout::new(lengths)
    }
}

impl From<StageLayout> for Vec<usize> {
    fn from(layout: StageLayout) -> Self {
        layout.lengths
    }
}

impl Default for StageLayout {
    fn default() -> Self {
        Self {
            lengths: DEFAULT_STAGE_LENGTHS.to_vec(),
        }
    }
}

/// Frames `[start, end)` of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageWindow {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl StageWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Rows of `data` inside this stage, or `None` if `data` is too short.
    pub fn slice<'a, T>(&self, data: &'a [T]) -> Option<&'a [T]> {
        data.get(self.start..self.end)
    }
}

impl StageLayout {
    /// A layout from stage lengths.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no stages or any stage is empty.
    pub fn new(lengths: Vec<usize>) -> Result<Self> {
        if lengths.is_empty() {
            return Err(KinesinError::InvalidInput(
                "stage layout needs at least one stage".into(),
            ));
        }
        if let Some(i) = lengths.iter().position(|&l| l == 0) {
            return Err(KinesinError::InvalidInput(format!(
                "stage {} has zero length",
                i
            )));
        }
        Ok(Self { lengths })
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn stage_count(&self) -> usize {
        self.lengths.len()
    }

    /// Total frames the layout expects.
    pub fn total_frames(&self) -> usize {
        self.lengths.iter().sum()
    }

    /// Every stage window, clipped to `n_frames`.
    ///
    /// Stages past the end of a short trajectory come back empty; frames past
    /// the last stage are not covered.
    pub fn split(&self, n_frames: usize) -> Vec<StageWindow> {
        let mut start = 0;
        self.lengths
            .iter()
            .enumerate()
            .map(|(index, &len)| {
                let s = start.min(n_frames);
                let e = (start + len).min(n_frames);
                start += len;
                StageWindow {
                    index,
                    start: s,
                    end: e,
                }
            })
            .collect()
    }

    /// One stage window, clipped to `n_frames`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not a stage of this layout or the stage
    /// starts at or after the end of the trajectory.
    pub fn stage(&self, index: usize, n_frames: usize) -> Result<StageWindow> {
        if index >= self.lengths.len() {
            return Err(KinesinError::InvalidInput(format!(
                "stage {} out of range for a layout of {} stages",
                index,
                self.lengths.len()
            )));
        }
        let start: usize = self.lengths[..index].iter().sum();
        if start >= n_frames {
            return Err(KinesinError::InvalidInput(format!(
                "stage {} starts at frame {} but the trajectory has {} frames",
                index, start, n_frames
            )));
        }
        Ok(StageWindow {
            index,
            start,
            end: (start + self.lengths[index]).min(n_frames),
        })
    }
}
