use serde::Serialize;

use crate::scoring::{PenaltyTable, Rating};

/// One object found in an uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub label: String,
    /// In `[0, 1]`.
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` in pixels of the source image.
    pub bbox: [f32; 4],
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: [f32; 4]) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

impl PenaltyTable {
    pub fn score_detections(&self, detections: &[Detection]) -> Rating {
        self.score(detections.iter().map(|detection| detection.label.as_str()))
    }
}
