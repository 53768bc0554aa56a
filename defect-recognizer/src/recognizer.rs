use std::{io::Cursor, sync::Arc};

use bytes::Bytes;
use image::{DynamicImage, ImageReader};
use sanitation_core::Detection;

use crate::annotate;

/// Confidence below which detections are discarded.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// An object detection model, loaded once and shared between requests.
///
/// Implementations are called from a blocking thread.
pub trait Detector: Send + Sync {
    /// Short description reported as the scoring method.
    fn method(&self) -> &str;

    fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizeError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to run detection: {0:#}")]
    Inference(anyhow::Error),
    #[error("failed to encode annotated image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Result of recognizing one picture.
#[derive(Debug, Clone)]
pub struct Recognition {
    pub detections: Vec<Detection>,
    /// The picture with detections drawn on it, JPEG.
    pub annotated: Bytes,
}

impl Recognition {
    pub fn annotated_base64(&self) -> String {
        annotate::to_base64(&self.annotated)
    }
}

#[derive(Clone)]
pub struct Recognizer {
    detector: Arc<dyn Detector>,
    confidence_threshold: f32,
}

impl Recognizer {
    pub fn new(detector: Arc<dyn Detector>) -> Self {
        Self {
            detector,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_confidence_threshold(mut self, confidence_threshold: f32) -> Self {
        self.confidence_threshold = confidence_threshold;
        self
    }

    pub fn method(&self) -> &str {
        self.detector.method()
    }

    #[tracing::instrument(skip(self, picture), fields(size = picture.len()))]
    pub fn recognize(&self, picture: Bytes) -> Result<Recognition, RecognizeError> {
        tracing::info!("Recognizing picture…");

        let image_reader = ImageReader::new(Cursor::new(picture))
            .with_guessed_format()
            .map_err(|e| RecognizeError::Decode(image::ImageError::IoError(e)))?;

        let image = image_reader.decode().map_err(RecognizeError::Decode)?;

        let detections: Vec<Detection> = self
            .detector
            .detect(&image)
            .map_err(RecognizeError::Inference)?
            .into_iter()
            .filter(|detection| detection.confidence >= self.confidence_threshold)
            .collect();

        let canvas = annotate::draw_detections(&image, &detections);
        let annotated = annotate::encode_jpeg(&canvas).map_err(RecognizeError::Encode)?;

        tracing::info!("Recognized! Found {} defects.", detections.len());

        Ok(Recognition {
            detections,
            annotated: Bytes::from(annotated),
        })
    }
}
