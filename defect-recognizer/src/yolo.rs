use anyhow::Context as _;
use image::DynamicImage;
use ort::execution_providers::{CUDAExecutionProvider, CoreMLExecutionProvider};
use sanitation_core::Detection;
use yolo_rs::{BoundingBox, image_to_yolo_input_tensor, inference, model::YoloModelSession};

use crate::recognizer::Detector;

pub const YOLO_METHOD: &str = "YOLOv8 ONNX";

/// Initialize the ONNX runtime. Call once, before loading any model.
pub fn init_runtime() -> anyhow::Result<()> {
    ort::init()
        .with_execution_providers([
            CUDAExecutionProvider::default().build(),
            CoreMLExecutionProvider::default().build(),
        ])
        .commit()
        .context("failed to initialize ONNX runtime")?;

    Ok(())
}

/// A YOLOv8 model exported to ONNX.
pub struct YoloDetector {
    session: YoloModelSession,
}

impl YoloDetector {
    #[tracing::instrument]
    pub fn load(model_path: &str) -> anyhow::Result<Self> {
        let session = YoloModelSession::from_filename_v8(model_path)
            .map_err(|e| anyhow::anyhow!("failed to load YOLO model from {model_path}: {e:?}"))?;

        tracing::info!("Loaded YOLO model");

        Ok(Self { session })
    }
}

impl Detector for YoloDetector {
    fn method(&self) -> &str {
        YOLO_METHOD
    }

    fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        let yolo_input = image_to_yolo_input_tensor(image);
        let yolo_output = inference(&self.session, yolo_input.view())
            .map_err(|e| anyhow::anyhow!("failed to run inference: {e:?}"))?;

        tracing::debug!("Model returned {} entities", yolo_output.len());

        let detections = yolo_output
            .into_iter()
            .map(|entity| {
                let BoundingBox { x1, x2, y1, y2 } = entity.bounding_box;

                Detection::new(
                    entity.label.to_string(),
                    entity.confidence,
                    [x1 as f32, y1 as f32, x2 as f32, y2 as f32],
                )
            })
            .collect();

        Ok(detections)
    }
}
