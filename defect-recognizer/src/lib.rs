//! Finds sanitation defects in uploaded pictures.
//!
//! [`Recognizer`] decodes the picture, hands it to a [`Detector`], drops
//! low-confidence results and renders an annotated JPEG. The detector is a
//! capability injected at startup; [`yolo::YoloDetector`] is the ONNX one.

pub mod annotate;
pub mod recognizer;
pub mod yolo;

pub use recognizer::{Detector, RecognizeError, Recognition, Recognizer};
