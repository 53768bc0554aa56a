#![allow(dead_code)]

use std::{io::Cursor, sync::Arc, time::Duration};

use defect_recognizer::{Detector, Recognizer};
use facility_api::{database::FacilityStore, state::AppState};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use poem::{
    endpoint::BoxEndpoint,
    EndpointExt,
    test::{TestClient, TestForm, TestFormField, TestResponse},
};
use sanitation_core::{Detection, PenaltyTable};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tempfile::TempDir;

/// Returns the same detections for every picture.
pub struct StubDetector {
    detections: Vec<Detection>,
    delay: Option<Duration>,
    broken: bool,
}

impl StubDetector {
    pub fn new(labels: &[&str]) -> Self {
        let detections = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let offset = i as f32 * 4.0;
                Detection::new(*label, 0.87, [offset, offset, offset + 10.0, offset + 10.0])
            })
            .collect();

        Self {
            detections,
            delay: None,
            broken: false,
        }
    }

    pub fn with_detection(mut self, detection: Detection) -> Self {
        self.detections.push(detection);
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every inference.
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

impl Detector for StubDetector {
    fn method(&self) -> &str {
        "stub"
    }

    fn detect(&self, _: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.broken {
            anyhow::bail!("model output has an unexpected shape");
        }

        Ok(self.detections.clone())
    }
}

pub struct Harness {
    pub client: TestClient<BoxEndpoint<'static>>,
    pub store: FacilityStore,
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn harness(detector: StubDetector) -> Harness {
    harness_with(detector, Duration::from_secs(5), PenaltyTable::default()).await
}

pub async fn harness_with(
    detector: StubDetector,
    detection_timeout: Duration,
    penalties: PenaltyTable,
) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("facilities.db"))
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await.unwrap();

    let store = FacilityStore::new(pool.clone());
    store.init().await.unwrap();

    let state = AppState {
        store: store.clone(),
        recognizer: Recognizer::new(Arc::new(detector)),
        penalties: Arc::new(penalties),
        detection_timeout,
    };

    let client = TestClient::new(facility_api::app(state).map_to_response().boxed());

    Harness {
        client,
        store,
        pool,
        _dir: dir,
    }
}

pub fn png() -> Vec<u8> {
    let image = RgbImage::from_pixel(48, 48, Rgb([230, 230, 230]));
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn upload(picture: Vec<u8>) -> TestForm {
    TestForm::new().field(
        TestFormField::bytes(picture)
            .name("file")
            .filename("restroom.png")
            .content_type("image/png"),
    )
}

pub async fn json(response: TestResponse) -> serde_json::Value {
    response.0.into_body().into_json().await.unwrap()
}
