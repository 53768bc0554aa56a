mod common;

use std::time::Duration;

use common::{StubDetector, harness, harness_with, json, png, upload};
use poem::{
    http::StatusCode,
    test::{TestForm, TestFormField},
};
use sanitation_core::{Detection, PenaltyTable};

#[tokio::test]
async fn scores_an_upload() {
    let harness = harness(StubDetector::new(&["dirty", "urine_stain", "trash"])).await;

    let response = harness.client.post("/detect").multipart(upload(png())).send().await;
    response.assert_status_is_ok();

    let report = json(response).await;
    assert_eq!(report["score"], 50);
    assert_eq!(report["grade"], "D");
    assert_eq!(report["method"], "stub");
    assert_eq!(report["total_detections"], 3);
    assert_eq!(report["detections"][0]["class"], "dirty");
    assert_eq!(report["detections"][2]["bbox"].as_array().unwrap().len(), 4);
    assert!(!report["image_base64"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn score_route_matches_detect() {
    let harness = harness(StubDetector::new(&[])).await;

    let report = json(harness.client.post("/score").multipart(upload(png())).send().await).await;
    assert_eq!(report["score"], 100);
    assert_eq!(report["grade"], "A");
    assert_eq!(report["total_detections"], 0);
    assert_eq!(report["detections"], serde_json::json!([]));
}

#[tokio::test]
async fn score_is_floored_at_zero() {
    let harness = harness(StubDetector::new(&["dirty"; 10])).await;

    let report = json(harness.client.post("/detect").multipart(upload(png())).send().await).await;
    assert_eq!(report["score"], 0);
    assert_eq!(report["grade"], "F");
}

#[tokio::test]
async fn low_confidence_detections_are_ignored() {
    let detector =
        StubDetector::new(&["cup"]).with_detection(Detection::new("dirty", 0.12, [0.0, 0.0, 5.0, 5.0]));
    let harness = harness(detector).await;

    let report = json(harness.client.post("/detect").multipart(upload(png())).send().await).await;
    assert_eq!(report["score"], 92);
    assert_eq!(report["total_detections"], 1);
}

#[tokio::test]
async fn scoring_a_facility_stores_the_rating() {
    let harness = harness(StubDetector::new(&["dirty"])).await;

    let response = harness
        .client
        .post("/detect/2")
        .multipart(upload(png()))
        .send()
        .await;
    response.assert_status_is_ok();
    let report = json(response).await;
    assert_eq!(report["score"], 80);
    assert_eq!(report["grade"], "B");

    let facility = harness.store.get(2).await.unwrap().unwrap();
    assert_eq!(facility.score(), 80);
    assert_eq!(facility.grade().as_str(), "B");

    let listed = json(harness.client.get("/facilities/2").send().await).await;
    assert_eq!(listed["score"], 80);
    assert_eq!(listed["grade"], "B");
}

#[tokio::test]
async fn plain_scoring_leaves_facilities_alone() {
    let harness = harness(StubDetector::new(&["dirty", "dirty"])).await;

    harness
        .client
        .post("/score")
        .multipart(upload(png()))
        .send()
        .await
        .assert_status_is_ok();

    let facility = harness.store.get(1).await.unwrap().unwrap();
    assert_eq!(facility.score(), 92);
}

#[tokio::test]
async fn scoring_an_unknown_facility_is_not_found() {
    let harness = harness(StubDetector::new(&["dirty"])).await;

    harness
        .client
        .post("/score/999")
        .multipart(upload(png()))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn corrupt_pictures_are_rejected() {
    let harness = harness(StubDetector::new(&["dirty"])).await;

    harness
        .client
        .post("/detect/1")
        .multipart(upload(b"\x89PNG but not really".to_vec()))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // nothing was written
    let facility = harness.store.get(1).await.unwrap().unwrap();
    assert_eq!(facility.score(), 92);
}

#[tokio::test]
async fn detector_failure_is_a_server_error() {
    let harness = harness(StubDetector::new(&["dirty"]).broken()).await;

    harness
        .client
        .post("/detect/1")
        .multipart(upload(png()))
        .send()
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let facility = harness.store.get(1).await.unwrap().unwrap();
    assert_eq!(facility.score(), 92);
}

#[tokio::test]
async fn failed_rating_write_hides_the_score() {
    let harness = harness(StubDetector::new(&["dirty"])).await;
    sqlx::query(
        "CREATE TRIGGER frozen BEFORE UPDATE ON facilities BEGIN SELECT RAISE(ABORT, 'facilities are read-only'); END",
    )
    .execute(&harness.pool)
    .await
    .unwrap();

    let response = harness
        .client
        .post("/detect/1")
        .multipart(upload(png()))
        .send()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.0.into_body().into_string().await.unwrap();
    assert!(!body.contains("image_base64"));
    assert!(!body.contains("\"score\""));

    let facility = harness.store.get(1).await.unwrap().unwrap();
    assert_eq!(facility.score(), 92);
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let harness = harness(StubDetector::new(&[])).await;

    let form = TestForm::new().field(TestFormField::text("hello").name("comment"));

    harness
        .client
        .post("/detect")
        .multipart(form)
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stalled_detection_times_out() {
    let detector = StubDetector::new(&["dirty"]).slow(Duration::from_millis(500));
    let harness = harness_with(detector, Duration::from_millis(20), PenaltyTable::default()).await;

    harness
        .client
        .post("/detect/3")
        .multipart(upload(png()))
        .send()
        .await
        .assert_status(StatusCode::GATEWAY_TIMEOUT);

    let facility = harness.store.get(3).await.unwrap().unwrap();
    assert_eq!(facility.score(), 81);
}

#[tokio::test]
async fn configured_penalties_apply() {
    let penalties = PenaltyTable::default()
        .with_overrides([("graffiti".to_string(), 45)])
        .with_default_penalty(1);
    let harness = harness_with(
        StubDetector::new(&["graffiti", "person"]),
        Duration::from_secs(5),
        penalties,
    )
    .await;

    let report = json(harness.client.post("/detect").multipart(upload(png())).send().await).await;
    assert_eq!(report["score"], 54);
    assert_eq!(report["grade"], "D");
}
