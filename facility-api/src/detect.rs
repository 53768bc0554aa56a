use bytes::Bytes;
use defect_recognizer::Recognition;
use poem::{
    handler,
    web::{Data, Json, Multipart, Path},
};
use sanitation_core::{Detection, Rating};
use serde::Serialize;

use crate::{error::ApiError, state::AppState};

/// Response of the scoring endpoints.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    #[serde(flatten)]
    pub rating: Rating,
    pub method: String,
    /// The annotated picture, base64-encoded JPEG.
    pub image_base64: String,
    pub detections: Vec<Detection>,
    pub total_detections: usize,
}

/// Score a picture without touching any facility.
#[handler]
#[tracing::instrument(skip(state, multipart))]
pub async fn score_picture(
    Data(state): Data<&AppState>,
    multipart: Multipart,
) -> poem::Result<Json<ScoreReport>> {
    let picture = read_picture(multipart).await?;
    let report = score(state, picture).await?;

    Ok(Json(report))
}

/// Score a picture and store the result on the facility.
#[handler]
#[tracing::instrument(skip(state, multipart))]
pub async fn score_facility(
    Data(state): Data<&AppState>,
    Path(facility_id): Path<i64>,
    multipart: Multipart,
) -> poem::Result<Json<ScoreReport>> {
    // fail fast instead of running the model for nothing
    if state
        .store
        .get(facility_id)
        .await
        .map_err(ApiError::from)?
        .is_none()
    {
        return Err(ApiError::FacilityNotFound(facility_id).into());
    }

    let picture = read_picture(multipart).await?;
    let report = score(state, picture).await?;

    let facility = state
        .store
        .update_rating(facility_id, report.rating)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::FacilityNotFound(facility_id))?;

    tracing::info!(
        "Facility {} is now {} ({})",
        facility.id,
        facility.score(),
        facility.grade()
    );

    Ok(Json(report))
}

/// Take the `file` field of the upload.
async fn read_picture(mut multipart: Multipart) -> poem::Result<Bytes> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let picture = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read the upload: {e}")))?;

        return Ok(Bytes::from(picture));
    }

    Err(ApiError::BadRequest("missing `file` field in the upload".to_string()).into())
}

async fn score(state: &AppState, picture: Bytes) -> Result<ScoreReport, ApiError> {
    let recognition = recognize(state, picture).await?;
    let rating = state.penalties.score_detections(&recognition.detections);

    tracing::info!(
        "Scored {} ({}) from {} detections",
        rating.score(),
        rating.grade(),
        recognition.detections.len()
    );

    Ok(ScoreReport {
        rating,
        method: state.recognizer.method().to_string(),
        image_base64: recognition.annotated_base64(),
        total_detections: recognition.detections.len(),
        detections: recognition.detections,
    })
}

/// Run the model on the blocking pool, bounded by the configured timeout.
async fn recognize(state: &AppState, picture: Bytes) -> Result<Recognition, ApiError> {
    let recognizer = state.recognizer.clone();
    let task = tokio::task::spawn_blocking(move || recognizer.recognize(picture));

    match tokio::time::timeout(state.detection_timeout, task).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(e)) => Err(ApiError::Internal(format!(
            "failed to run the recognition task: {e}"
        ))),
        Err(_) => {
            tracing::warn!(
                "Recognition did not finish within {:?}",
                state.detection_timeout
            );
            Err(ApiError::DetectionTimeout(state.detection_timeout))
        }
    }
}
