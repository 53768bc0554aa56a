use std::time::Duration;

use defect_recognizer::RecognizeError;
use poem::{error::ResponseError, http::StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("facility {0} not found")]
    FacilityNotFound(i64),
    #[error("detection did not finish within {0:?}")]
    DetectionTimeout(Duration),
    #[error(transparent)]
    Recognize(#[from] RecognizeError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FacilityNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DetectionTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Recognize(RecognizeError::Decode(_)) => StatusCode::BAD_REQUEST,
            ApiError::Recognize(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
