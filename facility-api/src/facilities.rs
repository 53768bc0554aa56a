use poem::{
    handler,
    web::{Data, Json, Path},
};
use sanitation_core::{Facility, NearbyFacility, NewFacility, nearby};

use crate::{error::ApiError, state::AppState};

#[handler]
#[tracing::instrument(skip(state))]
pub async fn list_facilities(Data(state): Data<&AppState>) -> poem::Result<Json<Vec<Facility>>> {
    let facilities = state.store.list().await.map_err(ApiError::from)?;

    Ok(Json(facilities))
}

#[handler]
#[tracing::instrument(skip(state))]
pub async fn get_facility(
    Data(state): Data<&AppState>,
    Path(facility_id): Path<i64>,
) -> poem::Result<Json<Facility>> {
    let facility = state
        .store
        .get(facility_id)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::FacilityNotFound(facility_id))?;

    Ok(Json(facility))
}

#[handler]
#[tracing::instrument(skip(state))]
pub async fn create_facility(
    Data(state): Data<&AppState>,
    Json(new_facility): Json<NewFacility>,
) -> poem::Result<Json<Facility>> {
    let facility = state
        .store
        .create(new_facility)
        .await
        .map_err(ApiError::from)?;

    tracing::info!("Created facility {} ({})", facility.id, facility.name);
    Ok(Json(facility))
}

/// Unknown ids give an empty list, not a 404.
#[handler]
#[tracing::instrument(skip(state))]
pub async fn nearby_facilities(
    Data(state): Data<&AppState>,
    Path(facility_id): Path<i64>,
) -> poem::Result<Json<Vec<NearbyFacility>>> {
    let facilities = state.store.list().await.map_err(ApiError::from)?;
    let ranked = nearby(facility_id, &facilities);

    tracing::debug!("Ranked {} facilities near {facility_id}", ranked.len());
    Ok(Json(ranked))
}
