use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use barberbook_core::{
    ApplicationError, DomainError, EntityKind, NewService, Service, ServiceId, ServicePatch,
};

use crate::error::{bad_body, reject, ApiResult};
use crate::routes::{AppState, Deleted};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Service>>> {
    let services = state
        .repositories
        .services
        .list()
        .await
        .map_err(|error| reject("services.list", error.into()))?;
    Ok(Json(services))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Service>> {
    let id = ServiceId::from(id);
    let found = state
        .repositories
        .services
        .find_by_id(&id)
        .await
        .map_err(|error| reject("services.get", error.into()))?;
    found.map(Json).ok_or_else(|| reject("services.get", missing(&id)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewService>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Service>)> {
    let Json(input) = payload.map_err(|rejection| bad_body("services.create", rejection))?;
    let service = state
        .repositories
        .services
        .create(input)
        .await
        .map_err(|error| reject("services.create", error.into()))?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ServicePatch>, JsonRejection>,
) -> ApiResult<Json<Service>> {
    let Json(patch) = payload.map_err(|rejection| bad_body("services.update", rejection))?;
    let id = ServiceId::from(id);
    let updated = state
        .repositories
        .services
        .update(&id, patch)
        .await
        .map_err(|error| reject("services.update", error.into()))?;
    updated.map(Json).ok_or_else(|| reject("services.update", missing(&id)))
}

/// Deletes the service and every appointment booked for it.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let id = ServiceId::from(id);
    state.cascade.delete_service(&id).await.map_err(|error| reject("services.delete", error))?;
    Ok(Json(Deleted::ok()))
}

fn missing(id: &ServiceId) -> ApplicationError {
    DomainError::not_found(EntityKind::Service, id.as_str()).into()
}
