use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use barberbook_core::{
    ApplicationError, Customer, CustomerId, CustomerPatch, DomainError, EntityKind, NewCustomer,
};

use crate::error::{bad_body, reject, ApiResult};
use crate::routes::{AppState, Deleted};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    let customers = state
        .repositories
        .customers
        .list()
        .await
        .map_err(|error| reject("customers.list", error.into()))?;
    Ok(Json(customers))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    let id = CustomerId::from(id);
    let found = state
        .repositories
        .customers
        .find_by_id(&id)
        .await
        .map_err(|error| reject("customers.get", error.into()))?;
    found.map(Json).ok_or_else(|| reject("customers.get", missing(&id)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let Json(input) = payload.map_err(|rejection| bad_body("customers.create", rejection))?;
    let customer = state
        .repositories
        .customers
        .create(input)
        .await
        .map_err(|error| reject("customers.create", error.into()))?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerPatch>, JsonRejection>,
) -> ApiResult<Json<Customer>> {
    let Json(patch) = payload.map_err(|rejection| bad_body("customers.update", rejection))?;
    let id = CustomerId::from(id);
    let updated = state
        .repositories
        .customers
        .update(&id, patch)
        .await
        .map_err(|error| reject("customers.update", error.into()))?;
    updated.map(Json).ok_or_else(|| reject("customers.update", missing(&id)))
}

/// Deletes the customer and every appointment booked for them.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let id = CustomerId::from(id);
    state.cascade.delete_customer(&id).await.map_err(|error| reject("customers.delete", error))?;
    Ok(Json(Deleted::ok()))
}

fn missing(id: &CustomerId) -> ApplicationError {
    DomainError::not_found(EntityKind::Customer, id.as_str()).into()
}
