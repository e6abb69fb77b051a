//! HTTP surface.
//!
//! - `/api/customers`, `/api/services`, `/api/appointments`: JSON CRUD
//! - `/health`: collection readiness
//! - everything else: static files from the configured directory

use std::path::Path;

use axum::{routing::get, Router};
use serde::Serialize;
use tower_http::services::ServeDir;

use barberbook_db::{AppointmentScheduler, CascadeCoordinator, RecordStore, Repositories};

use crate::{appointments, customers, health, services};

#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub scheduler: AppointmentScheduler,
    pub cascade: CascadeCoordinator,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        let repositories = Repositories::from_store(store);
        let scheduler = AppointmentScheduler::new(repositories.clone());
        let cascade = CascadeCoordinator::new(repositories.clone(), scheduler.booking_lock());
        Self { repositories, scheduler, cascade }
    }
}

/// Body returned by every successful DELETE.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub success: bool,
}

impl Deleted {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/customers", get(customers::list).post(customers::create))
        .route(
            "/api/customers/{id}",
            get(customers::get).put(customers::update).delete(customers::delete),
        )
        .route("/api/services", get(services::list).post(services::create))
        .route(
            "/api/services/{id}",
            get(services::get).put(services::update).delete(services::delete),
        )
        .route("/api/appointments", get(appointments::list).post(appointments::create))
        .route(
            "/api/appointments/{id}",
            get(appointments::get).put(appointments::update).delete(appointments::delete),
        )
        .with_state(state)
}

pub fn router(store: RecordStore, static_dir: &Path) -> Router {
    api_router(AppState::new(store.clone()))
        .merge(health::router(store))
        .fallback_service(ServeDir::new(static_dir))
}
