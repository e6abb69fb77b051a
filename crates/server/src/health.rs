use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use barberbook_db::{Collection, RecordStore};

#[derive(Clone)]
pub struct HealthState {
    store: RecordStore,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub storage: HealthCheck,
    pub checked_at: String,
}

pub fn router(store: RecordStore) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { store })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = storage_check(&state.store).await;
    let ready = storage.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "barberbook-server runtime initialized".to_string(),
        },
        storage,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn storage_check(store: &RecordStore) -> HealthCheck {
    let mut counts = Vec::with_capacity(Collection::ALL.len());
    for collection in Collection::ALL {
        match store.probe(collection).await {
            Ok(count) => counts.push(format!("{collection}={count}")),
            Err(error) => {
                return HealthCheck {
                    status: "degraded",
                    detail: format!("collection check failed: {error}"),
                };
            }
        }
    }

    HealthCheck { status: "ready", detail: format!("collections readable ({})", counts.join(", ")) }
}
