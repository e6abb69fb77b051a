use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use barberbook_core::ApplicationError;

/// Body of every non-2xx API response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

pub type ApiFailure = (StatusCode, Json<ApiError>);
pub type ApiResult<T> = Result<T, ApiFailure>;

pub fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Maps an application error onto its HTTP status and logs it under a fresh
/// correlation id.
pub fn reject(operation: &'static str, error: ApplicationError) -> ApiFailure {
    let correlation_id = correlation_id();
    let mapped = error.into_interface(correlation_id.clone());
    let status =
        StatusCode::from_u16(mapped.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(
            event_name = "api.request_failed",
            correlation_id = %correlation_id,
            operation,
            error = %mapped,
            "request failed"
        );
    } else {
        warn!(
            event_name = "api.request_rejected",
            correlation_id = %correlation_id,
            operation,
            status = status.as_u16(),
            error = %mapped,
            "request rejected"
        );
    }

    (status, Json(ApiError { error: mapped.message().to_string(), correlation_id }))
}

pub fn bad_body(operation: &'static str, rejection: JsonRejection) -> ApiFailure {
    bad_request(operation, format!("invalid JSON body: {}", rejection.body_text()))
}

pub fn bad_query(operation: &'static str, rejection: QueryRejection) -> ApiFailure {
    bad_request(operation, format!("invalid query string: {}", rejection.body_text()))
}

fn bad_request(operation: &'static str, message: String) -> ApiFailure {
    let correlation_id = correlation_id();
    warn!(
        event_name = "api.request_rejected",
        correlation_id = %correlation_id,
        operation,
        status = 400u16,
        error = %message,
        "request rejected"
    );
    (StatusCode::BAD_REQUEST, Json(ApiError { error: message, correlation_id }))
}
