use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use barberbook_core::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentPatch, AppointmentRequest,
    AppointmentView,
};

use crate::error::{bad_body, bad_query, reject, ApiResult};
use crate::routes::{AppState, Deleted};

/// `GET /api/appointments?date=YYYY-MM-DD&customerId=...`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<AppointmentFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<AppointmentView>>> {
    let Query(filter) = query.map_err(|rejection| bad_query("appointments.list", rejection))?;
    let rows =
        state.scheduler.list(&filter).await.map_err(|error| reject("appointments.list", error))?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    let appointment = state
        .scheduler
        .get(&AppointmentId::from(id))
        .await
        .map_err(|error| reject("appointments.get", error))?;
    Ok(Json(appointment))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<AppointmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let Json(request) =
        payload.map_err(|rejection| bad_body("appointments.create", rejection))?;
    let appointment = state
        .scheduler
        .create(request)
        .await
        .map_err(|error| reject("appointments.create", error))?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentPatch>, JsonRejection>,
) -> ApiResult<Json<Appointment>> {
    let Json(patch) = payload.map_err(|rejection| bad_body("appointments.update", rejection))?;
    let appointment = state
        .scheduler
        .update(&AppointmentId::from(id), patch)
        .await
        .map_err(|error| reject("appointments.update", error))?;
    Ok(Json(appointment))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    state
        .scheduler
        .delete(&AppointmentId::from(id))
        .await
        .map_err(|error| reject("appointments.delete", error))?;
    Ok(Json(Deleted::ok()))
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        Json,
    };
    use rust_decimal::Decimal;

    use barberbook_core::{
        AppointmentFilter, AppointmentPatch, AppointmentRequest, Customer, NewCustomer,
        NewService, Service,
    };
    use barberbook_db::{connect_in_memory, provision};

    use super::{create, delete, get, list, update};
    use crate::routes::AppState;

    async fn seeded() -> (State<AppState>, Customer, Service) {
        let (store, _) = connect_in_memory();
        provision(&store).await.expect("provision");
        let state = AppState::new(store);

        let customer = state
            .repositories
            .customers
            .create(NewCustomer { name: Some("Test User".to_string()), ..NewCustomer::default() })
            .await
            .expect("customer");
        let service = state
            .repositories
            .services
            .create(NewService {
                title: Some("Cut".to_string()),
                duration_min: Some(30),
                price: Some(Decimal::new(15, 0)),
            })
            .await
            .expect("service");
        (State(state), customer, service)
    }

    fn booking(customer: &Customer, service: &Service, time: &str) -> AppointmentRequest {
        AppointmentRequest {
            customer_id: Some(customer.id.clone()),
            service_id: Some(service.id.clone()),
            appointment_date: Some("2025-04-20".to_string()),
            start_time: Some(time.to_string()),
        }
    }

    #[tokio::test]
    async fn unknown_customer_on_create_is_a_bad_request() {
        let (state, customer, service) = seeded().await;
        let request = AppointmentRequest {
            customer_id: Some("ghost".into()),
            ..booking(&customer, &service, "10:00")
        };

        let (status, Json(body)) = create(state, Ok(Json(request))).await.expect_err("rejected");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Customer not found");
    }

    #[tokio::test]
    async fn moving_onto_a_booked_slot_is_a_conflict() {
        let (state, customer, service) = seeded().await;
        let (_, Json(first)) =
            create(state.clone(), Ok(Json(booking(&customer, &service, "10:00"))))
                .await
                .expect("first");
        create(state.clone(), Ok(Json(booking(&customer, &service, "11:00"))))
            .await
            .expect("second");

        let patch =
            AppointmentPatch { start_time: Some("11:00".to_string()), ..Default::default() };
        let (status, _) = update(state.clone(), Path(first.id.to_string()), Ok(Json(patch)))
            .await
            .expect_err("conflict");
        assert_eq!(status, StatusCode::CONFLICT);

        let Json(unchanged) = get(state, Path(first.id.to_string())).await.expect("get");
        assert_eq!(unchanged.start_time.to_string(), "10:00");
    }

    #[tokio::test]
    async fn list_filters_by_customer_and_delete_is_idempotent() {
        let (state, customer, service) = seeded().await;
        let (_, Json(booked)) =
            create(state.clone(), Ok(Json(booking(&customer, &service, "09:00"))))
                .await
                .expect("create");

        let filter =
            AppointmentFilter { date: None, customer_id: Some("someone-else".to_string()) };
        let Json(rows) = list(state.clone(), Ok(Query(filter))).await.expect("list");
        assert!(rows.is_empty());

        let filter =
            AppointmentFilter { date: None, customer_id: Some(customer.id.to_string()) };
        let Json(rows) = list(state.clone(), Ok(Query(filter))).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].service_title.as_deref(), Some("Cut"));

        for _ in 0..2 {
            let Json(body) =
                delete(state.clone(), Path(booked.id.to_string())).await.expect("delete");
            assert!(body.success);
        }
        let (status, _) = get(state, Path(booked.id.to_string())).await.expect_err("gone");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
