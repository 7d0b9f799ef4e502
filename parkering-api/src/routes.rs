//! Axum router and handlers.
//!
//! Handlers only translate between JSON and [`ParkingService`] calls.
//! Body rejections are taken as `Result` so they become 400 responses in the
//! common error format instead of axum's default 422.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use validator::Validate;

use parkering_core::PoolError;
use parkering_telemetry::MetricsRecorder;

use crate::dto::{
    AllocatedSlotResponse, ClearSlotRequest, CreateLotRequest, ExpandLotRequest,
    FreedSlotResponse, ParkCarRequest, SlotNumberResponse, SlotStatus, StatisticsResponse,
    TotalSlotResponse,
};
use crate::error::ApiError;
use crate::service::ParkingService;

pub fn router(service: ParkingService) -> Router {
    Router::new()
        .route(
            "/parking_lot",
            post(create_parking_lot).patch(expand_parking_lot),
        )
        .route("/park", post(park_car))
        .route("/clear", post(clear_slot))
        .route("/status", get(status))
        .route(
            "/registration_numbers/:color",
            get(registration_numbers_by_color),
        )
        .route("/slot_numbers/:color", get(slot_numbers_by_color))
        .route(
            "/slot_number/:registration_number",
            get(slot_number_by_registration),
        )
        .route("/statistics", get(statistics))
        .with_state(service)
}

/// `GET /metrics` in prometheus text format.
pub fn metrics_router(metrics: MetricsRecorder) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(metrics)
}

async fn create_parking_lot(
    State(service): State<ParkingService>,
    payload: Result<Json<CreateLotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TotalSlotResponse>), ApiError> {
    let Json(request) = payload?;
    let total_slot = service.create_lot(request.no_of_slot)?;
    Ok((StatusCode::CREATED, Json(TotalSlotResponse { total_slot })))
}

async fn expand_parking_lot(
    State(service): State<ParkingService>,
    payload: Result<Json<ExpandLotRequest>, JsonRejection>,
) -> Result<Json<TotalSlotResponse>, ApiError> {
    let Json(request) = payload?;
    let total_slot = service.expand_lot(request.increment_slot)?;
    Ok(Json(TotalSlotResponse { total_slot }))
}

async fn park_car(
    State(service): State<ParkingService>,
    payload: Result<Json<ParkCarRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AllocatedSlotResponse>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    let allocated_slot_number = service.park(&request.car_reg_no, &request.car_color)?;
    Ok((
        StatusCode::CREATED,
        Json(AllocatedSlotResponse {
            allocated_slot_number,
        }),
    ))
}

async fn clear_slot(
    State(service): State<ParkingService>,
    payload: Result<Json<ClearSlotRequest>, JsonRejection>,
) -> Result<Json<FreedSlotResponse>, ApiError> {
    let Json(request) = payload?;
    let freed_slot_number = service.clear(request.into_selector()?)?;
    Ok(Json(FreedSlotResponse { freed_slot_number }))
}

async fn status(State(service): State<ParkingService>) -> Result<Json<Vec<SlotStatus>>, ApiError> {
    Ok(Json(service.status()?))
}

async fn registration_numbers_by_color(
    State(service): State<ParkingService>,
    color: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Path(color) = color?;
    Ok(Json(service.registrations_by_color(&color)?))
}

/// Slot numbers are returned as strings, e.g. `["1", "3"]`.
async fn slot_numbers_by_color(
    State(service): State<ParkingService>,
    color: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Path(color) = color?;
    let slots = service.slots_by_color(&color)?;
    Ok(Json(slots.iter().map(ToString::to_string).collect()))
}

async fn slot_number_by_registration(
    State(service): State<ParkingService>,
    registration: Result<Path<String>, PathRejection>,
) -> Result<Json<SlotNumberResponse>, ApiError> {
    let Path(registration) = registration?;
    let slot_number = service
        .slot_for_registration(&registration)
        .map_err(|err| match err {
            PoolError::KeyNotFound(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Pool(other),
        })?;
    Ok(Json(SlotNumberResponse { slot_number }))
}

async fn statistics(
    State(service): State<ParkingService>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    Ok(Json(service.statistics()?.into()))
}

async fn render_metrics(State(metrics): State<MetricsRecorder>) -> impl IntoResponse {
    match metrics.gather_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(%err, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
