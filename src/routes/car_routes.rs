use axum::{
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::booking_controller::{BookingController, CarAvailability};
use crate::controllers::car_controller::CarController;
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::car::{
    AvailabilityParams, Car, CarFilters, CreateCarRequest, PopularCar, UpdateCarRequest,
    UpdateCarStatusRequest,
};
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_car))
        .route("/:id", put(update_car))
        .route("/:id/status", put(update_car_status))
        .route("/:id", delete(delete_car))
        .layer(from_fn_with_state(state.clone(), admin_only_middleware))
        .layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_cars))
        .route("/available", get(available_cars))
        .route("/popular", get(popular_cars))
        .route("/:id", get(get_car))
        .route("/:id/availability", get(car_availability))
        .merge(admin)
}

async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(filters): Query<CarFilters>,
) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn available_cars(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.available(params).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct PopularParams {
    limit: Option<i64>,
}

async fn popular_cars(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Result<Json<Vec<PopularCar>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.popular(params.limit).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    start_date: String,
    end_date: String,
}

async fn car_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<AvailabilityQuery>,
) -> Result<Json<CarAvailability>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .is_available(id, &params.start_date, &params.end_date)
        .await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Car>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn update_car_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarStatusRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
