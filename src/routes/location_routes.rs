use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::location_controller::LocationController;
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::location::{CreateLocationRequest, Location, UpdateLocationRequest};
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_location_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_location))
        .route("/:id", put(update_location))
        .route("/:id", delete(delete_location))
        .layer(from_fn_with_state(state.clone(), admin_only_middleware))
        .layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_locations))
        .route("/:id", get(get_location))
        .merge(admin)
}

async fn create_location(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<ApiResponse<Location>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Location>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Location>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<Location>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
