use axum::{
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::{BookingController, CreatedBooking};
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::booking::{
    BookingDetail, BookingFilters, CreateBookingRequest, PriceQuote, PriceQuoteParams,
    UpdateBookingStatusRequest,
};
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_bookings))
        .layer(from_fn_with_state(state.clone(), admin_only_middleware))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let protected = Router::new()
        .route("/", post(create_booking))
        .route("/my-bookings", get(my_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/status", put(update_booking_status))
        .layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/price-quote", get(price_quote))
        .merge(protected)
        .merge(admin)
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<CreatedBooking>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingDetail>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingDetail>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.my_bookings(&user).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetail>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.update_status(&user, id, &request.status).await?;
    Ok(Json(response))
}

async fn price_quote(
    State(state): State<AppState>,
    Query(params): Query<PriceQuoteParams>,
) -> Result<Json<PriceQuote>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.price_quote(params).await?;
    Ok(Json(response))
}
