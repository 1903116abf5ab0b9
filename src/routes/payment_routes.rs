use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::payment_controller::PaymentController;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::payment::{
    CreatePaymentRequest, Payment, PaymentDetail, UpdatePaymentStatusRequest,
};
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_payment_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/:id/status", put(update_payment_status))
        .layer(from_fn_with_state(state.clone(), admin_only_middleware))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", post(create_payment))
        .route("/:id", get(get_payment))
        .route("/booking/:booking_id", get(payments_by_booking))
        .layer(from_fn_with_state(state, auth_middleware))
        .merge(admin)
}

async fn create_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let controller = PaymentController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn get_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentDetail>, AppError> {
    let controller = PaymentController::new(state.pool.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn payments_by_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let controller = PaymentController::new(state.pool.clone());
    let response = controller.by_booking(&user, booking_id).await?;
    Ok(Json(response))
}

async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PaymentController::new(state.pool.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}
