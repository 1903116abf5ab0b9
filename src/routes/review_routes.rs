use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::review_controller::{CarReviews, ReviewController};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::review::{CreateReviewRequest, Review, UpdateReviewRequest};
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_review_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_review))
        .route("/my-reviews", get(my_reviews))
        .route("/:id", put(update_review))
        .route("/:id", delete(delete_review))
        .layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/car/:car_id", get(reviews_by_car))
        .merge(protected)
}

async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<Json<ApiResponse<Review>>, AppError> {
    let controller = ReviewController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn reviews_by_car(
    State(state): State<AppState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<CarReviews>, AppError> {
    let controller = ReviewController::new(state.pool.clone());
    let response = controller.by_car(car_id).await?;
    Ok(Json(response))
}

async fn my_reviews(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Review>>, AppError> {
    let controller = ReviewController::new(state.pool.clone());
    let response = controller.my_reviews(&user).await?;
    Ok(Json(response))
}

async fn update_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<ApiResponse<Review>>, AppError> {
    let controller = ReviewController::new(state.pool.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ReviewController::new(state.pool.clone());
    let response = controller.delete(&user, id).await?;
    Ok(Json(response))
}
