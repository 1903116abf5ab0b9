//! Controller de reseñas

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::review::{
    CarRating, CreateReviewRequest, Review, ReviewWithAuthor, UpdateReviewRequest,
};
use crate::models::ApiResponse;
use crate::repositories::review_repository::ReviewRepository;
use crate::utils::errors::AppError;

/// Reseñas de un coche junto a su valoración agregada
#[derive(Debug, Serialize)]
pub struct CarReviews {
    pub rating: CarRating,
    pub reviews: Vec<ReviewWithAuthor>,
}

pub struct ReviewController {
    repository: ReviewRepository,
}

impl ReviewController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReviewRepository::new(pool),
        }
    }

    /// Crear una reseña; exige un alquiler completado del coche
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateReviewRequest,
    ) -> Result<ApiResponse<Review>, AppError> {
        request.validate()?;

        let review = self
            .repository
            .create(user.user_id, request.car_id, request.rating, request.comment)
            .await?;

        Ok(ApiResponse::success_with_message(
            review,
            "Review created successfully".to_string(),
        ))
    }

    /// Reseñas y valoración media de un coche (público)
    pub async fn by_car(&self, car_id: Uuid) -> Result<CarReviews, AppError> {
        let rating = self.repository.average_rating(car_id).await?;
        let reviews = self.repository.find_by_car(car_id).await?;

        Ok(CarReviews { rating, reviews })
    }

    /// Reseñas del usuario autenticado
    pub async fn my_reviews(&self, user: &AuthenticatedUser) -> Result<Vec<Review>, AppError> {
        self.repository.find_by_user(user.user_id).await
    }

    /// Actualizar una reseña propia
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        review_id: Uuid,
        request: UpdateReviewRequest,
    ) -> Result<ApiResponse<Review>, AppError> {
        request.validate()?;

        let review = self
            .repository
            .update(review_id, user.user_id, request.rating, request.comment)
            .await?;

        Ok(ApiResponse::success_with_message(
            review,
            "Review updated successfully".to_string(),
        ))
    }

    /// Eliminar una reseña propia
    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        review_id: Uuid,
    ) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(review_id, user.user_id).await?;

        Ok(ApiResponse::message_only(
            "Review deleted successfully".to_string(),
        ))
    }
}
