//! Modelo de Review
//!
//! Solo se puede reseñar un coche tras completar un alquiler, y una única
//! vez por usuario y coche.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Review principal - mapea exactamente a la tabla reviews
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review con el nombre del autor (JOIN con users)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
}

/// Request para crear una reseña
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub car_id: Uuid,

    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

/// Request para actualizar una reseña propia
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

/// Valoración media de un coche
#[derive(Debug, Serialize)]
pub struct CarRating {
    pub average_rating: f64,
    pub review_count: i64,
}
