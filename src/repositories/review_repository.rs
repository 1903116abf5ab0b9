//! Repositorio de reseñas
//!
//! Solo puede reseñar quien completó un alquiler del coche, y una sola
//! vez por usuario y coche (respaldado por el UNIQUE del schema).

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::review::{CarRating, Review, ReviewWithAuthor};
use crate::utils::errors::{not_found_error, AppError};

pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        car_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Review, AppError> {
        let completed: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE user_id = $1 AND car_id = $2 AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .bind(car_id)
        .fetch_one(&self.pool)
        .await?;

        if completed.0 == 0 {
            return Err(AppError::Forbidden(
                "You can only review cars you have rented".to_string(),
            ));
        }

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, user_id, car_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(car_id)
        .bind(rating)
        .bind(&comment)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("You have already reviewed this car".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(review)
    }

    pub async fn find_by_car(&self, car_id: Uuid) -> Result<Vec<ReviewWithAuthor>, AppError> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT r.*, u.name AS user_name
            FROM reviews r
            JOIN users u ON r.user_id = u.id
            WHERE r.car_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Valoración media de un coche (0 si no tiene reseñas)
    pub async fn average_rating(&self, car_id: Uuid) -> Result<CarRating, AppError> {
        let row: (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rating)::float8, COUNT(*) FROM reviews WHERE car_id = $1",
        )
        .bind(car_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CarRating {
            average_rating: row.0.unwrap_or(0.0),
            review_count: row.1,
        })
    }

    /// Actualizar una reseña propia
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Review, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews SET rating = $3, comment = $4
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(rating)
        .bind(&comment)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Review", id))?;

        Ok(review)
    }

    /// Eliminar una reseña propia
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Review", id));
        }

        Ok(())
    }
}
