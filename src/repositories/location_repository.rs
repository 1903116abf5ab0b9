//! Repositorio de ubicaciones

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::location::{CreateLocationRequest, Location, UpdateLocationRequest};
use crate::utils::errors::{not_found_error, AppError};

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateLocationRequest) -> Result<Location, AppError> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations
            (id, name, address, city, latitude, longitude, phone_number, working_hours, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.address)
        .bind(&request.city)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.phone_number)
        .bind(&request.working_hours)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(location)
    }

    pub async fn find_all(&self) -> Result<Vec<Location>, AppError> {
        let locations = sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(locations)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, AppError> {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }

    /// Actualizar con campos explícitos, nada de SET dinámico
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateLocationRequest,
    ) -> Result<Location, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Location", id))?;

        let location = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET name = $2, address = $3, city = $4, latitude = $5, longitude = $6,
                phone_number = $7, working_hours = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.unwrap_or(current.name))
        .bind(request.address.unwrap_or(current.address))
        .bind(request.city.unwrap_or(current.city))
        .bind(request.latitude.unwrap_or(current.latitude))
        .bind(request.longitude.unwrap_or(current.longitude))
        .bind(request.phone_number.or(current.phone_number))
        .bind(request.working_hours.or(current.working_hours))
        .fetch_one(&self.pool)
        .await?;

        Ok(location)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::Conflict(
                    "Location is referenced by bookings and cannot be deleted".to_string(),
                ),
                _ => AppError::Database(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Location", id));
        }

        Ok(())
    }
}
