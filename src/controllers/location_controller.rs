//! Controller de ubicaciones

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::location::{CreateLocationRequest, Location, UpdateLocationRequest};
use crate::models::ApiResponse;
use crate::repositories::location_repository::LocationRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct LocationController {
    repository: LocationRepository,
}

impl LocationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LocationRepository::new(pool),
        }
    }

    /// Crear una ubicación (solo admin)
    pub async fn create(
        &self,
        request: CreateLocationRequest,
    ) -> Result<ApiResponse<Location>, AppError> {
        request.validate()?;

        let location = self.repository.create(request).await?;

        Ok(ApiResponse::success_with_message(
            location,
            "Location created successfully".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<Vec<Location>, AppError> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, location_id: Uuid) -> Result<Location, AppError> {
        self.repository
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| not_found_error("Location", location_id))
    }

    /// Actualizar una ubicación (solo admin)
    pub async fn update(
        &self,
        location_id: Uuid,
        request: UpdateLocationRequest,
    ) -> Result<ApiResponse<Location>, AppError> {
        request.validate()?;

        let location = self.repository.update(location_id, request).await?;

        Ok(ApiResponse::success_with_message(
            location,
            "Location updated successfully".to_string(),
        ))
    }

    /// Eliminar una ubicación sin reservas asociadas (solo admin)
    pub async fn delete(&self, location_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(location_id).await?;

        Ok(ApiResponse::message_only(
            "Location deleted successfully".to_string(),
        ))
    }
}
