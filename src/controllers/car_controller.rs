//! Controller de coches
//!
//! Lecturas públicas (catálogo, disponibilidad, populares) y escrituras
//! restringidas a administradores.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::car::{
    AvailabilityParams, Car, CarFilters, CreateCarRequest, PopularCar, UpdateCarRequest,
    UpdateCarStatusRequest,
};
use crate::models::status::CarStatus;
use crate::models::ApiResponse;
use crate::repositories::car_repository::CarRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::parse_query_range;

pub struct CarController {
    repository: CarRepository,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarRepository::new(pool),
        }
    }

    /// Dar de alta un coche en la flota (solo admin)
    pub async fn create(&self, request: CreateCarRequest) -> Result<ApiResponse<Car>, AppError> {
        request.validate()?;

        let car = self.repository.create(request).await?;

        Ok(ApiResponse::success_with_message(
            car,
            "Car created successfully".to_string(),
        ))
    }

    /// Listar la flota con filtros y ordenación
    pub async fn list(&self, filters: CarFilters) -> Result<Vec<Car>, AppError> {
        self.repository.find_all(&filters).await
    }

    /// Coches disponibles para un rango de fechas
    pub async fn available(&self, params: AvailabilityParams) -> Result<Vec<Car>, AppError> {
        let (start_date, end_date) = parse_query_range(&params.start_date, &params.end_date)?;

        self.repository
            .find_available(start_date, end_date, &params)
            .await
    }

    /// Coches más alquilados
    pub async fn popular(&self, limit: Option<i64>) -> Result<Vec<PopularCar>, AppError> {
        self.repository.find_popular(limit.unwrap_or(10)).await
    }

    pub async fn get_by_id(&self, car_id: Uuid) -> Result<Car, AppError> {
        self.repository
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", car_id))
    }

    /// Actualizar datos de un coche (solo admin)
    pub async fn update(
        &self,
        car_id: Uuid,
        request: UpdateCarRequest,
    ) -> Result<ApiResponse<Car>, AppError> {
        request.validate()?;

        let car = self.repository.update(car_id, request).await?;

        Ok(ApiResponse::success_with_message(
            car,
            "Car updated successfully".to_string(),
        ))
    }

    /// Cambiar el estado de un coche de forma explícita (solo admin)
    pub async fn update_status(
        &self,
        car_id: Uuid,
        request: UpdateCarStatusRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let status: CarStatus = request.status.parse().map_err(AppError::BadRequest)?;

        self.repository.update_status(car_id, status).await?;

        Ok(ApiResponse::message_only(format!(
            "Car status updated to {}",
            status
        )))
    }

    /// Eliminar un coche sin historial de reservas (solo admin)
    pub async fn delete(&self, car_id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.repository.delete(car_id).await?;

        Ok(ApiResponse::message_only(
            "Car deleted successfully".to_string(),
        ))
    }
}
