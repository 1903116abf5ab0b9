//! Repositorio de coches
//!
//! CRUD de la flota y la consulta de disponibilidad por rango de fechas.
//! Las consultas nunca mutan `cars.status`: ese campo solo lo escriben
//! las cascadas de booking/payment o un admin vía `update_status`.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::car::{
    resolve_sort, AvailabilityParams, Car, CarFilters, CreateCarRequest, PopularCar,
    UpdateCarRequest,
};
use crate::models::status::CarStatus;
use crate::utils::errors::{not_found_error, AppError};

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear un coche (solo admin)
    pub async fn create(&self, request: CreateCarRequest) -> Result<Car, AppError> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars
            (id, name, brand, model, license_plate, year, daily_rate, hourly_rate,
             seats, status, fuel_type, transmission, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'available', $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.brand)
        .bind(&request.model)
        .bind(&request.license_plate)
        .bind(request.year)
        .bind(request.daily_rate)
        .bind(request.hourly_rate)
        .bind(request.seats)
        .bind(&request.fuel_type)
        .bind(&request.transmission)
        .bind(&request.image_url)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("A car with this license plate already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(car)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    /// Listar coches con filtros y ordenación allow-listed
    pub async fn find_all(&self, filters: &CarFilters) -> Result<Vec<Car>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM cars WHERE 1=1");

        if let Some(name) = &filters.name {
            query.push(" AND name = ").push_bind(name);
        }

        if let Some(status) = &filters.status {
            let status: CarStatus = status.parse().map_err(AppError::BadRequest)?;
            query.push(" AND status = ").push_bind(status);
        }

        if let Some(brand) = &filters.brand {
            query.push(" AND brand = ").push_bind(brand);
        }

        if let Some(seats) = filters.seats {
            query.push(" AND seats >= ").push_bind(seats);
        }

        if let Some(year) = filters.year {
            query.push(" AND year = ").push_bind(year);
        }

        if let Some(fuel_type) = &filters.fuel_type {
            query.push(" AND fuel_type = ").push_bind(fuel_type);
        }

        if let Some(min) = filters.min_daily_rate {
            query.push(" AND daily_rate >= ").push_bind(min);
        }

        if let Some(max) = filters.max_daily_rate {
            query.push(" AND daily_rate <= ").push_bind(max);
        }

        // ORDER BY solo con valores de la allow-list, nunca input crudo
        let (field, order) = resolve_sort(filters.sort_by.as_deref(), filters.sort_order.as_deref());
        query.push(format!(" ORDER BY {} {}", field, order));

        let cars = query.build_query_as::<Car>().fetch_all(&self.pool).await?;

        Ok(cars)
    }

    /// Listar coches disponibles para un rango de fechas.
    ///
    /// Un coche aparece si su estado es `available` y no existe ninguna
    /// reserva pending/confirmed cuyo intervalo se solape con el pedido.
    /// El predicado de solapamiento es el canónico inclusivo
    /// (`start <= $end AND end >= $start`) con el filtro de estado
    /// aplicado uniformemente.
    pub async fn find_available(
        &self,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        params: &AvailabilityParams,
    ) -> Result<Vec<Car>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT c.* FROM cars c
            WHERE c.status = 'available'
            AND NOT EXISTS (
              SELECT 1 FROM bookings b
              WHERE b.car_id = c.id
              AND b.start_date <= "#,
        );
        query.push_bind(end_date);
        query.push(" AND b.end_date >= ");
        query.push_bind(start_date);
        query.push(" AND b.status IN ('pending', 'confirmed'))");

        if let Some(brand) = &params.brand {
            query.push(" AND c.brand = ").push_bind(brand);
        }

        if let Some(seats) = params.seats {
            query.push(" AND c.seats >= ").push_bind(seats);
        }

        if let Some(fuel_type) = &params.fuel_type {
            query.push(" AND c.fuel_type = ").push_bind(fuel_type);
        }

        if let Some(min) = params.min_daily_rate {
            query.push(" AND c.daily_rate >= ").push_bind(min);
        }

        if let Some(max) = params.max_daily_rate {
            query.push(" AND c.daily_rate <= ").push_bind(max);
        }

        query.push(" ORDER BY c.daily_rate ASC");

        let cars = query.build_query_as::<Car>().fetch_all(&self.pool).await?;

        Ok(cars)
    }

    /// Actualizar un coche con campos explícitos (solo admin)
    pub async fn update(&self, id: Uuid, request: UpdateCarRequest) -> Result<Car, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", id))?;

        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET name = $2, brand = $3, model = $4, license_plate = $5, year = $6,
                daily_rate = $7, hourly_rate = $8, seats = $9, fuel_type = $10,
                transmission = $11, image_url = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.unwrap_or(current.name))
        .bind(request.brand.unwrap_or(current.brand))
        .bind(request.model.unwrap_or(current.model))
        .bind(request.license_plate.unwrap_or(current.license_plate))
        .bind(request.year.unwrap_or(current.year))
        .bind(request.daily_rate.unwrap_or(current.daily_rate))
        .bind(request.hourly_rate.or(current.hourly_rate))
        .bind(request.seats.unwrap_or(current.seats))
        .bind(request.fuel_type.unwrap_or(current.fuel_type))
        .bind(request.transmission.unwrap_or(current.transmission))
        .bind(request.image_url.or(current.image_url))
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    /// Actualizar el estado de un coche de forma explícita (solo admin)
    pub async fn update_status(&self, id: Uuid, status: CarStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE cars SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Car", id));
        }

        Ok(())
    }

    /// Eliminar un coche (solo admin)
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(
                        "Car has bookings and cannot be deleted; retire it instead".to_string(),
                    )
                }
                _ => AppError::Database(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Car", id));
        }

        Ok(())
    }

    /// Coches más alquilados (por reservas completadas)
    pub async fn find_popular(&self, limit: i64) -> Result<Vec<PopularCar>, AppError> {
        let cars = sqlx::query_as::<_, PopularCar>(
            r#"
            SELECT c.id, c.name, c.brand, c.model, c.daily_rate, c.seats,
                   c.status, c.image_url, COUNT(b.id) AS booking_count
            FROM cars c
            JOIN bookings b ON c.id = b.car_id
            WHERE b.status = 'completed'
            GROUP BY c.id
            ORDER BY booking_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit.clamp(1, 50))
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }
}
