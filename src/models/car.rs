//! Modelo de Car
//!
//! Este módulo contiene el struct Car y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.
//!
//! El campo `status` es derivado: refleja la elegibilidad del coche para
//! nuevas reservas y solo lo mutan las cascadas de booking/payment (o un
//! admin de forma explícita), nunca las consultas de disponibilidad.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::status::CarStatus;

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub license_plate: String,
    pub year: i32,
    pub daily_rate: Decimal,
    pub hourly_rate: Option<Decimal>,
    pub seats: i32,
    pub status: CarStatus,
    pub fuel_type: String,
    pub transmission: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Coche con contador de reservas completadas (ranking de populares)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PopularCar {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub daily_rate: Decimal,
    pub seats: i32,
    pub status: CarStatus,
    pub image_url: Option<String>,
    pub booking_count: i64,
}

/// Request para crear un coche (solo admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 5, max = 20))]
    pub license_plate: String,

    #[validate(range(min = 1950, max = 2030))]
    pub year: i32,

    pub daily_rate: Decimal,

    pub hourly_rate: Option<Decimal>,

    #[validate(range(min = 1, max = 12))]
    pub seats: i32,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: String,

    #[validate(length(min = 2, max = 20))]
    pub transmission: String,

    pub image_url: Option<String>,
}

/// Request para actualizar un coche (solo admin).
///
/// Campos explícitos en lugar de un objeto arbitrario: nada de construir
/// cláusulas SET dinámicas a partir del input.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(length(min = 5, max = 20))]
    pub license_plate: Option<String>,

    #[validate(range(min = 1950, max = 2030))]
    pub year: Option<i32>,

    pub daily_rate: Option<Decimal>,

    pub hourly_rate: Option<Decimal>,

    #[validate(range(min = 1, max = 12))]
    pub seats: Option<i32>,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: Option<String>,

    #[validate(length(min = 2, max = 20))]
    pub transmission: Option<String>,

    pub image_url: Option<String>,
}

/// Request para actualizar el estado de un coche (solo admin)
#[derive(Debug, Deserialize)]
pub struct UpdateCarStatusRequest {
    pub status: String,
}

/// Filtros para búsqueda de coches
#[derive(Debug, Default, Deserialize)]
pub struct CarFilters {
    pub name: Option<String>,
    pub status: Option<String>,
    pub brand: Option<String>,
    pub seats: Option<i32>,
    pub year: Option<i32>,
    pub fuel_type: Option<String>,
    pub min_daily_rate: Option<Decimal>,
    pub max_daily_rate: Option<Decimal>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Filtros para búsqueda de coches disponibles en un rango de fechas
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub start_date: String,
    pub end_date: String,
    pub brand: Option<String>,
    pub seats: Option<i32>,
    pub fuel_type: Option<String>,
    pub min_daily_rate: Option<Decimal>,
    pub max_daily_rate: Option<Decimal>,
}

/// Campos permitidos para ordenar listados de coches
const ALLOWED_SORT_FIELDS: &[&str] = &[
    "id",
    "name",
    "brand",
    "daily_rate",
    "year",
    "seats",
    "created_at",
];

/// Resolver el ORDER BY de un listado contra la allow-list.
///
/// Cualquier campo u orden fuera de la lista cae al default `id ASC`;
/// el valor retornado es seguro para interpolar en la query.
pub fn resolve_sort(
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> (&'static str, &'static str) {
    let field = sort_by
        .and_then(|f| ALLOWED_SORT_FIELDS.iter().find(|allowed| **allowed == f))
        .copied()
        .unwrap_or("id");

    let order = match sort_order.map(|o| o.to_ascii_lowercase()) {
        Some(ref o) if o == "desc" => "DESC",
        _ => "ASC",
    };

    (field, order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sort_defaults() {
        assert_eq!(resolve_sort(None, None), ("id", "ASC"));
    }

    #[test]
    fn test_resolve_sort_allowed_field() {
        assert_eq!(
            resolve_sort(Some("daily_rate"), Some("desc")),
            ("daily_rate", "DESC")
        );
        assert_eq!(resolve_sort(Some("brand"), Some("ASC")), ("brand", "ASC"));
    }

    #[test]
    fn test_resolve_sort_rejects_unknown_field() {
        // Un campo fuera de la allow-list nunca llega a la query
        assert_eq!(
            resolve_sort(Some("password_hash; DROP TABLE cars"), None),
            ("id", "ASC")
        );
        assert_eq!(resolve_sort(Some("status"), Some("desc")), ("id", "DESC"));
    }

    #[test]
    fn test_resolve_sort_rejects_unknown_order() {
        assert_eq!(resolve_sort(Some("year"), Some("sideways")), ("year", "ASC"));
    }
}
