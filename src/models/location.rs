//! Modelo de Location
//!
//! Puntos de recogida y devolución de coches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Location principal - mapea exactamente a la tabla locations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone_number: Option<String>,
    pub working_hours: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una ubicación (solo admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 5, max = 200))]
    pub address: String,

    #[validate(length(min = 2, max = 100))]
    pub city: String,

    pub latitude: f64,
    pub longitude: f64,

    pub phone_number: Option<String>,
    pub working_hours: Option<serde_json::Value>,
}

/// Request para actualizar una ubicación (solo admin).
///
/// Campos explícitos, nada de SET dinámico desde el input.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 5, max = 200))]
    pub address: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub city: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub phone_number: Option<String>,
    pub working_hours: Option<serde_json::Value>,
}
