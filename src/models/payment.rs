//! Modelo de Payment
//!
//! Un pago referencia siempre a una reserva existente. Completar un pago
//! fuerza la reserva a `confirmed` y su coche a `booked`; reembolsarlo
//! fuerza la reserva a `cancelled` y el coche a `available` (ver la tabla
//! de cascada en `models::status`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::status::PaymentStatus;

/// Payment principal - mapea exactamente a la tabla payments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
}

/// Payment con los datos de su reserva (JOIN)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentDetail {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub booking_price: Decimal,
}

/// Request para registrar un pago
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub booking_id: Uuid,

    pub amount: Decimal,

    #[validate(length(min = 2, max = 50))]
    pub payment_method: String,

    /// Identificador opaco del procesador de pagos externo
    pub transaction_id: Option<String>,

    /// Estado inicial; por defecto 'pending'
    pub status: Option<String>,
}

/// Request para actualizar el estado de un pago (solo admin)
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: String,
    pub transaction_id: Option<String>,
}
