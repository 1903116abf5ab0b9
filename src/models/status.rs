//! Máquina de estados del sistema de alquiler
//!
//! Este módulo define los enums de estado de coches, reservas y pagos,
//! y las tablas de cascada que mantienen los tres estados consistentes.
//! Toda la lógica de transición vive aquí: los repositorios de booking y
//! payment consumen estas tablas en lugar de duplicar condicionales.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estado del coche - mapea al ENUM car_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "car_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Booked,
    Maintenance,
    Retired,
}

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Estado del pago - mapea al ENUM payment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// Cascada reserva -> coche.
///
/// `None` significa que la transición no toca el estado del coche.
pub fn car_cascade_for_booking(new_status: BookingStatus) -> Option<CarStatus> {
    match new_status {
        BookingStatus::Confirmed => Some(CarStatus::Booked),
        BookingStatus::Completed | BookingStatus::Cancelled => Some(CarStatus::Available),
        BookingStatus::Pending => None,
    }
}

/// Cascada pago -> (reserva, coche).
///
/// `None` significa que la transición de pago no toca reserva ni coche.
pub fn cascade_for_payment(new_status: PaymentStatus) -> Option<(BookingStatus, CarStatus)> {
    match new_status {
        PaymentStatus::Completed => Some((BookingStatus::Confirmed, CarStatus::Booked)),
        PaymentStatus::Refunded => Some((BookingStatus::Cancelled, CarStatus::Available)),
        PaymentStatus::Pending | PaymentStatus::Failed => None,
    }
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Booked => "booked",
            CarStatus::Maintenance => "maintenance",
            CarStatus::Retired => "retired",
        }
    }
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(CarStatus::Available),
            "booked" => Ok(CarStatus::Booked),
            "maintenance" => Ok(CarStatus::Maintenance),
            "retired" => Ok(CarStatus::Retired),
            other => Err(format!(
                "Invalid car status '{}'. Must be one of: available, booked, maintenance, retired",
                other
            )),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!(
                "Invalid booking status '{}'. Must be one of: pending, confirmed, cancelled, completed",
                other
            )),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!(
                "Invalid payment status '{}'. Must be one of: pending, completed, failed, refunded",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_cascade_confirmed_books_car() {
        assert_eq!(
            car_cascade_for_booking(BookingStatus::Confirmed),
            Some(CarStatus::Booked)
        );
    }

    #[test]
    fn test_booking_cascade_terminal_states_free_car() {
        assert_eq!(
            car_cascade_for_booking(BookingStatus::Completed),
            Some(CarStatus::Available)
        );
        assert_eq!(
            car_cascade_for_booking(BookingStatus::Cancelled),
            Some(CarStatus::Available)
        );
    }

    #[test]
    fn test_booking_cascade_pending_leaves_car_alone() {
        assert_eq!(car_cascade_for_booking(BookingStatus::Pending), None);
    }

    #[test]
    fn test_payment_cascade_completed() {
        assert_eq!(
            cascade_for_payment(PaymentStatus::Completed),
            Some((BookingStatus::Confirmed, CarStatus::Booked))
        );
    }

    #[test]
    fn test_payment_cascade_refunded() {
        assert_eq!(
            cascade_for_payment(PaymentStatus::Refunded),
            Some((BookingStatus::Cancelled, CarStatus::Available))
        );
    }

    #[test]
    fn test_payment_cascade_pending_and_failed_are_noops() {
        assert_eq!(cascade_for_payment(PaymentStatus::Pending), None);
        assert_eq!(cascade_for_payment(PaymentStatus::Failed), None);
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "confirmed", "cancelled", "completed"] {
            assert_eq!(BookingStatus::from_str(s).unwrap().as_str(), s);
        }
        for s in ["pending", "completed", "failed", "refunded"] {
            assert_eq!(PaymentStatus::from_str(s).unwrap().as_str(), s);
        }
        for s in ["available", "booked", "maintenance", "retired"] {
            assert_eq!(CarStatus::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        assert!(BookingStatus::from_str("archived").is_err());
        assert!(PaymentStatus::from_str("chargeback").is_err());
    }
}
