//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, sus DTOs y la lógica pura
//! del chequeo de solapamiento de intervalos y del cálculo de precio.
//! Las reservas nunca se borran físicamente: son el histórico del sistema.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::status::BookingStatus;

/// Booking principal - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub pickup_location_id: Uuid,
    pub return_location_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking con información de coche, usuario y ubicaciones (JOIN)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub pickup_location_id: Uuid,
    pub return_location_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub car_name: String,
    pub car_brand: String,
    pub car_model: String,
    pub user_name: String,
    pub user_email: String,
    pub pickup_location_name: String,
    pub return_location_name: String,
}

/// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub car_id: Uuid,
    pub pickup_location_id: Uuid,
    pub return_location_id: Uuid,
    /// Fecha de inicio en formato YYYY-MM-DD
    #[validate(length(min = 10, max = 10))]
    pub start_date: String,
    /// Fecha de fin en formato YYYY-MM-DD
    #[validate(length(min = 10, max = 10))]
    pub end_date: String,
}

/// Request para actualizar el estado de una reserva
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

/// Filtros para búsqueda de reservas (solo admin)
#[derive(Debug, Default, Deserialize)]
pub struct BookingFilters {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Parámetros para el cálculo de precio
#[derive(Debug, Deserialize)]
pub struct PriceQuoteParams {
    pub car_id: Uuid,
    pub start_date: String,
    pub end_date: String,
}

/// Desglose de precio de una reserva
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceQuote {
    pub daily_rate: Decimal,
    pub days: i64,
    pub total_price: Decimal,
}

impl PriceQuote {
    /// Calcular el precio para un rango de fechas.
    ///
    /// La duración se redondea a días completos con un mínimo de 1 día:
    /// una reserva del mismo día cuenta como un día entero, y un rango
    /// invertido se recorta al mínimo en lugar de usar su valor absoluto.
    pub fn calculate(daily_rate: Decimal, start: NaiveDate, end: NaiveDate) -> Self {
        let days = rental_days(start, end);
        Self {
            daily_rate,
            days,
            total_price: daily_rate * Decimal::from(days),
        }
    }
}

/// Duración de un alquiler en días completos, mínimo 1
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Chequeo canónico de solapamiento inclusivo de intervalos.
///
/// Dos intervalos `[s1, e1]` y `[s2, e2]` se solapan si y solo si
/// `s1 <= e2 && e1 >= s2`. Es el mismo predicado que usan las queries SQL
/// de disponibilidad; una reserva de un solo día ocupa ese día.
pub fn intervals_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && e1 >= s2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_overlap_is_boundary_inclusive() {
        // Comparten exactamente el día frontera
        assert!(intervals_overlap(
            d("2024-01-01"),
            d("2024-01-05"),
            d("2024-01-05"),
            d("2024-01-10")
        ));
    }

    #[test]
    fn test_adjacent_intervals_do_not_overlap() {
        assert!(!intervals_overlap(
            d("2024-01-01"),
            d("2024-01-04"),
            d("2024-01-05"),
            d("2024-01-10")
        ));
    }

    #[test]
    fn test_contained_interval_overlaps() {
        assert!(intervals_overlap(
            d("2024-06-02"),
            d("2024-06-03"),
            d("2024-06-01"),
            d("2024-06-05")
        ));
    }

    #[test]
    fn test_single_day_booking_occupies_that_day() {
        assert!(intervals_overlap(
            d("2024-06-03"),
            d("2024-06-03"),
            d("2024-06-01"),
            d("2024-06-05")
        ));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let cases = [
            (d("2024-06-01"), d("2024-06-05"), d("2024-06-03"), d("2024-06-07")),
            (d("2024-06-01"), d("2024-06-05"), d("2024-06-06"), d("2024-06-10")),
        ];
        for (s1, e1, s2, e2) in cases {
            assert_eq!(
                intervals_overlap(s1, e1, s2, e2),
                intervals_overlap(s2, e2, s1, e1)
            );
        }
    }

    #[test]
    fn test_rental_days_minimum_one() {
        assert_eq!(rental_days(d("2024-06-01"), d("2024-06-01")), 1);
        // Rango invertido: se recorta al mínimo, no se usa el valor absoluto
        assert_eq!(rental_days(d("2024-06-10"), d("2024-06-01")), 1);
    }

    #[test]
    fn test_rental_days_counts_whole_days() {
        assert_eq!(rental_days(d("2024-06-01"), d("2024-06-05")), 4);
    }

    #[test]
    fn test_price_quote_same_day_is_one_daily_rate() {
        let rate = Decimal::new(4500, 2); // 45.00
        let quote = PriceQuote::calculate(rate, d("2024-06-01"), d("2024-06-01"));
        assert_eq!(quote.days, 1);
        assert_eq!(quote.total_price, rate);
    }

    #[test]
    fn test_price_is_monotonic_in_duration() {
        let rate = Decimal::new(3000, 2);
        let mut last = Decimal::ZERO;
        for extra in 0..10 {
            let end = d("2024-06-01") + chrono::Duration::days(extra);
            let quote = PriceQuote::calculate(rate, d("2024-06-01"), end);
            assert!(quote.total_price >= last);
            last = quote.total_price;
        }
    }

    #[test]
    fn test_price_quote_multiplies_rate_by_days() {
        let rate = Decimal::new(5000, 2); // 50.00
        let quote = PriceQuote::calculate(rate, d("2024-06-01"), d("2024-06-05"));
        assert_eq!(quote.days, 4);
        assert_eq!(quote.total_price, Decimal::new(20000, 2)); // 200.00
    }
}
