//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos en los bordes de la API.

use chrono::NaiveDate;

use crate::utils::errors::AppError;

/// Validar y convertir string a fecha (YYYY-MM-DD)
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!(
            "Field '{}' must be a valid date in YYYY-MM-DD format, got '{}'",
            field, value
        ))
    })
}

/// Validar un rango de fechas de reserva: ambas bien formadas y start < end
pub fn parse_booking_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = parse_date(start, "start_date")?;
    let end = parse_date(end, "end_date")?;

    if start >= end {
        return Err(AppError::BadRequest(
            "start_date must be strictly before end_date".to_string(),
        ));
    }

    Ok((start, end))
}

/// Validar un rango de fechas de consulta: start <= end (se admite un solo día)
pub fn parse_query_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = parse_date(start, "start_date")?;
    let end = parse_date(end, "end_date")?;

    if start > end {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }

    Ok((start, end))
}

/// Validar que un string no esté vacío
pub fn require_not_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!(
            "Field '{}' must not be empty",
            field
        )));
    }
    Ok(())
}

/// Validar que un importe monetario sea positivo
pub fn require_positive_amount(value: rust_decimal::Decimal, field: &str) -> Result<(), AppError> {
    if value <= rust_decimal::Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "Field '{}' must be a positive amount",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-01-15", "start_date").is_ok());
        assert!(parse_date("2024/01/15", "start_date").is_err());
        assert!(parse_date("15-01-2024", "start_date").is_err());
        assert!(parse_date("2024-02-30", "start_date").is_err());
    }

    #[test]
    fn test_booking_range_requires_start_before_end() {
        assert!(parse_booking_range("2024-06-01", "2024-06-05").is_ok());
        // Mismo día no es un rango de reserva válido
        assert!(parse_booking_range("2024-06-01", "2024-06-01").is_err());
        assert!(parse_booking_range("2024-06-05", "2024-06-01").is_err());
    }

    #[test]
    fn test_query_range_allows_single_day() {
        assert!(parse_query_range("2024-06-01", "2024-06-01").is_ok());
        assert!(parse_query_range("2024-06-05", "2024-06-01").is_err());
    }

    #[test]
    fn test_require_not_empty() {
        assert!(require_not_empty("credit_card", "payment_method").is_ok());
        assert!(require_not_empty("   ", "payment_method").is_err());
    }

    #[test]
    fn test_require_positive_amount() {
        assert!(require_positive_amount(Decimal::new(100, 2), "amount").is_ok());
        assert!(require_positive_amount(Decimal::ZERO, "amount").is_err());
        assert!(require_positive_amount(Decimal::new(-100, 2), "amount").is_err());
    }
}
