//! Controller de reservas
//!
//! Valida input, aplica la política de autorización sobre transiciones y
//! delega la lógica transaccional en el repositorio.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{
    Booking, BookingDetail, BookingFilters, CreateBookingRequest, PriceQuote, PriceQuoteParams,
};
use crate::models::status::BookingStatus;
use crate::models::ApiResponse;
use crate::repositories::booking_repository::BookingRepository;
use crate::utils::errors::{forbidden_error, not_found_error, AppError};
use crate::utils::validation::{parse_booking_range, parse_query_range};

/// Reserva recién creada con su desglose de precio
#[derive(Debug, Serialize)]
pub struct CreatedBooking {
    pub booking: Booking,
    pub price_details: PriceQuote,
}

pub struct BookingController {
    repository: BookingRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool),
        }
    }

    /// Crear una reserva para el usuario autenticado.
    ///
    /// Las reservas nacen siempre `pending`; la confirmación llega por la
    /// cascada de un pago completado o por un admin.
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<CreatedBooking>, AppError> {
        request.validate()?;

        let (start_date, end_date) = parse_booking_range(&request.start_date, &request.end_date)?;

        let (booking, price_details) = self
            .repository
            .create(
                user.user_id,
                request.car_id,
                request.pickup_location_id,
                request.return_location_id,
                start_date,
                end_date,
                BookingStatus::Pending,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            CreatedBooking {
                booking,
                price_details,
            },
            "Booking created successfully".to_string(),
        ))
    }

    /// Listar reservas con filtros (solo admin, garantizado por la ruta)
    pub async fn list(&self, filters: BookingFilters) -> Result<Vec<BookingDetail>, AppError> {
        self.repository.find_all(&filters).await
    }

    /// Reservas del usuario autenticado
    pub async fn my_bookings(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Vec<BookingDetail>, AppError> {
        self.repository.find_by_user(user.user_id).await
    }

    /// Obtener una reserva; solo su dueño o un admin pueden verla
    pub async fn get_by_id(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
    ) -> Result<BookingDetail, AppError> {
        let booking = self
            .repository
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", booking_id))?;

        if booking.user_id != user.user_id && !user.is_admin() {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(booking)
    }

    /// Transicionar el estado de una reserva.
    ///
    /// Política: un admin puede aplicar cualquier transición válida a
    /// cualquier reserva; un cliente solo puede cancelar una reserva
    /// propia.
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
        new_status: &str,
    ) -> Result<ApiResponse<()>, AppError> {
        let new_status: BookingStatus = new_status.parse().map_err(AppError::BadRequest)?;

        if !user.is_admin() {
            let booking = self
                .repository
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| not_found_error("Booking", booking_id))?;

            if booking.user_id != user.user_id {
                return Err(AppError::Forbidden("Access denied".to_string()));
            }

            if new_status != BookingStatus::Cancelled {
                return Err(forbidden_error(
                    "update booking status",
                    "customers may only cancel their own bookings",
                ));
            }
        }

        self.repository.update_status(booking_id, new_status).await?;

        Ok(ApiResponse::message_only(format!(
            "Booking status updated to {}",
            new_status
        )))
    }

    /// Calcular el precio de un alquiler (endpoint público, sin efectos)
    pub async fn price_quote(&self, params: PriceQuoteParams) -> Result<PriceQuote, AppError> {
        let (start_date, end_date) = parse_query_range(&params.start_date, &params.end_date)?;

        self.repository
            .price_quote(params.car_id, start_date, end_date)
            .await
    }

    /// Consultar si un coche está libre para un rango de fechas
    pub async fn is_available(
        &self,
        car_id: Uuid,
        start_date: &str,
        end_date: &str,
    ) -> Result<CarAvailability, AppError> {
        let (start_date, end_date) = parse_query_range(start_date, end_date)?;

        let available = self
            .repository
            .is_available(car_id, start_date, end_date)
            .await?;

        Ok(CarAvailability { car_id, available })
    }
}

/// Respuesta del chequeo de disponibilidad de un coche
#[derive(Debug, Serialize)]
pub struct CarAvailability {
    pub car_id: Uuid,
    pub available: bool,
}
