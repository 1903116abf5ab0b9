//! Controller de pagos
//!
//! Valida input y propiedad de la reserva antes de delegar en el
//! repositorio transaccional.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::payment::{
    CreatePaymentRequest, Payment, PaymentDetail, UpdatePaymentStatusRequest,
};
use crate::models::status::PaymentStatus;
use crate::models::ApiResponse;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::payment_repository::PaymentRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{require_not_empty, require_positive_amount};

pub struct PaymentController {
    repository: PaymentRepository,
    bookings: BookingRepository,
}

impl PaymentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PaymentRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool),
        }
    }

    /// Registrar un pago sobre una reserva propia (o cualquiera si admin).
    ///
    /// Si el pago llega ya `completed`, la cascada confirma la reserva y
    /// marca el coche como `booked` en la misma transacción.
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreatePaymentRequest,
    ) -> Result<ApiResponse<Payment>, AppError> {
        request.validate()?;
        require_not_empty(&request.payment_method, "payment_method")?;
        require_positive_amount(request.amount, "amount")?;

        let initial_status = match &request.status {
            Some(s) => s.parse().map_err(AppError::BadRequest)?,
            None => PaymentStatus::Pending,
        };

        let booking = self
            .bookings
            .find_by_id(request.booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", request.booking_id))?;

        if booking.user_id != user.user_id && !user.is_admin() {
            return Err(AppError::Forbidden(
                "You can only pay for your own bookings".to_string(),
            ));
        }

        let payment = self
            .repository
            .create(
                request.booking_id,
                request.amount,
                request.payment_method,
                request.transaction_id,
                initial_status,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            payment,
            "Payment recorded successfully".to_string(),
        ))
    }

    /// Obtener un pago; solo el dueño de la reserva o un admin
    pub async fn get_by_id(
        &self,
        user: &AuthenticatedUser,
        payment_id: Uuid,
    ) -> Result<PaymentDetail, AppError> {
        let payment = self
            .repository
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| not_found_error("Payment", payment_id))?;

        if payment.user_id != user.user_id && !user.is_admin() {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(payment)
    }

    /// Pagos de una reserva; solo su dueño o un admin
    pub async fn by_booking(
        &self,
        user: &AuthenticatedUser,
        booking_id: Uuid,
    ) -> Result<Vec<Payment>, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", booking_id))?;

        if booking.user_id != user.user_id && !user.is_admin() {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        self.repository.find_by_booking(booking_id).await
    }

    /// Transicionar el estado de un pago (solo admin, garantizado por la ruta)
    pub async fn update_status(
        &self,
        payment_id: Uuid,
        request: UpdatePaymentStatusRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let new_status: PaymentStatus = request.status.parse().map_err(AppError::BadRequest)?;

        self.repository
            .update_status(payment_id, new_status, request.transaction_id)
            .await?;

        Ok(ApiResponse::message_only(format!(
            "Payment status updated to {}",
            new_status
        )))
    }
}
