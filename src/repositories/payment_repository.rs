//! Repositorio de pagos
//!
//! La mitad payment del Rental State Controller. Completar o reembolsar
//! un pago arrastra reserva y coche según la tabla de cascada de
//! `models::status`; las tres escrituras (pago, reserva, coche) son una
//! única unidad atómica y nunca se observa una aplicación parcial.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment::{Payment, PaymentDetail};
use crate::models::status::{cascade_for_payment, PaymentStatus};
use crate::repositories::booking_repository::apply_booking_transition;
use crate::utils::errors::{not_found_error, AppError};

/// Fila mínima de la reserva que ancla la cascada de un pago
#[derive(Debug, sqlx::FromRow)]
struct BookingForPayment {
    id: Uuid,
    car_id: Uuid,
}

pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar un pago para una reserva.
    ///
    /// La reserva debe existir (`NotFound` si no). Si el pago nace
    /// `completed`, en la misma transacción la reserva pasa a `confirmed`
    /// y su coche a `booked`.
    pub async fn create(
        &self,
        booking_id: Uuid,
        amount: rust_decimal::Decimal,
        payment_method: String,
        transaction_id: Option<String>,
        initial_status: PaymentStatus,
    ) -> Result<Payment, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock de la reserva: ancla la cascada y garantiza que exista
        let booking = sqlx::query_as::<_, BookingForPayment>(
            "SELECT id, car_id FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("Booking", booking_id))?;

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments
            (id, booking_id, amount, payment_method, transaction_id, status, payment_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(amount)
        .bind(&payment_method)
        .bind(&transaction_id)
        .bind(initial_status)
        .bind(chrono::Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        if let Some((booking_status, _car_status)) = cascade_for_payment(initial_status) {
            apply_booking_transition(&mut tx, booking.id, booking.car_id, booking_status).await?;
        }

        tx.commit().await?;

        Ok(payment)
    }

    /// Transicionar el estado de un pago con cascada a reserva y coche.
    ///
    /// Lee el pago `FOR UPDATE` dentro de la transacción para obtener su
    /// reserva; `NotFound` si el pago no existe. `transaction_id` solo se
    /// escribe cuando el llamador lo provee.
    pub async fn update_status(
        &self,
        payment_id: Uuid,
        new_status: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE id = $1 FOR UPDATE",
        )
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("Payment", payment_id))?;

        sqlx::query(
            "UPDATE payments SET status = $2, transaction_id = COALESCE($3, transaction_id) WHERE id = $1",
        )
        .bind(payment_id)
        .bind(new_status)
        .bind(&transaction_id)
        .execute(&mut *tx)
        .await?;

        if let Some((booking_status, _car_status)) = cascade_for_payment(new_status) {
            let booking = sqlx::query_as::<_, BookingForPayment>(
                "SELECT id, car_id FROM bookings WHERE id = $1 FOR UPDATE",
            )
            .bind(payment.booking_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("Booking", payment.booking_id))?;

            apply_booking_transition(&mut tx, booking.id, booking.car_id, booking_status).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Obtener un pago por id con los datos de su reserva
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentDetail>, AppError> {
        let payment = sqlx::query_as::<_, PaymentDetail>(
            r#"
            SELECT p.*, b.user_id, b.car_id, b.total_price AS booking_price
            FROM payments p
            JOIN bookings b ON p.booking_id = b.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Obtener los pagos de una reserva
    pub async fn find_by_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE booking_id = $1 ORDER BY payment_date DESC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
