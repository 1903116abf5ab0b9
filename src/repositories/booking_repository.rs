//! Repositorio de reservas
//!
//! Aquí vive la mitad booking del Rental State Controller: creación con
//! re-chequeo de disponibilidad dentro de la transacción, y transiciones
//! de estado con cascada al coche. Toda escritura multi-fila corre en una
//! única transacción sobre una misma conexión; el lock `FOR UPDATE` sobre
//! la fila del coche serializa los check-and-insert concurrentes sobre el
//! mismo coche.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingDetail, BookingFilters, PriceQuote};
use crate::models::status::{car_cascade_for_booking, BookingStatus, CarStatus};
use crate::utils::errors::{conflict_error, not_found_error, AppError};

/// Fila mínima del coche que se lee (y bloquea) al crear una reserva
#[derive(Debug, sqlx::FromRow)]
struct CarForBooking {
    #[allow(dead_code)]
    id: Uuid,
    daily_rate: Decimal,
}

pub struct BookingRepository {
    pool: PgPool,
}

/// Aplicar una transición de estado de reserva con su cascada al coche.
///
/// Rutina única compartida por el ciclo de vida de booking y el de payment:
/// escribe el estado de la reserva y, si la tabla de cascada lo indica,
/// el estado del coche, siempre dentro de la transacción del llamador.
pub(crate) async fn apply_booking_transition(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
    car_id: Uuid,
    new_status: BookingStatus,
) -> Result<(), AppError> {
    sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
        .bind(booking_id)
        .bind(new_status)
        .execute(&mut **tx)
        .await?;

    if let Some(car_status) = car_cascade_for_booking(new_status) {
        sqlx::query("UPDATE cars SET status = $2 WHERE id = $1")
            .bind(car_id)
            .bind(car_status)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una reserva.
    ///
    /// Pasos, como una única transacción atómica:
    ///  1. bloquear la fila del coche (`FOR UPDATE`) - cierra la ventana
    ///     de carrera entre chequeo e inserción;
    ///  2. re-chequear disponibilidad con el predicado canónico de
    ///     solapamiento; `Conflict` si hay una reserva pending/confirmed
    ///     que se solapa;
    ///  3. calcular el precio con la tarifa leída dentro de la transacción
    ///     e insertar la reserva;
    ///  4. si nace `confirmed`, cascada del coche a `booked`.
    ///
    /// De dos creaciones concurrentes solapadas sobre el mismo coche,
    /// exactamente una gana; la otra recibe `Conflict`.
    pub async fn create(
        &self,
        user_id: Uuid,
        car_id: Uuid,
        pickup_location_id: Uuid,
        return_location_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        initial_status: BookingStatus,
    ) -> Result<(Booking, PriceQuote), AppError> {
        let mut tx = self.pool.begin().await?;

        let car = sqlx::query_as::<_, CarForBooking>(
            "SELECT id, daily_rate FROM cars WHERE id = $1 FOR UPDATE",
        )
        .bind(car_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("Car", car_id))?;

        let conflicts: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE car_id = $1
            AND start_date <= $3
            AND end_date >= $2
            AND status IN ('pending', 'confirmed')
            "#,
        )
        .bind(car_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&mut *tx)
        .await?;

        if conflicts.0 > 0 {
            return Err(conflict_error("Car is not available for the selected dates"));
        }

        let quote = PriceQuote::calculate(car.daily_rate, start_date, end_date);

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings
            (id, user_id, car_id, pickup_location_id, return_location_id,
             start_date, end_date, total_price, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(car_id)
        .bind(pickup_location_id)
        .bind(return_location_id)
        .bind(start_date)
        .bind(end_date)
        .bind(quote.total_price)
        .bind(initial_status)
        .bind(chrono::Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        // Una reserva que nace confirmada marca el coche como booked
        if initial_status == BookingStatus::Confirmed {
            sqlx::query("UPDATE cars SET status = $2 WHERE id = $1")
                .bind(car_id)
                .bind(CarStatus::Booked)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok((booking, quote))
    }

    /// Transicionar el estado de una reserva con cascada al coche.
    ///
    /// Re-lee la reserva `FOR UPDATE` dentro de la transacción; aplicar el
    /// estado que ya tiene es un no-op que no toca el coche.
    pub async fn update_status(
        &self,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("Booking", booking_id))?;

        if booking.status == new_status {
            return Ok(());
        }

        apply_booking_transition(&mut tx, booking_id, booking.car_id, new_status).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Consultar si un coche está libre para un rango de fechas.
    ///
    /// Un coche no está disponible para `[s, e]` si existe una reserva
    /// pending/confirmed cuyo intervalo se solapa con el pedido usando el
    /// predicado inclusivo `s1 <= e2 AND e1 >= s2` (el mismo de
    /// `models::booking::intervals_overlap`).
    pub async fn is_available(
        &self,
        car_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1)")
            .bind(car_id)
            .fetch_one(&self.pool)
            .await?;

        if !exists.0 {
            return Err(not_found_error("Car", car_id));
        }

        let conflicts: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE car_id = $1
            AND start_date <= $3
            AND end_date >= $2
            AND status IN ('pending', 'confirmed')
            "#,
        )
        .bind(car_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(conflicts.0 == 0)
    }

    /// Calcular el precio de un alquiler sin efectos secundarios
    pub async fn price_quote(
        &self,
        car_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceQuote, AppError> {
        let rate: Option<(Decimal,)> =
            sqlx::query_as("SELECT daily_rate FROM cars WHERE id = $1")
                .bind(car_id)
                .fetch_optional(&self.pool)
                .await?;

        let (daily_rate,) = rate.ok_or_else(|| not_found_error("Car", car_id))?;

        Ok(PriceQuote::calculate(daily_rate, start_date, end_date))
    }

    /// Obtener una reserva por id con datos de coche, usuario y ubicaciones
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingDetail>, AppError> {
        let booking = sqlx::query_as::<_, BookingDetail>(
            r#"
            SELECT b.*,
              c.name AS car_name, c.brand AS car_brand, c.model AS car_model,
              u.name AS user_name, u.email AS user_email,
              pl.name AS pickup_location_name,
              rl.name AS return_location_name
            FROM bookings b
            JOIN cars c ON b.car_id = c.id
            JOIN users u ON b.user_id = u.id
            JOIN locations pl ON b.pickup_location_id = pl.id
            JOIN locations rl ON b.return_location_id = rl.id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Obtener las reservas de un usuario
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<BookingDetail>, AppError> {
        let bookings = sqlx::query_as::<_, BookingDetail>(
            r#"
            SELECT b.*,
              c.name AS car_name, c.brand AS car_brand, c.model AS car_model,
              u.name AS user_name, u.email AS user_email,
              pl.name AS pickup_location_name,
              rl.name AS return_location_name
            FROM bookings b
            JOIN cars c ON b.car_id = c.id
            JOIN users u ON b.user_id = u.id
            JOIN locations pl ON b.pickup_location_id = pl.id
            JOIN locations rl ON b.return_location_id = rl.id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Listar reservas con filtros (solo admin)
    pub async fn find_all(&self, filters: &BookingFilters) -> Result<Vec<BookingDetail>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT b.*,
              c.name AS car_name, c.brand AS car_brand, c.model AS car_model,
              u.name AS user_name, u.email AS user_email,
              pl.name AS pickup_location_name,
              rl.name AS return_location_name
            FROM bookings b
            JOIN cars c ON b.car_id = c.id
            JOIN users u ON b.user_id = u.id
            JOIN locations pl ON b.pickup_location_id = pl.id
            JOIN locations rl ON b.return_location_id = rl.id
            WHERE 1=1
            "#,
        );

        if let Some(status) = &filters.status {
            let status: BookingStatus = status
                .parse()
                .map_err(AppError::BadRequest)?;
            query.push(" AND b.status = ").push_bind(status);
        }

        if let Some(start_date) = &filters.start_date {
            let start = crate::utils::validation::parse_date(start_date, "start_date")?;
            query.push(" AND b.start_date >= ").push_bind(start);
        }

        if let Some(end_date) = &filters.end_date {
            let end = crate::utils::validation::parse_date(end_date, "end_date")?;
            query.push(" AND b.end_date <= ").push_bind(end);
        }

        if let Some(user_id) = filters.user_id {
            query.push(" AND b.user_id = ").push_bind(user_id);
        }

        if let Some(car_id) = filters.car_id {
            query.push(" AND b.car_id = ").push_bind(car_id);
        }

        query.push(" ORDER BY b.created_at DESC");

        if let Some(limit) = filters.limit {
            query.push(" LIMIT ").push_bind(limit.clamp(1, 500));
            if let Some(offset) = filters.offset {
                query.push(" OFFSET ").push_bind(offset.max(0));
            }
        }

        let bookings = query
            .build_query_as::<BookingDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }
}
