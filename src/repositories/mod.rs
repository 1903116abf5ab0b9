//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula el SQL parametrizado de una entidad.
//! Las transiciones de estado multi-tabla (booking/payment) corren
//! siempre dentro de una transacción única.

pub mod booking_repository;
pub mod car_repository;
pub mod location_repository;
pub mod payment_repository;
pub mod review_repository;
pub mod user_repository;
