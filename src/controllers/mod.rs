//! Controllers del sistema
//!
//! Cada controller valida input, aplica autorización y delega en su
//! repositorio. La lógica transaccional vive en repositories/.

pub mod auth_controller;
pub mod booking_controller;
pub mod car_controller;
pub mod location_controller;
pub mod payment_controller;
pub mod review_controller;

pub use auth_controller::AuthController;
pub use booking_controller::BookingController;
pub use car_controller::CarController;
pub use location_controller::LocationController;
pub use payment_controller::PaymentController;
pub use review_controller::ReviewController;
