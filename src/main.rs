mod config;
mod controllers;
mod database;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod utils;

use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::connection::{create_pool, run_migrations};
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Car Rental Backend - API de alquiler de coches");
    info!("=================================================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    run_migrations(&pool).await?;
    info!("✅ Migraciones aplicadas");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // CORS permisivo solo en desarrollo
    let cors = if config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(pool, config);

    let app = routes::create_api_router(app_state.clone())
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/register - Registrar cliente");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Perfil del usuario actual");
    info!("🚗 Cars:");
    info!("   GET  /api/cars - Listar flota");
    info!("   GET  /api/cars/available - Disponibilidad por fechas");
    info!("   GET  /api/cars/popular - Coches más alquilados");
    info!("   GET  /api/cars/:id - Obtener coche");
    info!("📅 Bookings:");
    info!("   GET  /api/bookings/price-quote - Calcular precio");
    info!("   POST /api/bookings - Crear reserva");
    info!("   GET  /api/bookings/my-bookings - Mis reservas");
    info!("   PUT  /api/bookings/:id/status - Transicionar estado");
    info!("💳 Payments:");
    info!("   POST /api/payments - Registrar pago");
    info!("   GET  /api/payments/booking/:booking_id - Pagos de una reserva");
    info!("📍 Locations:");
    info!("   GET  /api/locations - Listar ubicaciones");
    info!("⭐ Reviews:");
    info!("   GET  /api/reviews/car/:car_id - Reseñas de un coche");
    info!("   POST /api/reviews - Crear reseña");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
