//! Controller de autenticación
//!
//! Registro, login y perfil. Las contraseñas se almacenan con bcrypt y
//! la sesión se materializa en un JWT firmado con el secreto de entorno.

use sqlx::PgPool;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{LoginRequest, LoginResponse, RegisterRequest, UserProfile, UserRole};
use crate::models::ApiResponse;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::generate_token;

pub struct AuthController {
    repository: UserRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            config,
        }
    }

    /// Registrar un nuevo cliente
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<UserProfile>, AppError> {
        self.register_with_role(request, UserRole::Customer).await
    }

    /// Registrar un administrador (solo accesible desde rutas admin)
    pub async fn register_admin(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<UserProfile>, AppError> {
        self.register_with_role(request, UserRole::Admin).await
    }

    async fn register_with_role(
        &self,
        request: RegisterRequest,
        role: UserRole,
    ) -> Result<ApiResponse<UserProfile>, AppError> {
        request.validate()?;

        let password_hash = bcrypt::hash(&request.password, self.config.bcrypt_cost)
            .map_err(|e| AppError::Hash(format!("Error al hashear contraseña: {}", e)))?;

        let user = self
            .repository
            .create(
                request.name,
                request.email,
                password_hash,
                request.phone,
                request.address,
                request.driver_license_number,
                role,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            UserProfile::from(user),
            "User registered successfully".to_string(),
        ))
    }

    /// Autenticar un usuario y emitir un token de acceso.
    ///
    /// El mismo mensaje de error cubre email inexistente y contraseña
    /// incorrecta para no filtrar qué cuentas existen.
    pub async fn login(&self, request: LoginRequest) -> Result<ApiResponse<LoginResponse>, AppError> {
        request.validate()?;

        let invalid =
            || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error al verificar contraseña: {}", e)))?;

        if !valid {
            return Err(invalid());
        }

        let access_token = generate_token(user.id, user.role.as_str(), &self.config)?;

        Ok(ApiResponse::success_with_message(
            LoginResponse {
                access_token,
                user: UserProfile::from(user),
            },
            "Login successful".to_string(),
        ))
    }

    /// Perfil del usuario autenticado
    pub async fn me(&self, user: &AuthenticatedUser) -> Result<UserProfile, AppError> {
        self.repository
            .get_profile(user.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))
    }
}
