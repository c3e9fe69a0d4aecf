//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, RegisterUser, Role, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by login and password, returning a JWT token and the user
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid login or password".to_string(),
            ));
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Create a JWT token for a user
    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Self-registration; always creates a patron account
    pub async fn register(&self, request: RegisterUser) -> AppResult<User> {
        if self.repository.users.login_exists(&request.login).await? {
            return Err(AppError::Conflict("Login is already taken".to_string()));
        }

        let hashed = self.hash_password(&request.password)?;
        self.repository
            .users
            .create(
                &request.login,
                &hashed,
                request.email.as_deref(),
                request.firstname.as_deref(),
                request.lastname.as_deref(),
                Role::Patron,
            )
            .await
    }

    /// Create a user with an explicit role (admin endpoint)
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        if self.repository.users.login_exists(&request.login).await? {
            return Err(AppError::Conflict("Login is already taken".to_string()));
        }

        let hashed = self.hash_password(&request.password)?;
        self.repository
            .users
            .create(
                &request.login,
                &hashed,
                request.email.as_deref(),
                request.firstname.as_deref(),
                request.lastname.as_deref(),
                request.role.unwrap_or(Role::Patron),
            )
            .await
    }

    /// Get user by ID
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Change a user's role
    pub async fn update_role(&self, id: i32, role: Role) -> AppResult<User> {
        self.repository.users.update_role(id, role).await
    }

    /// Ensure the configured bootstrap admin account exists
    pub async fn ensure_admin(&self) -> AppResult<()> {
        if self
            .repository
            .users
            .login_exists(&self.config.admin_login)
            .await?
        {
            return Ok(());
        }

        let hashed = self.hash_password(&self.config.admin_password)?;
        self.repository
            .users
            .create(&self.config.admin_login, &hashed, None, None, None, Role::Admin)
            .await?;
        tracing::info!(login = %self.config.admin_login, "bootstrap admin account created");
        Ok(())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
