//! Authentication service - registration, login and token verification.
//!
//! Password hashing lives in `domain::Password`; this service only decides
//! who may sign up or sign in and issues the JWT.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Identity, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Caller identity carried by the token. An unknown role means the
    /// token was not issued by this service.
    pub fn identity(&self) -> AppResult<Identity> {
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::Unauthorized)?;
        Ok(Identity::new(self.sub, role))
    }
}

/// Token returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// A signed-in user together with their token
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: TokenResponse,
}

/// Sign-up input after request validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and sign them in
    async fn register(&self, registration: Registration) -> AppResult<Session>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<Session>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to the caller's current identity.
    ///
    /// The account is reloaded on every call: a deactivated or deleted user
    /// is `Unauthorized` even while their token is unexpired, and the role
    /// comes from the stored account rather than the token.
    async fn authenticate(&self, token: &str) -> AppResult<Identity>;
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<Session> {
        match registration.role {
            UserRole::Admin if !self.config.allow_admin_signup => {
                tracing::warn!("Refused admin self-registration");
                return Err(AppError::Forbidden);
            }
            UserRole::Admin | UserRole::SalesManager | UserRole::SalesMember => {}
        }

        let name = registration.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::invalid_field("name", "Name is required"));
        }

        let email = normalize_email(&registration.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password = Password::new(&registration.password)?;
        let user = User::new(name, email, password.into_string(), registration.role);
        let user = self.uow.users().create(user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        let token = generate_token(&user, &self.config)?;
        Ok(Session { user, token })
    }

    async fn login(&self, email: String, password: String) -> AppResult<Session> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        // Verify even for unknown emails so timing does not reveal which
        // accounts exist.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()),
            None => Password::unmatchable(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid && user.is_active => {
                let token = generate_token(&user, &self.config)?;
                Ok(Session { user, token })
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Identity> {
        let claims = self.verify_token(token)?;
        let claimed = claims.identity()?;

        match self.uow.users().find_by_id(claimed.user_id).await? {
            Some(user) if user.is_active => Ok(Identity::new(user.id, user.role)),
            Some(_) => {
                tracing::debug!(user_id = %claimed.user_id, "Token presented for inactive user");
                Err(AppError::Unauthorized)
            }
            None => Err(AppError::Unauthorized),
        }
    }
}
