use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, NewAccount, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    uid: String,
    exp: usize,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, service::AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, UserRole};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let input = RegisterInput {
    ///     first_name: "Amira".into(), last_name: "Ben Salah".into(),
    ///     email: "amira@example.com".into(), password: "Secret123".into(),
    ///     role: UserRole::Client, city: "Tunis".into(), phone: "21612345".into(),
    ///     address: None, photo: None,
    /// };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "amira@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        for (field, value) in [
            ("firstName", &input.first_name),
            ("lastName", &input.last_name),
            ("email", &input.email),
            ("city", &input.city),
            ("phone", &input.phone),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::Validation(format!("{field} is mandatory")));
            }
        }
        if !input.email.contains('@') {
            return Err(AuthError::Validation("invalid email".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some((existing, _)) = self.repo.find_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self
            .repo
            .create_account(NewAccount {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                password_hash: hash,
                role: input.role,
                city: input.city,
                phone: input.phone,
                address: input.address,
                photo: input.photo,
            })
            .await?;
        info!(user_id = %user.id, email = %user.email, role = ?user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a bearer token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let (user, stored_hash) = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed =
            PasswordHash::new(&stored_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to its account; the `currentUser` primitive
    /// the protected routes build on.
    pub async fn current_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let uid = self.verify_token(token)?;
        self.repo.find_by_id(uid).await?.ok_or(AuthError::NotFound)
    }

    fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours))
            .timestamp() as usize;
        let claims = Claims { sub: user.email.clone(), uid: user.id.to_string(), exp };
        encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::Unauthorized)?;
        Uuid::parse_str(&data.claims.uid).map_err(|_| AuthError::Unauthorized)
    }
}
