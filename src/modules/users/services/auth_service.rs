use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::core::{AppError, ExpiringCache, Result};
use crate::modules::users::models::{AuthenticatedUser, NewUser, Role, Session, UserSummary};
use crate::modules::users::repositories::{SessionStore, UserStore};
use crate::modules::users::services::dispatcher::{dispatch, LandingView};
use crate::modules::users::services::login_limiter::LoginAttemptLimiter;
use crate::modules::users::services::password::{
    generate_session_token, hash_password, hash_session_token, verify_password,
};

/// Role lookups by user id, kept for a short TTL to spare the user table
pub type RoleCache = ExpiringCache<String, Role>;

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
    pub user: UserSummary,
    pub landing: LandingView,
    pub redirect: &'static str,
}

/// Login, session resolution and user administration
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    role_cache: Arc<RoleCache>,
    limiter: Arc<LoginAttemptLimiter>,
    session_ttl: chrono::Duration,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        role_cache: Arc<RoleCache>,
        limiter: Arc<LoginAttemptLimiter>,
        session_ttl: Duration,
    ) -> Result<Self> {
        let session_ttl = chrono::Duration::from_std(session_ttl)
            .map_err(|_| AppError::Configuration("Session TTL out of range".to_string()))?;

        Ok(Self {
            users,
            sessions,
            role_cache,
            limiter,
            session_ttl,
        })
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// # Errors
    /// `RateLimitExceeded` while the account is locked out after repeated
    /// failures, `Unauthorized` for unknown email or wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let key = normalize_email(email);

        let attempts = match self.limiter.try_acquire(&key) {
            Ok(attempts) => attempts,
            Err(retry_after) => {
                warn!(email = %key, "Login refused, too many failed attempts");
                return Err(AppError::rate_limited(
                    "Too many failed login attempts. Please try again later.",
                    Some(retry_after.as_secs().max(1)),
                ));
            }
        };

        let user = match self.users.find_by_email(&key).await? {
            Some(user) if verify_password(password, &user.password_hash)? => user,
            _ => {
                warn!(email = %key, attempts, "Failed login attempt");
                return Err(AppError::unauthorized("Invalid email or password"));
            }
        };

        self.limiter.reset(&key);

        let token = generate_session_token();
        let expires_at = Utc::now() + self.session_ttl;
        self.sessions
            .create(&Session {
                token_hash: hash_session_token(&token),
                user_id: user.id.clone(),
                expires_at,
            })
            .await?;
        self.role_cache.insert(user.id.clone(), user.role);

        let landing = dispatch(user.role);
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginOutcome {
            token,
            expires_at,
            user: UserSummary::from(&user),
            landing,
            redirect: landing.path(),
        })
    }

    /// Resolve a bearer token to the user id and current role
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let token_hash = hash_session_token(token);
        let session = self
            .sessions
            .find(&token_hash)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid session token"))?;

        if session.is_expired(Utc::now()) {
            self.sessions.delete(&token_hash).await?;
            return Err(AppError::unauthorized("Session expired"));
        }

        let role = self.role_for(&session.user_id).await?;
        Ok(AuthenticatedUser {
            user_id: session.user_id,
            role,
        })
    }

    async fn role_for(&self, user_id: &str) -> Result<Role> {
        let key = user_id.to_string();
        if let Some(role) = self.role_cache.get(&key) {
            return Ok(role);
        }

        let role = self
            .users
            .find_role(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;
        self.role_cache.insert(key, role);
        Ok(role)
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.delete(&hash_session_token(token)).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<UserSummary> {
        new_user.validate()?;
        let password_hash = hash_password(&new_user.password)?;

        let user = self
            .users
            .create(
                &normalize_email(&new_user.email),
                new_user.name.trim(),
                &password_hash,
                new_user.role,
            )
            .await?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(UserSummary::from(&user))
    }

    /// Change a user's role; the cached claim is dropped so the next request sees it
    pub async fn update_role(&self, user_id: &str, role: Role) -> Result<()> {
        if !self.users.update_role(user_id, role).await? {
            return Err(AppError::not_found(format!("User {}", user_id)));
        }
        self.role_cache.invalidate(&user_id.to_string());

        info!(user_id = %user_id, role = %role, "User role changed");
        Ok(())
    }
}
