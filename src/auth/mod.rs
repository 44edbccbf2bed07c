use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::AppError;

pub const USER_COOKIE: &str = "token";
pub const ADMIN_COOKIE: &str = "admin_token";

const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const ROLE_USER: &str = "user";
const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub secure_cookies: bool,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, secure_cookies: bool) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            secure_cookies,
        }
    }

    pub fn issue_user_token(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue(user_id.to_string(), ROLE_USER)
    }

    pub fn issue_admin_token(&self) -> Result<String, AppError> {
        self.issue(ROLE_ADMIN.to_string(), ROLE_ADMIN)
    }

    fn issue(&self, sub: String, role: &str) -> Result<String, AppError> {
        let claims = Claims {
            sub,
            role: role.to_string(),
            exp: chrono::Utc::now().timestamp() + TOKEN_TTL_SECS,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalServerError(format!("Failed to sign token: {e}")))
    }

    fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthError("Session expired. Please login again.".to_string())
            }
            _ => AppError::AuthError("Invalid token. Please login again.".to_string()),
        })
    }

    /// Builds an httpOnly Set-Cookie header for a session cookie.
    pub fn session_cookie(&self, name: &str, token: &str) -> (axum::http::HeaderName, HeaderValue) {
        let value = format!(
            "{name}={token}; HttpOnly; Path=/; Max-Age={TOKEN_TTL_SECS}; SameSite={}{}",
            if self.secure_cookies { "Strict" } else { "Lax" },
            if self.secure_cookies { "; Secure" } else { "" },
        );
        (
            SET_COOKIE,
            HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("")),
        )
    }

    /// Builds a Set-Cookie header that clears a session cookie.
    pub fn clear_cookie(&self, name: &str) -> (axum::http::HeaderName, HeaderValue) {
        let value = format!(
            "{name}=; HttpOnly; Path=/; Max-Age=0; SameSite={}{}",
            if self.secure_cookies { "Strict" } else { "Lax" },
            if self.secure_cookies { "; Secure" } else { "" },
        );
        (
            SET_COOKIE,
            HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("")),
        )
    }
}

fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    let header = parts.headers.get(COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Authenticated storefront user, extracted from the `token` cookie.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthConfig::from_ref(state);
        let token = cookie_value(parts, USER_COOKIE)
            .ok_or_else(|| AppError::AuthError("Not authorized".to_string()))?;
        let claims = auth.verify(&token)?;
        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AppError::AuthError("Invalid token. Please login again.".to_string()))?;
        Ok(AuthUser(user_id))
    }
}

/// Authenticated admin, extracted from the `admin_token` cookie.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub admin_id: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthConfig::from_ref(state);
        let token = cookie_value(parts, ADMIN_COOKIE).ok_or_else(|| {
            AppError::AuthError("Admin access required. Please login.".to_string())
        })?;
        let claims = auth.verify(&token)?;
        if claims.role != ROLE_ADMIN {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AuthAdmin {
            admin_id: claims.sub,
        })
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {e}")))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    argon2::verify_encoded(hash, password.as_bytes()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig::new("test-secret", false)
    }

    #[test]
    fn user_token_round_trips() {
        let auth = test_config();
        let user_id = Uuid::new_v4();
        let token = auth.issue_user_token(user_id).unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, ROLE_USER);
    }

    #[test]
    fn admin_token_carries_admin_role() {
        let auth = test_config();
        let token = auth.issue_admin_token().unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.role, ROLE_ADMIN);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let auth = test_config();
        let other = AuthConfig::new("different-secret", false);
        let token = auth.issue_admin_token().unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn session_cookie_is_http_only() {
        let auth = test_config();
        let (_, value) = auth.session_cookie(USER_COOKIE, "abc");
        let value = value.to_str().unwrap();
        assert!(value.starts_with("token=abc"));
        assert!(value.contains("HttpOnly"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn secure_cookie_in_production_mode() {
        let auth = AuthConfig::new("s", true);
        let (_, value) = auth.session_cookie(ADMIN_COOKIE, "abc");
        let value = value.to_str().unwrap();
        assert!(value.contains("Secure"));
        assert!(value.contains("SameSite=Strict"));
    }
}
