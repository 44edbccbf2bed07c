use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::auth::{hash_password, verify_password, AuthUser, USER_COOKIE};
use crate::db::UserRepo;
use crate::models::user::{LoginRequest, PublicUser, RegisterRequest};
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

fn validate_identity(name: &str, email: &str) -> Result<(), AppError> {
    if name.is_empty() || email.is_empty() {
        return Err(AppError::ValidationError(
            "Name and email are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    validate_identity(name, &email)?;
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;
    let user = UserRepo::new(&state.pool)
        .create(name, &email, &password_hash)
        .await?;

    let token = state.auth.issue_user_token(user.id)?;
    let cookie = state.auth.session_cookie(USER_COOKIE, &token);

    Ok((
        [cookie],
        success(PublicUser::from(&user), "Account created"),
    )
        .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = UserRepo::new(&state.pool)
        .find_by_email(&email)
        .await?
        .filter(|user| verify_password(&user.password_hash, &req.password))
        .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    let token = state.auth.issue_user_token(user.id)?;
    let cookie = state.auth.session_cookie(USER_COOKIE, &token);

    Ok(([cookie], success(PublicUser::from(&user), "Logged in")).into_response())
}

pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = state.auth.clear_cookie(USER_COOKIE);
    ([cookie], empty_success("Logged out")).into_response()
}

pub async fn is_auth(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let user = UserRepo::new(&state.pool).find_by_id(user_id).await?;
    Ok(success(PublicUser::from(&user), "Authenticated").into_response())
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Response, AppError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    validate_identity(name, &email)?;

    let user = UserRepo::new(&state.pool)
        .update_profile(user_id, name, &email)
        .await?;
    Ok(success(PublicUser::from(&user), "Profile Updated").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_identity_validation() {
        assert!(validate_identity("Mina", "mina@example.com").is_ok());
        assert!(validate_identity("", "mina@example.com").is_err());
        assert!(validate_identity("Mina", "").is_err());
        assert!(validate_identity("Mina", "not-an-email").is_err());
    }
}
