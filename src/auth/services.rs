use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::{
    error::AppError,
    state::AppState,
    users::{normalize_email, PublicUser},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Registration input after validation: trimmed name, normalized email.
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for NewUser {
    type Error = AppError;

    fn try_from(req: RegisterRequest) -> Result<Self, Self::Error> {
        let name = required_trimmed(req.name, "name")?;
        let email = normalize_email(&required_trimmed(req.email, "email")?);
        let password = required_raw(req.password, "password")?;
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email"));
        }
        Ok(Self {
            name,
            email,
            password,
        })
    }
}

pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = AppError;

    fn try_from(req: LoginRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: normalize_email(&required_trimmed(req.email, "email")?),
            password: required_raw(req.password, "password")?,
        })
    }
}

fn required_trimmed(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}

// passwords are compared byte for byte, so no trimming
fn required_raw(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}

#[instrument(skip_all, fields(email = %input.email))]
pub async fn register(state: &AppState, input: NewUser) -> Result<AuthResponse, AppError> {
    let users = state.users.as_ref();
    // The store's unique constraint is authoritative; this only skips
    // hashing for known duplicates.
    if users.find_by_email(&input.email).await?.is_some() {
        warn!("email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = state.passwords.hash_blocking(input.password).await?;
    let user = users.create(&input.name, &input.email, &hash).await?;
    let token = state.jwt.sign(user.id).context("sign token")?;

    info!(user_id = %user.id, "user registered");
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

#[instrument(skip_all, fields(email = %creds.email))]
pub async fn login(state: &AppState, creds: Credentials) -> Result<AuthResponse, AppError> {
    let Some(user) = state.users.find_by_email(&creds.email).await? else {
        warn!("login unknown email");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    };

    let matches = state
        .passwords
        .verify_blocking(creds.password, user.password_hash.clone())
        .await?;
    if !matches {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.jwt.sign(user.id).context("sign token")?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

#[instrument(skip(state))]
pub async fn profile(state: &AppState, user_id: Uuid) -> Result<PublicUser, AppError> {
    match state.users.find_by_id(user_id).await? {
        Some(user) => Ok(user.into()),
        None => {
            warn!("token owner no longer exists");
            Err(AppError::NotFound("User not found".into()))
        }
    }
}
