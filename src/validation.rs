use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::AppError;

pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Field-level checks run after a body has been deserialized.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn check_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("The username cannot be empty".into());
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(format!(
            "The username cannot exceed {} characters",
            USERNAME_MAX_LEN
        ));
    }
    Ok(())
}

pub fn check_email(email: &str) -> Result<(), String> {
    if !is_valid_email(&normalize_email(email)) {
        return Err("E-mail is not valid.".into());
    }
    Ok(())
}

pub fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(format!(
            "The password must have at least {} characters",
            PASSWORD_MIN_LEN
        ));
    }
    Ok(())
}

/// JSON body that has passed deserialization and [`Validate`].
///
/// Malformed JSON, wrong types, missing or unknown fields (the DTOs use
/// `deny_unknown_fields`) and failed field checks all reject with
/// [`AppError::Validation`].
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rej| AppError::Validation(rej.body_text()))?;
        value.validate().map_err(AppError::Validation)?;
        Ok(ValidatedJson(value))
    }
}

/// `{id}` path segment parsed as a UUID.
pub struct PathId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rej| AppError::Validation(rej.body_text()))?;
        let id = Uuid::parse_str(&raw)
            .map_err(|_| AppError::Validation("Validation failed (uuid is expected)".into()))?;
        Ok(PathId(id))
    }
}
