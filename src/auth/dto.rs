use serde::{Deserialize, Serialize};

use crate::{
    users::dto::CreateUserRequest,
    validation::{check_email, check_password, check_username, Validate},
};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        check_username(&self.username)?;
        check_email(&self.email)?;
        check_password(&self.password)
    }
}

impl From<RegisterRequest> for CreateUserRequest {
    // Self-registration never picks a role.
    fn from(r: RegisterRequest) -> Self {
        CreateUserRequest {
            username: r.username,
            email: r.email,
            password: r.password,
            role: None,
        }
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err("Password is required".into());
        }
        Ok(())
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}
