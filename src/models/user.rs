//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "must not be blank"))]
    pub name: String,
    #[validate(email(message = "must be a well-formed email address"))]
    pub email: String,
}

/// Partial user update: absent fields keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "must not be blank"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a well-formed email address"))]
    pub email: Option<String>,
}
