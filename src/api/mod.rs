//! API handlers for LendHub REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, AppState};

/// Name of the header carrying the calling user's identity
pub const SHARER_USER_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the calling user's id from the X-Sharer-User-Id header
pub struct SharerUserId(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for SharerUserId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(SHARER_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing {} header", SHARER_USER_HEADER))
            })?;

        let user_id = header.trim().parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!("Invalid {} header", SHARER_USER_HEADER))
        })?;

        Ok(SharerUserId(user_id))
    }
}
