//! Booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::booking::{BookingDetails, CreateBooking},
};

use super::SharerUserId;

#[derive(Deserialize)]
pub struct DecideParams {
    pub approved: bool,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl ListParams {
    fn unpack(self) -> (String, i64, i64) {
        (
            self.state.unwrap_or_else(|| "ALL".to_string()),
            self.from.unwrap_or(0),
            self.size.unwrap_or(10),
        )
    }
}

/// Create a booking for an item
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booking user ID")
    ),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created in WAITING status", body = BookingDetails),
        (status = 400, description = "Item unavailable or booking period invalid"),
        (status = 404, description = "User or item not found, or caller owns the item")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(booking): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    let created = state.services.bookings.create(booking, user_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve or reject a waiting booking
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("approved" = bool, Query, description = "true to approve, false to reject"),
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner ID")
    ),
    responses(
        (status = 200, description = "Booking decided", body = BookingDetails),
        (status = 400, description = "Booking already decided"),
        (status = 404, description = "Booking not found or caller is not the owner")
    )
)]
pub async fn decide(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(params): Query<DecideParams>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state
        .services
        .bookings
        .decide(id, user_id, params.approved)
        .await?;
    Ok(Json(booking))
}

/// Get a booking by ID
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 404, description = "Booking not found or caller may not view it")
    )
)]
pub async fn get_by_id(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.get_by_id(id, user_id).await?;
    Ok(Json(booking))
}

/// List the caller's bookings, filtered by state
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED (default ALL)"),
        ("from" = Option<i64>, Query, description = "Index to page from (default 0)"),
        ("size" = Option<i64>, Query, description = "Page size (default 10)"),
        ("X-Sharer-User-Id" = i64, Header, description = "Booking user ID")
    ),
    responses(
        (status = 200, description = "Bookings made by the caller", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state or invalid page window"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_all_by_user(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let (booking_state, from, size) = params.unpack();
    let bookings = state
        .services
        .bookings
        .get_all_by_user(user_id, &booking_state, from, size)
        .await?;
    Ok(Json(bookings))
}

/// List bookings on the caller's items, filtered by state
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED (default ALL)"),
        ("from" = Option<i64>, Query, description = "Index to page from (default 0)"),
        ("size" = Option<i64>, Query, description = "Page size (default 10)"),
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner ID")
    ),
    responses(
        (status = 200, description = "Bookings on items owned by the caller", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state or invalid page window"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_all_by_owner(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let (booking_state, from, size) = params.unpack();
    let bookings = state
        .services
        .bookings
        .get_all_by_owner(user_id, &booking_state, from, size)
        .await?;
    Ok(Json(bookings))
}
