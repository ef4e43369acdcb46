//! Item request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppResult,
    models::request::{CreateItemRequest, ItemRequestDto},
};

use super::SharerUserId;

#[derive(Deserialize)]
pub struct PageParams {
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Post a new item request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requesting user ID")
    ),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Request created", body = ItemRequestDto),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemRequestDto>)> {
    request.validate()?;

    let created = state.services.requests.create(request, user_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's own requests
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    responses(
        (status = 200, description = "Requests posted by the caller", body = Vec<ItemRequestDto>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_all_by_user(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemRequestDto>>> {
    let requests = state.services.requests.get_all_by_user(user_id).await?;
    Ok(Json(requests))
}

/// List requests fulfilled by the caller's items
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        ("from" = Option<i64>, Query, description = "Index to page from (default 0)"),
        ("size" = Option<i64>, Query, description = "Page size (default 10)"),
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    responses(
        (status = 200, description = "Requests the caller's items were listed against", body = Vec<ItemRequestDto>),
        (status = 400, description = "Invalid page window"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_all(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<ItemRequestDto>>> {
    let requests = state
        .services
        .requests
        .get_all(user_id, params.from.unwrap_or(0), params.size.unwrap_or(10))
        .await?;
    Ok(Json(requests))
}

/// Get a request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    responses(
        (status = 200, description = "Request details", body = ItemRequestDto),
        (status = 404, description = "User or request not found")
    )
)]
pub async fn get_by_id(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestDto>> {
    let request = state.services.requests.get_by_id(user_id, id).await?;
    Ok(Json(request))
}
