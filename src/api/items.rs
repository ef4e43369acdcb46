//! Item management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        comment::{CommentDto, CreateComment},
        item::{CreateItem, ItemDetails, ItemDto, UpdateItem},
    },
};

use super::SharerUserId;

#[derive(Deserialize)]
pub struct SearchParams {
    pub text: String,
}

/// List the caller's items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    responses(
        (status = 200, description = "Items owned by the caller", body = Vec<ItemDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_all(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.items.get_all(user_id).await?;
    Ok(Json(items))
}

/// Get item details by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_by_id(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_by_id(id, user_id).await?;
    Ok(Json(item))
}

/// List a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = ItemDto),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(item): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemDto>)> {
    item.validate()?;

    let created = state.services.items.create(item, user_id).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Partially update an item
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = ItemDto),
        (status = 404, description = "Item not found or not owned by the caller")
    )
)]
pub async fn update(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(item): Json<UpdateItem>,
) -> AppResult<Json<ItemDto>> {
    let updated = state.services.items.update(id, item, user_id).await?;
    Ok(Json(updated.into()))
}

/// Search available items by text
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        ("text" = String, Query, description = "Search text"),
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    responses(
        (status = 200, description = "Matching available items", body = Vec<ItemDto>)
    )
)]
pub async fn search(
    State(state): State<crate::AppState>,
    SharerUserId(_user_id): SharerUserId,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ItemDto>>> {
    let items = state.services.items.search(&params.text).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Comment on an item after a finished booking
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Caller has no finished booking of this item"),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(comment): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    comment.validate()?;

    let created = state
        .services
        .items
        .create_comment(user_id, id, comment)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
