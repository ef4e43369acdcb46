//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LendHub API",
        version = "1.0.0",
        description = "Peer-to-peer item sharing REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::get_all,
        users::get_by_id,
        users::create,
        users::update,
        users::delete,
        // Items
        items::get_all,
        items::get_by_id,
        items::create,
        items::update,
        items::search,
        items::create_comment,
        // Bookings
        bookings::create,
        bookings::decide,
        bookings::get_by_id,
        bookings::get_all_by_user,
        bookings::get_all_by_owner,
        // Requests
        requests::create,
        requests::get_all_by_user,
        requests::get_all,
        requests::get_by_id,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Items
            crate::models::item::ItemDto,
            crate::models::item::ItemDetails,
            crate::models::item::ItemShort,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            // Bookings
            crate::models::booking::BookingStatus,
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingShort,
            crate::models::booking::CreateBooking,
            // Comments
            crate::models::comment::CommentDto,
            crate::models::comment::CreateComment,
            // Requests
            crate::models::request::ItemRequestDto,
            crate::models::request::CreateItemRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management"),
        (name = "items", description = "Shared item management"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Item requests")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
