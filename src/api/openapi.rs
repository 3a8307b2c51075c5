//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt API",
        version = "1.0.0",
        description = "Peer-to-Peer Item Sharing REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::search_items,
        items::create_comment,
        // Bookings
        bookings::create_booking,
        bookings::approve_booking,
        bookings::get_booking,
        bookings::list_bookings,
        bookings::list_owner_bookings,
        // Requests
        requests::create_request,
        requests::list_own_requests,
        requests::list_all_requests,
        requests::get_request,
    ),
    components(schemas(
        health::HealthResponse,
        crate::error::ErrorResponse,
        crate::models::user::User,
        crate::models::user::UserShort,
        crate::models::user::CreateUser,
        crate::models::user::UpdateUser,
        crate::models::item::Item,
        crate::models::item::ItemShort,
        crate::models::item::CreateItem,
        crate::models::item::UpdateItem,
        crate::models::item::ItemResponse,
        crate::models::booking::BookingStatus,
        crate::models::booking::CreateBooking,
        crate::models::booking::BookingResponse,
        crate::models::booking::BookingShort,
        crate::models::comment::CreateComment,
        crate::models::comment::CommentResponse,
        crate::models::request::CreateRequest,
        crate::models::request::RequestResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "users", description = "User accounts"),
        (name = "items", description = "Item catalog"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Item requests")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
