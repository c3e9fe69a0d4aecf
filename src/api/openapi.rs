//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, circulation, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lectern API",
        version = "1.0.0",
        description = "Library Checkout Server REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Lectern Team", email = "contact@lectern.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::prefill_book,
        books::update_book,
        books::delete_book,
        // Circulation
        circulation::checkout,
        circulation::checkin,
        circulation::hold,
        circulation::remove_hold,
        // Users
        users::create_user,
        users::get_user,
        users::update_role,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookDraft,
            books::BookDetailResponse,
            books::PrefillRequest,
            // Circulation
            crate::models::hold::CirculationStatus,
            crate::models::hold::HoldEntry,
            circulation::CheckoutResponse,
            circulation::CheckinResponse,
            circulation::HoldResponse,
            // Users
            crate::models::user::Role,
            crate::models::user::CreateUser,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateRole,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "circulation", description = "Checkouts and hold queue"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
