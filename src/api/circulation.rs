//! Checkout and hold queue endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Checkin query parameters
#[derive(Deserialize, ToSchema)]
pub struct CheckinParams {
    /// Redirect target echoed back to the caller after checkin
    pub next: Option<String>,
}

/// Checkout confirmation
#[derive(Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub status: String,
    pub book_id: i32,
}

/// Checkin confirmation. When the hold queue was non-empty, `promoted_user_id`
/// names the user who now has the book.
#[derive(Serialize, ToSchema)]
pub struct CheckinResponse {
    pub status: String,
    pub book_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

/// Hold confirmation with the caller's queue position
#[derive(Serialize, ToSchema)]
pub struct HoldResponse {
    pub status: String,
    pub book_id: i32,
    pub queue_position: usize,
}

/// Check a book out to the calling user
#[utoipa::path(
    post,
    path = "/books/{id}/checkout",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book checked out", body = CheckoutResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckoutResponse>> {
    state.services.circulation.checkout(id, claims.user_id).await?;

    Ok(Json(CheckoutResponse {
        status: "checked_out".to_string(),
        book_id: id,
    }))
}

/// Check a book back in. If other users are waiting, the head of the hold
/// queue is promoted to checked-out and notified by email.
#[utoipa::path(
    post,
    path = "/books/{id}/checkin",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("next" = Option<String>, Query, description = "Redirect target echoed back to the caller")
    ),
    responses(
        (status = 200, description = "Book checked in", body = CheckinResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn checkin(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(params): Query<CheckinParams>,
) -> AppResult<Json<CheckinResponse>> {
    let promoted = state.services.circulation.checkin(id, claims.user_id).await?;

    Ok(Json(CheckinResponse {
        status: "checked_in".to_string(),
        book_id: id,
        promoted_user_id: promoted,
        redirect_to: params.next,
    }))
}

/// Join the hold queue for a book
#[utoipa::path(
    post,
    path = "/books/{id}/hold",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Hold placed", body = HoldResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Already in the hold queue")
    )
)]
pub async fn hold(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<HoldResponse>> {
    state.services.circulation.hold(id, claims.user_id).await?;
    let status = state.services.circulation.status(id, claims.user_id).await?;

    Ok(Json(HoldResponse {
        status: "on_hold".to_string(),
        book_id: id,
        queue_position: status.queue_position.unwrap_or(0),
    }))
}

/// Leave the hold queue for a book
#[utoipa::path(
    delete,
    path = "/books/{id}/hold",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Hold removed"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book or hold not found")
    )
)]
pub async fn remove_hold(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .services
        .circulation
        .remove_hold(id, claims.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
