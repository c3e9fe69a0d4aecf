//! Catalog (book) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDraft, BookQuery, CreateBook, UpdateBook},
        hold::CirculationStatus,
    },
};

use super::{AuthenticatedUser, MaybeAuthenticated};

/// Book detail with the viewer's circulation status. `circulation` is only
/// present for authenticated viewers.
#[derive(Serialize, ToSchema)]
pub struct BookDetailResponse {
    pub book: Book,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circulation: Option<CirculationStatus>,
}

/// Prefill request: the source page to scrape
#[derive(Deserialize, Validate, ToSchema)]
pub struct PrefillRequest {
    #[validate(url(message = "Invalid source URL"))]
    pub url: String,
}

/// List books, sorted by the given key
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 400, description = "Unknown sort key")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .catalog
        .list_books(query.sort.as_deref())
        .await?;
    Ok(Json(books))
}

/// Get book details. Authenticated viewers also get their own circulation
/// status: whether they hold the book and their hold queue position.
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetailResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    MaybeAuthenticated(claims): MaybeAuthenticated,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetailResponse>> {
    let book = state.services.catalog.get_book(id).await?;

    let circulation = match claims {
        Some(claims) => Some(state.services.circulation.status(id, claims.user_id).await?),
        None => None,
    };

    Ok(Json(BookDetailResponse { book, circulation }))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_librarian()?;
    book.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Scrape a source page into a create-book draft
#[utoipa::path(
    post,
    path = "/books/prefill",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = PrefillRequest,
    responses(
        (status = 200, description = "Draft extracted from source page", body = BookDraft),
        (status = 403, description = "Librarian privileges required"),
        (status = 502, description = "Source page could not be fetched")
    )
)]
pub async fn prefill_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<PrefillRequest>,
) -> AppResult<Json<BookDraft>> {
    claims.require_librarian()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let draft = state.services.gutenberg.prefill(&request.url).await?;
    Ok(Json(draft))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;
    book.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.catalog.update_book(id, book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
