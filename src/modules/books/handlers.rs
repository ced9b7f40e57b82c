use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use shelf_http::error::AppError;

use super::models::{Book, BookList, CreateBook};
use super::store::{BookStore, StoreError};

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found("book not found"),
            StoreError::Poisoned => AppError::Internal(err.into()),
        }
    }
}

/// `GET /books`
pub async fn list_books(State(store): State<Arc<BookStore>>) -> Result<Json<BookList>, AppError> {
    let items = store.list()?;
    Ok(Json(BookList { items }))
}

/// `POST /books`
///
/// The body is decoded as JSON whatever `Content-Type` says.
pub async fn create_book(
    State(store): State<Arc<BookStore>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let payload: CreateBook = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "create payload rejected");
        AppError::bad_request("invalid JSON payload")
    })?;

    let (title, author) = payload
        .normalized()
        .ok_or_else(|| AppError::bad_request("title and author are required"))?;

    let book = store.create(title, author)?;
    tracing::info!(id = book.id, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(store): State<Arc<BookStore>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = id
        .ok()
        .and_then(|Path(raw)| raw.parse::<i64>().ok())
        .ok_or_else(|| AppError::bad_request("invalid book id"))?;

    Ok(Json(store.get(id)?))
}

/// `GET /books/` with no identifier
pub async fn missing_book_id() -> AppError {
    AppError::not_found("book not found")
}
