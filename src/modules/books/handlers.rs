//! HTTP handlers for the book resource.
//!
//! Writes go through the schema before the repository is touched; reads and
//! deletes only need the `isbn` path segment.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use shelf_http::error::AppError;

use super::models::{Book, BookChanges, BookEnvelope, BookListEnvelope, MessageEnvelope};
use super::repository::{BookRepository, RepoError};
use super::schema::{BookSchema, SchemaViolation};

/// Shared state for the book routes.
#[derive(Clone)]
pub struct BooksState {
    pub repository: BookRepository,
    pub schema: Arc<BookSchema>,
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(isbn) => {
                AppError::not_found(format!("There is no book with isbn '{}'", isbn))
            }
            RepoError::Conflict(isbn) => AppError::conflict(
                vec![json!({ "isbn": isbn })],
                format!("A book with isbn '{}' already exists", isbn),
            ),
            RepoError::Database(err) => {
                AppError::Internal(anyhow::Error::new(err).context("book storage failure"))
            }
        }
    }
}

fn validation_failed(violations: Vec<SchemaViolation>) -> AppError {
    AppError::validation(
        violations.iter().map(SchemaViolation::to_json).collect(),
        "Book payload failed schema validation",
    )
}

/// GET /books
pub async fn list_books(
    State(state): State<BooksState>,
) -> Result<Json<BookListEnvelope>, AppError> {
    let books = state.repository.list_all().await?;
    Ok(Json(BookListEnvelope { books }))
}

/// POST /books
pub async fn create_book(
    State(state): State<BooksState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let Json(payload) = payload?;
    let book: Book = state.schema.parse(&payload).map_err(validation_failed)?;

    let book = state.repository.create(&book).await?;
    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

/// GET /books/{isbn}
pub async fn get_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = state.repository.get_by_isbn(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

/// PUT /books/{isbn}
pub async fn update_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookEnvelope>, AppError> {
    let Json(payload) = payload?;
    let changes: BookChanges = state.schema.parse(&payload).map_err(validation_failed)?;

    if payload.get("isbn").and_then(Value::as_str) != Some(isbn.as_str()) {
        tracing::debug!(isbn = %isbn, "ignoring isbn carried in update payload");
    }

    let book = state.repository.update(&isbn, &changes).await?;
    Ok(Json(BookEnvelope { book }))
}

/// DELETE /books/{isbn}
pub async fn delete_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageEnvelope>, AppError> {
    state.repository.remove(&isbn).await?;
    Ok(Json(MessageEnvelope {
        message: "Book deleted".to_string(),
    }))
}
