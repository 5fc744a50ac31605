//! Book persistence over the `books` table.
//!
//! Every operation is a single SQL statement, so atomicity and the uniqueness
//! of `isbn` come from SQLite itself. Callers are expected to have validated
//! payloads already; this layer only reports storage outcomes.

use shelf_db::Database;
use thiserror::Error;

use super::models::{Book, BookChanges};

pub const BOOKS_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS books (
    isbn TEXT PRIMARY KEY,
    amazon_url TEXT NOT NULL,
    author TEXT NOT NULL,
    language TEXT NOT NULL,
    pages INTEGER NOT NULL,
    publisher TEXT NOT NULL,
    title TEXT NOT NULL,
    year INTEGER NOT NULL
);";

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("book not found: {0}")]
    NotFound(String),

    #[error("book already exists: {0}")]
    Conflict(String),

    #[error("book storage failure: {0}")]
    Database(#[from] sqlx::Error),
}

/// Sole owner of book rows.
#[derive(Debug, Clone)]
pub struct BookRepository {
    db: Database,
}

impl BookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert `book`, echoing it back on success.
    pub async fn create(&self, book: &Book) -> RepoResult<Book> {
        let result = sqlx::query(
            "INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => {
                tracing::info!(isbn = %book.isbn, "book created");
                Ok(book.clone())
            }
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(RepoError::Conflict(book.isbn.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// All books ordered by title; ties fall back to isbn.
    pub async fn list_all(&self) -> RepoResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY title ASC, isbn ASC"
        ))
        .fetch_all(self.db.pool())
        .await?;

        tracing::debug!(count = books.len(), "books listed");
        Ok(books)
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> RepoResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?1"
        ))
        .bind(isbn)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| RepoError::NotFound(isbn.to_string()))
    }

    /// Replace every mutable column of the row keyed by `isbn`.
    pub async fn update(&self, isbn: &str, changes: &BookChanges) -> RepoResult<Book> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books
             SET amazon_url = ?1,
                 author = ?2,
                 language = ?3,
                 pages = ?4,
                 publisher = ?5,
                 title = ?6,
                 year = ?7
             WHERE isbn = ?8
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&changes.amazon_url)
        .bind(&changes.author)
        .bind(&changes.language)
        .bind(changes.pages)
        .bind(&changes.publisher)
        .bind(&changes.title)
        .bind(changes.year)
        .bind(isbn)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| RepoError::NotFound(isbn.to_string()))?;

        tracing::info!(isbn = %isbn, "book updated");
        Ok(updated)
    }

    pub async fn remove(&self, isbn: &str) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?1")
            .bind(isbn)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(isbn.to_string()));
        }

        tracing::info!(isbn = %isbn, "book deleted");
        Ok(())
    }
}
