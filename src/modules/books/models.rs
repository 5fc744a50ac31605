use serde::{Deserialize, Serialize};

/// A catalogued book, keyed by ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i64,
    pub publisher: String,
    pub title: String,
    pub year: i64,
}

/// Replacement values for every mutable column of a book.
///
/// Decoded from a full book payload; any `isbn` it carries is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookChanges {
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i64,
    pub publisher: String,
    pub title: String,
    pub year: i64,
}

impl From<Book> for BookChanges {
    fn from(book: Book) -> Self {
        Self {
            amazon_url: book.amazon_url,
            author: book.author,
            language: book.language,
            pages: book.pages,
            publisher: book.publisher,
            title: book.title,
            year: book.year,
        }
    }
}

/// `{ "book": ... }` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// `{ "books": [...] }` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookListEnvelope {
    pub books: Vec<Book>,
}

/// `{ "message": ... }` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub message: String,
}
