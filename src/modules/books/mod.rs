pub mod handlers;
pub mod models;
pub mod repository;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use serde_json::json;
use shelf_kernel::{InitCtx, Module, TableDefinition};

use handlers::BooksState;
use repository::{BookRepository, BOOKS_TABLE_DDL};
use schema::BookSchema;

/// Book catalogue module: CRUD over the `books` table keyed by ISBN
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> anyhow::Result<Router> {
        let state = BooksState {
            repository: BookRepository::new(ctx.db.clone()),
            schema: Arc::new(BookSchema::new()?),
        };

        let router = Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route(
                "/{isbn}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .with_state(state);

        Ok(router)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "properties": { "book": { "$ref": "#/components/schemas/Book" } },
                            "required": ["book"]
                        }
                    }
                }
            })
        };
        let book_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Book" }
                }
            }
        });
        let isbn_param = json!([{
            "name": "isbn",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books ordered by title",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "books": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/Book" }
                                                }
                                            },
                                            "required": ["books"]
                                        }
                                    }
                                }
                            },
                            "500": error_response("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_body.clone(),
                        "responses": {
                            "201": book_response("Created book"),
                            "400": error_response("Payload failed schema validation"),
                            "409": error_response("A book with this isbn already exists"),
                            "500": error_response("Internal server error")
                        }
                    }
                },
                "/{isbn}": {
                    "parameters": isbn_param,
                    "get": {
                        "summary": "Get a book by isbn",
                        "tags": ["Books"],
                        "responses": {
                            "200": book_response("Book"),
                            "404": error_response("No book with this isbn"),
                            "500": error_response("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Replace every field of a book except its isbn",
                        "tags": ["Books"],
                        "requestBody": book_body,
                        "responses": {
                            "200": book_response("Updated book"),
                            "400": error_response("Payload failed schema validation"),
                            "404": error_response("No book with this isbn"),
                            "500": error_response("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Book deleted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "message": { "type": "string" } },
                                            "required": ["message"]
                                        }
                                    }
                                }
                            },
                            "404": error_response("No book with this isbn"),
                            "500": error_response("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string", "description": "Primary key; immutable" },
                            "amazon_url": { "type": "string", "format": "uri" },
                            "author": { "type": "string" },
                            "language": { "type": "string" },
                            "pages": { "type": "integer", "minimum": 0 },
                            "publisher": { "type": "string" },
                            "title": { "type": "string" },
                            "year": { "type": "integer", "minimum": 1000, "maximum": 9999 }
                        },
                        "required": [
                            "isbn", "amazon_url", "author", "language",
                            "pages", "publisher", "title", "year"
                        ],
                        "additionalProperties": false
                    }
                }
            }
        }))
    }

    fn tables(&self) -> Vec<TableDefinition> {
        vec![TableDefinition {
            id: "books",
            ddl: BOOKS_TABLE_DDL,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
