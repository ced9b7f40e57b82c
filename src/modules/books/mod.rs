pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use shelf_http::error::method_not_allowed;
use shelf_kernel::{InitCtx, Module};

use store::BookStore;

/// Books module: owns the route table over a shared `BookStore`
pub struct BooksModule {
    store: Arc<BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<BookStore>) -> Self {
        Self { store }
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

    /// Only GET (and POST on `/books`) are served; HEAD is registered
    /// explicitly because axum would otherwise answer it with the GET handler.
    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/books",
                get(handlers::list_books)
                    .head(method_not_allowed)
                    .post(handlers::create_book)
                    .fallback(method_not_allowed),
            )
            .route(
                "/books/",
                get(handlers::missing_book_id)
                    .head(method_not_allowed)
                    .fallback(method_not_allowed),
            )
            .route(
                "/books/{id}",
                get(handlers::get_book)
                    .head(method_not_allowed)
                    .fallback(method_not_allowed),
            )
            .with_state(Arc::clone(&self.store))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books, ascending by id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookList" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Invalid JSON or blank title/author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer", "format": "int64" }
                        }],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Non-numeric id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Store-assigned identifier"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "created_at": {
                                "type": "string",
                                "format": "date-time",
                                "description": "When the book was created (UTC)"
                            }
                        },
                        "required": ["id", "title", "author", "created_at"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" }
                        },
                        "required": ["title", "author"]
                    },
                    "BookList": {
                        "type": "object",
                        "properties": {
                            "items": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["items"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.store.count()?;
        tracing::info!(module = self.name(), books, "books module stopped");
        Ok(())
    }
}

/// Create the books module over a shared store
pub fn create_module(store: Arc<BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
