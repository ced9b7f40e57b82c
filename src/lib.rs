//! Shelf application library
//!
//! Wires the books module and its in-memory store into the HTTP server.

pub mod modules;

use std::sync::Arc;

use axum::Router;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books::models::{Book, BookList, CreateBook};
pub use modules::books::store::{BookStore, StoreError};

/// Registry with every application module registered over `store`
pub fn build_registry(store: Arc<BookStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Fully layered router over `store`, as served by [`run`]
pub fn app(store: Arc<BookStore>, settings: &Settings) -> Router {
    shelf_http::build_router(&build_registry(store), settings)
}

/// Create the store, run module lifecycles, and serve until shutdown
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = Arc::new(BookStore::new());
    let registry = build_registry(store);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
