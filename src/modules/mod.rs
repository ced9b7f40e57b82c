pub mod books;

use std::sync::Arc;

use shelf_kernel::ModuleRegistry;

use books::store::BookStore;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<BookStore>) {
    registry.register(books::create_module(store));
}
