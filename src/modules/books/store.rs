//! Process-local book storage.
//!
//! One reader/writer lock guards both the id counter and the map, so a
//! create is a single exclusive section (increment + insert) and reads see
//! either all of it or none of it. Lookups and listings share the lock and
//! run in parallel with each other.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use time::OffsetDateTime;

use super::models::Book;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(i64),

    /// A writer panicked while holding the lock.
    #[error("book store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct Shelf {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

/// In-memory book store, safe for concurrent use.
#[derive(Debug, Default)]
pub struct BookStore {
    shelf: RwLock<Shelf>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Shelf>, StoreError> {
        self.shelf.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Shelf>, StoreError> {
        self.shelf.write().map_err(|_| StoreError::Poisoned)
    }

    /// Store a new book under the next identifier.
    ///
    /// Inputs are stored as given; callers validate and trim.
    pub fn create(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Book, StoreError> {
        let mut shelf = self.write()?;

        let id = shelf.last_id + 1;
        shelf.last_id = id;

        let book = Book {
            id,
            title: title.into(),
            author: author.into(),
            created_at: OffsetDateTime::now_utc(),
        };
        shelf.books.insert(id, book.clone());

        tracing::debug!(id, "book stored");
        Ok(book)
    }

    /// Look up a book by identifier.
    pub fn get(&self, id: i64) -> Result<Book, StoreError> {
        self.read()?
            .books
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Snapshot of every stored book, ascending by id.
    pub fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.read()?.books.values().cloned().collect())
    }

    /// Number of stored books.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.books.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[test]
    fn empty_store_lists_nothing() {
        let store = BookStore::new();
        assert_eq!(store.list().unwrap(), Vec::<Book>::new());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let store = BookStore::new();

        let first = store.create("The Go Programming Language", "Donovan").unwrap();
        let second = store.create("Concurrency in Go", "Cox-Buday").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
        assert_eq!(first.created_at.offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn get_returns_the_created_book() {
        let store = BookStore::new();
        let created = store.create("Dune", "Frank Herbert").unwrap();

        assert_eq!(store.get(created.id).unwrap(), created);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = BookStore::new();
        store.create("Dune", "Frank Herbert").unwrap();

        for id in [0, -1, 2, i64::MAX] {
            assert_eq!(store.get(id), Err(StoreError::NotFound(id)));
        }
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = BookStore::new();
        for n in 0..25 {
            store.create(format!("title {n}"), "author").unwrap();
        }

        let ids: Vec<i64> = store.list().unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn concurrent_creates_get_distinct_gapless_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let store = Arc::new(BookStore::new());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let mut ids = Vec::with_capacity(PER_THREAD);
                    let mut last = 0;
                    for n in 0..PER_THREAD {
                        let book = store.create(format!("t{t}-{n}"), "author").unwrap();
                        // Ids seen by a single thread only ever grow.
                        assert!(book.id > last);
                        last = book.id;
                        ids.push(book.id);
                    }
                    ids
                })
            })
            .collect();

        let mut all = BTreeSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }

        let expected: BTreeSet<i64> = (1..=(THREADS * PER_THREAD) as i64).collect();
        assert_eq!(all, expected);
        assert_eq!(store.count().unwrap(), THREADS * PER_THREAD);
    }

    #[test]
    fn readers_only_see_complete_snapshots() {
        let store = Arc::new(BookStore::new());

        std::thread::scope(|scope| {
            let writer = Arc::clone(&store);
            scope.spawn(move || {
                for n in 0..200 {
                    writer.create(format!("title {n}"), "author").unwrap();
                }
            });

            for _ in 0..4 {
                let reader = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let snapshot = reader.list().unwrap();
                        // Gapless prefix 1..=len, each fully populated.
                        for (idx, book) in snapshot.iter().enumerate() {
                            assert_eq!(book.id, idx as i64 + 1);
                            assert!(!book.title.is_empty());
                        }
                    }
                });
            }
        });

        assert_eq!(store.list().unwrap().len(), 200);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store = BookStore::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.shelf.write().unwrap();
            panic!("writer crashed");
        }));
        assert!(result.is_err());

        assert_eq!(store.get(1), Err(StoreError::Poisoned));
        assert_eq!(store.list(), Err(StoreError::Poisoned));
        assert_eq!(store.create("a", "b"), Err(StoreError::Poisoned));
    }
}
