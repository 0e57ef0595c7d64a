//! Repository layer for database operations
//!
//! The workflow only talks to the two traits below; [`Repository`] bundles
//! whichever implementations the process was started with.

pub mod book_instances;
pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceDetail, BookInstanceDraft, BookSummary},
};

/// Read access to the books a copy can reference
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books (id and title), sorted by title ascending
    async fn list_summaries(&self) -> AppResult<Vec<BookSummary>>;
}

/// Storage for copy records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceRepository: Send + Sync {
    /// All copies with their book resolved
    async fn list_with_books(&self) -> AppResult<Vec<BookInstanceDetail>>;

    /// One copy with its book resolved
    async fn find_with_book(&self, id: &str) -> AppResult<Option<BookInstanceDetail>>;

    /// One copy, book left as a bare id
    async fn find(&self, id: &str) -> AppResult<Option<BookInstance>>;

    /// Store a new copy under a freshly generated id
    async fn insert(&self, draft: &BookInstanceDraft) -> AppResult<BookInstance>;

    /// Overwrite the copy stored at `id`. Returns `None` when there is none.
    async fn replace(&self, id: &str, draft: &BookInstanceDraft) -> AppResult<Option<BookInstance>>;

    /// Remove a copy. Returns whether one existed.
    async fn delete(&self, id: &str) -> AppResult<bool>;

    /// Connectivity check used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
    pub book_instances: Arc<dyn BookInstanceRepository>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool)),
        }
    }

    /// Create a repository over an in-process store
    pub fn in_memory(store: memory::MemoryStore) -> Self {
        Self {
            books: Arc::new(store.clone()),
            book_instances: Arc::new(store),
        }
    }

    pub fn from_parts(
        books: Arc<dyn BookRepository>,
        book_instances: Arc<dyn BookInstanceRepository>,
    ) -> Self {
        Self {
            books,
            book_instances,
        }
    }
}

/// Fresh opaque record id
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
