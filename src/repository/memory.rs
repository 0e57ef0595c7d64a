//! In-process store implementing both repository traits.
//!
//! Keeps copies in insertion order, like a collection scan would return them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{new_id, BookInstanceRepository, BookRepository};
use crate::{
    error::AppResult,
    models::{book, BookInstance, BookInstanceDetail, BookInstanceDraft, BookSummary},
};

#[derive(Default)]
struct Collections {
    books: Vec<BookSummary>,
    book_instances: Vec<BookInstance>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: impl IntoIterator<Item = BookSummary>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Collections {
                books: books.into_iter().collect(),
                book_instances: Vec::new(),
            })),
        }
    }

    pub async fn add_book(&self, book: BookSummary) {
        self.inner.write().await.books.push(book);
    }

    /// Put a copy in place as-is, keeping its id
    pub async fn put_instance(&self, instance: BookInstance) {
        let mut collections = self.inner.write().await;
        collections.book_instances.retain(|i| i.id != instance.id);
        collections.book_instances.push(instance);
    }

    pub async fn instance_count(&self) -> usize {
        self.inner.read().await.book_instances.len()
    }

    fn resolve(books: &[BookSummary], instance: &BookInstance) -> BookInstanceDetail {
        BookInstanceDetail {
            instance: instance.clone(),
            book: books.iter().find(|b| b.id == instance.book).cloned(),
        }
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn list_summaries(&self) -> AppResult<Vec<BookSummary>> {
        let mut books = self.inner.read().await.books.clone();
        book::sort_by_title(&mut books);
        Ok(books)
    }
}

#[async_trait]
impl BookInstanceRepository for MemoryStore {
    async fn list_with_books(&self) -> AppResult<Vec<BookInstanceDetail>> {
        let collections = self.inner.read().await;
        Ok(collections
            .book_instances
            .iter()
            .map(|i| Self::resolve(&collections.books, i))
            .collect())
    }

    async fn find_with_book(&self, id: &str) -> AppResult<Option<BookInstanceDetail>> {
        let collections = self.inner.read().await;
        Ok(collections
            .book_instances
            .iter()
            .find(|i| i.id == id)
            .map(|i| Self::resolve(&collections.books, i)))
    }

    async fn find(&self, id: &str) -> AppResult<Option<BookInstance>> {
        let collections = self.inner.read().await;
        Ok(collections.book_instances.iter().find(|i| i.id == id).cloned())
    }

    async fn insert(&self, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        let instance = draft.clone().into_instance(new_id());
        self.inner
            .write()
            .await
            .book_instances
            .push(instance.clone());
        Ok(instance)
    }

    async fn replace(&self, id: &str, draft: &BookInstanceDraft) -> AppResult<Option<BookInstance>> {
        let mut collections = self.inner.write().await;
        let Some(slot) = collections.book_instances.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        *slot = draft.clone().into_instance(id.to_string());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut collections = self.inner.write().await;
        let before = collections.book_instances.len();
        collections.book_instances.retain(|i| i.id != id);
        Ok(collections.book_instances.len() < before)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(book: &str) -> BookInstanceDraft {
        BookInstanceDraft {
            id: None,
            book: book.into(),
            imprint: "Penguin".into(),
            status: "Available".into(),
            due_back: None,
        }
    }

    #[tokio::test]
    async fn books_come_back_sorted_by_title() {
        let store = MemoryStore::with_books([
            BookSummary::new("2", "Zazie dans le métro"),
            BookSummary::new("1", "Anna Karenina"),
        ]);
        let titles: Vec<_> = store
            .list_summaries()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Anna Karenina", "Zazie dans le métro"]);
    }

    #[tokio::test]
    async fn added_book_resolves_existing_copy() {
        let store = MemoryStore::new();
        let created = store.insert(&draft("late")).await.unwrap();
        assert!(store.find_with_book(&created.id).await.unwrap().unwrap().book.is_none());

        store.add_book(BookSummary::new("late", "Late Arrival")).await;
        let detail = store.find_with_book(&created.id).await.unwrap().unwrap();
        assert_eq!(detail.book.map(|b| b.title).as_deref(), Some("Late Arrival"));
        assert_eq!(store.list_summaries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_book_reference_resolves_to_none() {
        let store = MemoryStore::with_books([BookSummary::new("b1", "Dune")]);
        let kept = store.insert(&draft("b1")).await.unwrap();
        let stale = store.insert(&draft("gone")).await.unwrap();

        let kept = store.find_with_book(&kept.id).await.unwrap().unwrap();
        assert_eq!(kept.book.unwrap().title, "Dune");
        let stale = store.find_with_book(&stale.id).await.unwrap().unwrap();
        assert!(stale.book.is_none());
        assert_eq!(stale.instance.book, "gone");
    }

    #[tokio::test]
    async fn replace_keeps_id_and_position() {
        let store = MemoryStore::new();
        let first = store.insert(&draft("b1")).await.unwrap();
        store.insert(&draft("b2")).await.unwrap();

        let mut changed = draft("b3");
        changed.imprint = "Vintage".into();
        let replaced = store.replace(&first.id, &changed).await.unwrap().unwrap();
        assert_eq!(replaced.id, first.id);

        let listed = store.list_with_books().await.unwrap();
        assert_eq!(listed[0].instance.imprint, "Vintage");
        assert_eq!(listed[0].instance.book, "b3");
        assert!(store.replace("missing", &changed).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        let created = store.insert(&draft("b1")).await.unwrap();
        assert!(store.delete(&created.id).await.unwrap());
        assert!(!store.delete(&created.id).await.unwrap());
        assert_eq!(store.instance_count().await, 0);
    }
}
