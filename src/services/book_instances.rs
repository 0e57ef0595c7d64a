//! Copy (BookInstance) workflow: listing, detail, and the form-driven
//! create/update/delete cycle

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{
            BookInstanceDeleteView, BookInstanceDetailView, BookInstanceFormView,
            BookInstanceListView, BookInstanceView,
        },
        BookInstance, BookInstanceDraft, BookInstanceForm,
    },
    repository::Repository,
    validation::{validate_book_instance, FieldError, FormKind},
};

/// What a form submission ended in
#[derive(Debug)]
pub enum FormOutcome {
    /// Persisted; redirect to the record
    Saved(BookInstance),
    /// Rejected by validation; render the form again. Nothing was written.
    Invalid(BookInstanceFormView),
}

#[derive(Debug)]
pub enum DeleteFormOutcome {
    Confirm(BookInstanceDeleteView),
    /// No such copy; send the user back to the list
    Missing,
}

#[derive(Clone)]
pub struct BookInstanceService {
    repository: Repository,
}

impl BookInstanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies, book resolved
    pub async fn list(&self) -> AppResult<BookInstanceListView> {
        let instances = self.repository.book_instances.list_with_books().await?;
        Ok(BookInstanceListView {
            title: "Book Instance List".to_string(),
            bookinstance_list: instances.into_iter().map(BookInstanceView::from).collect(),
        })
    }

    pub async fn detail(&self, id: &str) -> AppResult<BookInstanceDetailView> {
        let detail = self
            .repository
            .book_instances
            .find_with_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;
        Ok(BookInstanceDetailView {
            title: "Book:".to_string(),
            bookinstance: detail.into(),
        })
    }

    pub async fn create_form(&self) -> AppResult<BookInstanceFormView> {
        let book_list = self.repository.books.list_summaries().await?;
        Ok(BookInstanceFormView {
            title: FormKind::Create.title().to_string(),
            book_list,
            selected_book: None,
            bookinstance: None,
            errors: Vec::new(),
        })
    }

    /// Validate and store a new copy. The referenced book is not looked up.
    pub async fn submit_create(&self, form: &BookInstanceForm) -> AppResult<FormOutcome> {
        let validated = validate_book_instance(form, FormKind::Create, None);
        if !validated.is_valid() {
            tracing::debug!(errors = validated.errors.len(), "BookInstance create rejected");
            return self
                .rerender(FormKind::Create, validated.draft, validated.errors)
                .await
                .map(FormOutcome::Invalid);
        }

        let created = self.repository.book_instances.insert(&validated.draft).await?;
        tracing::info!(id = %created.id, book = %created.book, "BookInstance created");
        Ok(FormOutcome::Saved(created))
    }

    /// Pre-filled update form. The copy and the book list are read
    /// concurrently. A missing copy is reported as a 400.
    pub async fn update_form(&self, id: &str) -> AppResult<BookInstanceFormView> {
        let (detail, book_list) = tokio::try_join!(
            self.repository.book_instances.find_with_book(id),
            self.repository.books.list_summaries(),
        )?;
        let detail = detail
            .ok_or_else(|| AppError::NotFoundBadRequest("BookInstance not found".to_string()))?;

        let instance = detail.instance;
        Ok(BookInstanceFormView {
            title: FormKind::Update.title().to_string(),
            book_list,
            selected_book: Some(instance.book.clone()),
            bookinstance: Some(BookInstanceDraft {
                id: Some(instance.id),
                book: instance.book,
                imprint: instance.imprint,
                status: instance.status,
                due_back: instance.due_back,
            }),
            errors: Vec::new(),
        })
    }

    /// Validate and overwrite the copy stored at `id`
    pub async fn submit_update(&self, id: &str, form: &BookInstanceForm) -> AppResult<FormOutcome> {
        let validated = validate_book_instance(form, FormKind::Update, Some(id.to_string()));
        if !validated.is_valid() {
            tracing::debug!(id, errors = validated.errors.len(), "BookInstance update rejected");
            return self
                .rerender(FormKind::Update, validated.draft, validated.errors)
                .await
                .map(FormOutcome::Invalid);
        }

        let updated = self
            .repository
            .book_instances
            .replace(id, &validated.draft)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("BookInstance {} not found", id)))?;
        tracing::info!(id = %updated.id, "BookInstance updated");
        Ok(FormOutcome::Saved(updated))
    }

    pub async fn delete_form(&self, id: &str) -> AppResult<DeleteFormOutcome> {
        let Some(instance) = self.repository.book_instances.find(id).await? else {
            return Ok(DeleteFormOutcome::Missing);
        };
        Ok(DeleteFormOutcome::Confirm(BookInstanceDeleteView {
            title: "Delete BookInstance".to_string(),
            bookinstance: instance.into(),
        }))
    }

    /// Delete by id. Succeeds whether or not the copy existed, and without
    /// touching storage when no id was given.
    pub async fn submit_delete(&self, id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            tracing::debug!("BookInstance delete without id");
            return Ok(());
        }
        let removed = self.repository.book_instances.delete(id).await?;
        tracing::info!(id, removed, "BookInstance delete");
        Ok(())
    }

    async fn rerender(
        &self,
        kind: FormKind,
        draft: BookInstanceDraft,
        errors: Vec<FieldError>,
    ) -> AppResult<BookInstanceFormView> {
        let book_list = self.repository.books.list_summaries().await?;
        Ok(BookInstanceFormView {
            title: kind.title().to_string(),
            book_list,
            selected_book: Some(draft.book.clone()),
            bookinstance: Some(draft),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        models::{BookInstanceDetail, BookSummary},
        repository::{memory::MemoryStore, BookInstanceRepository, MockBookInstanceRepository, MockBookRepository},
    };

    fn books() -> Vec<BookSummary> {
        vec![
            BookSummary::new("b2", "The Wasp Factory"),
            BookSummary::new("b1", "Apes and Angels"),
            BookSummary::new("b3", "Mythical Man-Month"),
        ]
    }

    fn service_over(store: &MemoryStore) -> BookInstanceService {
        BookInstanceService::new(Repository::in_memory(store.clone()))
    }

    fn form(book: &str, imprint: &str, status: &str, due_back: Option<&str>) -> BookInstanceForm {
        BookInstanceForm {
            book: book.into(),
            imprint: imprint.into(),
            status: status.into(),
            due_back: due_back.map(str::to_string),
        }
    }

    fn stored(id: &str) -> BookInstance {
        BookInstance {
            id: id.into(),
            book: "b1".into(),
            imprint: "Old Imprint".into(),
            status: "Maintenance".into(),
            due_back: None,
        }
    }

    #[tokio::test]
    async fn create_persists_and_returns_record() {
        let store = MemoryStore::with_books(books());
        let service = service_over(&store);

        let outcome = service
            .submit_create(&form("b1", "Pen", "Loaned", Some("2024-01-15")))
            .await
            .unwrap();
        let FormOutcome::Saved(created) = outcome else {
            panic!("expected the copy to be saved");
        };

        assert_eq!(created.due_back, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(created.url(), format!("/catalog/bookinstance/{}", created.id));
        let found = store.find(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.imprint, "Pen");
        assert_eq!(found.status, "Loaned");
    }

    #[tokio::test]
    async fn short_imprint_is_rejected_without_persisting() {
        let store = MemoryStore::with_books(books());
        let service = service_over(&store);

        let outcome = service.submit_create(&form("b1", "Pe", "Loaned", None)).await.unwrap();
        let FormOutcome::Invalid(view) = outcome else {
            panic!("expected a re-render");
        };

        assert_eq!(store.instance_count().await, 0);
        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "imprint");
        assert_eq!(view.title, "Create BookInstance");
        assert_eq!(view.selected_book.as_deref(), Some("b1"));
        assert_eq!(view.bookinstance.unwrap().imprint, "Pe");
    }

    #[tokio::test]
    async fn update_with_blank_book_rerenders_sorted_list() {
        let store = MemoryStore::with_books(books());
        store.put_instance(stored("42")).await;
        let service = service_over(&store);

        let outcome = service
            .submit_update("42", &form("", "Penguin Classics", "Available", None))
            .await
            .unwrap();
        let FormOutcome::Invalid(view) = outcome else {
            panic!("expected a re-render");
        };

        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "book");
        let titles: Vec<_> = view.book_list.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Apes and Angels", "Mythical Man-Month", "The Wasp Factory"]);
        assert_eq!(view.bookinstance.unwrap().id.as_deref(), Some("42"));
        assert_eq!(store.find("42").await.unwrap().unwrap(), stored("42"));
    }

    #[tokio::test]
    async fn update_overwrites_in_place() {
        let store = MemoryStore::with_books(books());
        store.put_instance(stored("42")).await;
        let service = service_over(&store);

        let outcome = service
            .submit_update("42", &form("b3", " Penguin Classics ", " Available ", Some("")))
            .await
            .unwrap();
        let FormOutcome::Saved(updated) = outcome else {
            panic!("expected the copy to be saved");
        };

        assert_eq!(updated.id, "42");
        assert_eq!(updated.url(), "/catalog/bookinstance/42");
        let found = store.find("42").await.unwrap().unwrap();
        assert_eq!(found.book, "b3");
        assert_eq!(found.imprint, "Penguin Classics");
        assert_eq!(found.status, "Available");
        assert_eq!(store.instance_count().await, 1);
    }

    #[tokio::test]
    async fn update_of_vanished_copy_is_not_found() {
        let service = service_over(&MemoryStore::with_books(books()));
        let err = service
            .submit_update("nope", &form("b1", "Penguin", "Available", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn detail_and_update_form_disagree_on_missing_status() {
        let service = service_over(&MemoryStore::with_books(books()));

        let err = service.detail("missing").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);

        let err = service.update_form("missing").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_form_is_prefilled() {
        let store = MemoryStore::with_books(books());
        store.put_instance(stored("7")).await;
        let service = service_over(&store);

        let view = service.update_form("7").await.unwrap();
        assert_eq!(view.title, "Update BookInstance");
        assert_eq!(view.selected_book.as_deref(), Some("b1"));
        assert_eq!(view.bookinstance.unwrap().imprint, "Old Imprint");
        assert_eq!(view.book_list[0].title, "Apes and Angels");
        assert!(view.errors.is_empty());
    }

    #[tokio::test]
    async fn delete_form_for_missing_copy_asks_for_redirect() {
        let store = MemoryStore::new();
        store.put_instance(stored("1")).await;
        let service = service_over(&store);

        assert!(matches!(
            service.delete_form("2").await.unwrap(),
            DeleteFormOutcome::Missing
        ));
        let DeleteFormOutcome::Confirm(view) = service.delete_form("1").await.unwrap() else {
            panic!("expected a confirmation view");
        };
        assert_eq!(view.bookinstance.id, "1");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put_instance(stored("1")).await;
        let service = service_over(&store);

        service.submit_delete("1").await.unwrap();
        service.submit_delete("1").await.unwrap();
        assert_eq!(store.instance_count().await, 0);
    }

    #[tokio::test]
    async fn delete_without_id_skips_storage() {
        let books = MockBookRepository::new();
        let mut instances = MockBookInstanceRepository::new();
        instances.expect_delete().never();

        let service = BookInstanceService::new(Repository::from_parts(
            Arc::new(books),
            Arc::new(instances),
        ));
        service.submit_delete("").await.unwrap();
    }

    #[tokio::test]
    async fn list_resolves_books() {
        let store = MemoryStore::with_books(books());
        store.put_instance(stored("1")).await;
        let service = service_over(&store);

        let view = service.list().await.unwrap();
        assert_eq!(view.bookinstance_list.len(), 1);
        assert_eq!(
            view.bookinstance_list[0].book.as_ref().map(|b| b.title.as_str()),
            Some("Apes and Angels")
        );
    }

    #[tokio::test]
    async fn invalid_create_never_touches_storage() {
        let mut books = MockBookRepository::new();
        books.expect_list_summaries().times(1).returning(|| Ok(Vec::new()));
        let mut instances = MockBookInstanceRepository::new();
        instances.expect_insert().never();

        let service = BookInstanceService::new(Repository::from_parts(
            Arc::new(books),
            Arc::new(instances),
        ));
        let outcome = service.submit_create(&form("", "", "", None)).await.unwrap();
        let FormOutcome::Invalid(view) = outcome else {
            panic!("expected a re-render");
        };
        assert_eq!(
            view.errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
            vec!["book", "imprint"]
        );
    }

    #[tokio::test]
    async fn persistence_failure_propagates() {
        let books = MockBookRepository::new();
        let mut instances = MockBookInstanceRepository::new();
        instances
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let service = BookInstanceService::new(Repository::from_parts(
            Arc::new(books),
            Arc::new(instances),
        ));
        let err = service
            .submit_create(&form("b1", "Penguin", "Available", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn update_form_reads_fail_together() {
        let mut books = MockBookRepository::new();
        books
            .expect_list_summaries()
            .returning(|| Err(AppError::Internal("books offline".into())));
        let mut instances = MockBookInstanceRepository::new();
        instances.expect_find_with_book().returning(|id| {
            Ok(Some(BookInstanceDetail {
                instance: stored(id),
                book: None,
            }))
        });

        let service = BookInstanceService::new(Repository::from_parts(
            Arc::new(books),
            Arc::new(instances),
        ));
        let err = service.update_form("1").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
