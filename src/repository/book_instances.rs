//! Copy (book_instances) storage in PostgreSQL

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};

use super::{new_id, BookInstanceRepository};
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceDetail, BookInstanceDraft, BookSummary},
};

/// Copy row joined with its book's title. `book_title` is NULL when the
/// referenced book is gone.
#[derive(FromRow)]
struct BookInstanceRow {
    id: String,
    book_id: String,
    imprint: String,
    status: String,
    due_back: Option<NaiveDate>,
    book_title: Option<String>,
}

impl From<BookInstanceRow> for BookInstanceDetail {
    fn from(row: BookInstanceRow) -> Self {
        let book = row
            .book_title
            .map(|title| BookSummary::new(row.book_id.clone(), title));
        Self {
            instance: BookInstance {
                id: row.id,
                book: row.book_id,
                imprint: row.imprint,
                status: row.status,
                due_back: row.due_back,
            },
            book,
        }
    }
}

const SELECT_WITH_BOOK: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title AS book_title
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceRepository for BookInstancesRepository {
    async fn list_with_books(&self) -> AppResult<Vec<BookInstanceDetail>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(SELECT_WITH_BOOK)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_with_book(&self, id: &str) -> AppResult<Option<BookInstanceDetail>> {
        let query = format!("{} WHERE bi.id = $1", SELECT_WITH_BOOK);
        let row = sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find(&self, id: &str) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, draft: &BookInstanceDraft) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(new_id())
        .bind(&draft.book)
        .bind(&draft.imprint)
        .bind(&draft.status)
        .bind(draft.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace(&self, id: &str, draft: &BookInstanceDraft) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(id)
        .bind(&draft.book)
        .bind(&draft.imprint)
        .bind(&draft.status)
        .bind(draft.due_back)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
