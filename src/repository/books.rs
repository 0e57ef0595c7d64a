//! Book lookups in PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookRepository;
use crate::{error::AppResult, models::BookSummary};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for BooksRepository {
    async fn list_summaries(&self) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>("SELECT id, title FROM books ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
