//! Book (catalog title) model, read-only for copy management

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book identity and title, as used by selection lists and populated references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
}

impl BookSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Path of the book's detail page
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Sort summaries by title ascending, the order every book list is shown in
pub fn sort_by_title(books: &mut [BookSummary]) {
    books.sort_by(|a, b| a.title.cmp(&b.title));
}

/// Populated book reference embedded in copy views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookRef {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl From<BookSummary> for BookRef {
    fn from(book: BookSummary) -> Self {
        let url = book.url();
        Self {
            id: book.id,
            title: book.title,
            url,
        }
    }
}
