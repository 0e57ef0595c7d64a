//! BookInstance (physical copy of a book) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::{BookRef, BookSummary};
use crate::validation::FieldError;

/// Path of the copy list page, the target of delete redirects
pub const LIST_URL: &str = "/catalog/bookinstances";

/// Path of a copy's detail page
pub fn instance_url(id: &str) -> String {
    format!("/catalog/bookinstance/{}", id)
}

/// Stored copy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: String,
    /// Id of the referenced book. Not checked against the books table.
    #[sqlx(rename = "book_id")]
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        instance_url(&self.id)
    }
}

/// Copy with its book reference resolved. `book` is `None` when the
/// reference points at a book that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceDetail {
    pub instance: BookInstance,
    pub book: Option<BookSummary>,
}

/// Candidate record assembled from submitted form data.
///
/// A draft exists whether or not validation passed; it is what the form is
/// re-rendered with, and what gets persisted once it is clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookInstanceDraft {
    /// Target id on update, `None` on create
    pub id: Option<String>,
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceDraft {
    pub fn into_instance(self, id: String) -> BookInstance {
        BookInstance {
            id,
            book: self.book,
            imprint: self.imprint,
            status: self.status,
            due_back: self.due_back,
        }
    }
}

/// Create/update form body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    #[serde(default)]
    pub status: String,
    /// ISO-8601 date; empty means no date
    #[serde(default)]
    pub due_back: Option<String>,
}

/// Delete confirmation form body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteBookInstanceForm {
    /// Empty when the body carries no id; nothing is deleted then
    #[serde(default)]
    pub id: String,
}

// ---- View models ----

/// Copy as shown on list, detail and delete pages
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceView {
    pub id: String,
    pub url: String,
    pub book: Option<BookRef>,
    pub book_id: String,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
    /// e.g. "Jan 15, 2024"
    pub due_back_formatted: Option<String>,
}

impl BookInstanceView {
    fn build(instance: BookInstance, book: Option<BookSummary>) -> Self {
        Self {
            url: instance.url(),
            due_back_formatted: instance.due_back.map(format_due_back),
            book: book.map(BookRef::from),
            book_id: instance.book,
            id: instance.id,
            imprint: instance.imprint,
            status: instance.status,
            due_back: instance.due_back,
        }
    }
}

impl From<BookInstanceDetail> for BookInstanceView {
    fn from(detail: BookInstanceDetail) -> Self {
        Self::build(detail.instance, detail.book)
    }
}

impl From<BookInstance> for BookInstanceView {
    fn from(instance: BookInstance) -> Self {
        Self::build(instance, None)
    }
}

pub fn format_due_back(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceListView {
    pub title: String,
    pub bookinstance_list: Vec<BookInstanceView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDetailView {
    pub title: String,
    pub bookinstance: BookInstanceView,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDeleteView {
    pub title: String,
    pub bookinstance: BookInstanceView,
}

/// Create/update form, blank, pre-filled, or re-rendered with errors
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceFormView {
    pub title: String,
    /// Book choices sorted by title
    pub book_list: Vec<BookSummary>,
    pub selected_book: Option<String>,
    pub bookinstance: Option<BookInstanceDraft>,
    /// Validation errors in field order; empty unless re-rendered
    pub errors: Vec<FieldError>,
}
