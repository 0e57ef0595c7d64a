//! Data models for the catalog server

pub mod book;
pub mod book_instance;

// Re-export commonly used types
pub use book::{BookRef, BookSummary};
pub use book_instance::{
    BookInstance, BookInstanceDetail, BookInstanceDraft, BookInstanceForm, DeleteBookInstanceForm,
};
