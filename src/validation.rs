//! Validation and sanitization policy for copy forms.
//!
//! Create and update share one rule table. [`FormKind`] selects the few
//! points where they differ: update requires a status of at least three
//! characters and words some messages differently.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidateLength, ValidationError};

use crate::models::{BookInstanceDraft, BookInstanceForm};

/// Which submission a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Update,
}

struct Messages {
    book: &'static str,
    imprint: &'static str,
    /// `None` when status carries no rule
    status: Option<&'static str>,
    due_back: &'static str,
}

impl FormKind {
    fn messages(self) -> Messages {
        match self {
            FormKind::Create => Messages {
                book: "Book must be specified",
                imprint: "Imprint must be at least 3 characters",
                status: None,
                due_back: "Invalid date",
            },
            FormKind::Update => Messages {
                book: "Book name must be specified",
                imprint: "Imprint must be at least 3 character",
                status: Some("Status must be specified"),
                due_back: "Invalid Date",
            },
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Create => "Create BookInstance",
            FormKind::Update => "Update BookInstance",
        }
    }
}

/// One failed rule, reported against the submitted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    /// Value after sanitization
    pub value: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, value: &str, error: ValidationError) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            message: error
                .message
                .map(Cow::into_owned)
                .unwrap_or_else(|| error.code.into_owned()),
        }
    }
}

/// Result of running the policy. The draft is always present, even when
/// `errors` is non-empty.
#[derive(Debug, Clone)]
pub struct Validated {
    pub draft: BookInstanceDraft,
    pub errors: Vec<FieldError>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sanitize and validate a submitted form.
///
/// Errors are collected in field order (book, imprint, status, due_back)
/// and none are dropped.
pub fn validate_book_instance(
    form: &BookInstanceForm,
    kind: FormKind,
    id: Option<String>,
) -> Validated {
    let messages = kind.messages();
    let mut errors = Vec::new();

    // Lengths are checked on the trimmed value, before escaping.
    let book = form.book.trim();
    if let Err(e) = min_length(book, 1, messages.book) {
        errors.push(FieldError::new("book", &escape(book), e));
    }

    let imprint = form.imprint.trim();
    if let Err(e) = min_length(imprint, 3, messages.imprint) {
        errors.push(FieldError::new("imprint", &escape(imprint), e));
    }

    let status = match messages.status {
        Some(message) => {
            let status = form.status.trim();
            if let Err(e) = min_length(status, 3, message) {
                errors.push(FieldError::new("status", &escape(status), e));
            }
            escape(status)
        }
        None => escape(&form.status),
    };

    let due_back = match form.due_back.as_deref() {
        None | Some("") => None,
        Some(raw) => match iso8601_date(raw, messages.due_back) {
            Ok(date) => Some(date),
            Err(e) => {
                errors.push(FieldError::new("due_back", raw, e));
                None
            }
        },
    };

    Validated {
        draft: BookInstanceDraft {
            id,
            book: escape(book),
            imprint: escape(imprint),
            status,
            due_back,
        },
        errors,
    }
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn min_length(value: &str, min: u64, message: &'static str) -> Result<(), ValidationError> {
    if value.validate_length(Some(min), None, None) {
        Ok(())
    } else {
        Err(rule_error("length", message))
    }
}

/// Date-times carrying a zone designator (`Z` or `±hh[:mm]`)
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parse an ISO-8601 calendar date or date-time down to its date.
/// Date-times with an offset are normalised to UTC first; a bare
/// year-month (`YYYY-MM`) means the first of the month.
fn iso8601_date(raw: &str, message: &'static str) -> Result<NaiveDate, ValidationError> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Ok(dt.with_timezone(&Utc).date_naive());
        }
    }
    for format in LOCAL_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.date());
        }
    }
    if raw.len() == 7 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
            return Ok(date);
        }
    }
    Err(rule_error("iso8601", message))
}

/// HTML-escape a form value the way form sanitizers do
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}
