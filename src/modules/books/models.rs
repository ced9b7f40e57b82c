use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A catalogued book. Fixed once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, starting at 1
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Creation time in UTC, RFC 3339 on the wire
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl CreateBook {
    /// Trimmed `(title, author)`, or `None` if either is missing or blank.
    pub fn normalized(&self) -> Option<(String, String)> {
        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        let author = self.author.as_deref().map(str::trim).unwrap_or_default();

        if title.is_empty() || author.is_empty() {
            return None;
        }

        Some((title.to_string(), author.to_string()))
    }
}

/// Response envelope for listing books.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookList {
    pub items: Vec<Book>,
}
