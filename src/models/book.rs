//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full book model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    /// Link to the source page the book was catalogued from
    pub source_url: Option<String>,
    pub language: Option<String>,
    /// Title normalized for alphabetic sorting ("The Hobbit" -> "Hobbit, The")
    pub sort_title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub description: Option<String>,
    #[validate(url(message = "Invalid source URL"))]
    pub source_url: Option<String>,
    pub language: Option<String>,
}

/// Update book request. All fields settable, including an explicit
/// sort_title override.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub description: Option<String>,
    #[validate(url(message = "Invalid source URL"))]
    pub source_url: Option<String>,
    pub language: Option<String>,
    pub sort_title: Option<String>,
}

/// Book listing query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Sort key: id, title, author or language
    pub sort: Option<String>,
}

/// Draft book returned by the metadata prefill endpoint. Every field is
/// optional: the librarian reviews and completes it before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub source_url: String,
    pub language: Option<String>,
}

/// Whitelisted sort keys for book listings. Parsed from the `sort` query
/// parameter; anything else is a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSort {
    #[default]
    Id,
    Title,
    Author,
    Language,
}

impl BookSort {
    /// Column the key sorts on. `Title` sorts on the normalized sort title.
    pub fn as_column(&self) -> &'static str {
        match self {
            BookSort::Id => "id",
            BookSort::Title => "sort_title",
            BookSort::Author => "author",
            BookSort::Language => "language",
        }
    }
}

impl std::str::FromStr for BookSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(BookSort::Id),
            "title" | "sort_title" => Ok(BookSort::Title),
            "author" => Ok(BookSort::Author),
            "language" => Ok(BookSort::Language),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

const LEADING_ARTICLES: [&str; 3] = ["the", "a", "an"];

/// Derive the sort title from a display title by moving a leading article
/// after a comma: "The Hobbit" -> "Hobbit, The", "Moby Dick" -> "Moby Dick".
pub fn derive_sort_title(title: &str) -> String {
    let trimmed = title.trim();
    if let Some((first, rest)) = trimmed.split_once(char::is_whitespace) {
        let rest = rest.trim_start();
        if !rest.is_empty() && LEADING_ARTICLES.contains(&first.to_lowercase().as_str()) {
            return format!("{}, {}", rest, first);
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_title_without_article_is_unchanged() {
        assert_eq!(derive_sort_title("Moby Dick"), "Moby Dick");
    }

    #[test]
    fn sort_title_moves_leading_article() {
        assert_eq!(derive_sort_title("The Hobbit"), "Hobbit, The");
        assert_eq!(derive_sort_title("A Wizard of Earthsea"), "Wizard of Earthsea, A");
        assert_eq!(derive_sort_title("An Old Captivity"), "Old Captivity, An");
    }

    #[test]
    fn sort_title_is_case_insensitive_on_article() {
        assert_eq!(derive_sort_title("the Odyssey"), "Odyssey, the");
    }

    #[test]
    fn sort_title_keeps_article_only_titles() {
        // "The" alone is a title, not an article prefix
        assert_eq!(derive_sort_title("The"), "The");
        assert_eq!(derive_sort_title("  The Hobbit  "), "Hobbit, The");
    }

    #[test]
    fn sort_title_ignores_article_like_words() {
        assert_eq!(derive_sort_title("Theodore Roosevelt"), "Theodore Roosevelt");
        assert_eq!(derive_sort_title("Anna Karenina"), "Anna Karenina");
    }

    #[test]
    fn sort_keys_parse_from_query_values() {
        assert_eq!("title".parse::<BookSort>(), Ok(BookSort::Title));
        assert_eq!("id".parse::<BookSort>(), Ok(BookSort::Id));
        assert!("rating".parse::<BookSort>().is_err());
        assert_eq!(BookSort::Title.as_column(), "sort_title");
    }
}
