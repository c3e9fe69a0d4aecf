//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{derive_sort_title, Book, BookSort, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books ordered by a caller-selected key
    pub async fn list_books(&self, sort: Option<&str>) -> AppResult<Vec<Book>> {
        let sort = match sort {
            Some(key) => key
                .parse::<BookSort>()
                .map_err(AppError::Validation)?,
            None => BookSort::default(),
        };
        self.repository.books.list(sort).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book; derives the sort title and title-cases the language
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let sort_title = derive_sort_title(&book.title);
        let language = book.language.as_deref().map(titlecase);

        self.repository
            .books
            .create(
                &book.title,
                &book.author,
                book.description.as_deref(),
                book.source_url.as_deref(),
                language.as_deref(),
                &sort_title,
            )
            .await
    }

    /// Update an existing book. An explicit sort_title overrides the derived
    /// one; otherwise it is recomputed from the new title.
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        let sort_title = match book.sort_title {
            Some(ref explicit) if !explicit.trim().is_empty() => explicit.trim().to_string(),
            _ => derive_sort_title(&book.title),
        };
        let language = book.language.as_deref().map(titlecase);

        self.repository
            .books
            .update(
                id,
                &book.title,
                &book.author,
                book.description.as_deref(),
                book.source_url.as_deref(),
                language.as_deref(),
                &sort_title,
            )
            .await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}

/// Title-case a language name: "english" -> "English", "old norse" -> "Old Norse"
fn titlecase(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titlecase_normalizes_language_names() {
        assert_eq!(titlecase("english"), "English");
        assert_eq!(titlecase("OLD NORSE"), "Old Norse");
        assert_eq!(titlecase("Français"), "Français");
    }
}
