//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookSort},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all books ordered by the given key, sort title as tie-breaker
    pub async fn list(&self, sort: BookSort) -> AppResult<Vec<Book>> {
        // Sort column comes from the BookSort whitelist, never from the caller
        let query = format!(
            "SELECT * FROM books ORDER BY {}, sort_title",
            sort.as_column()
        );
        let books = sqlx::query_as::<_, Book>(&query).fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Insert a new book
    pub async fn create(
        &self,
        title: &str,
        author: &str,
        description: Option<&str>,
        source_url: Option<&str>,
        language: Option<&str>,
        sort_title: &str,
    ) -> AppResult<Book> {
        let now = Utc::now();

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, description, source_url, language, sort_title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(source_url)
        .bind(language)
        .bind(sort_title)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Update an existing book
    pub async fn update(
        &self,
        id: i32,
        title: &str,
        author: &str,
        description: Option<&str>,
        source_url: Option<&str>,
        language: Option<&str>,
        sort_title: &str,
    ) -> AppResult<Book> {
        let now = Utc::now();

        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, author = $3, description = $4, source_url = $5,
                language = $6, sort_title = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(source_url)
        .bind(language)
        .bind(sort_title)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book. Checkout and hold rows go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
