//! Circulation repository: checked-out set and hold queue operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::hold::HoldEntry};

#[derive(Clone)]
pub struct CirculationRepository {
    pool: Pool<Postgres>,
}

impl CirculationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Add a user to a book's checked-out set. Set semantics: re-adding an
    /// existing pair is a no-op.
    pub async fn add_checkout(&self, book_id: i32, user_id: i32) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO checkouts (book_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(book_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Check whether a user currently has a book checked out
    pub async fn is_checked_out(&self, book_id: i32, user_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM checkouts WHERE book_id = $1 AND user_id = $2)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Remove a user from the checked-out set and promote the head of the
    /// hold queue, if any, in a single transaction. Returns the promoted
    /// user's id.
    pub async fn checkin_and_promote(&self, book_id: i32, user_id: i32) -> AppResult<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM checkouts WHERE book_id = $1 AND user_id = $2")
            .bind(book_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let head: Option<(i32, i32)> = sqlx::query_as(
            "SELECT id, user_id FROM holds WHERE book_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let promoted = match head {
            Some((hold_id, next_user)) => {
                sqlx::query("DELETE FROM holds WHERE id = $1")
                    .bind(hold_id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(
                    "INSERT INTO checkouts (book_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(book_id)
                .bind(next_user)
                .execute(&mut *tx)
                .await?;
                Some(next_user)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(promoted)
    }

    /// Check whether a user is in a book's hold queue
    pub async fn is_on_hold(&self, book_id: i32, user_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM holds WHERE book_id = $1 AND user_id = $2)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Append a user to a book's hold queue
    pub async fn add_hold(&self, book_id: i32, user_id: i32) -> AppResult<HoldEntry> {
        let entry = sqlx::query_as::<_, HoldEntry>(
            r#"
            INSERT INTO holds (book_id, user_id, placed_at)
            VALUES ($1, $2, NOW())
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    /// Remove all of a user's hold entries for a book. Returns the number
    /// of entries removed.
    pub async fn remove_holds(&self, book_id: i32, user_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM holds WHERE book_id = $1 AND user_id = $2")
            .bind(book_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// The full hold queue for a book, in insertion order
    pub async fn hold_queue(&self, book_id: i32) -> AppResult<Vec<HoldEntry>> {
        let queue = sqlx::query_as::<_, HoldEntry>(
            "SELECT * FROM holds WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(queue)
    }
}
