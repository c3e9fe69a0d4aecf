//! Hold/checkout management service

use crate::{
    error::{AppError, AppResult},
    models::hold::{queue_position, CirculationStatus, HoldEntry},
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
    email: EmailService,
}

impl CirculationService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Check a book out to a user. Re-checkout of an already-held pair is a
    /// no-op; there is no capacity model.
    pub async fn checkout(&self, book_id: i32, user_id: i32) -> AppResult<()> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.circulation.add_checkout(book_id, user_id).await?;
        tracing::info!(book_id, user_id, "book checked out");
        Ok(())
    }

    /// Check a book back in. If the hold queue is non-empty the head user is
    /// promoted to checked-out in the same transaction and notified by email
    /// afterwards. Returns the promoted user's id.
    pub async fn checkin(&self, book_id: i32, user_id: i32) -> AppResult<Option<i32>> {
        let book = self.repository.books.get_by_id(book_id).await?;

        let promoted = self
            .repository
            .circulation
            .checkin_and_promote(book_id, user_id)
            .await?;
        tracing::info!(book_id, user_id, ?promoted, "book checked in");

        // The promotion is committed; the notification is best-effort.
        if let Some(next_user_id) = promoted {
            let next_user = self.repository.users.get_by_id(next_user_id).await?;
            match next_user.email {
                Some(ref address) => {
                    if let Err(e) = self
                        .email
                        .send_hold_available(address, &next_user.display_name(), &book.title)
                        .await
                    {
                        tracing::warn!(
                            user_id = next_user_id,
                            book_id,
                            "failed to send hold notification: {}",
                            e
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        user_id = next_user_id,
                        book_id,
                        "promoted user has no email address, skipping notification"
                    );
                }
            }
        }

        Ok(promoted)
    }

    /// Join a book's hold queue. A user can hold a given book at most once.
    pub async fn hold(&self, book_id: i32, user_id: i32) -> AppResult<HoldEntry> {
        self.repository.books.get_by_id(book_id).await?;

        if self.repository.circulation.is_on_hold(book_id, user_id).await? {
            return Err(AppError::Conflict(
                "User is already in the hold queue for this book".to_string(),
            ));
        }

        let entry = self.repository.circulation.add_hold(book_id, user_id).await?;
        tracing::info!(book_id, user_id, hold_id = entry.id, "hold placed");
        Ok(entry)
    }

    /// Leave a book's hold queue. Removes every entry the user has for the
    /// book; under the one-hold-per-user rule that is a single entry.
    pub async fn remove_hold(&self, book_id: i32, user_id: i32) -> AppResult<()> {
        self.repository.books.get_by_id(book_id).await?;

        let removed = self
            .repository
            .circulation
            .remove_holds(book_id, user_id)
            .await?;
        if removed == 0 {
            return Err(AppError::NotFound(
                "User is not in the hold queue for this book".to_string(),
            ));
        }
        tracing::info!(book_id, user_id, removed, "hold removed");
        Ok(())
    }

    /// Circulation status of a book as seen by one viewer. The queue
    /// position is recomputed from the ordered queue on each call.
    pub async fn status(&self, book_id: i32, user_id: i32) -> AppResult<CirculationStatus> {
        let checked_out = self
            .repository
            .circulation
            .is_checked_out(book_id, user_id)
            .await?;
        let queue = self.repository.circulation.hold_queue(book_id).await?;
        let position = queue_position(&queue, user_id);

        Ok(CirculationStatus {
            checked_out,
            on_hold: position.is_some(),
            queue_position: position,
        })
    }
}
