//! Hold queue and checkout relation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One entry in a book's hold queue. Queue order is insertion order,
/// materialized by the monotonically increasing `id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HoldEntry {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub placed_at: Option<DateTime<Utc>>,
}

/// Circulation status of a book as seen by one viewer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CirculationStatus {
    /// The viewer currently has the book checked out
    pub checked_out: bool,
    /// The viewer is in the hold queue
    pub on_hold: bool,
    /// 1-based position in the hold queue, if on hold
    pub queue_position: Option<usize>,
}

/// 1-based position of `user_id` in an ordered hold queue: 1 + the number
/// of users ahead in insertion order. Recomputed on each call, not stored.
pub fn queue_position(queue: &[HoldEntry], user_id: i32) -> Option<usize> {
    queue
        .iter()
        .position(|entry| entry.user_id == user_id)
        .map(|index| index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i32, user_id: i32) -> HoldEntry {
        HoldEntry {
            id,
            book_id: 1,
            user_id,
            placed_at: None,
        }
    }

    #[test]
    fn position_is_one_based_insertion_order() {
        let queue = vec![entry(10, 101), entry(11, 102), entry(12, 103)];
        assert_eq!(queue_position(&queue, 101), Some(1));
        assert_eq!(queue_position(&queue, 102), Some(2));
        assert_eq!(queue_position(&queue, 103), Some(3));
    }

    #[test]
    fn position_is_none_when_not_queued() {
        let queue = vec![entry(10, 101)];
        assert_eq!(queue_position(&queue, 999), None);
        assert_eq!(queue_position(&[], 101), None);
    }
}
