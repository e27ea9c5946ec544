//! Read marker - the stored pointer to the last post a user has read.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-(user, topic) read pointer.
///
/// `last_read_post_number` is monotonically non-decreasing: a mark-as-read
/// never moves the pointer backward, which makes out-of-order calls from
/// multiple tabs idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMarker {
    pub user_id: Uuid,
    pub topic_id: Uuid,
    pub last_read_post_number: i64,
    pub last_read_at: DateTime<Utc>,
}

impl ReadMarker {
    /// Create a marker for a first read
    #[must_use]
    pub fn new(user_id: Uuid, topic_id: Uuid, post_number: i64) -> Self {
        Self {
            user_id,
            topic_id,
            last_read_post_number: post_number,
            last_read_at: Utc::now(),
        }
    }

    /// Check whether a candidate position would advance the pointer
    #[inline]
    pub fn would_advance(&self, post_number: i64) -> bool {
        post_number > self.last_read_post_number
    }

    /// Advance the pointer if the candidate is newer; stale positions are
    /// silently ignored. Returns whether the marker changed.
    pub fn advance_to(&mut self, post_number: i64) -> bool {
        if self.would_advance(post_number) {
            self.last_read_post_number = post_number;
            self.last_read_at = Utc::now();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_pointer() {
        let mut marker = ReadMarker::new(Uuid::new_v4(), Uuid::new_v4(), 5);
        assert!(!marker.advance_to(3));
        assert_eq!(marker.last_read_post_number, 5);

        assert!(marker.advance_to(7));
        assert_eq!(marker.last_read_post_number, 7);
    }

    #[test]
    fn test_equal_position_does_not_advance() {
        let mut marker = ReadMarker::new(Uuid::new_v4(), Uuid::new_v4(), 5);
        assert!(!marker.advance_to(5));
        assert_eq!(marker.last_read_post_number, 5);
    }
}
