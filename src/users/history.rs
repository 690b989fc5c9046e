use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::WatchEntry;

/// Upper bound on the recently-watched log.
pub const RECENT_LIMIT: usize = 20;

/// Sole mutator of the recently-watched log: drops any existing entry for
/// the movie, prepends a fresh one and truncates to [`RECENT_LIMIT`].
/// Re-watching therefore moves the entry to the front with a refreshed
/// timestamp and position instead of duplicating it.
pub fn push_watch(
    entries: &mut Vec<WatchEntry>,
    movie_id: Uuid,
    position: f64,
    watched_at: OffsetDateTime,
) {
    entries.retain(|e| e.movie_id != movie_id);
    entries.insert(
        0,
        WatchEntry {
            movie_id,
            watched_at,
            position,
        },
    );
    entries.truncate(RECENT_LIMIT);
}
