use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Movie, WatchEntry};

/// Default number of recommendations returned.
pub const DEFAULT_LIMIT: i64 = 12;

/// How many of the heaviest genres feed the catalog query.
pub const TOP_GENRES: usize = 3;

/// Tallies genre frequencies over the recently-watched log (front-to-back)
/// and returns the top `n` genres, heaviest first. Ties keep first-seen
/// order: the sort is stable and the candidate list is built in encounter
/// order. Entries whose movie is gone from the catalog contribute nothing.
pub fn top_genres(
    entries: &[WatchEntry],
    movies_by_id: &HashMap<Uuid, Movie>,
    n: usize,
) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for entry in entries {
        let Some(movie) = movies_by_id.get(&entry.movie_id) else {
            continue;
        };
        for genre in &movie.genres {
            let count = counts.entry(genre.as_str()).or_insert(0);
            if *count == 0 {
                order.push(genre.as_str());
            }
            *count += 1;
        }
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(n).map(String::from).collect()
}
