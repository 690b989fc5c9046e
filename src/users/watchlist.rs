use uuid::Uuid;

/// Removes any pre-existing reference before appending, so stored
/// duplicates (corrupt state) are healed on the way through. Adding an
/// already-present movie keeps the set's content unchanged; its position
/// moves to the end.
pub fn add(list: &mut Vec<Uuid>, movie_id: Uuid) {
    list.retain(|id| *id != movie_id);
    list.push(movie_id);
}

/// Filters out every occurrence. Removing an absent movie is a no-op.
pub fn remove(list: &mut Vec<Uuid>, movie_id: Uuid) {
    list.retain(|id| *id != movie_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_in_content() {
        let mut list = Vec::new();
        let m = Uuid::new_v4();
        add(&mut list, m);
        add(&mut list, m);
        assert_eq!(list, vec![m]);
    }

    #[test]
    fn add_moves_existing_entry_to_the_end() {
        let mut list = Vec::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        add(&mut list, a);
        add(&mut list, b);
        add(&mut list, a);
        assert_eq!(list, vec![b, a]);
    }

    #[test]
    fn remove_absent_is_a_noop() {
        let mut list = vec![Uuid::new_v4()];
        remove(&mut list, Uuid::new_v4());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_clears_stored_duplicates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut list = vec![a, b, a];
        remove(&mut list, a);
        assert_eq!(list, vec![b]);
    }
}
