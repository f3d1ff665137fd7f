//! Deduplication set shared by every task of a crawl

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of identifiers that have begun processing
///
/// Identifiers are only ever inserted. The membership test and the insert
/// happen under a single lock acquisition, so two tasks racing on the same
/// identifier can never both proceed.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as visited
    ///
    /// Returns `true` if this call marked it, `false` if it was already marked.
    pub fn check_and_mark(&self, id: &str) -> bool {
        let mut seen = self.lock();
        if seen.contains(id) {
            return false;
        }
        seen.insert(id.to_string())
    }

    /// Returns true if `id` has been marked
    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    /// Number of marked identifiers
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sorted copy of every marked identifier
    pub fn snapshot(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().iter().cloned().collect();
        ids.sort();
        ids
    }

    // The set is insert-only, so a panic while holding the lock cannot leave
    // it half-updated; recover the guard instead of propagating the poison.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_mark_wins() {
        let visited = VisitedSet::new();
        assert!(visited.check_and_mark("a"));
        assert!(!visited.check_and_mark("a"));
        assert!(visited.check_and_mark("b"));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_contains_and_snapshot() {
        let visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(!visited.contains("x"));

        visited.check_and_mark("z");
        visited.check_and_mark("x");

        assert!(visited.contains("x"));
        assert_eq!(visited.snapshot(), vec!["x".to_string(), "z".to_string()]);
    }

    #[test]
    fn test_racing_threads_mark_once() {
        let visited = Arc::new(VisitedSet::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let visited = Arc::clone(&visited);
                std::thread::spawn(move || visited.check_and_mark("contested"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(visited.len(), 1);
    }
}
