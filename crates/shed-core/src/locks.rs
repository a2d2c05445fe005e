//! Repository-keyed mutual exclusion.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::trace;

/// One lock per repository id.
///
/// Runs for the same repository are serialized; different repositories
/// never contend.
#[derive(Debug, Default)]
pub struct RepositoryLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RepositoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `repository_id`.
    pub fn run_locked<T>(&self, repository_id: &str, f: impl FnOnce() -> T) -> T {
        // Clone the handle out so the map shard is not held while waiting
        let lock = self
            .locks
            .entry(repository_id.to_string())
            .or_default()
            .clone();
        let _guard = lock.lock();
        trace!(repository = %repository_id, "Acquired repository lock");
        f()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn same_repository_is_serialized() {
        let locks = Arc::new(RepositoryLocks::new());
        let active = Arc::new(AtomicUsize::new(0));
        let overlap = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let active = Arc::clone(&active);
                let overlap = Arc::clone(&overlap);
                thread::spawn(move || {
                    locks.run_locked("repo-1", || {
                        if active.fetch_add(1, Ordering::SeqCst) > 0 {
                            overlap.fetch_add(1, Ordering::SeqCst);
                        }
                        thread::sleep(Duration::from_millis(10));
                        active.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(overlap.load(Ordering::SeqCst), 0);
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn different_repositories_do_not_block() {
        let locks = RepositoryLocks::new();
        let value = locks.run_locked("a", || locks.run_locked("b", || 42));
        assert_eq!(value, 42);
        assert_eq!(locks.len(), 2);
    }
}
