//! Keyed lock table serializing read-modify-write cycles per entity.
//!
//! Keys are taken in phases: characters, then factions, then faction names.
//! A guard may only be extended with keys of a later phase than everything it
//! already holds, so two callers can never wait on each other.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockKey {
    Character(String),
    Faction(String),
    FactionName(String),
}

impl LockKey {
    pub fn character(actor_id: &str) -> Self {
        LockKey::Character(actor_id.to_string())
    }

    pub fn faction(faction_id: &str) -> Self {
        LockKey::Faction(faction_id.to_string())
    }

    pub fn faction_name(name: &str) -> Self {
        LockKey::FactionName(name.to_string())
    }

    fn phase(&self) -> u8 {
        match self {
            LockKey::Character(_) => 0,
            LockKey::Faction(_) => 1,
            LockKey::FactionName(_) => 2,
        }
    }
}

#[derive(Debug, Default)]
pub struct EntityLocks {
    held: Mutex<HashSet<LockKey>>,
    released: Condvar,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every key is free, then take them all at once.
    pub fn acquire(&self, keys: impl IntoIterator<Item = LockKey>) -> LockGuard<'_> {
        let mut keys: Vec<LockKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();
        self.take(&keys);
        LockGuard { locks: self, keys }
    }

    pub fn is_held(&self, key: &LockKey) -> bool {
        self.table().contains(key)
    }

    fn table(&self) -> MutexGuard<'_, HashSet<LockKey>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self, keys: &[LockKey]) {
        let mut held = self.table();
        while keys.iter().any(|k| held.contains(k)) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.extend(keys.iter().cloned());
    }

    fn release(&self, keys: &[LockKey]) {
        let mut held = self.table();
        for key in keys {
            held.remove(key);
        }
        drop(held);
        self.released.notify_all();
    }
}

/// Keys held by one caller; released together on drop.
#[derive(Debug)]
pub struct LockGuard<'a> {
    locks: &'a EntityLocks,
    keys: Vec<LockKey>,
}

impl LockGuard<'_> {
    /// Take additional keys of a later phase while keeping the current ones.
    pub fn extend(&mut self, keys: impl IntoIterator<Item = LockKey>) {
        let mut fresh: Vec<LockKey> = keys
            .into_iter()
            .filter(|k| !self.keys.contains(k))
            .collect();
        fresh.sort();
        fresh.dedup();
        if fresh.is_empty() {
            return;
        }
        debug_assert!(
            fresh.iter().map(LockKey::phase).min() > self.keys.iter().map(LockKey::phase).max(),
            "lock phases must only move forward"
        );
        self.locks.take(&fresh);
        self.keys.extend(fresh);
    }

    pub fn keys(&self) -> &[LockKey] {
        &self.keys
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.locks.release(&self.keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_guard_releases_on_drop() {
        let locks = EntityLocks::new();
        let key = LockKey::character("a");
        {
            let _guard = locks.acquire([key.clone()]);
            assert!(locks.is_held(&key));
        }
        assert!(!locks.is_held(&key));
    }

    #[test]
    fn test_duplicate_keys_are_collapsed() {
        let locks = EntityLocks::new();
        let guard = locks.acquire([LockKey::character("a"), LockKey::character("a")]);
        assert_eq!(guard.keys().len(), 1);
    }

    #[test]
    fn test_extend_takes_later_phase_and_skips_owned_keys() {
        let locks = EntityLocks::new();
        let mut guard = locks.acquire([LockKey::character("a")]);
        guard.extend([LockKey::faction("f1"), LockKey::faction("f1")]);
        guard.extend([LockKey::faction("f1")]);
        assert_eq!(guard.keys().len(), 2);
        assert!(locks.is_held(&LockKey::faction("f1")));
        drop(guard);
        assert!(!locks.is_held(&LockKey::faction("f1")));
    }

    #[test]
    fn test_same_key_is_mutually_exclusive() {
        let locks = Arc::new(EntityLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let peak = Arc::clone(&peak);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let _guard = locks.acquire([LockKey::character("shared")]);
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_micros(50));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_crossing_pairs_do_not_deadlock() {
        let locks = Arc::new(EntityLocks::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let locks = Arc::clone(&locks);
                thread::spawn(move || {
                    let (a, b) = if i % 2 == 0 { ("x", "y") } else { ("y", "x") };
                    for _ in 0..200 {
                        let mut guard =
                            locks.acquire([LockKey::character(a), LockKey::character(b)]);
                        guard.extend([LockKey::faction("f1"), LockKey::faction("f2")]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(!locks.is_held(&LockKey::character("x")));
    }
}
