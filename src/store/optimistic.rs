//! Optimistic mutation with rollback.
//!
//! A mutation runs in three steps: apply the change speculatively while
//! recording what it displaced, then commit (keep it) or revert (put back
//! only what this mutation displaced) depending on the backend's answer.
//! Changes other mutations confirmed in the meantime survive a revert.
//!
//! Mutations are keyed per entity through [`InFlight`]: a second mutation
//! for a key that is still waiting on the backend is rejected instead of
//! racing the first one's snapshot.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;

use crate::{Error, Result};

/// Registry of entity keys with a mutation in flight.
#[derive(Debug)]
pub struct InFlight<K> {
    keys: Mutex<HashSet<K>>,
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            keys: Mutex::new(HashSet::new()),
        }
    }
}

impl<K> InFlight<K>
where
    K: Eq + Hash + Clone + Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key` until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// * [`Error::InFlight`] - If another mutation holds the key
    pub fn acquire(&self, key: K) -> Result<InFlightGuard<'_, K>> {
        let mut keys = self.keys.lock();
        if !keys.insert(key.clone()) {
            return Err(Error::in_flight(key.to_string()));
        }
        Ok(InFlightGuard { owner: self, key })
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.lock().contains(key)
    }
}

/// Releases its key on drop, including when the owning future is dropped
/// before completion.
#[derive(Debug)]
pub struct InFlightGuard<'a, K>
where
    K: Eq + Hash,
{
    owner: &'a InFlight<K>,
    key: K,
}

impl<K> Drop for InFlightGuard<'_, K>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        self.owner.keys.lock().remove(&self.key);
    }
}

/// Applies `apply` to `state` immediately, then awaits `remote`.
///
/// `apply` returns an undo record describing what it changed. On failure
/// that record is handed to `revert`, which puts back this mutation's own
/// change, and the error is returned. `on_change` sees the state after the
/// speculative apply and again after a revert.
///
/// `remote` must be lazy (an `async` block or `async fn` call) so that no
/// request is sent before the speculative state is visible.
pub async fn optimistic<S, U, T, A, R, C, F>(
    state: &Mutex<S>,
    apply: A,
    revert: R,
    on_change: C,
    remote: F,
) -> Result<T>
where
    A: FnOnce(&mut S) -> U,
    R: FnOnce(&mut S, U),
    C: Fn(&S),
    F: Future<Output = Result<T>>,
{
    let undo = {
        let mut current = state.lock();
        let undo = apply(&mut *current);
        on_change(&*current);
        undo
    };

    match remote.await {
        Ok(value) => Ok(value),
        Err(e) => {
            let mut current = state.lock();
            revert(&mut *current, undo);
            on_change(&*current);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_rejects_same_key() {
        let registry = InFlight::<u64>::new();

        let guard = registry.acquire(7).unwrap();
        assert!(registry.contains(&7));
        assert!(matches!(registry.acquire(7), Err(Error::InFlight(ref k)) if k == "7"));
        assert!(registry.acquire(8).is_ok());

        drop(guard);
        assert!(!registry.contains(&7));
        assert!(registry.acquire(7).is_ok());
    }

    fn take(items: &mut Vec<i32>, value: i32) -> Option<usize> {
        let at = items.iter().position(|&x| x == value)?;
        items.remove(at);
        Some(at)
    }

    fn put_back(items: &mut Vec<i32>, value: i32, at: Option<usize>) {
        if let Some(at) = at {
            items.insert(at.min(items.len()), value);
        }
    }

    #[tokio::test]
    async fn test_commit_keeps_speculative_state() {
        let state = Mutex::new(vec![1, 2, 3]);
        let result = optimistic(
            &state,
            |s| take(s, 2),
            |s, at| put_back(s, 2, at),
            |_| {},
            async { Ok(()) },
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(*state.lock(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_revert_restores_own_change() {
        let state = Mutex::new(vec![1, 2, 3]);
        let changes = Mutex::new(Vec::new());

        let result: Result<()> = optimistic(
            &state,
            |s| take(s, 2),
            |s, at| put_back(s, 2, at),
            |s| changes.lock().push(s.clone()),
            async { Err(Error::Other("offline".to_string())) },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(*state.lock(), vec![1, 2, 3]);
        assert_eq!(*changes.lock(), vec![vec![1, 3], vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn test_revert_keeps_changes_made_while_pending() {
        let state = Mutex::new(vec![1, 2, 3]);

        let result: Result<()> = optimistic(
            &state,
            |s| take(s, 1),
            |s, at| put_back(s, 1, at),
            |_| {},
            async {
                state.lock().retain(|&x| x != 3);
                state.lock().push(4);
                Err(Error::Other("offline".to_string()))
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(*state.lock(), vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn test_apply_is_visible_before_remote_runs() {
        let state = Mutex::new(vec![1, 2]);
        let seen_during_remote = optimistic(
            &state,
            |s| std::mem::take(s),
            |s, old| *s = old,
            |_| {},
            async { Ok(state.lock().len()) },
        )
        .await
        .unwrap();

        assert_eq!(seen_during_remote, 0);
    }
}
