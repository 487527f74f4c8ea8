//! Process-wide credential pool with rotation and usage accounting. One pool
//! serves every in-flight query; all mutation happens under a single mutex
//! so concurrent queries cannot corrupt the cursor or double-count.

use std::sync::{Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;

/// Snapshot of the pool counters, safe to expose (no secrets).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolStatus {
    pub cursor: usize,
    pub pool_size: usize,
    pub usage: Vec<u64>,
    pub rotations: u64,
    pub failures: u64,
    pub total_requests: u64,
}

/// One reserved attempt: the credential to use and its pool index (for
/// logging; the credential itself is never logged).
pub struct CredentialLease {
    pub index: usize,
    pub credential: SecretString,
}

#[derive(Debug, Default)]
struct PoolState {
    credentials: Vec<SecretString>,
    cursor: usize,
    usage: Vec<u64>,
    rotations: u64,
    failures: u64,
    total_requests: u64,
}

#[derive(Debug, Default)]
pub struct CredentialPool {
    state: Mutex<PoolState>,
}

impl CredentialPool {
    pub fn new(credentials: Vec<SecretString>) -> Self {
        let usage = vec![0; credentials.len()];
        Self {
            state: Mutex::new(PoolState {
                credentials,
                cursor: 0,
                usage,
                rotations: 0,
                failures: 0,
                total_requests: 0,
            }),
        }
    }

    pub fn size(&self) -> usize {
        self.lock().credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Reserves the cursor's credential for one attempt and counts it.
    /// Returns `None` on an empty pool, leaving every counter untouched.
    /// Invariant: `sum(usage) == total_requests` holds across calls because
    /// both are incremented under the same lock.
    pub fn begin_attempt(&self) -> Option<CredentialLease> {
        let mut state = self.lock();
        if state.credentials.is_empty() {
            return None;
        }
        let index = state.cursor;
        state.total_requests += 1;
        state.usage[index] += 1;
        let credential = state.credentials[index].clone();
        Some(CredentialLease { index, credential })
    }

    /// Advances the cursor to the next credential. Returns `false` when the
    /// pool has fewer than two entries and rotation is meaningless.
    pub fn rotate(&self) -> bool {
        let mut state = self.lock();
        if state.credentials.len() < 2 {
            return false;
        }
        state.cursor = (state.cursor + 1) % state.credentials.len();
        state.rotations += 1;
        true
    }

    /// Counts one pool exhaustion (all credentials failed for a query).
    pub fn record_exhaustion(&self) {
        self.lock().failures += 1;
    }

    pub fn status(&self) -> PoolStatus {
        let state = self.lock();
        PoolStatus {
            cursor: state.cursor,
            pool_size: state.credentials.len(),
            usage: state.usage.clone(),
            rotations: state.rotations,
            failures: state.failures,
            total_requests: state.total_requests,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::CredentialPool;

    fn pool_of(count: usize) -> CredentialPool {
        let credentials =
            (0..count).map(|n| SecretString::from(format!("key-{n}"))).collect::<Vec<_>>();
        CredentialPool::new(credentials)
    }

    #[test]
    fn empty_pool_reserves_nothing_and_counts_nothing() {
        let pool = pool_of(0);
        assert!(pool.begin_attempt().is_none());
        let status = pool.status();
        assert_eq!(status.total_requests, 0);
        assert_eq!(status.pool_size, 0);
    }

    #[test]
    fn usage_counters_track_total_requests() {
        let pool = pool_of(3);
        for _ in 0..2 {
            pool.begin_attempt().expect("non-empty pool");
        }
        pool.rotate();
        pool.begin_attempt().expect("non-empty pool");

        let status = pool.status();
        assert_eq!(status.total_requests, 3);
        assert_eq!(status.usage, vec![2, 1, 0]);
        assert_eq!(status.usage.iter().sum::<u64>(), status.total_requests);
    }

    #[test]
    fn rotation_wraps_and_counts() {
        let pool = pool_of(2);
        assert!(pool.rotate());
        assert!(pool.rotate());
        let status = pool.status();
        assert_eq!(status.cursor, 0);
        assert_eq!(status.rotations, 2);
    }

    #[test]
    fn single_credential_cannot_rotate() {
        let pool = pool_of(1);
        assert!(!pool.rotate());
        assert_eq!(pool.status().rotations, 0);
    }
}
