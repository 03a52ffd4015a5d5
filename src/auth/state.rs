use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::{Rng, distributions::Alphanumeric};

const STATE_LEN: usize = 32;

/// One-time OAuth `state` values, valid for a short window.
#[derive(Clone)]
pub struct OauthStateStore {
    issued: Arc<DashMap<String, DateTime<Utc>>>,
    ttl: Duration,
}

impl OauthStateStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            issued: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn issue(&self) -> String {
        let now = Utc::now();
        self.issued.retain(|_, expires| *expires > now);

        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect();
        self.issued.insert(state.clone(), now + self.ttl);
        state
    }

    /// True at most once per issued value, and only before it expires.
    pub fn consume(&self, state: &str) -> bool {
        self.issued
            .remove(state)
            .is_some_and(|(_, expires)| expires > Utc::now())
    }
}

impl Default for OauthStateStore {
    fn default() -> Self {
        Self::new(Duration::minutes(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_single_use() {
        let store = OauthStateStore::default();
        let state = store.issue();
        assert_eq!(state.len(), STATE_LEN);
        assert!(store.consume(&state));
        assert!(!store.consume(&state));
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let store = OauthStateStore::default();
        store.issue();
        assert!(!store.consume("forged"));
        assert!(!store.consume(""));
    }

    #[test]
    fn test_expired_state_is_rejected() {
        let store = OauthStateStore::new(Duration::seconds(-1));
        let state = store.issue();
        assert!(!store.consume(&state));
    }

    #[test]
    fn test_states_are_distinct() {
        let store = OauthStateStore::default();
        assert_ne!(store.issue(), store.issue());
    }
}
