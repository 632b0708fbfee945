//! Session store: one session per client identifier.
//!
//! The client map sits behind an `RwLock`; each session has its own `Mutex`
//! so different clients never wait on each other beyond the brief map
//! lookup. New sessions are inserted under the write lock, so of two
//! concurrent first requests for a client the first writer wins and the
//! other reuses its session.
//!
//! Eviction runs only when a new session is created: sessions idle for
//! longer than the TTL are dropped, then least-recently-active sessions
//! until the map has room. A session is in use, and never evicted, while it
//! is locked or while a request holds a handle to it outside the map.

use crate::config::{EngineConfig, StoreConfig};
use crate::engine::session::Session;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::{Duration, Instant};

/// Handle to one client's session.
pub type SharedSession = Arc<Mutex<Session>>;

/// Lock a session, recovering from poisoning.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

/// Owner of all live sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
    engine: EngineConfig,
    policy: StoreConfig,
}

impl SessionStore {
    pub fn new(engine: EngineConfig, policy: StoreConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            engine,
            policy,
        }
    }

    /// Return the client's session, creating it on first use.
    pub fn get_or_create(&self, client_id: &str, now: Instant) -> SharedSession {
        if let Some(session) = self.get(client_id) {
            return session;
        }

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        if let Some(session) = sessions.get(client_id) {
            return Arc::clone(session);
        }

        self.evict(&mut sessions, now);

        let session = Arc::new(Mutex::new(Session::new(&self.engine, now)));
        sessions.insert(client_id.to_string(), Arc::clone(&session));
        log::debug!(
            "Created session '{client_id}' ({} live)",
            sessions.len()
        );
        session
    }

    /// Existing session for `client_id`, if any.
    pub fn get(&self, client_id: &str) -> Option<SharedSession> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(client_id)
            .map(Arc::clone)
    }

    /// Drop the client's session. Returns true if one existed.
    pub fn reset(&self, client_id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(client_id)
            .is_some();
        if removed {
            log::debug!("Reset session '{client_id}'");
        }
        removed
    }

    /// Current sentence, empty for unknown clients. Never creates a session.
    pub fn current_sentence(&self, client_id: &str) -> String {
        self.get(client_id)
            .map(|session| lock_session(&session).sentence().to_string())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.get(client_id).is_some()
    }

    fn evict(&self, sessions: &mut HashMap<String, SharedSession>, now: Instant) {
        if let Some(ttl) = self.policy.idle_ttl() {
            sessions.retain(|client_id, session| match idle_for(session, now) {
                Some(idle) if idle >= ttl => {
                    log::debug!("Expired session '{client_id}' after {idle:?} idle");
                    false
                }
                _ => true,
            });
        }

        let Some(max) = self.policy.max_sessions else {
            return;
        };
        while sessions.len() >= max {
            let oldest = sessions
                .iter()
                .filter_map(|(client_id, session)| {
                    idle_for(session, now).map(|idle| (client_id.clone(), idle))
                })
                .max_by_key(|(_, idle)| *idle);
            match oldest {
                Some((client_id, idle)) => {
                    sessions.remove(&client_id);
                    log::debug!("Evicted least recently active session '{client_id}' ({idle:?} idle)");
                }
                None => {
                    log::warn!("All {} sessions busy, exceeding limit of {max}", sessions.len());
                    break;
                }
            }
        }
    }
}

/// Idle time of a session, `None` if an in-flight request holds it.
fn idle_for(session: &SharedSession, now: Instant) -> Option<Duration> {
    if Arc::strong_count(session) > 1 {
        return None;
    }
    let guard = match session.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::Poisoned(e)) => e.into_inner(),
        Err(TryLockError::WouldBlock) => return None,
    };
    Some(now.saturating_duration_since(guard.last_activity()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::corrector::PassthroughCorrector;
    use crate::engine::observation::Observation;
    use crate::labels::Labels;

    fn store(policy: StoreConfig) -> SessionStore {
        SessionStore::new(EngineConfig::default(), policy)
    }

    fn unbounded() -> StoreConfig {
        StoreConfig {
            max_sessions: None,
            idle_ttl_secs: None,
        }
    }

    fn touch(store: &SessionStore, client_id: &str, at: Instant) {
        let session = store.get_or_create(client_id, at);
        lock_session(&session).process(Observation::no_hand(at), &Labels::default(), &PassthroughCorrector);
    }

    #[test]
    fn creates_lazily_and_reuses() {
        let store = store(unbounded());
        let now = Instant::now();
        assert!(store.is_empty());

        let a = store.get_or_create("a", now);
        let again = store.get_or_create("a", now);
        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn current_sentence_does_not_create() {
        let store = store(unbounded());
        assert_eq!(store.current_sentence("ghost"), "");
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn reset_drops_session() {
        let store = store(unbounded());
        store.get_or_create("a", Instant::now());
        assert!(store.reset("a"));
        assert!(!store.reset("a"));
        assert!(store.is_empty());
    }

    #[test]
    fn lru_eviction_keeps_most_recent() {
        let store = store(StoreConfig {
            max_sessions: Some(2),
            idle_ttl_secs: None,
        });
        let start = Instant::now();
        touch(&store, "a", start);
        touch(&store, "b", start + Duration::from_secs(1));
        touch(&store, "a", start + Duration::from_secs(2));
        touch(&store, "c", start + Duration::from_secs(3));

        assert_eq!(store.len(), 2);
        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert!(store.contains("c"));
    }

    #[test]
    fn busy_sessions_are_not_evicted() {
        let store = store(StoreConfig {
            max_sessions: Some(1),
            idle_ttl_secs: None,
        });
        let start = Instant::now();
        let a = store.get_or_create("a", start);
        let _guard = lock_session(&a);

        store.get_or_create("b", start + Duration::from_secs(10));
        assert!(store.contains("a"));
        assert!(store.contains("b"));
    }

    #[test]
    fn held_handle_survives_eviction() {
        let engine = EngineConfig {
            hold_frames: 1,
            ..EngineConfig::default()
        };
        let store = SessionStore::new(
            engine,
            StoreConfig {
                max_sessions: Some(1),
                idle_ttl_secs: Some(1),
            },
        );
        let start = Instant::now();
        let a = store.get_or_create("a", start);

        // Another client arrives before the first request locks its session
        let later = start + Duration::from_secs(10);
        store.get_or_create("b", later);
        lock_session(&a).process(
            Observation::sign(0, 0.9, later),
            &Labels::default(),
            &PassthroughCorrector,
        );
        drop(a);

        assert!(store.contains("a"));
        assert_eq!(store.current_sentence("a"), "0");
    }

    #[test]
    fn idle_ttl_expires_on_next_creation() {
        let store = store(StoreConfig {
            max_sessions: None,
            idle_ttl_secs: Some(60),
        });
        let start = Instant::now();
        touch(&store, "old", start);
        touch(&store, "recent", start + Duration::from_secs(50));
        touch(&store, "new", start + Duration::from_secs(61));

        assert!(!store.contains("old"));
        assert!(store.contains("recent"));
        assert!(store.contains("new"));
    }
}
