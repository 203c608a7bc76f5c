//! Session state registry.
//!
//! All per-user state lives here: the feature window, the spine monitor,
//! and the bookkeeping needed for eviction. The registry map is guarded by
//! a `RwLock` and each session carries its own `Mutex`, so two threads can
//! work different sessions concurrently while one session's window and
//! counters are never mutated from two threads at once. Frame ordering
//! within a session is the caller's responsibility.
//!
//! Retention defaults to unbounded: a session that stops submitting frames
//! simply goes inert, which leaks memory under sustained multi-user load.
//! Deployments can either dispose sessions explicitly via
//! [`SessionRegistry::remove`] or cap the registry with
//! [`RegistryConfig::max_sessions`], which evicts the least recently used
//! session on overflow.

use crate::detection::spine::{SpineMonitorConfig, SpineRiskMonitor};
use crate::window::SessionWindow;
use liftsense_core::SessionId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Registry sizing policy.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Maximum live sessions; `None` retains every session for the process
    /// lifetime.
    pub max_sessions: Option<usize>,
}

/// The mutable state of one session.
pub struct SessionState {
    /// Sliding feature window feeding the classifier
    pub window: SessionWindow,
    /// Spinal risk state machine
    pub spine: SpineRiskMonitor,
    last_touched: Instant,
}

impl SessionState {
    fn new(spine_config: SpineMonitorConfig) -> Self {
        Self {
            window: SessionWindow::new(),
            spine: SpineRiskMonitor::new(spine_config),
            last_touched: Instant::now(),
        }
    }

    /// Marks the session as recently used.
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }
}

/// Map of session id to isolated per-session state.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionState>>>>,
    config: RegistryConfig,
    spine_config: SpineMonitorConfig,
}

impl SessionRegistry {
    /// Creates a registry with the given policies.
    #[must_use]
    pub fn new(config: RegistryConfig, spine_config: SpineMonitorConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            spine_config,
        }
    }

    /// Creates an unbounded registry with default spine thresholds.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RegistryConfig::default(), SpineMonitorConfig::default())
    }

    /// Returns the session's state handle, creating it on first use.
    ///
    /// Creating a session past [`RegistryConfig::max_sessions`] evicts the
    /// least recently used existing session first.
    pub fn get_or_create(&self, id: &SessionId) -> Arc<Mutex<SessionState>> {
        if let Some(existing) = self.sessions.read().get(id) {
            let handle = Arc::clone(existing);
            handle.lock().touch();
            return handle;
        }

        let mut sessions = self.sessions.write();
        // Re-check under the write lock: another thread may have created it
        if let Some(existing) = sessions.get(id) {
            let handle = Arc::clone(existing);
            handle.lock().touch();
            return handle;
        }

        if let Some(max) = self.config.max_sessions {
            while sessions.len() >= max {
                match Self::least_recently_used(&sessions) {
                    Some(oldest) => {
                        debug!(session = %oldest, "evicting least recently used session");
                        sessions.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        let handle = Arc::new(Mutex::new(SessionState::new(self.spine_config.clone())));
        sessions.insert(id.clone(), Arc::clone(&handle));
        handle
    }

    fn least_recently_used(
        sessions: &HashMap<SessionId, Arc<Mutex<SessionState>>>,
    ) -> Option<SessionId> {
        sessions
            .iter()
            .min_by_key(|(_, state)| state.lock().last_touched)
            .map(|(id, _)| id.clone())
    }

    /// Disposes a session explicitly. Returns whether it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether the registry holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Whether a session currently exists.
    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureVector, FEATURE_DIM};

    #[test]
    fn test_sessions_are_isolated() {
        let registry = SessionRegistry::with_defaults();
        let a = registry.get_or_create(&SessionId::from("a"));
        let b = registry.get_or_create(&SessionId::from("b"));

        a.lock().window.push(FeatureVector([1.0; FEATURE_DIM]));
        assert_eq!(a.lock().window.len(), 1);
        assert_eq!(b.lock().window.len(), 0);
    }

    #[test]
    fn test_get_or_create_reuses_state() {
        let registry = SessionRegistry::with_defaults();
        let id = SessionId::from("s1");

        registry
            .get_or_create(&id)
            .lock()
            .window
            .push(FeatureVector([1.0; FEATURE_DIM]));
        assert_eq!(registry.get_or_create(&id).lock().window.len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unbounded_by_default() {
        let registry = SessionRegistry::with_defaults();
        for i in 0..100 {
            registry.get_or_create(&SessionId::new(format!("s{i}")));
        }
        assert_eq!(registry.len(), 100);
    }

    #[test]
    fn test_lru_eviction_on_overflow() {
        let registry = SessionRegistry::new(
            RegistryConfig {
                max_sessions: Some(2),
            },
            SpineMonitorConfig::default(),
        );

        let pause = std::time::Duration::from_millis(2);
        registry.get_or_create(&SessionId::from("old"));
        std::thread::sleep(pause);
        registry.get_or_create(&SessionId::from("mid"));
        std::thread::sleep(pause);
        // Touch "old" so "mid" becomes the eviction candidate
        registry.get_or_create(&SessionId::from("old"));
        std::thread::sleep(pause);
        registry.get_or_create(&SessionId::from("new"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&SessionId::from("old")));
        assert!(!registry.contains(&SessionId::from("mid")));
        assert!(registry.contains(&SessionId::from("new")));
    }

    #[test]
    fn test_remove_disposes_state() {
        let registry = SessionRegistry::with_defaults();
        let id = SessionId::from("gone");
        registry.get_or_create(&id);

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }
}
