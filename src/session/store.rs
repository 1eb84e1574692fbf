use super::config::SessionConfig;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// An authenticated login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Username the session was issued to
    pub identity: String,

    /// When the login happened
    pub created_at: DateTime<Utc>,
}

/// Process-wide table of session tokens
///
/// One lock guards the whole map. It is only held for map operations, never
/// across filesystem access.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Issue a fresh token for `identity`
    pub async fn create(&self, identity: impl Into<String>) -> String {
        let identity = identity.into();
        let session = Session {
            identity: identity.clone(),
            created_at: Utc::now(),
        };

        let mut sessions = self.sessions.write().await;
        let token = loop {
            let candidate = generate_token();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(token.clone(), session);

        info!(
            "Session {} created for {} ({} active)",
            token_hint(&token),
            identity,
            sessions.len()
        );

        token
    }

    /// Identity behind `token`, or `None` when unknown or expired
    pub async fn lookup(&self, token: &str) -> Option<String> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !self.is_expired(session, now) => {
                    return Some(session.identity.clone())
                }
                Some(_) => {}
            }
        }

        // Expired: drop it so the map does not wait for the next purge
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(token)
            .is_some_and(|session| self.is_expired(session, now))
        {
            sessions.remove(token);
            debug!("Session {} expired", token_hint(token));
        }
        None
    }

    /// Remove `token`; unknown tokens are ignored
    pub async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.remove(token) {
            info!(
                "Session {} revoked for {}",
                token_hint(token),
                session.identity
            );
        }
    }

    /// Drop every expired session, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Spawn the periodic purge loop. Does nothing useful without a timeout.
    pub fn spawn_purge_task(&self) -> Option<JoinHandle<()>> {
        self.config.timeout?;

        let store = self.clone();
        let period = self.config.purge_interval;

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = store.purge_expired().await;
                if removed > 0 {
                    info!("Purged {} expired sessions", removed);
                }
            }
        }))
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        match self.config.timeout {
            Some(timeout) => now
                .signed_duration_since(session.created_at)
                .to_std()
                .map(|age| age > timeout)
                .unwrap_or(false),
            None => false,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// 32 random bytes from two v4 UUIDs, base64url without padding
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
    bytes[16..].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Short token prefix for log lines
fn token_hint(token: &str) -> &str {
    token.get(..6).unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    #[test]
    fn test_tokens_are_unique_and_url_safe() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 1000);
        for token in &tokens {
            assert_eq!(token.len(), 43);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_token_hint_is_short() {
        assert_eq!(token_hint("abcdefghij"), "abcdef");
        assert_eq!(token_hint("abc"), "abc");
    }

    #[tokio::test]
    async fn test_create_lookup_revoke() {
        let store = SessionStore::default();

        let token = store.create("demo").await;
        assert_eq!(store.lookup(&token).await.as_deref(), Some("demo"));
        assert_eq!(store.lookup(&token).await.as_deref(), Some("demo"));

        store.revoke(&token).await;
        assert_eq!(store.lookup(&token).await, None);

        // Revoking twice is fine
        store.revoke(&token).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_tokens_map_to_their_own_identity() {
        let store = SessionStore::default();
        let alice = store.create("alice").await;
        let bob = store.create("bob").await;

        assert_ne!(alice, bob);
        assert_eq!(store.lookup(&alice).await.as_deref(), Some("alice"));
        assert_eq!(store.lookup(&bob).await.as_deref(), Some("bob"));

        store.revoke(&alice).await;
        assert_eq!(store.lookup(&bob).await.as_deref(), Some("bob"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = SessionStore::default();
        assert_eq!(store.lookup("nope").await, None);
        assert_eq!(store.lookup("").await, None);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_dropped() {
        let store = SessionStore::new(SessionConfig {
            timeout: Some(Duration::from_millis(10)),
            purge_interval: Duration::from_secs(60),
        });

        let token = store.create("demo").await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.lookup(&token).await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionStore::new(SessionConfig {
            timeout: Some(Duration::from_millis(10)),
            purge_interval: Duration::from_secs(60),
        });

        store.create("a").await;
        store.create("b").await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        let fresh = store.create("c").await;

        assert_eq!(store.purge_expired().await, 2);
        assert_eq!(store.lookup(&fresh).await.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_no_timeout_never_expires() {
        let store = SessionStore::new(SessionConfig {
            timeout: None,
            purge_interval: Duration::from_secs(60),
        });

        let token = store.create("demo").await;
        assert_eq!(store.purge_expired().await, 0);
        assert_eq!(store.lookup(&token).await.as_deref(), Some("demo"));
        assert!(store.spawn_purge_task().is_none());
    }
}
