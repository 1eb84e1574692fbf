use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the login session table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a session stays valid after login (`None` = until logout)
    /// Default: 24 hours
    pub timeout: Option<Duration>,

    /// How often the background task drops expired sessions
    /// Default: 300 seconds (5 minutes)
    pub purge_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(24 * 60 * 60)), // 24 hours
            purge_interval: Duration::from_secs(300),         // 5 minutes
        }
    }
}
