use crate::config::Config;
use crate::sandbox::PathSandbox;
use crate::session::SessionStore;
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Confinement of every filesystem read
    pub sandbox: Arc<PathSandbox>,

    /// Active logins (token → session)
    pub sessions: SessionStore,

    /// Static credential table (username → password)
    pub accounts: Arc<HashMap<String, String>>,

    /// Expose `/api/debug`
    pub debug: bool,

    /// Browser UI assets, when served by this process
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        sandbox: PathSandbox,
        sessions: SessionStore,
        accounts: HashMap<String, String>,
    ) -> Self {
        Self {
            sandbox: Arc::new(sandbox),
            sessions,
            accounts: Arc::new(accounts),
            debug: false,
            static_dir: None,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let sandbox = PathSandbox::new(&cfg.library.root)?;
        let sessions = SessionStore::new(cfg.session_config());

        Ok(Self {
            debug: cfg.debug,
            static_dir: cfg.library.static_dir.clone(),
            ..Self::new(sandbox, sessions, cfg.credentials())
        })
    }

    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        self.accounts
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}
