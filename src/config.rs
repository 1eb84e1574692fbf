use crate::session::SessionConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables use this prefix and `__` between key levels,
/// e.g. `AUDIO_BROWSER__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "AUDIO_BROWSER";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub auth: AuthConfig,
    /// Verbose logging and the `/api/debug` listing endpoint
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    /// Directory whose contents are exposed; nothing outside it is readable
    pub root: PathBuf,
    /// Browser UI assets (`index.html`, `login.html`, `/static/*`)
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// 0 keeps sessions until logout
    pub session_timeout_secs: u64,
    pub purge_interval_secs: u64,
    /// `[[auth.accounts]]` entries; a list keeps usernames case-sensitive
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with(path, &Overrides::default())
    }

    /// Layer defaults, the optional file at `path`, the environment, then
    /// `overrides`.
    pub fn load_with(path: &str, overrides: &Overrides) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 3002_i64)?
            .set_default("auth.session_timeout_secs", 24 * 60 * 60_i64)?
            .set_default("auth.purge_interval_secs", 300_i64)?
            .set_default("debug", false)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        if let Some(root) = &overrides.root {
            builder = builder.set_override("library.root", root.to_string_lossy().into_owned())?;
        }
        if let Some(bind) = &overrides.bind {
            builder = builder.set_override("server.bind", bind.clone())?;
        }
        if let Some(port) = overrides.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if overrides.debug {
            builder = builder.set_override("debug", true)?;
        }

        let settings = builder.build().context("Failed to load configuration")?;
        let cfg: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        cfg.validate()?;

        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.auth.accounts.is_empty() {
            anyhow::bail!("No accounts configured under [[auth.accounts]]");
        }

        let mut seen = HashSet::new();
        for account in &self.auth.accounts {
            if account.username.is_empty() {
                anyhow::bail!("Account with an empty username");
            }
            if account.password.is_empty() {
                anyhow::bail!("Account {} has an empty password", account.username);
            }
            if !seen.insert(account.username.as_str()) {
                anyhow::bail!("Account {} is configured twice", account.username);
            }
        }
        Ok(())
    }

    /// Credential table keyed by username, as the login handler checks it.
    pub fn credentials(&self) -> HashMap<String, String> {
        self.auth
            .accounts
            .iter()
            .map(|a| (a.username.clone(), a.password.clone()))
            .collect()
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            timeout: match self.auth.session_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            purge_interval: Duration::from_secs(self.auth.purge_interval_secs.max(1)),
        }
    }
}
