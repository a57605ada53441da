//! Service configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Where the service keeps its data and listens.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Root of the settings storage (`NODECONF_DATA_DIR`).
    pub data_dir: PathBuf,
    /// HTTP listen address (`NODECONF_BIND`).
    pub bind_addr: SocketAddr,
    /// Strict form validation (`NODECONF_STRICT_FORMS`).
    pub strict_forms: bool,
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_dir = lookup("NODECONF_DATA_DIR").unwrap_or_else(|| "./data".to_string());
        let bind = lookup("NODECONF_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let bind_addr = bind
            .parse()
            .with_context(|| format!("invalid NODECONF_BIND address: {}", bind))?;
        let strict_forms = lookup("NODECONF_STRICT_FORMS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            bind_addr,
            strict_forms,
        })
    }
}
