//! Screen configuration.
//!
//! The endpoint is fixed per build: `DEFAULT_BASE_URL` unless a host
//! overrides it. `ScreenConfig::from_env` reads `JOBS_BASE_URL` and
//! `JOBS_INGEST`, falling back to defaults for anything unset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// How a fetch response is merged into the job list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestPolicy {
    /// Append each element as soon as it decodes. A bad element leaves the
    /// records before it in the list.
    Partial,
    /// Decode the whole array first; append only if every element is valid.
    #[default]
    Atomic,
}

impl FromStr for IngestPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "partial" => Ok(IngestPolicy::Partial),
            "atomic" => Ok(IngestPolicy::Atomic),
            _ => Err(ConfigError::UnknownIngestPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for IngestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestPolicy::Partial => f.write_str("partial"),
            IngestPolicy::Atomic => f.write_str("atomic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub ingest: IngestPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ingest: IngestPolicy::default(),
        }
    }
}

impl ScreenConfig {
    pub fn new(base_url: &str, ingest: IngestPolicy) -> Self {
        Self {
            base_url: base_url.to_string(),
            ingest,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("JOBS_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_base_url);
        let ingest = match lookup("JOBS_INGEST") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => IngestPolicy::default(),
        };
        Ok(Self { base_url, ingest })
    }
}
