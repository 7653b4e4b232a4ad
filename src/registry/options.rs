//! Registry configuration.
//!
//! Options are plain values with a `Default`; `from_env` lets an embedding
//! process pick the duplicate-key policy without code changes.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable read by [`RegistryOptions::from_env`].
pub const DUPLICATE_KEYS_ENV: &str = "PROPDEFS_DUPLICATE_KEYS";

/// What happens when a source declares a key another source already added.
///
/// Duplicates inside a single component are always rejected by the
/// extractor; this policy only covers collisions across sources.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// The later definition replaces the earlier one, along with the default
    /// category recorded for it.
    #[default]
    LastWriteWins,
    /// The mutation that introduced the collision fails.
    Reject,
}

impl DuplicateKeyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateKeyPolicy::LastWriteWins => "last-write-wins",
            DuplicateKeyPolicy::Reject => "reject",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "last-write-wins" => Ok(DuplicateKeyPolicy::LastWriteWins),
            "reject" => Ok(DuplicateKeyPolicy::Reject),
            other => bail!(
                "{DUPLICATE_KEYS_ENV} must be 'last-write-wins' or 'reject', got '{other}'"
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
/// Knobs that shape how a registry merges sources.
pub struct RegistryOptions {
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl RegistryOptions {
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// Read options from the process environment.
    ///
    /// Unset or blank variables keep the defaults; unrecognized values are
    /// an error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`RegistryOptions::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(raw) = lookup(DUPLICATE_KEYS_ENV).filter(|v| !v.trim().is_empty()) {
            options.duplicate_keys = DuplicateKeyPolicy::parse(&raw)?;
        }
        Ok(options)
    }
}
