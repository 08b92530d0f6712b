//! Configuration types for hidden-groups
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::registry::HiddenGroupRegistry;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::info;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Declarative hidden group rules
    pub hidden_groups: Vec<HiddenGroupsEntry>,
}

impl AppConfig {
    /// Register every configured rule into `registry`.
    ///
    /// Returns the number of rules that were new to the registry.
    pub fn register_rules(&self, registry: &HiddenGroupRegistry) -> usize {
        self.hidden_groups
            .iter()
            .map(|entry| entry.register(registry))
            .sum()
    }

    /// Remove every configured rule from `registry`
    pub fn unregister_rules(&self, registry: &HiddenGroupRegistry) -> usize {
        self.hidden_groups
            .iter()
            .map(|entry| entry.unregister(registry))
            .sum()
    }
}

/// One user and the groups hidden from them
///
/// ```toml
/// [[hidden_groups]]
/// username = "alice"
/// groups = ["admins", "auditors"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HiddenGroupsEntry {
    pub username: String,
    pub groups: Vec<String>,
}

impl HiddenGroupsEntry {
    pub fn new<I, S>(username: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmed group names, blanks dropped
    pub fn hidden_groups(&self) -> BTreeSet<&str> {
        self.groups
            .iter()
            .map(|group| group.trim())
            .filter(|group| !group.is_empty())
            .collect()
    }

    /// Add this entry's rules to `registry`
    pub fn register(&self, registry: &HiddenGroupRegistry) -> usize {
        let username = self.username.trim();
        let groups = self.hidden_groups();
        let added = groups
            .iter()
            .filter(|group| registry.add(username, group))
            .count();

        info!(
            user = username,
            groups = groups.len(),
            added,
            "Processed hidden group entry"
        );
        added
    }

    /// Remove this entry's rules from `registry`
    pub fn unregister(&self, registry: &HiddenGroupRegistry) -> usize {
        let username = self.username.trim();
        let groups = self.hidden_groups();
        let removed = groups
            .iter()
            .filter(|group| registry.remove(username, group))
            .count();

        info!(
            user = username,
            groups = groups.len(),
            removed,
            "Removed hidden group entry"
        );
        removed
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
