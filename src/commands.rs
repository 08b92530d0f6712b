//! Administrative commands
//!
//! Thin wrappers over the registry for callers that need validation
//! errors reported back to them instead of silently ignored input.

use crate::error::{CommandError, CommandResult};
use crate::registry::HiddenGroupRegistry;
use tracing::info;

fn required<'a>(value: &'a str, field: &'static str) -> CommandResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommandError::blank(field));
    }
    Ok(trimmed)
}

/// Hide a group for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddHiddenGroup {
    pub username: String,
    pub group_name: String,
}

impl AddHiddenGroup {
    pub const ID: &'static str = "GroupHiding.AddHiddenGroup";

    pub fn new(username: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            group_name: group_name.into(),
        }
    }

    /// Returns `true` if the rule was not already present
    pub fn run(&self, registry: &HiddenGroupRegistry) -> CommandResult<bool> {
        let username = required(&self.username, "username")?;
        let group = required(&self.group_name, "group name")?;

        let added = registry.add(username, group);
        info!(command = Self::ID, user = username, group, added, "Command applied");
        Ok(added)
    }
}

/// Stop hiding a group for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveHiddenGroup {
    pub username: String,
    pub group_name: String,
}

impl RemoveHiddenGroup {
    pub const ID: &'static str = "GroupHiding.RemoveHiddenGroup";

    pub fn new(username: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            group_name: group_name.into(),
        }
    }

    /// Returns `true` if a rule was removed
    pub fn run(&self, registry: &HiddenGroupRegistry) -> CommandResult<bool> {
        let username = required(&self.username, "username")?;
        let group = required(&self.group_name, "group name")?;

        let removed = registry.remove(username, group);
        info!(command = Self::ID, user = username, group, removed, "Command applied");
        Ok(removed)
    }
}

/// Parse a `user:group` pair as given on the command line
pub fn parse_rule(spec: &str) -> CommandResult<(String, String)> {
    let (username, group) = spec.split_once(':').ok_or_else(|| CommandError::Failed {
        command: "parse rule",
        reason: format!("expected USER:GROUP, got '{}'", spec),
    })?;

    Ok((
        required(username, "username")?.to_string(),
        required(group, "group name")?.to_string(),
    ))
}
