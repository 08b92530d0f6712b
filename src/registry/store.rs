//! Concurrent username → hidden groups store

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Thread-safe registry of hidden group memberships.
///
/// Each user's set lives behind the map shard that owns the user, so
/// writers for different users never contend with each other, and every
/// mutation of one user's set (including dropping the user when the set
/// empties) happens under a single shard lock.
#[derive(Debug, Default)]
pub struct HiddenGroupRegistry {
    rules: DashMap<String, HashSet<String>>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl HiddenGroupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `group` is hidden for `username`.
    ///
    /// Returns `false` for empty arguments.
    pub fn is_hidden(&self, username: &str, group: &str) -> bool {
        if username.is_empty() || group.is_empty() {
            return false;
        }

        let hidden = self
            .rules
            .get(username)
            .is_some_and(|groups| groups.contains(group));

        if hidden {
            debug!(user = username, group, "Group is hidden for user");
        }

        hidden
    }

    /// Independent copy of the groups hidden for `username`.
    ///
    /// Unknown or empty usernames yield an empty set.
    pub fn hidden_groups_of(&self, username: &str) -> HashSet<String> {
        if username.is_empty() {
            return HashSet::new();
        }

        self.rules
            .get(username)
            .map(|groups| groups.clone())
            .unwrap_or_default()
    }

    /// Snapshot of every username holding at least one rule
    pub fn users_with_rules(&self) -> HashSet<String> {
        self.rules.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Hide `group` for `username`.
    ///
    /// Blank arguments are ignored. Returns `true` if the rule was new.
    pub fn add(&self, username: &str, group: &str) -> bool {
        if is_blank(username) || is_blank(group) {
            warn!(
                user = username,
                group, "Ignoring hidden group rule with blank username or group"
            );
            return false;
        }

        let inserted = self
            .rules
            .entry(username.to_string())
            .or_default()
            .insert(group.to_string());

        if inserted {
            info!(user = username, group, "Added hidden group");
        }

        inserted
    }

    /// Stop hiding `group` for `username`.
    ///
    /// Drops the user entirely once their last rule is gone. Returns `true`
    /// if a rule was removed.
    pub fn remove(&self, username: &str, group: &str) -> bool {
        if is_blank(username) || is_blank(group) {
            debug!(
                user = username,
                group, "Ignoring removal with blank username or group"
            );
            return false;
        }

        let removed = match self.rules.entry(username.to_string()) {
            Entry::Occupied(mut entry) => {
                let removed = entry.get_mut().remove(group);
                if entry.get().is_empty() {
                    entry.remove();
                }
                removed
            }
            Entry::Vacant(_) => false,
        };

        if removed {
            info!(user = username, group, "Removed hidden group");
        }

        removed
    }

    /// Remove every rule for `username` in one step.
    ///
    /// Returns the number of rules dropped.
    pub fn clear(&self, username: &str) -> usize {
        if username.is_empty() {
            return 0;
        }

        match self.rules.remove(username) {
            Some((_, groups)) => {
                info!(user = username, count = groups.len(), "Cleared hidden groups");
                groups.len()
            }
            None => 0,
        }
    }

    /// Number of users holding at least one rule
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
