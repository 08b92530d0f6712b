//! Lookup seam between the decision engine and the registry

use crate::error::PolicyError;
use crate::registry::HiddenGroupRegistry;
use std::collections::HashSet;

/// Source of hidden groups consulted by the decision engine.
///
/// The in-process [`HiddenGroupRegistry`] never fails; other sources
/// (a registry owned by a host that may not have started yet, a remote
/// cache) report failures through [`PolicyError`].
pub trait HiddenGroupLookup: Send + Sync {
    /// Snapshot of the groups hidden for `username`.
    fn lookup_hidden_groups(&self, username: &str) -> Result<HashSet<String>, PolicyError>;
}

impl HiddenGroupLookup for HiddenGroupRegistry {
    fn lookup_hidden_groups(&self, username: &str) -> Result<HashSet<String>, PolicyError> {
        Ok(self.hidden_groups_of(username))
    }
}
