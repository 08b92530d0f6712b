//! In-memory merged ACL
//!
//! Ordered list of access control entries. The first entry matching a
//! principal and a permission decides, so callers encode precedence by
//! ordering entries.
//!
//! ```toml
//! [[entries]]
//! principal = "alice"
//! permission = "Read"
//! granted = false
//!
//! [[entries]]
//! principal = "admins"
//! permission = "Read"
//! granted = true
//! ```

use crate::error::AclError;
use crate::policy::types::{Access, AccessControlList};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Single access control entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub principal: String,
    pub permission: String,
    pub granted: bool,
}

impl AclEntry {
    pub fn grant(principal: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            permission: permission.into(),
            granted: true,
        }
    }

    pub fn deny(principal: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            permission: permission.into(),
            granted: false,
        }
    }

    fn access(&self) -> Access {
        if self.granted {
            Access::Grant
        } else {
            Access::Deny
        }
    }
}

/// Ordered, already merged ACL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAcl {
    #[serde(default)]
    entries: Vec<AclEntry>,
}

impl StaticAcl {
    pub fn new(entries: Vec<AclEntry>) -> Self {
        Self { entries }
    }

    /// ACL with no entries; every lookup is `Unknown`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append an entry with the lowest precedence
    pub fn push(&mut self, entry: AclEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[AclEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse an ACL document
    pub fn from_toml_str(document: &str) -> Result<Self, AclError> {
        let acl: StaticAcl = toml::from_str(document)?;
        acl.validate()?;
        Ok(acl)
    }

    /// Load an ACL document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AclError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    fn validate(&self) -> Result<(), AclError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.principal.trim().is_empty() {
                return Err(AclError::InvalidEntry {
                    index,
                    reason: "principal is empty".into(),
                });
            }
            if entry.permission.trim().is_empty() {
                return Err(AclError::InvalidEntry {
                    index,
                    reason: "permission is empty".into(),
                });
            }
        }
        Ok(())
    }
}

impl AccessControlList for StaticAcl {
    fn get_access(&self, principals: &[&str], permission: &str) -> Access {
        self.entries
            .iter()
            .find(|entry| {
                entry.permission == permission && principals.contains(&entry.principal.as_str())
            })
            .map(AclEntry::access)
            .unwrap_or_default()
    }
}

impl FromIterator<AclEntry> for StaticAcl {
    fn from_iter<I: IntoIterator<Item = AclEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
