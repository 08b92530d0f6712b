//! Policy types
//!
//! Core types shared between the decision engine and its host: the
//! access answers a merged ACL gives, the decisions the policy makes, and
//! the principal and ACL contracts the host implements.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Answer of a merged ACL lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Grant,
    Deny,
    /// No entry matched
    #[default]
    Unknown,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Grant => "grant",
            Access::Deny => "deny",
            Access::Unknown => "unknown",
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Grant)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a security policy for one permission check.
///
/// `Grant` exists for hosts that chain policies able to add access; the
/// group hiding policy only ever answers `Deny` or `Abstain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Grant,
    Deny,
    /// No opinion; defer to the rest of the evaluation pipeline
    Abstain,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Grant => "grant",
            Decision::Deny => "deny",
            Decision::Abstain => "abstain",
        }
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Decision::Deny)
    }

    pub fn is_abstain(&self) -> bool {
        matches!(self, Decision::Abstain)
    }

    /// Merge this decision with the host's own evaluation.
    ///
    /// An abstain keeps `fallback`; anything else overrides it.
    pub fn resolve(self, fallback: Access) -> Access {
        match self {
            Decision::Grant => Access::Grant,
            Decision::Deny => Access::Deny,
            Decision::Abstain => fallback,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity presented to a permission check.
///
/// Group membership is already resolved by the host, including any
/// hierarchy expansion it performs.
pub trait Principal {
    /// Name of the principal, `None` when it cannot be identified
    fn name(&self) -> Option<&str>;

    /// Every group the principal belongs to
    fn groups(&self) -> &HashSet<String>;

    fn is_member_of(&self, group: &str) -> bool {
        self.groups().contains(group)
    }
}

/// Merged, precedence-resolved access control list of one document.
pub trait AccessControlList {
    /// Access the ACL gives any of `principals` for `permission`.
    ///
    /// Precedence between entries is entirely the implementation's
    /// business.
    fn get_access(&self, principals: &[&str], permission: &str) -> Access;
}

/// Plain user principal with a resolved group set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrincipal {
    pub name: Option<String>,
    #[serde(default)]
    pub groups: HashSet<String>,
}

impl UserPrincipal {
    pub fn new<I, S>(name: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Principal without an identifiable name
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl Principal for UserPrincipal {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn groups(&self) -> &HashSet<String> {
        &self.groups
    }
}
