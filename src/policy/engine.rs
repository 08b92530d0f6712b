//! Group hiding decision engine
//!
//! Decides, for one permission check, whether a grant that reaches the
//! user only through a hidden group membership must be overridden with
//! an explicit deny.
//!
//! Evaluation order:
//! 1. No name, or no hidden groups for the user → abstain
//! 2. Any visible principal (the user, or a group that is not hidden) is
//!    granted the permission → abstain
//! 3. A hidden group the user belongs to is granted the permission → deny
//! 4. Otherwise → abstain
//!
//! The policy only ever subtracts access. It never grants, and it never
//! denies something the host would not have granted anyway.
//!
//! ## Search results
//!
//! The policy reports itself as expressible in queries but provides no
//! query transformer. Search results can therefore list documents that a
//! direct permission check on the same document denies.

use crate::error::PolicyError;
use crate::policy::types::{AccessControlList, Decision, Principal};
use crate::registry::HiddenGroupLookup;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Rewrites a search query so that results honor a policy
pub trait QueryTransformer: Send + Sync {
    fn transform(&self, principal: &dyn Principal, query: &str) -> String;
}

/// Per-check security policy as seen by the permission pipeline
pub trait SecurityPolicy: Send + Sync {
    /// Evaluate one permission check against the document's merged ACL
    fn decide(
        &self,
        principal: &dyn Principal,
        acl: &dyn AccessControlList,
        permission: &str,
    ) -> Decision;

    /// Whether the policy inspects every permission
    fn applies_to_all_permissions(&self) -> bool;

    /// Whether the policy may restrict `permission`
    fn restricts_permission(&self, _permission: &str) -> bool {
        self.applies_to_all_permissions()
    }

    /// Whether the policy claims to be expressible in search queries
    fn is_query_expressible(&self) -> bool;

    /// Query rewrite honoring this policy, if any
    fn query_transformer(&self) -> Option<&dyn QueryTransformer>;
}

/// Security policy denying grants that only flow through hidden groups
#[derive(Clone)]
pub struct GroupHidingPolicy {
    registry: Option<Arc<dyn HiddenGroupLookup>>,
}

impl GroupHidingPolicy {
    /// Create a policy backed by `registry`
    pub fn new(registry: Arc<dyn HiddenGroupLookup>) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    /// Policy with no registry wired in; every check abstains
    pub fn unbound() -> Self {
        Self { registry: None }
    }

    pub fn is_bound(&self) -> bool {
        self.registry.is_some()
    }

    fn evaluate(
        &self,
        principal: &dyn Principal,
        acl: &dyn AccessControlList,
        permission: &str,
    ) -> Result<Decision, PolicyError> {
        let Some(username) = principal.name() else {
            return Ok(Decision::Abstain);
        };

        let registry = self
            .registry
            .as_ref()
            .ok_or(PolicyError::RegistryUnavailable)?;

        let hidden = registry.lookup_hidden_groups(username)?;
        if hidden.is_empty() {
            return Ok(Decision::Abstain);
        }

        if has_visible_grant(principal, username, &hidden, acl, permission) {
            debug!(
                user = username,
                permission, "Permission reachable through visible principals"
            );
            return Ok(Decision::Abstain);
        }

        if let Some(group) = hidden_grant(principal, &hidden, acl, permission) {
            info!(
                user = username,
                permission,
                group,
                "Denying permission granted only through hidden group"
            );
            return Ok(Decision::Deny);
        }

        trace!(user = username, permission, "No grant to override");
        Ok(Decision::Abstain)
    }
}

/// Does the user, or any group they belong to that is not hidden, hold a grant?
fn has_visible_grant(
    principal: &dyn Principal,
    username: &str,
    hidden: &HashSet<String>,
    acl: &dyn AccessControlList,
    permission: &str,
) -> bool {
    std::iter::once(username)
        .chain(
            principal
                .groups()
                .iter()
                .map(String::as_str)
                .filter(|group| !hidden.contains(*group)),
        )
        .any(|name| acl.get_access(&[name], permission).is_granted())
}

/// First hidden group the user belongs to that holds a grant
fn hidden_grant<'a>(
    principal: &dyn Principal,
    hidden: &'a HashSet<String>,
    acl: &dyn AccessControlList,
    permission: &str,
) -> Option<&'a str> {
    hidden
        .iter()
        .map(String::as_str)
        .filter(|group| principal.is_member_of(group))
        .find(|group| acl.get_access(&[*group], permission).is_granted())
}

impl SecurityPolicy for GroupHidingPolicy {
    fn decide(
        &self,
        principal: &dyn Principal,
        acl: &dyn AccessControlList,
        permission: &str,
    ) -> Decision {
        self.evaluate(principal, acl, permission)
            .unwrap_or_else(|e| {
                error!(error = %e, permission, "Group hiding policy failed, abstaining");
                Decision::Abstain
            })
    }

    fn applies_to_all_permissions(&self) -> bool {
        true
    }

    fn is_query_expressible(&self) -> bool {
        true
    }

    fn query_transformer(&self) -> Option<&dyn QueryTransformer> {
        None
    }
}

impl std::fmt::Debug for GroupHidingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupHidingPolicy")
            .field("bound", &self.is_bound())
            .finish()
    }
}
