//! Group hiding policy integration tests
//!
//! This test suite covers:
//! - Early exits (anonymous principals, users without rules)
//! - Visible grants winning over hidden grants
//! - Grants flowing only through hidden groups being denied
//! - Fail-safe behavior when the registry cannot be consulted
//! - The host contract, including the missing query transformer
//!
//! The policy never answers `Grant`; it only subtracts access.

use hidden_groups::error::PolicyError;
use hidden_groups::policy::{
    Access, AccessControlList, AclEntry, Decision, GroupHidingPolicy, Principal, SecurityPolicy,
    StaticAcl, UserPrincipal,
};
use hidden_groups::registry::{HiddenGroupLookup, HiddenGroupRegistry};
use rstest::rstest;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Test Helpers
// =============================================================================

fn registry_with(rules: &[(&str, &str)]) -> Arc<HiddenGroupRegistry> {
    let registry = Arc::new(HiddenGroupRegistry::new());
    for (user, group) in rules {
        registry.add(user, group);
    }
    registry
}

fn policy_with(rules: &[(&str, &str)]) -> GroupHidingPolicy {
    GroupHidingPolicy::new(registry_with(rules))
}

fn alice() -> UserPrincipal {
    UserPrincipal::new("alice", ["admins", "everyone"])
}

/// ACL counting the lookups made against it
struct RecordingAcl {
    inner: StaticAcl,
    lookups: AtomicUsize,
}

impl RecordingAcl {
    fn new(inner: StaticAcl) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl AccessControlList for RecordingAcl {
    fn get_access(&self, principals: &[&str], permission: &str) -> Access {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_access(principals, permission)
    }
}

/// Registry stand-in that is never reachable
struct BrokenLookup;

impl HiddenGroupLookup for BrokenLookup {
    fn lookup_hidden_groups(&self, username: &str) -> Result<HashSet<String>, PolicyError> {
        Err(PolicyError::Lookup {
            username: username.to_string(),
            reason: "backing store offline".to_string(),
        })
    }
}

// =============================================================================
// 1. Documented scenarios
// =============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn test_hidden_admins_grant_is_denied() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = StaticAcl::new(vec![
            AclEntry::grant("admins", "Read"),
            AclEntry::deny("everyone", "Read"),
        ]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Deny);
    }

    #[test]
    fn test_direct_user_grant_abstains() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = StaticAcl::new(vec![
            AclEntry::grant("admins", "Read"),
            AclEntry::deny("everyone", "Read"),
            AclEntry::grant("alice", "Read"),
        ]);

        let decision = policy.decide(&alice(), &acl, "Read");
        assert_eq!(decision, Decision::Abstain);

        // Normal evaluation proceeds and grants
        let baseline = acl.get_access(&["alice", "admins", "everyone"], "Read");
        assert_eq!(decision.resolve(baseline), Access::Grant);
    }

    #[test]
    fn test_deny_overrides_host_grant() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = StaticAcl::new(vec![AclEntry::grant("admins", "Write")]);

        let baseline = acl.get_access(&["alice", "admins", "everyone"], "Write");
        assert_eq!(baseline, Access::Grant);

        let decision = policy.decide(&alice(), &acl, "Write");
        assert_eq!(decision.resolve(baseline), Access::Deny);
    }
}

// =============================================================================
// 2. Early exits
// =============================================================================

mod early_exits {
    use super::*;

    #[rstest]
    #[case(StaticAcl::empty())]
    #[case(StaticAcl::new(vec![AclEntry::grant("admins", "Read")]))]
    #[case(StaticAcl::new(vec![AclEntry::deny("alice", "Read")]))]
    #[case(StaticAcl::new(vec![
        AclEntry::grant("admins", "Read"),
        AclEntry::grant("everyone", "Read"),
    ]))]
    fn test_user_without_rules_always_abstains(#[case] acl: StaticAcl) {
        let policy = policy_with(&[("bob", "admins")]);
        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
    }

    #[test]
    fn test_user_without_rules_never_queries_acl() {
        let policy = policy_with(&[("bob", "admins")]);
        let acl = RecordingAcl::new(StaticAcl::new(vec![AclEntry::grant("admins", "Read")]));

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
        assert_eq!(acl.lookups(), 0);
    }

    #[test]
    fn test_anonymous_principal_abstains() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = RecordingAcl::new(StaticAcl::new(vec![AclEntry::grant("admins", "Read")]));

        let decision = policy.decide(&UserPrincipal::anonymous(), &acl, "Read");
        assert_eq!(decision, Decision::Abstain);
        assert_eq!(acl.lookups(), 0);
    }
}

// =============================================================================
// 3. Visible versus hidden grants
// =============================================================================

mod visibility {
    use super::*;

    #[test]
    fn test_visible_group_grant_abstains() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = StaticAcl::new(vec![
            AclEntry::grant("admins", "Read"),
            AclEntry::grant("everyone", "Read"),
        ]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
    }

    #[test]
    fn test_no_grant_anywhere_abstains() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = StaticAcl::new(vec![
            AclEntry::deny("admins", "Read"),
            AclEntry::deny("everyone", "Read"),
        ]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
    }

    #[test]
    fn test_grant_for_other_permission_is_ignored() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = StaticAcl::new(vec![AclEntry::grant("admins", "Write")]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
        assert_eq!(policy.decide(&alice(), &acl, "Write"), Decision::Deny);
    }

    #[test]
    fn test_hidden_group_user_is_not_member_of() {
        let policy = policy_with(&[("alice", "auditors")]);
        let acl = StaticAcl::new(vec![AclEntry::grant("auditors", "Read")]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
    }

    #[test]
    fn test_any_of_several_hidden_groups_denies() {
        let policy = policy_with(&[("alice", "admins"), ("alice", "auditors")]);
        let principal = UserPrincipal::new("alice", ["admins", "auditors", "everyone"]);
        let acl = StaticAcl::new(vec![AclEntry::grant("auditors", "Read")]);

        assert_eq!(policy.decide(&principal, &acl, "Read"), Decision::Deny);
    }

    #[test]
    fn test_rules_of_other_users_do_not_apply() {
        let policy = policy_with(&[("alice", "admins")]);
        let bob = UserPrincipal::new("bob", ["admins"]);
        let acl = StaticAcl::new(vec![AclEntry::grant("admins", "Read")]);

        assert_eq!(policy.decide(&bob, &acl, "Read"), Decision::Abstain);
        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Deny);
    }

    #[test]
    fn test_decision_does_not_depend_on_entry_order() {
        let policy = policy_with(&[("alice", "admins")]);
        let entries = vec![
            AclEntry::grant("admins", "Read"),
            AclEntry::grant("everyone", "Read"),
            AclEntry::deny("alice", "Write"),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();

        assert_eq!(
            policy.decide(&alice(), &StaticAcl::new(entries), "Read"),
            policy.decide(&alice(), &StaticAcl::new(reversed), "Read"),
        );
    }

    #[test]
    fn test_policy_never_grants() {
        let policy = policy_with(&[("alice", "admins")]);
        let acl = StaticAcl::new(vec![
            AclEntry::grant("admins", "Read"),
            AclEntry::grant("alice", "Write"),
            AclEntry::grant("everyone", "Browse"),
        ]);

        for permission in ["Read", "Write", "Browse", "Everything"] {
            assert_ne!(policy.decide(&alice(), &acl, permission), Decision::Grant);
        }
    }

    #[test]
    fn test_rule_changes_are_seen_by_next_decision() {
        let registry = registry_with(&[]);
        let policy = GroupHidingPolicy::new(registry.clone());
        let acl = StaticAcl::new(vec![AclEntry::grant("admins", "Read")]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);

        registry.add("alice", "admins");
        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Deny);

        registry.remove("alice", "admins");
        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
    }
}

// =============================================================================
// 4. Failure handling
// =============================================================================

mod failures {
    use super::*;

    #[test]
    fn test_unreachable_registry_abstains() {
        let policy = GroupHidingPolicy::new(Arc::new(BrokenLookup));
        let acl = StaticAcl::new(vec![AclEntry::grant("admins", "Read")]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
    }

    #[test]
    fn test_unbound_policy_abstains() {
        let policy = GroupHidingPolicy::unbound();
        let acl = StaticAcl::new(vec![AclEntry::grant("admins", "Read")]);

        assert_eq!(policy.decide(&alice(), &acl, "Read"), Decision::Abstain);
    }
}

// =============================================================================
// 5. Host contract
// =============================================================================

mod host_contract {
    use super::*;

    #[rstest]
    #[case("Read")]
    #[case("Write")]
    #[case("Everything")]
    fn test_restricts_every_permission(#[case] permission: &str) {
        let policy = policy_with(&[]);
        assert!(policy.applies_to_all_permissions());
        assert!(policy.restricts_permission(permission));
    }

    /// Search results are not filtered: the policy claims query support
    /// but hands out no transformer.
    #[test]
    fn test_query_expressible_without_transformer() {
        let policy = policy_with(&[("alice", "admins")]);

        assert!(policy.is_query_expressible());
        assert!(policy.query_transformer().is_none());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let policies: Vec<Box<dyn SecurityPolicy>> = vec![
            Box::new(policy_with(&[("alice", "admins")])),
            Box::new(GroupHidingPolicy::unbound()),
        ];
        let acl = StaticAcl::new(vec![AclEntry::grant("admins", "Read")]);
        let user = alice();
        let principal: &dyn Principal = &user;

        let decisions: Vec<Decision> = policies
            .iter()
            .map(|policy| policy.decide(principal, &acl, "Read"))
            .collect();
        assert_eq!(decisions, vec![Decision::Deny, Decision::Abstain]);
    }

    #[test]
    fn test_shared_across_threads() {
        let registry = registry_with(&[("alice", "admins")]);
        let policy = Arc::new(GroupHidingPolicy::new(registry));
        let acl = Arc::new(StaticAcl::new(vec![AclEntry::grant("admins", "Read")]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let policy = Arc::clone(&policy);
                let acl = Arc::clone(&acl);
                std::thread::spawn(move || policy.decide(&alice(), acl.as_ref(), "Read"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Decision::Deny);
        }
    }
}
