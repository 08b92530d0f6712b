//! Access decision module
//!
//! Supplementary security policy consulted by the host's permission
//! pipeline once per (principal, permission, document) check, after the
//! host has merged the document's ACL and resolved the principal's groups.
//!
//! ## Decision Model
//!
//! ```text
//! visible = {user} ∪ (groups \ hidden)
//! any visible principal granted         → abstain
//! else any hidden member group granted  → deny
//! else                                  → abstain
//! ```
//!
//! The host merges the decision with its own evaluation: a deny overrides
//! whatever the ACL would have answered, an abstain leaves it untouched
//! (see [`Decision::resolve`]).

pub mod acl;
pub mod engine;
pub mod types;

pub use acl::{AclEntry, StaticAcl};
pub use engine::{GroupHidingPolicy, QueryTransformer, SecurityPolicy};
pub use types::{Access, AccessControlList, Decision, Principal, UserPrincipal};
