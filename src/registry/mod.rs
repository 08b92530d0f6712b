//! Hidden group registry
//!
//! Process-wide, in-memory store of which group memberships are hidden
//! from which users.
//!
//! ## Model
//!
//! ```text
//! username → { group, group, ... }
//! ```
//!
//! A user appears in the registry only while at least one group is hidden
//! for them. Names are case-sensitive and stored exactly as given.
//!
//! Reads are lock-free with respect to other users; writes only lock the
//! shard holding the user being changed.

pub mod lookup;
pub mod store;

pub use lookup::HiddenGroupLookup;
pub use store::HiddenGroupRegistry;
