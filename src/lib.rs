//! Hidden group memberships for document permission checks
//!
//! Administrators can hide specific group memberships from specific users.
//! The user stays a member of the group, but a document permission that
//! reaches them *only* through a hidden membership is denied. Access
//! available through the user's own identity or any visible group is
//! left alone.
//!
//! ## Components
//!
//! - [`HiddenGroupRegistry`] - concurrent `username → hidden groups` store
//! - [`GroupHidingPolicy`] - per-check decision function consulted by the
//!   host's permission pipeline; answers `Deny` or `Abstain`, never `Grant`
//! - [`config`] - declarative rules loaded from TOML and the environment
//! - [`commands`] - validated add/remove wrappers for administrative callers
//!
//! ## Example Configuration
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [[hidden_groups]]
//! username = "alice"
//! groups = ["admins"]
//! ```
//!
//! ## Known Limitation
//!
//! The policy declares itself expressible in search queries but provides
//! no query transformer, so search results may list documents that a
//! direct permission check denies.

pub mod commands;
pub mod config;
pub mod error;
pub mod policy;
pub mod registry;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use policy::{Access, Decision, GroupHidingPolicy, SecurityPolicy};
pub use registry::HiddenGroupRegistry;
