//! Configuration module
//!
//! Handles loading and validating configuration from TOML files and
//! environment variables, and feeding the declared hidden group rules
//! into a registry.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
