//! Hidden groups CLI
//!
//! Inspect configured hidden group rules and evaluate the policy against
//! a document ACL.

use clap::{Parser, Subcommand};
use hidden_groups::{
    HiddenGroupRegistry,
    commands::{AddHiddenGroup, RemoveHiddenGroup, parse_rule},
    config::{AppConfig, LogFormat, load_config},
    policy::{AccessControlList, GroupHidingPolicy, SecurityPolicy, StaticAcl, UserPrincipal},
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Hidden groups - deny permissions granted only through hidden memberships
#[derive(Parser, Debug)]
#[command(name = "hidden-groups")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "HIDDEN_GROUPS_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HIDDEN_GROUPS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured hidden group rules
    Rules {
        /// Print rules as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate one permission check
    Check {
        /// Username of the principal
        #[arg(short, long)]
        user: String,

        /// Group the principal belongs to (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Permission to check
        #[arg(short, long)]
        permission: String,

        /// TOML file holding the document's merged ACL
        #[arg(long)]
        acl: Option<String>,

        /// Additional USER:GROUP rule to hide before checking (repeatable)
        #[arg(long = "hide")]
        hide: Vec<String>,

        /// USER:GROUP rule to remove before checking (repeatable)
        #[arg(long = "unhide")]
        unhide: Vec<String>,
    },
}

fn init_logging(config: &AppConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn list_rules(registry: &HiddenGroupRegistry, as_json: bool) -> anyhow::Result<()> {
    let rules: BTreeMap<String, Vec<String>> = registry
        .users_with_rules()
        .into_iter()
        .map(|user| {
            let mut groups: Vec<String> = registry.hidden_groups_of(&user).into_iter().collect();
            groups.sort();
            (user, groups)
        })
        .collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    if rules.is_empty() {
        println!("No hidden group rules configured");
    }
    for (user, groups) in &rules {
        println!("{}: {}", user, groups.join(", "));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rules = config.hidden_groups.len(),
        "Loaded configuration"
    );

    let registry = Arc::new(HiddenGroupRegistry::new());
    config.register_rules(&registry);

    match args.command {
        Command::Rules { json } => list_rules(&registry, json)?,
        Command::Check {
            user,
            groups,
            permission,
            acl,
            hide,
            unhide,
        } => {
            for spec in &hide {
                let (username, group) = parse_rule(spec)?;
                AddHiddenGroup::new(username, group)
                    .run(&registry)
                    .inspect_err(|e| error!(error = %e, "Failed to add hidden group"))?;
            }
            for spec in &unhide {
                let (username, group) = parse_rule(spec)?;
                RemoveHiddenGroup::new(username, group)
                    .run(&registry)
                    .inspect_err(|e| error!(error = %e, "Failed to remove hidden group"))?;
            }

            let acl = match acl {
                Some(path) => StaticAcl::load(&path)
                    .inspect_err(|e| error!(error = %e, path = %path, "Failed to load ACL"))?,
                None => StaticAcl::empty(),
            };

            let principal = UserPrincipal::new(user.clone(), groups);
            let policy = GroupHidingPolicy::new(registry.clone());

            let mut names: Vec<&str> = vec![user.as_str()];
            names.extend(principal.groups.iter().map(String::as_str));
            let baseline = acl.get_access(&names, &permission);
            let decision = policy.decide(&principal, &acl, &permission);

            let report = json!({
                "user": user,
                "permission": permission,
                "hidden_groups": registry.hidden_groups_of(&user),
                "acl": baseline,
                "decision": decision,
                "effective": decision.resolve(baseline),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
