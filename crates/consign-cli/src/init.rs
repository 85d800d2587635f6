//! # Init Subcommand
//!
//! Creates a fresh store in the state directory from a registry
//! configuration file or from `--owner`/`--moderator` flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use consign_access::RegistryConfig;
use consign_core::Principal;
use consign_ledger::ConsignmentStore;

use crate::state::{self, Snapshot};

/// Arguments for the `consign init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Registry configuration (YAML or JSON) naming the owner and initial moderators.
    #[arg(long, conflicts_with = "owner", required_unless_present = "owner")]
    pub config: Option<PathBuf>,

    /// Registry owner. Always a moderator.
    #[arg(long)]
    pub owner: Option<Principal>,

    /// Additional initial moderator. Repeatable.
    #[arg(long = "moderator", requires = "owner")]
    pub moderators: Vec<Principal>,

    /// Replace an existing store.
    #[arg(long)]
    pub force: bool,
}

/// Read a registry configuration file. JSON is accepted as a YAML subset.
pub fn load_config(path: &Path) -> Result<RegistryConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("invalid registry config in {}", path.display()))
}

/// Execute the init subcommand.
pub fn run_init(args: &InitArgs, state_dir: &Path) -> Result<u8> {
    let config = match (&args.config, &args.owner) {
        (Some(path), _) => load_config(path)?,
        (None, Some(owner)) => RegistryConfig::new(owner.clone(), args.moderators.clone()),
        (None, None) => bail!("either --config or --owner is required"),
    };

    if state::store_path(state_dir).exists() && !args.force {
        bail!(
            "store already exists in {} (use --force to replace it)",
            state_dir.display()
        );
    }

    let snapshot = Snapshot::new(ConsignmentStore::new(&config));
    state::save(state_dir, &snapshot)?;

    println!(
        "OK: initialized store in {} (owner {}, {} moderators)",
        state_dir.display(),
        config.owner,
        snapshot.store.get_moderators().len()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn owner_args(owner: &str) -> InitArgs {
        InitArgs {
            config: None,
            owner: Some(p(owner)),
            moderators: vec![p("mod1")],
            force: false,
        }
    }

    #[test]
    fn init_from_flags() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_init(&owner_args("owner"), dir.path()).unwrap(), 0);
        let snapshot = state::load(dir.path()).unwrap();
        assert_eq!(snapshot.store.registry().owner(), &p("owner"));
        assert!(snapshot.store.is_moderator(&p("mod1")));
    }

    #[test]
    fn init_from_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("registry.yaml");
        std::fs::write(&config, "owner: alice\nmoderators:\n  - bob\n  - carol\n").unwrap();
        let args = InitArgs {
            config: Some(config),
            owner: None,
            moderators: vec![],
            force: false,
        };
        let state_dir = dir.path().join(".consign");
        run_init(&args, &state_dir).unwrap();
        let snapshot = state::load(&state_dir).unwrap();
        assert_eq!(snapshot.store.get_moderators().len(), 3);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        run_init(&owner_args("owner"), dir.path()).unwrap();
        let err = run_init(&owner_args("other"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let mut forced = owner_args("other");
        forced.force = true;
        run_init(&forced, dir.path()).unwrap();
        let snapshot = state::load(dir.path()).unwrap();
        assert_eq!(snapshot.store.registry().owner(), &p("other"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("registry.yaml");
        std::fs::write(&config, "moderators: [bob]\n").unwrap();
        let err = load_config(&config).unwrap_err();
        assert!(err.to_string().contains("invalid registry config"));
    }
}
