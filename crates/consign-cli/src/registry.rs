//! # Registry Subcommand
//!
//! Moderator-gated administration of the access registry, plus read-only
//! membership queries. Mutations require `--as <principal>`.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use consign_core::Principal;

use crate::state;

/// Arguments for the `consign registry` subcommand.
#[derive(Args, Debug)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

/// Registry subcommands.
#[derive(Subcommand, Debug)]
pub enum RegistryCommand {
    /// Add a moderator.
    AddModerator {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        principal: Principal,
    },

    /// Remove a moderator. Removing the owner has no effect.
    RemoveModerator {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        principal: Principal,
    },

    /// Whitelist principals as shipment creators.
    AddCreators {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(required = true)]
        principals: Vec<Principal>,
    },

    /// Remove principals from the creators whitelist.
    RemoveCreators {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(required = true)]
        principals: Vec<Principal>,
    },

    /// Whitelist principals as transactors.
    AddTransactors {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(required = true)]
        principals: Vec<Principal>,
    },

    /// Remove principals from the transactors whitelist.
    RemoveTransactors {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(required = true)]
        principals: Vec<Principal>,
    },

    /// Print the owner and all three membership sets.
    Show,

    /// Print the roles held by one principal.
    Check { principal: Principal },
}

/// Execute the registry subcommand.
pub fn run_registry(args: &RegistryArgs, state_dir: &Path) -> Result<u8> {
    match &args.command {
        RegistryCommand::AddModerator { caller, principal } => {
            let added = state::update(state_dir, |s| {
                s.store
                    .add_moderator(caller, principal.clone())
                    .context("add-moderator failed")
            })?;
            report(added as usize, "moderator", "added");
        }
        RegistryCommand::RemoveModerator { caller, principal } => {
            let removed = state::update(state_dir, |s| {
                s.store
                    .remove_moderator(caller, principal)
                    .context("remove-moderator failed")
            })?;
            report(removed as usize, "moderator", "removed");
        }
        RegistryCommand::AddCreators { caller, principals } => {
            let n = state::update(state_dir, |s| {
                s.store
                    .add_creators(caller, principals)
                    .context("add-creators failed")
            })?;
            report(n, "creator", "added");
        }
        RegistryCommand::RemoveCreators { caller, principals } => {
            let n = state::update(state_dir, |s| {
                s.store
                    .remove_creators(caller, principals)
                    .context("remove-creators failed")
            })?;
            report(n, "creator", "removed");
        }
        RegistryCommand::AddTransactors { caller, principals } => {
            let n = state::update(state_dir, |s| {
                s.store
                    .add_transactors(caller, principals)
                    .context("add-transactors failed")
            })?;
            report(n, "transactor", "added");
        }
        RegistryCommand::RemoveTransactors { caller, principals } => {
            let n = state::update(state_dir, |s| {
                s.store
                    .remove_transactors(caller, principals)
                    .context("remove-transactors failed")
            })?;
            report(n, "transactor", "removed");
        }
        RegistryCommand::Show => cmd_show(state_dir)?,
        RegistryCommand::Check { principal } => cmd_check(state_dir, principal)?,
    }
    Ok(0)
}

fn report(changed: usize, role: &str, verb: &str) {
    if changed == 0 {
        println!("OK: no change ({role} membership already as requested)");
    } else {
        println!("OK: {changed} {role}(s) {verb}");
    }
}

fn cmd_show(state_dir: &Path) -> Result<()> {
    let snapshot = state::load(state_dir)?;
    let store = &snapshot.store;
    println!("Owner: {}", store.registry().owner());
    for (label, set) in [
        ("Moderators", store.get_moderators()),
        ("Creators", store.get_creators_whitelist()),
        ("Transactors", store.get_transactors_whitelist()),
    ] {
        println!("{label} ({}):", set.len());
        for principal in set {
            println!("  {principal}");
        }
    }
    Ok(())
}

fn cmd_check(state_dir: &Path, principal: &Principal) -> Result<()> {
    let snapshot = state::load(state_dir)?;
    let roles = snapshot.store.registry().roles_of(principal);
    if roles.is_empty() {
        println!("{principal}: no roles");
    } else {
        let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
        println!("{principal}: {}", names.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{run_init, InitArgs};

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn init(dir: &Path) {
        let args = InitArgs {
            config: None,
            owner: Some(p("owner")),
            moderators: vec![],
            force: false,
        };
        run_init(&args, dir).unwrap();
    }

    fn run(dir: &Path, command: RegistryCommand) -> Result<u8> {
        run_registry(&RegistryArgs { command }, dir)
    }

    #[test]
    fn moderator_whitelists_creators() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path());
        run(
            dir.path(),
            RegistryCommand::AddCreators {
                caller: p("owner"),
                principals: vec![p("alice"), p("bob")],
            },
        )
        .unwrap();
        let snapshot = state::load(dir.path()).unwrap();
        assert!(snapshot.store.is_creator(&p("alice")));
        assert!(snapshot.store.is_creator(&p("bob")));
    }

    #[test]
    fn non_moderator_is_refused_and_nothing_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path());
        let before = std::fs::read_to_string(state::store_path(dir.path())).unwrap();
        let err = run(
            dir.path(),
            RegistryCommand::AddTransactors {
                caller: p("mallory"),
                principals: vec![p("mallory")],
            },
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("permission denied"));
        let after = std::fs::read_to_string(state::store_path(dir.path())).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn owner_removal_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path());
        run(
            dir.path(),
            RegistryCommand::RemoveModerator {
                caller: p("owner"),
                principal: p("owner"),
            },
        )
        .unwrap();
        assert!(state::load(dir.path()).unwrap().store.is_moderator(&p("owner")));
    }

    #[test]
    fn queries_succeed() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path());
        assert_eq!(run(dir.path(), RegistryCommand::Show).unwrap(), 0);
        assert_eq!(
            run(dir.path(), RegistryCommand::Check { principal: p("owner") }).unwrap(),
            0
        );
    }
}
