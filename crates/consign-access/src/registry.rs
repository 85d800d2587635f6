//! # Access Registry
//!
//! Holds the owner, the moderator set, and the creator/transactor
//! whitelists. Only moderators may mutate any of the three sets.
//!
//! ## Invariant
//!
//! `owner ∈ moderators` holds from construction onward. Removing the owner
//! from the moderator set is accepted as a no-op, and a snapshot that lost
//! the owner regains it on load.

use std::collections::BTreeSet;

use consign_core::Principal;
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::AccessError;
use crate::policy::{authorize, Capability, Role};

/// Moderator, creator, and transactor membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RegistrySnapshot")]
pub struct AccessRegistry {
    owner: Principal,
    moderators: BTreeSet<Principal>,
    creators: BTreeSet<Principal>,
    transactors: BTreeSet<Principal>,
}

/// Wire form of the registry, re-checked on the way in.
#[derive(Deserialize)]
struct RegistrySnapshot {
    owner: Principal,
    moderators: BTreeSet<Principal>,
    #[serde(default)]
    creators: BTreeSet<Principal>,
    #[serde(default)]
    transactors: BTreeSet<Principal>,
}

impl From<RegistrySnapshot> for AccessRegistry {
    fn from(raw: RegistrySnapshot) -> Self {
        let mut moderators = raw.moderators;
        moderators.insert(raw.owner.clone());
        Self {
            owner: raw.owner,
            moderators,
            creators: raw.creators,
            transactors: raw.transactors,
        }
    }
}

impl AccessRegistry {
    /// Create a registry owned by `owner`, with `owner` and every member of
    /// `initial_moderators` in the moderator set. Both whitelists start empty.
    pub fn new(owner: Principal, initial_moderators: impl IntoIterator<Item = Principal>) -> Self {
        let mut moderators: BTreeSet<Principal> = initial_moderators.into_iter().collect();
        moderators.insert(owner.clone());
        tracing::info!(
            owner = %owner,
            moderators = moderators.len(),
            "access registry created"
        );
        Self {
            owner,
            moderators,
            creators: BTreeSet::new(),
            transactors: BTreeSet::new(),
        }
    }

    /// Build a registry from construction-time configuration.
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.owner.clone(), config.moderators.iter().cloned())
    }

    /// The principal that created the registry. Immutable.
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    // ── Moderators ──────────────────────────────────────────────────

    /// Add `principal` to the moderator set.
    ///
    /// Returns whether membership changed; re-adding a moderator is a no-op.
    pub fn add_moderator(
        &mut self,
        caller: &Principal,
        principal: Principal,
    ) -> Result<bool, AccessError> {
        self.require_moderator(caller)?;
        let changed = self.moderators.insert(principal.clone());
        tracing::info!(caller = %caller, moderator = %principal, changed, "moderator added");
        Ok(changed)
    }

    /// Remove `principal` from the moderator set.
    ///
    /// Returns whether membership changed. Removing a non-moderator, or the
    /// owner, is a no-op.
    pub fn remove_moderator(
        &mut self,
        caller: &Principal,
        principal: &Principal,
    ) -> Result<bool, AccessError> {
        self.require_moderator(caller)?;
        if principal == &self.owner {
            tracing::warn!(caller = %caller, "owner cannot leave the moderator set; ignoring");
            return Ok(false);
        }
        let changed = self.moderators.remove(principal);
        tracing::info!(caller = %caller, moderator = %principal, changed, "moderator removed");
        Ok(changed)
    }

    // ── Whitelists ──────────────────────────────────────────────────

    /// Add every principal in `principals` to the creators whitelist.
    ///
    /// Returns how many were not already members.
    pub fn add_creators(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.require_moderator(caller)?;
        let added = insert_all(&mut self.creators, principals);
        tracing::info!(caller = %caller, requested = principals.len(), added, "creators added");
        Ok(added)
    }

    /// Remove every principal in `principals` from the creators whitelist.
    ///
    /// Returns how many were members.
    pub fn remove_creators(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.require_moderator(caller)?;
        let removed = remove_all(&mut self.creators, principals);
        tracing::info!(caller = %caller, requested = principals.len(), removed, "creators removed");
        Ok(removed)
    }

    /// Add every principal in `principals` to the transactors whitelist.
    pub fn add_transactors(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.require_moderator(caller)?;
        let added = insert_all(&mut self.transactors, principals);
        tracing::info!(caller = %caller, requested = principals.len(), added, "transactors added");
        Ok(added)
    }

    /// Remove every principal in `principals` from the transactors whitelist.
    pub fn remove_transactors(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.require_moderator(caller)?;
        let removed = remove_all(&mut self.transactors, principals);
        tracing::info!(
            caller = %caller,
            requested = principals.len(),
            removed,
            "transactors removed"
        );
        Ok(removed)
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn is_moderator(&self, principal: &Principal) -> bool {
        self.moderators.contains(principal)
    }

    pub fn is_creator(&self, principal: &Principal) -> bool {
        self.creators.contains(principal)
    }

    pub fn is_transactor(&self, principal: &Principal) -> bool {
        self.transactors.contains(principal)
    }

    /// Whether `principal` holds `role`.
    pub fn has_role(&self, principal: &Principal, role: Role) -> bool {
        match role {
            Role::Moderator => self.is_moderator(principal),
            Role::Creator => self.is_creator(principal),
            Role::Transactor => self.is_transactor(principal),
        }
    }

    /// Every role `principal` currently holds.
    pub fn roles_of(&self, principal: &Principal) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.has_role(principal, *role))
            .collect()
    }

    pub fn moderators(&self) -> &BTreeSet<Principal> {
        &self.moderators
    }

    pub fn creators(&self) -> &BTreeSet<Principal> {
        &self.creators
    }

    pub fn transactors(&self) -> &BTreeSet<Principal> {
        &self.transactors
    }

    fn require_moderator(&self, caller: &Principal) -> Result<(), AccessError> {
        authorize(self, caller, Capability::Role(Role::Moderator)).map_err(|e| {
            tracing::debug!(caller = %caller, kind = %e.kind(), "registry mutation refused");
            e
        })
    }
}

fn insert_all(set: &mut BTreeSet<Principal>, principals: &[Principal]) -> usize {
    principals
        .iter()
        .filter(|p| set.insert((*p).clone()))
        .count()
}

fn remove_all(set: &mut BTreeSet<Principal>, principals: &[Principal]) -> usize {
    principals.iter().filter(|p| set.remove(*p)).count()
}
