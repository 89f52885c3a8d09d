//! # Role-Based Access Control
//!
//! The single authoritative source of truth for who may call privileged
//! entry points. Roles are plain storage-backed capabilities granted to
//! addresses; every grant, revocation, and super-admin transfer publishes an
//! event so role changes are an explicit, auditable part of the log rather
//! than ambient state.
//!
//! | Role             | May do                                              |
//! |------------------|-----------------------------------------------------|
//! | `SuperAdmin`     | Everything; grant/revoke all roles; transfer itself |
//! | `Admin`          | Grant/revoke non-SuperAdmin roles; register projects |
//! | `ProjectManager` | Register projects                                   |
//! | `Oracle`         | Status transitions, milestone verification, market resolution |
//!
//! The Oracle role is the system's sole trust boundary: it submits
//! already-adjudicated verification tuples and drives lifecycle transitions,
//! but can never mutate market pools or bond balances directly.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::events;
use crate::Error;

/// Capability levels an address can hold. An address holds at most one role.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    SuperAdmin,
    Admin,
    ProjectManager,
    Oracle,
}

/// Role storage keys, kept separate from [`crate::storage::DataKey`].
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum RbacKey {
    /// Set once by `init`; guards against re-initialisation.
    Initialized,
    /// Role held by an address.
    Role(Address),
}

/// Bootstrap the role table with the first SuperAdmin.
/// Panics `AlreadyInitialized` on any call after the first.
pub fn init_super_admin(env: &Env, super_admin: &Address) {
    if env.storage().instance().has(&RbacKey::Initialized) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    crate::storage::bump_instance(env);
    env.storage().instance().set(&RbacKey::Initialized, &true);
    env.storage()
        .instance()
        .set(&RbacKey::Role(super_admin.clone()), &Role::SuperAdmin);
    events::role_granted(env, super_admin, Role::SuperAdmin);
}

/// Return the role held by `address`, or `None`.
pub fn role_of(env: &Env, address: Address) -> Option<Role> {
    env.storage().instance().get(&RbacKey::Role(address))
}

/// Return `true` if `address` holds exactly `role`.
pub fn has_role(env: &Env, address: Address, role: Role) -> bool {
    role_of(env, address) == Some(role)
}

/// Grant `role` to `target`. `caller` must authorize and hold Admin or
/// SuperAdmin; only a SuperAdmin may grant SuperAdmin. A target holding
/// SuperAdmin cannot be overwritten; [`transfer_super_admin`] is the only
/// way that role moves.
pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) {
    caller.require_auth();
    require_admin_or_above(env, caller);
    if role == Role::SuperAdmin && !has_role(env, caller.clone(), Role::SuperAdmin) {
        panic_with_error!(env, Error::NotAuthorized);
    }
    if has_role(env, target.clone(), Role::SuperAdmin) {
        panic_with_error!(env, Error::NotAuthorized);
    }
    env.storage()
        .instance()
        .set(&RbacKey::Role(target.clone()), &role);
    events::role_granted(env, target, role);
}

/// Revoke whatever role `target` holds. Cannot remove a SuperAdmin; use
/// [`transfer_super_admin`] for that. Panics `RoleNotFound` when `target`
/// holds nothing.
pub fn revoke_role(env: &Env, caller: &Address, target: &Address) {
    caller.require_auth();
    require_admin_or_above(env, caller);
    let role = match role_of(env, target.clone()) {
        Some(r) => r,
        None => panic_with_error!(env, Error::RoleNotFound),
    };
    if role == Role::SuperAdmin {
        panic_with_error!(env, Error::NotAuthorized);
    }
    env.storage()
        .instance()
        .remove(&RbacKey::Role(target.clone()));
    events::role_revoked(env, target, role);
}

/// Move the SuperAdmin role from `current` to `new`. The previous holder
/// loses it in the same operation.
pub fn transfer_super_admin(env: &Env, current: &Address, new: &Address) {
    current.require_auth();
    if !has_role(env, current.clone(), Role::SuperAdmin) {
        panic_with_error!(env, Error::NotAuthorized);
    }
    env.storage()
        .instance()
        .remove(&RbacKey::Role(current.clone()));
    env.storage()
        .instance()
        .set(&RbacKey::Role(new.clone()), &Role::SuperAdmin);
    events::super_admin_transferred(env, current, new);
}

/// Gate: caller must hold Admin or SuperAdmin.
pub fn require_admin_or_above(env: &Env, address: &Address) {
    match role_of(env, address.clone()) {
        Some(Role::SuperAdmin) | Some(Role::Admin) => {}
        _ => panic_with_error!(env, Error::NotAuthorized),
    }
}

/// Gate: caller may register projects (ProjectManager, Admin, or SuperAdmin).
pub fn require_can_register(env: &Env, address: &Address) {
    match role_of(env, address.clone()) {
        Some(Role::SuperAdmin) | Some(Role::Admin) | Some(Role::ProjectManager) => {}
        _ => panic_with_error!(env, Error::NotAuthorized),
    }
}

/// Gate: caller must hold the Oracle role.
pub fn require_oracle(env: &Env, address: &Address) {
    if !has_role(env, address.clone(), Role::Oracle) {
        panic_with_error!(env, Error::NotAuthorized);
    }
}
