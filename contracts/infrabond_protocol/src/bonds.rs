//! # Bond ledger
//!
//! Capital intake and soulbound share accounting. Balances live in a
//! dedicated ownership map: there is no token interface to reject; the one
//! transfer-shaped entry point exists only to answer `NonTransferable`.
//!
//! Shares are credited 1:1 in collateral base units, so
//! `Σ balances == bond_supply == funding_raised` holds exactly at every
//! point. The purchase that makes `funding_raised` meet the goal flips the
//! project `Active` and releases the raised capital to the sponsor inside
//! the same atomic call; no observable state has the goal met with a stale
//! status.

use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::events;
use crate::storage;
use crate::types::ProjectStatus;
use crate::vault;
use crate::Error;

/// Create the bond ledger for a project. Sponsor-only, exactly once.
pub fn create_bond(env: &Env, project_id: u64) {
    let config = storage::load_project_config(env, project_id);
    config.sponsor.require_auth();

    if storage::has_bond_ledger(env, project_id) {
        panic_with_error!(env, Error::BondAlreadyExists);
    }
    storage::set_bond_supply(env, project_id, 0);
    events::bond_created(env, project_id);
}

/// Purchase `amount` of bonds with the project's collateral token.
///
/// Requires status `Funding`, a created ledger, a positive amount, and that
/// the purchase does not push `funding_raised` past the goal.
pub fn purchase_bonds(env: &Env, project_id: u64, buyer: Address, amount: i128) {
    buyer.require_auth();

    if amount <= 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }
    let config = storage::load_project_config(env, project_id);
    let mut state = storage::load_project_state(env, project_id);

    if !storage::has_bond_ledger(env, project_id) {
        panic_with_error!(env, Error::BondNotCreated);
    }
    if state.status != ProjectStatus::Funding {
        panic_with_error!(env, Error::NotInFundingStatus);
    }
    if state.funding_raised + amount > config.funding_goal {
        panic_with_error!(env, Error::ExceedsFundingGoal);
    }

    let client = token::Client::new(env, &config.token);
    client.transfer(&buyer, &env.current_contract_address(), &amount);

    // Settle before the balance grows; revenue deposited while funding is
    // still open belongs to the holders of record at deposit time.
    vault::settle_holder(env, project_id, &buyer);

    let balance = storage::bond_balance(env, project_id, &buyer);
    storage::set_bond_balance(env, project_id, &buyer, balance + amount);
    let supply = storage::bond_supply(env, project_id);
    storage::set_bond_supply(env, project_id, supply + amount);
    state.funding_raised += amount;

    if state.funding_raised == config.funding_goal {
        // Goal met: flip Active and release the principal to the sponsor in
        // the same call. Bond holders' claim is on future yield, not on the
        // principal, which exists to fund the work.
        state.status = ProjectStatus::Active;
        client.transfer(
            &env.current_contract_address(),
            &config.sponsor,
            &state.funding_raised,
        );
        storage::save_project_state(env, project_id, &state);
        events::bonds_purchased(env, project_id, &buyer, amount);
        events::project_activated(env, project_id, state.funding_raised);
        return;
    }

    storage::save_project_state(env, project_id, &state);
    events::bonds_purchased(env, project_id, &buyer, amount);
}

pub fn balance_of(env: &Env, project_id: u64, holder: Address) -> i128 {
    storage::bond_balance(env, project_id, &holder)
}

pub fn supply_of(env: &Env, project_id: u64) -> i128 {
    storage::bond_supply(env, project_id)
}

/// Bond balances are soulbound; every transfer attempt fails.
pub fn transfer_bonds(
    env: &Env,
    _project_id: u64,
    _from: Address,
    _to: Address,
    _amount: i128,
) {
    panic_with_error!(env, Error::NonTransferable);
}
