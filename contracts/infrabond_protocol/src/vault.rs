//! # Yield vault
//!
//! Pro-rata revenue distribution in constant time per operation.
//!
//! Each deposit advances `acc_per_share` by `amount·SCALE / supply`; a
//! holder's claimable amount is their settled pending amount plus
//! `balance · (acc − checkpoint) / SCALE`, and a claim zeroes the pending
//! amount and advances their checkpoint to the current accumulator. Every
//! balance increase must run [`settle_holder`] first, so newly bought shares
//! only accrue from deposits made after they exist. Nothing ever iterates
//! the holder set, so the design scales to any number of contributors.
//! Integer division floors each claim, so the sum of all claims never
//! exceeds total revenue; the dust stays in the contract.

use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::events;
use crate::lmsr::SCALE;
use crate::storage;
use crate::Error;

/// Deposit project revenue for distribution to bond holders.
pub fn deposit_revenue(env: &Env, project_id: u64, payer: Address, amount: i128) {
    payer.require_auth();

    if amount <= 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }
    let config = storage::load_project_config(env, project_id);
    if !storage::has_bond_ledger(env, project_id) {
        panic_with_error!(env, Error::BondNotFound);
    }
    let supply = storage::bond_supply(env, project_id);
    if supply == 0 {
        panic_with_error!(env, Error::NoBondSupply);
    }

    token::Client::new(env, &config.token).transfer(
        &payer,
        &env.current_contract_address(),
        &amount,
    );

    let mut pool = storage::load_yield_pool(env, project_id);
    pool.total_revenue += amount;
    pool.acc_per_share += amount * SCALE / supply;
    storage::save_yield_pool(env, project_id, &pool);

    events::revenue_deposited(env, project_id, &payer, amount);
}

/// Fold the holder's accrued-but-unpaid yield into their pending amount and
/// advance their checkpoint to the current accumulator.
///
/// Must run before any increase of the holder's bond balance; otherwise the
/// new shares would accrue from deposits made before they existed.
pub fn settle_holder(env: &Env, project_id: u64, holder: &Address) {
    let pool = storage::load_yield_pool(env, project_id);
    let checkpoint = storage::yield_checkpoint(env, project_id, holder);
    if pool.acc_per_share == checkpoint {
        return;
    }
    let balance = storage::bond_balance(env, project_id, holder);
    let accrued = balance * (pool.acc_per_share - checkpoint) / SCALE;
    if accrued > 0 {
        let pending = storage::pending_yield(env, project_id, holder);
        storage::set_pending_yield(env, project_id, holder, pending + accrued);
    }
    storage::set_yield_checkpoint(env, project_id, holder, pool.acc_per_share);
}

/// Yield claimable by `holder` right now. Zero before any deposit.
pub fn claimable_yield(env: &Env, project_id: u64, holder: Address) -> i128 {
    let pool = storage::load_yield_pool(env, project_id);
    let checkpoint = storage::yield_checkpoint(env, project_id, &holder);
    let balance = storage::bond_balance(env, project_id, &holder);
    storage::pending_yield(env, project_id, &holder)
        + balance * (pool.acc_per_share - checkpoint) / SCALE
}

/// Pay out the holder's accrued yield, zero their pending amount, and
/// advance their checkpoint.
pub fn claim_yield(env: &Env, project_id: u64, holder: Address) -> i128 {
    holder.require_auth();

    let amount = claimable_yield(env, project_id, holder.clone());
    if amount == 0 {
        panic_with_error!(env, Error::NothingToClaim);
    }

    let pool = storage::load_yield_pool(env, project_id);
    storage::set_pending_yield(env, project_id, &holder, 0);
    storage::set_yield_checkpoint(env, project_id, &holder, pool.acc_per_share);

    let config = storage::load_project_config(env, project_id);
    token::Client::new(env, &config.token).transfer(
        &env.current_contract_address(),
        &holder,
        &amount,
    );

    events::yield_claimed(env, project_id, &holder, amount);
    amount
}
