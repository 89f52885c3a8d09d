//! # Market engine
//!
//! One binary LMSR market per project. Anyone may create the market (it
//! prices project success independently of the sponsor), seeding it with
//! the maximum-loss collateral `b·ln2`. Pools are only ever mutated by the
//! trade entry points here; the milestone oracle may force resolution but
//! never touches pools.
//!
//! Collateral accounting: `collateral == C(qy, qn)` up to rounding in the
//! book's favor, and at resolution the winning pool pays out 1:1, so the
//! book is solvent at every reachable state (`C(q) ≥ max(qy, qn)`).

use soroban_sdk::{panic_with_error, token, Address, Env, String};

use crate::events::{self, MarketCreated, OutcomeTransferred};
use crate::lmsr::{self, SCALE};
use crate::rbac;
use crate::storage;
use crate::types::{Market, MarketConfig, MarketState, Side};
use crate::Error;

/// Liquidity parameter used when `create_market` is not given an override:
/// 100 collateral units. Worst-case subsidy at this depth is ~69.3 units.
pub const DEFAULT_LIQUIDITY: i128 = 100 * SCALE;

/// Create the project's market. Pulls the LMSR seed `b·ln2` from the
/// creator so the book can always cover the winning side.
pub fn create_market(
    env: &Env,
    creator: Address,
    project_id: u64,
    question: String,
    resolution_time: u64,
    liquidity_override: Option<i128>,
) -> u64 {
    creator.require_auth();

    let project = storage::load_project_config(env, project_id);
    if storage::project_market(env, project_id).is_some() {
        panic_with_error!(env, Error::MarketAlreadyExists);
    }
    let b = match liquidity_override {
        Some(b) => {
            if b <= 0 {
                panic_with_error!(env, Error::InvalidLiquidity);
            }
            b
        }
        None => DEFAULT_LIQUIDITY,
    };

    let seed = lmsr::seed_collateral(b);
    token::Client::new(env, &project.token).transfer(
        &creator,
        &env.current_contract_address(),
        &seed,
    );

    let id = storage::next_market_id(env);
    let config = MarketConfig {
        id,
        project_id,
        question,
        b,
        resolution_time,
    };
    let state = MarketState {
        yes_pool: 0,
        no_pool: 0,
        collateral: seed,
        resolved: false,
        outcome: false,
    };
    storage::save_market(env, &config, &state);
    storage::set_project_market(env, project_id, id);

    events::market_created(
        env,
        MarketCreated {
            market_id: id,
            project_id,
            b,
            resolution_time,
        },
    );
    id
}

fn deltas(side: Side, shares: i128) -> (i128, i128) {
    match side {
        Side::Yes => (shares, 0),
        Side::No => (0, shares),
    }
}

/// Cost of buying `shares` on `side` at the current pool state.
pub fn quote_buy(env: &Env, market_id: u64, side: Side, shares: i128) -> i128 {
    if shares <= 0 {
        panic_with_error!(env, Error::ZeroShares);
    }
    let config = storage::load_market_config(env, market_id);
    let state = storage::load_market_state(env, market_id);
    let (dy, dn) = deltas(side, shares);
    lmsr::buy_cost(state.yes_pool, state.no_pool, config.b, dy, dn)
}

/// Payout for selling `shares` on `side` at the current pool state.
pub fn quote_sell(env: &Env, market_id: u64, side: Side, shares: i128) -> i128 {
    if shares <= 0 {
        panic_with_error!(env, Error::ZeroShares);
    }
    let config = storage::load_market_config(env, market_id);
    let state = storage::load_market_state(env, market_id);
    let (dy, dn) = deltas(side, shares);
    lmsr::sell_payout(state.yes_pool, state.no_pool, config.b, dy, dn)
}

/// Buy outcome shares: pulls the quoted collateral, mints shares.
pub fn buy(env: &Env, market_id: u64, trader: Address, side: Side, shares: i128) -> i128 {
    trader.require_auth();

    if shares <= 0 {
        panic_with_error!(env, Error::ZeroShares);
    }
    let config = storage::load_market_config(env, market_id);
    let mut state = storage::load_market_state(env, market_id);
    if state.resolved {
        panic_with_error!(env, Error::MarketResolved);
    }

    let (dy, dn) = deltas(side, shares);
    let cost = lmsr::buy_cost(state.yes_pool, state.no_pool, config.b, dy, dn);

    let project = storage::load_project_config(env, config.project_id);
    token::Client::new(env, &project.token).transfer(
        &trader,
        &env.current_contract_address(),
        &cost,
    );

    state.yes_pool += dy;
    state.no_pool += dn;
    state.collateral += cost;
    storage::save_market_state(env, market_id, &state);

    let balance = storage::outcome_balance(env, market_id, &trader, side);
    storage::set_outcome_balance(env, market_id, &trader, side, balance + shares);

    events::shares_bought(env, market_id, &trader, side, shares, cost);
    cost
}

/// Sell outcome shares back to the book: burns shares, returns collateral.
pub fn sell(env: &Env, market_id: u64, trader: Address, side: Side, shares: i128) -> i128 {
    trader.require_auth();

    if shares <= 0 {
        panic_with_error!(env, Error::ZeroShares);
    }
    let config = storage::load_market_config(env, market_id);
    let mut state = storage::load_market_state(env, market_id);
    if state.resolved {
        panic_with_error!(env, Error::MarketResolved);
    }

    let balance = storage::outcome_balance(env, market_id, &trader, side);
    if balance < shares {
        panic_with_error!(env, Error::InsufficientShares);
    }

    let (dy, dn) = deltas(side, shares);
    let payout = lmsr::sell_payout(state.yes_pool, state.no_pool, config.b, dy, dn);

    storage::set_outcome_balance(env, market_id, &trader, side, balance - shares);
    state.yes_pool -= dy;
    state.no_pool -= dn;
    state.collateral -= payout;
    storage::save_market_state(env, market_id, &state);

    if payout > 0 {
        let project = storage::load_project_config(env, config.project_id);
        token::Client::new(env, &project.token).transfer(
            &env.current_contract_address(),
            &trader,
            &payout,
        );
    }

    events::shares_sold(env, market_id, &trader, side, shares, payout);
    payout
}

/// Current probability of `side` in scale units. YES and NO always sum to
/// exactly [`SCALE`]: NO is defined as the complement.
pub fn price(env: &Env, market_id: u64, side: Side) -> i128 {
    let config = storage::load_market_config(env, market_id);
    let state = storage::load_market_state(env, market_id);
    let yes = lmsr::price_yes(state.yes_pool, state.no_pool, config.b);
    match side {
        Side::Yes => yes,
        Side::No => SCALE - yes,
    }
}

/// Oracle-called natural resolution; only valid once `resolution_time` has
/// passed. Forced resolution via project completion/failure bypasses the
/// time gate through [`resolve_for_project`].
pub fn resolve(env: &Env, caller: Address, market_id: u64, outcome: bool) {
    caller.require_auth();
    rbac::require_oracle(env, &caller);

    let config = storage::load_market_config(env, market_id);
    let state = storage::load_market_state(env, market_id);
    if state.resolved {
        panic_with_error!(env, Error::AlreadyResolved);
    }
    if env.ledger().timestamp() < config.resolution_time {
        panic_with_error!(env, Error::ResolutionTooEarly);
    }
    apply_resolution(env, market_id, state, outcome);
}

/// Resolve the project's market as part of a Completed/Failed transition.
/// No-op when the project has no market or it is already resolved; the
/// lifecycle transition must not fail because of market state.
pub fn resolve_for_project(env: &Env, project_id: u64, outcome: bool) {
    if let Some(market_id) = storage::project_market(env, project_id) {
        let state = storage::load_market_state(env, market_id);
        if !state.resolved {
            apply_resolution(env, market_id, state, outcome);
        }
    }
}

fn apply_resolution(env: &Env, market_id: u64, mut state: MarketState, outcome: bool) {
    if state.resolved {
        panic_with_error!(env, Error::AlreadyResolved);
    }
    state.resolved = true;
    state.outcome = outcome;
    storage::save_market_state(env, market_id, &state);
    events::market_resolved(env, market_id, outcome);
}

/// Redeem winning-side shares at one collateral unit per share unit.
pub fn claim_winnings(env: &Env, market_id: u64, holder: Address) -> i128 {
    holder.require_auth();

    let config = storage::load_market_config(env, market_id);
    let mut state = storage::load_market_state(env, market_id);
    if !state.resolved {
        panic_with_error!(env, Error::MarketNotResolved);
    }

    let winning_side = if state.outcome { Side::Yes } else { Side::No };
    let balance = storage::outcome_balance(env, market_id, &holder, winning_side);
    if balance == 0 {
        panic_with_error!(env, Error::NoWinnings);
    }

    storage::set_outcome_balance(env, market_id, &holder, winning_side, 0);
    state.collateral -= balance;
    storage::save_market_state(env, market_id, &state);

    let project = storage::load_project_config(env, config.project_id);
    token::Client::new(env, &project.token).transfer(
        &env.current_contract_address(),
        &holder,
        &balance,
    );

    events::winnings_claimed(env, market_id, &holder, balance);
    balance
}

/// Outcome shares are transferable, unlike bond balances.
pub fn transfer_outcome(
    env: &Env,
    market_id: u64,
    from: Address,
    to: Address,
    side: Side,
    amount: i128,
) {
    from.require_auth();

    if amount <= 0 {
        panic_with_error!(env, Error::ZeroAmount);
    }
    // Ensure the market exists before touching balances.
    storage::load_market_config(env, market_id);

    let from_balance = storage::outcome_balance(env, market_id, &from, side);
    if from_balance < amount {
        panic_with_error!(env, Error::InsufficientShares);
    }
    storage::set_outcome_balance(env, market_id, &from, side, from_balance - amount);
    // Read after the debit so a self-transfer nets to zero.
    let to_balance = storage::outcome_balance(env, market_id, &to, side);
    storage::set_outcome_balance(env, market_id, &to, side, to_balance + amount);

    events::outcome_transferred(
        env,
        OutcomeTransferred {
            market_id,
            from,
            to,
            side,
            amount,
        },
    );
}

pub fn get_market(env: &Env, market_id: u64) -> Market {
    storage::load_market(env, market_id)
}

/// Market ID for a project; panics `MarketNotFound` when none exists.
pub fn market_of_project(env: &Env, project_id: u64) -> u64 {
    match storage::project_market(env, project_id) {
        Some(id) => id,
        None => panic_with_error!(env, Error::MarketNotFound),
    }
}

pub fn outcome_balance(env: &Env, market_id: u64, holder: Address, side: Side) -> i128 {
    storage::outcome_balance(env, market_id, &holder, side)
}
