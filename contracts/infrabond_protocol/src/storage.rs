//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type  | Description                        |
//! |----------------|-------|------------------------------------|
//! | `ProjectCount` | `u64` | Auto-increment project ID counter  |
//! | `MarketCount`  | `u64` | Auto-increment market ID counter   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//! Role storage lives in `RbacKey` inside [`crate::rbac`].
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                              | Type                      | Description                          |
//! |----------------------------------|---------------------------|--------------------------------------|
//! | `ProjConfig(id)`                 | `ProjectConfig`           | Immutable project configuration      |
//! | `ProjState(id)`                  | `ProjectState`            | Mutable project state                |
//! | `BondSupply(id)`                 | `i128`                    | Total bond shares; presence marks the ledger as created |
//! | `BondBalance(id, holder)`        | `i128`                    | Soulbound per-holder share count     |
//! | `Yield(id)`                      | `YieldPool`               | Revenue total + per-share accumulator |
//! | `YieldCheckpoint(id, holder)`    | `i128`                    | Holder's last-seen accumulator value |
//! | `PendingYield(id, holder)`       | `i128`                    | Yield settled at a balance change, unpaid |
//! | `Milestones(id)`                 | `Vec<Milestone>`          | Fixed at setup; completion monotonic |
//! | `Verifications(id)`              | `Vec<VerificationRecord>` | Append-only audit log                |
//! | `MktConfig(market_id)`           | `MarketConfig`            | Immutable market configuration       |
//! | `MktState(market_id)`            | `MarketState`             | Pools, collateral, resolution        |
//! | `ProjectMarket(id)`              | `u64`                     | Project → market id (one per project) |
//! | `OutcomeBalance(mkt, holder, s)` | `i128`                    | Transferable outcome shares          |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining. Mutable state entries are kept separate from their immutable
//! configs so high-frequency writes (purchases, trades) stay small.

use soroban_sdk::{contracttype, panic_with_error, Address, Env, Vec};

use crate::types::{
    Market, MarketConfig, MarketState, Milestone, Project, ProjectConfig, ProjectState, Side,
    VerificationRecord, YieldPool,
};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys outside the RBAC module.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    /// Global auto-increment counter for market IDs (Instance).
    MarketCount,
    /// Immutable project configuration keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// Total bond shares for a project; presence means the ledger exists.
    BondSupply(u64),
    /// Soulbound bond balance per (project, holder).
    BondBalance(u64, Address),
    /// Yield pool per project.
    Yield(u64),
    /// Holder's last-seen accumulator value per (project, holder).
    YieldCheckpoint(u64, Address),
    /// Yield accrued before the holder's last balance change, not yet paid.
    PendingYield(u64, Address),
    /// Milestone list per project, fixed at setup.
    Milestones(u64),
    /// Append-only verification log per project.
    Verifications(u64),
    /// Immutable market configuration keyed by market ID.
    MktConfig(u64),
    /// Mutable market state keyed by market ID.
    MktState(u64),
    /// Project ID → market ID (at most one market per project).
    ProjectMarket(u64),
    /// Outcome share balance per (market, holder, side).
    OutcomeBalance(u64, Address, Side),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn next_id(env: &Env, key: DataKey) -> u64 {
    bump_instance(env);
    let current: u64 = env.storage().instance().get(&key).unwrap_or(0);
    env.storage().instance().set(&key, &(current + 1));
    current
}

/// Atomically reads, increments, and stores the project counter.
/// Returns the ID to use for the *current* project (pre-increment value).
pub fn next_project_id(env: &Env) -> u64 {
    next_id(env, DataKey::ProjectCount)
}

/// Number of projects registered so far.
pub fn project_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

/// Atomically reads, increments, and stores the market counter.
pub fn next_market_id(env: &Env) -> u64 {
    next_id(env, DataKey::MarketCount)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable config and initial mutable state for a new project.
pub fn save_project(env: &Env, project: &Project) {
    let config_key = DataKey::ProjConfig(project.id);
    let state_key = DataKey::ProjState(project.id);

    let config = ProjectConfig {
        id: project.id,
        sponsor: project.sponsor.clone(),
        name: project.name.clone(),
        metadata_uri: project.metadata_uri.clone(),
        token: project.token.clone(),
        funding_goal: project.funding_goal,
        bond_price: project.bond_price,
        created_at: project.created_at,
    };

    let state = ProjectState {
        funding_raised: project.funding_raised,
        status: project.status,
    };

    env.storage().persistent().set(&config_key, &config);
    env.storage().persistent().set(&state_key, &state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Project {
    let config = load_project_config(env, id);
    let state = load_project_state(env, id);
    Project {
        id: config.id,
        sponsor: config.sponsor,
        name: config.name,
        metadata_uri: config.metadata_uri,
        token: config.token,
        funding_goal: config.funding_goal,
        funding_raised: state.funding_raised,
        bond_price: config.bond_price,
        status: state.status,
        created_at: config.created_at,
    }
}

/// Load only the immutable project configuration.
pub fn load_project_config(env: &Env, id: u64) -> ProjectConfig {
    let key = DataKey::ProjConfig(id);
    let config: ProjectConfig = match env.storage().persistent().get(&key) {
        Some(c) => c,
        None => panic_with_error!(env, Error::ProjectNotFound),
    };
    bump_persistent(env, &key);
    config
}

/// Load only the mutable project state.
pub fn load_project_state(env: &Env, id: u64) -> ProjectState {
    let key = DataKey::ProjState(id);
    let state: ProjectState = match env.storage().persistent().get(&key) {
        Some(s) => s,
        None => panic_with_error!(env, Error::ProjectNotFound),
    };
    bump_persistent(env, &key);
    state
}

/// Save only the mutable project state (the purchase/transition write path).
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

// ── Bond ledger ──────────────────────────────────────────────────────

/// True once `create_bond` has run for the project.
pub fn has_bond_ledger(env: &Env, project_id: u64) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::BondSupply(project_id))
}

pub fn bond_supply(env: &Env, project_id: u64) -> i128 {
    let key = DataKey::BondSupply(project_id);
    match env.storage().persistent().get(&key) {
        Some(supply) => {
            bump_persistent(env, &key);
            supply
        }
        None => 0,
    }
}

pub fn set_bond_supply(env: &Env, project_id: u64, supply: i128) {
    let key = DataKey::BondSupply(project_id);
    env.storage().persistent().set(&key, &supply);
    bump_persistent(env, &key);
}

pub fn bond_balance(env: &Env, project_id: u64, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::BondBalance(project_id, holder.clone()))
        .unwrap_or(0)
}

pub fn set_bond_balance(env: &Env, project_id: u64, holder: &Address, balance: i128) {
    let key = DataKey::BondBalance(project_id, holder.clone());
    env.storage().persistent().set(&key, &balance);
    bump_persistent(env, &key);
}

// ── Yield vault ──────────────────────────────────────────────────────

pub fn load_yield_pool(env: &Env, project_id: u64) -> YieldPool {
    env.storage()
        .persistent()
        .get(&DataKey::Yield(project_id))
        .unwrap_or(YieldPool {
            total_revenue: 0,
            acc_per_share: 0,
        })
}

pub fn save_yield_pool(env: &Env, project_id: u64, pool: &YieldPool) {
    let key = DataKey::Yield(project_id);
    env.storage().persistent().set(&key, pool);
    bump_persistent(env, &key);
}

pub fn yield_checkpoint(env: &Env, project_id: u64, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::YieldCheckpoint(project_id, holder.clone()))
        .unwrap_or(0)
}

pub fn set_yield_checkpoint(env: &Env, project_id: u64, holder: &Address, acc: i128) {
    let key = DataKey::YieldCheckpoint(project_id, holder.clone());
    env.storage().persistent().set(&key, &acc);
    bump_persistent(env, &key);
}

pub fn pending_yield(env: &Env, project_id: u64, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::PendingYield(project_id, holder.clone()))
        .unwrap_or(0)
}

pub fn set_pending_yield(env: &Env, project_id: u64, holder: &Address, amount: i128) {
    let key = DataKey::PendingYield(project_id, holder.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

// ── Milestones & verification log ────────────────────────────────────

pub fn has_milestones(env: &Env, project_id: u64) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Milestones(project_id))
}

/// Load the milestone list; panics `MilestonesNotSetup` when absent.
pub fn load_milestones(env: &Env, project_id: u64) -> Vec<Milestone> {
    let key = DataKey::Milestones(project_id);
    let milestones: Vec<Milestone> = match env.storage().persistent().get(&key) {
        Some(m) => m,
        None => panic_with_error!(env, Error::MilestonesNotSetup),
    };
    bump_persistent(env, &key);
    milestones
}

pub fn save_milestones(env: &Env, project_id: u64, milestones: &Vec<Milestone>) {
    let key = DataKey::Milestones(project_id);
    env.storage().persistent().set(&key, milestones);
    bump_persistent(env, &key);
}

/// Load the verification log; empty when nothing has been recorded yet.
pub fn load_verifications(env: &Env, project_id: u64) -> Vec<VerificationRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Verifications(project_id))
        .unwrap_or(Vec::new(env))
}

pub fn save_verifications(env: &Env, project_id: u64, log: &Vec<VerificationRecord>) {
    let key = DataKey::Verifications(project_id);
    env.storage().persistent().set(&key, log);
    bump_persistent(env, &key);
}

// ── Markets ──────────────────────────────────────────────────────────

pub fn save_market(env: &Env, config: &MarketConfig, state: &MarketState) {
    let config_key = DataKey::MktConfig(config.id);
    let state_key = DataKey::MktState(config.id);
    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

pub fn load_market_config(env: &Env, market_id: u64) -> MarketConfig {
    let key = DataKey::MktConfig(market_id);
    let config: MarketConfig = match env.storage().persistent().get(&key) {
        Some(c) => c,
        None => panic_with_error!(env, Error::MarketNotFound),
    };
    bump_persistent(env, &key);
    config
}

pub fn load_market_state(env: &Env, market_id: u64) -> MarketState {
    let key = DataKey::MktState(market_id);
    let state: MarketState = match env.storage().persistent().get(&key) {
        Some(s) => s,
        None => panic_with_error!(env, Error::MarketNotFound),
    };
    bump_persistent(env, &key);
    state
}

/// Save only the mutable market state (the trade/resolve write path).
pub fn save_market_state(env: &Env, market_id: u64, state: &MarketState) {
    let key = DataKey::MktState(market_id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Load the full `Market` by combining config and state.
pub fn load_market(env: &Env, market_id: u64) -> Market {
    let config = load_market_config(env, market_id);
    let state = load_market_state(env, market_id);
    Market {
        id: config.id,
        project_id: config.project_id,
        question: config.question,
        b: config.b,
        resolution_time: config.resolution_time,
        yes_pool: state.yes_pool,
        no_pool: state.no_pool,
        collateral: state.collateral,
        resolved: state.resolved,
        outcome: state.outcome,
    }
}

/// Market ID for a project, if one has been created.
pub fn project_market(env: &Env, project_id: u64) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::ProjectMarket(project_id))
}

pub fn set_project_market(env: &Env, project_id: u64, market_id: u64) {
    let key = DataKey::ProjectMarket(project_id);
    env.storage().persistent().set(&key, &market_id);
    bump_persistent(env, &key);
}

pub fn outcome_balance(env: &Env, market_id: u64, holder: &Address, side: Side) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::OutcomeBalance(market_id, holder.clone(), side))
        .unwrap_or(0)
}

pub fn set_outcome_balance(env: &Env, market_id: u64, holder: &Address, side: Side, bal: i128) {
    let key = DataKey::OutcomeBalance(market_id, holder.clone(), side);
    env.storage().persistent().set(&key, &bal);
    bump_persistent(env, &key);
}
