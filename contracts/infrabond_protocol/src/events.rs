//! # Events
//!
//! Typed event structs and their publish helpers. Events are the contract's
//! observability surface: every state mutation publishes exactly one event
//! under a `(symbol, id)` topic pair so off-chain consumers can filter by
//! kind and by project/market without decoding payloads.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::rbac::Role;
use crate::types::{ProjectStatus, Side};

// ── Registry ─────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub sponsor: Address,
    pub token: Address,
    pub funding_goal: i128,
    pub bond_price: i128,
}

pub fn project_created(env: &Env, event: ProjectCreated) {
    env.events()
        .publish((symbol_short!("created"), event.project_id), event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChanged {
    pub project_id: u64,
    pub status: ProjectStatus,
}

pub fn status_changed(env: &Env, project_id: u64, status: ProjectStatus) {
    env.events().publish(
        (symbol_short!("status"), project_id),
        StatusChanged { project_id, status },
    );
}

// ── Bond ledger ──────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondCreated {
    pub project_id: u64,
}

pub fn bond_created(env: &Env, project_id: u64) {
    env.events().publish(
        (symbol_short!("bond_new"), project_id),
        BondCreated { project_id },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondsPurchased {
    pub project_id: u64,
    pub buyer: Address,
    pub amount: i128,
}

pub fn bonds_purchased(env: &Env, project_id: u64, buyer: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("purchased"), project_id),
        BondsPurchased {
            project_id,
            buyer: buyer.clone(),
            amount,
        },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectActivated {
    pub project_id: u64,
    pub funding_raised: i128,
}

pub fn project_activated(env: &Env, project_id: u64, funding_raised: i128) {
    env.events().publish(
        (symbol_short!("activated"), project_id),
        ProjectActivated {
            project_id,
            funding_raised,
        },
    );
}

// ── Yield vault ──────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevenueDeposited {
    pub project_id: u64,
    pub payer: Address,
    pub amount: i128,
}

pub fn revenue_deposited(env: &Env, project_id: u64, payer: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("revenue"), project_id),
        RevenueDeposited {
            project_id,
            payer: payer.clone(),
            amount,
        },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct YieldClaimed {
    pub project_id: u64,
    pub holder: Address,
    pub amount: i128,
}

pub fn yield_claimed(env: &Env, project_id: u64, holder: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("yield"), project_id),
        YieldClaimed {
            project_id,
            holder: holder.clone(),
            amount,
        },
    );
}

// ── Market engine ────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketCreated {
    pub market_id: u64,
    pub project_id: u64,
    pub b: i128,
    pub resolution_time: u64,
}

pub fn market_created(env: &Env, event: MarketCreated) {
    env.events()
        .publish((symbol_short!("mkt_new"), event.market_id), event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SharesTraded {
    pub market_id: u64,
    pub trader: Address,
    pub side: Side,
    pub shares: i128,
    /// Collateral paid (buys) or received (sells).
    pub collateral: i128,
}

pub fn shares_bought(env: &Env, market_id: u64, trader: &Address, side: Side, shares: i128, cost: i128) {
    env.events().publish(
        (symbol_short!("buy"), market_id),
        SharesTraded {
            market_id,
            trader: trader.clone(),
            side,
            shares,
            collateral: cost,
        },
    );
}

pub fn shares_sold(env: &Env, market_id: u64, trader: &Address, side: Side, shares: i128, payout: i128) {
    env.events().publish(
        (symbol_short!("sell"), market_id),
        SharesTraded {
            market_id,
            trader: trader.clone(),
            side,
            shares,
            collateral: payout,
        },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutcomeTransferred {
    pub market_id: u64,
    pub from: Address,
    pub to: Address,
    pub side: Side,
    pub amount: i128,
}

pub fn outcome_transferred(env: &Env, event: OutcomeTransferred) {
    env.events()
        .publish((symbol_short!("out_xfer"), event.market_id), event);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketResolved {
    pub market_id: u64,
    pub outcome: bool,
}

pub fn market_resolved(env: &Env, market_id: u64, outcome: bool) {
    env.events().publish(
        (symbol_short!("resolved"), market_id),
        MarketResolved { market_id, outcome },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WinningsClaimed {
    pub market_id: u64,
    pub holder: Address,
    pub amount: i128,
}

pub fn winnings_claimed(env: &Env, market_id: u64, holder: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("winnings"), market_id),
        WinningsClaimed {
            market_id,
            holder: holder.clone(),
            amount,
        },
    );
}

// ── Milestone oracle ─────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestonesSetup {
    pub project_id: u64,
    pub count: u32,
}

pub fn milestones_setup(env: &Env, project_id: u64, count: u32) {
    env.events().publish(
        (symbol_short!("ms_setup"), project_id),
        MilestonesSetup { project_id, count },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneVerified {
    pub project_id: u64,
    pub milestone_index: u32,
    pub verified: bool,
    pub confidence: u32,
}

pub fn milestone_verified(
    env: &Env,
    project_id: u64,
    milestone_index: u32,
    verified: bool,
    confidence: u32,
) {
    env.events().publish(
        (symbol_short!("ms_verify"), project_id),
        MilestoneVerified {
            project_id,
            milestone_index,
            verified,
            confidence,
        },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectFailed {
    pub project_id: u64,
    pub reason: String,
}

pub fn project_failed(env: &Env, project_id: u64, reason: String) {
    env.events().publish(
        (symbol_short!("failed"), project_id),
        ProjectFailed { project_id, reason },
    );
}

// ── RBAC ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChanged {
    pub target: Address,
    pub role: Role,
}

pub fn role_granted(env: &Env, target: &Address, role: Role) {
    env.events().publish(
        (symbol_short!("rolegrant"),),
        RoleChanged {
            target: target.clone(),
            role,
        },
    );
}

pub fn role_revoked(env: &Env, target: &Address, role: Role) {
    env.events().publish(
        (symbol_short!("rolerevok"),),
        RoleChanged {
            target: target.clone(),
            role,
        },
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuperAdminTransferred {
    pub from: Address,
    pub to: Address,
}

pub fn super_admin_transferred(env: &Env, from: &Address, to: &Address) {
    env.events().publish(
        (symbol_short!("admin_xfr"),),
        SuperAdminTransferred {
            from: from.clone(),
            to: to.clone(),
        },
    );
}
