//! # Infrabond Protocol Contract
//!
//! Root crate of the infrastructure bond funding and milestone market
//! protocol. It exposes the single Soroban contract [`InfrabondProtocol`]
//! whose entry points cover the full project lifecycle:
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Bootstrap    | [`InfrabondProtocol::init`]                           |
//! | Role admin   | `grant_role`, `revoke_role`, `transfer_super_admin`, `set_oracle` |
//! | Registration | `register_project`, `update_status`                   |
//! | Funding      | `create_bond`, `purchase_bonds`                       |
//! | Yield        | `deposit_revenue`, `claimable_yield`, `claim_yield`   |
//! | Markets      | `create_market`, `buy`, `sell`, `resolve_market`, `claim_winnings` |
//! | Verification | `setup_milestones`, `verify_milestone`, `mark_project_failed` |
//! | Queries      | `get_project`, `get_market`, `get_milestones`, `price`, … |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`rbac`]. Storage access is fully
//! delegated to [`storage`]. Business logic lives in the component modules
//! ([`registry`], [`bonds`], [`vault`], [`market`], [`oracle`]); this file
//! contains **only** the public entry points.
//!
//! Each piece of mutable state has exactly one writer module: project
//! status after funding opens belongs to the oracle module (with the single
//! automatic `Funding → Active` flip owned by the purchase path), market
//! pools belong to the market module's trade entry points, bond balances to
//! the purchase path, and yield accumulators to the vault. Every entry
//! point commits fully or reverts fully; the host serializes calls, so
//! there are no partial updates to reason about.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

mod bonds;
mod events;
mod lmsr;
mod market;
mod oracle;
mod registry;
pub mod rbac;
mod storage;
mod types;
mod vault;

#[cfg(test)]
mod test_oracle;

pub use lmsr::SCALE;
pub use rbac::Role;
pub use types::{
    Market, Milestone, Project, ProjectProgress, ProjectStatus, Side, VerificationRecord,
    YieldPool,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Bootstrap / roles
    AlreadyInitialized = 1,
    NotAuthorized = 2,
    RoleNotFound = 3,
    // Registry
    ProjectNotFound = 4,
    InvalidFundingParams = 5,
    InvalidStatusTransition = 6,
    // Bond ledger
    BondAlreadyExists = 7,
    BondNotCreated = 8,
    NotInFundingStatus = 9,
    ZeroAmount = 10,
    ExceedsFundingGoal = 11,
    NonTransferable = 12,
    // Yield vault
    BondNotFound = 13,
    NoBondSupply = 14,
    NothingToClaim = 15,
    // Market engine
    MarketAlreadyExists = 16,
    MarketNotFound = 17,
    InvalidLiquidity = 18,
    ZeroShares = 19,
    MarketResolved = 20,
    InsufficientShares = 21,
    ResolutionTooEarly = 22,
    AlreadyResolved = 23,
    MarketNotResolved = 24,
    NoWinnings = 25,
    // Milestone oracle
    InvalidArrayLengths = 26,
    MilestonesAlreadySetup = 27,
    MilestonesNotSetup = 28,
    InvalidMilestoneIndex = 29,
    MilestoneAlreadyCompleted = 30,
    InvalidConfidence = 31,
    TerminalStatus = 32,
}

#[contract]
pub struct InfrabondProtocol;

#[contractimpl]
impl InfrabondProtocol {
    // ─────────────────────────────────────────────────────────
    // Bootstrap & role management
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract and set the first SuperAdmin.
    ///
    /// Must be called exactly once after deployment; subsequent calls panic
    /// with `Error::AlreadyInitialized`.
    pub fn init(env: Env, super_admin: Address) {
        super_admin.require_auth();
        rbac::init_super_admin(&env, &super_admin);
    }

    /// Grant `role` to `target`. `caller` must hold SuperAdmin or Admin;
    /// only SuperAdmin can grant SuperAdmin.
    pub fn grant_role(env: Env, caller: Address, target: Address, role: Role) {
        rbac::grant_role(&env, &caller, &target, role);
    }

    /// Revoke any non-SuperAdmin role from `target`.
    pub fn revoke_role(env: Env, caller: Address, target: Address) {
        rbac::revoke_role(&env, &caller, &target);
    }

    /// Transfer SuperAdmin; the previous holder loses the role immediately.
    pub fn transfer_super_admin(env: Env, current_super_admin: Address, new_super_admin: Address) {
        rbac::transfer_super_admin(&env, &current_super_admin, &new_super_admin);
    }

    /// Grant the Oracle role to `oracle`. `caller` must hold SuperAdmin or
    /// Admin. To run a single oracle, revoke the old one first.
    pub fn set_oracle(env: Env, caller: Address, oracle: Address) {
        rbac::grant_role(&env, &caller, &oracle, Role::Oracle);
    }

    /// Return the role held by `address`, or `None`.
    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::role_of(&env, address)
    }

    /// Return `true` if `address` holds `role`.
    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, address, role)
    }

    // ─────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────

    /// Register a new project. `sponsor` must hold ProjectManager, Admin,
    /// or SuperAdmin. The project starts in `Pending`.
    pub fn register_project(
        env: Env,
        sponsor: Address,
        name: String,
        metadata_uri: String,
        token: Address,
        funding_goal: i128,
        bond_price: i128,
    ) -> Project {
        registry::register_project(
            &env,
            sponsor,
            name,
            metadata_uri,
            token,
            funding_goal,
            bond_price,
        )
    }

    /// Privileged status update (Oracle role). Only `Pending → Funding` is
    /// accepted here; all later transitions have dedicated owners.
    pub fn update_status(env: Env, caller: Address, project_id: u64, status: ProjectStatus) {
        registry::update_status(&env, caller, project_id, status);
    }

    pub fn get_project(env: Env, project_id: u64) -> Project {
        registry::get_project(&env, project_id)
    }

    pub fn get_all_projects(env: Env) -> Vec<Project> {
        registry::get_all_projects(&env)
    }

    pub fn get_active_projects(env: Env) -> Vec<Project> {
        registry::get_active_projects(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Bond ledger
    // ─────────────────────────────────────────────────────────

    /// Create the project's bond ledger (sponsor-only, once).
    pub fn create_bond(env: Env, project_id: u64) {
        bonds::create_bond(&env, project_id);
    }

    /// Purchase bonds while the project is in `Funding`. The purchase that
    /// meets the goal flips the project `Active` in the same call.
    pub fn purchase_bonds(env: Env, project_id: u64, buyer: Address, amount: i128) {
        bonds::purchase_bonds(&env, project_id, buyer, amount);
    }

    pub fn bond_balance_of(env: Env, project_id: u64, holder: Address) -> i128 {
        bonds::balance_of(&env, project_id, holder)
    }

    pub fn bond_supply(env: Env, project_id: u64) -> i128 {
        bonds::supply_of(&env, project_id)
    }

    /// Bond balances are soulbound; always fails `NonTransferable`.
    pub fn transfer_bonds(env: Env, project_id: u64, from: Address, to: Address, amount: i128) {
        bonds::transfer_bonds(&env, project_id, from, to, amount);
    }

    // ─────────────────────────────────────────────────────────
    // Yield vault
    // ─────────────────────────────────────────────────────────

    /// Deposit revenue for pro-rata distribution to bond holders.
    pub fn deposit_revenue(env: Env, project_id: u64, payer: Address, amount: i128) {
        vault::deposit_revenue(&env, project_id, payer, amount);
    }

    pub fn claimable_yield(env: Env, project_id: u64, holder: Address) -> i128 {
        vault::claimable_yield(&env, project_id, holder)
    }

    /// Pay out accrued yield; fails `NothingToClaim` when zero.
    pub fn claim_yield(env: Env, project_id: u64, holder: Address) -> i128 {
        vault::claim_yield(&env, project_id, holder)
    }

    // ─────────────────────────────────────────────────────────
    // Market engine
    // ─────────────────────────────────────────────────────────

    /// Create the project's binary market. Pulls the LMSR seed `b·ln2`
    /// from `creator`. One market per project.
    pub fn create_market(
        env: Env,
        creator: Address,
        project_id: u64,
        question: String,
        resolution_time: u64,
        liquidity_override: Option<i128>,
    ) -> u64 {
        market::create_market(
            &env,
            creator,
            project_id,
            question,
            resolution_time,
            liquidity_override,
        )
    }

    pub fn quote_buy(env: Env, market_id: u64, side: Side, shares: i128) -> i128 {
        market::quote_buy(&env, market_id, side, shares)
    }

    pub fn quote_sell(env: Env, market_id: u64, side: Side, shares: i128) -> i128 {
        market::quote_sell(&env, market_id, side, shares)
    }

    /// Buy outcome shares; returns the collateral charged.
    pub fn buy(env: Env, market_id: u64, trader: Address, side: Side, shares: i128) -> i128 {
        market::buy(&env, market_id, trader, side, shares)
    }

    /// Sell outcome shares back; returns the collateral paid out.
    pub fn sell(env: Env, market_id: u64, trader: Address, side: Side, shares: i128) -> i128 {
        market::sell(&env, market_id, trader, side, shares)
    }

    /// Probability of `side` in scale units (`SCALE` == certainty).
    pub fn price(env: Env, market_id: u64, side: Side) -> i128 {
        market::price(&env, market_id, side)
    }

    /// Oracle-called natural resolution, valid from `resolution_time` on.
    /// Project completion/failure resolves the market earlier by itself.
    pub fn resolve_market(env: Env, caller: Address, market_id: u64, outcome: bool) {
        market::resolve(&env, caller, market_id, outcome);
    }

    /// Redeem winning shares at one collateral unit per share unit.
    pub fn claim_winnings(env: Env, market_id: u64, holder: Address) -> i128 {
        market::claim_winnings(&env, market_id, holder)
    }

    /// Transfer outcome shares (these, unlike bonds, are transferable).
    pub fn transfer_outcome(
        env: Env,
        market_id: u64,
        from: Address,
        to: Address,
        side: Side,
        amount: i128,
    ) {
        market::transfer_outcome(&env, market_id, from, to, side, amount);
    }

    pub fn get_market(env: Env, market_id: u64) -> Market {
        market::get_market(&env, market_id)
    }

    pub fn market_of_project(env: Env, project_id: u64) -> u64 {
        market::market_of_project(&env, project_id)
    }

    pub fn outcome_balance(env: Env, market_id: u64, holder: Address, side: Side) -> i128 {
        market::outcome_balance(&env, market_id, holder, side)
    }

    // ─────────────────────────────────────────────────────────
    // Milestone oracle
    // ─────────────────────────────────────────────────────────

    /// Fix the project's milestone list (Oracle role, once per project).
    pub fn setup_milestones(
        env: Env,
        caller: Address,
        project_id: u64,
        descriptions: Vec<String>,
        target_dates: Vec<u64>,
    ) {
        oracle::setup_milestones(&env, caller, project_id, descriptions, target_dates);
    }

    /// Record a verification attempt (Oracle role). Always appends to the
    /// audit log; a true verdict completes the milestone, and completing
    /// the last one completes the project and resolves its market to YES.
    pub fn verify_milestone(
        env: Env,
        caller: Address,
        project_id: u64,
        index: u32,
        verified: bool,
        evidence_uri: String,
        data_sources: Vec<String>,
        confidence: u32,
    ) {
        oracle::verify_milestone(
            &env,
            caller,
            project_id,
            index,
            verified,
            evidence_uri,
            data_sources,
            confidence,
        );
    }

    /// Force a non-terminal project to `Failed`, resolving its market to NO.
    pub fn mark_project_failed(env: Env, caller: Address, project_id: u64, reason: String) {
        oracle::mark_project_failed(&env, caller, project_id, reason);
    }

    pub fn get_milestones(env: Env, project_id: u64) -> Vec<Milestone> {
        oracle::get_milestones(&env, project_id)
    }

    pub fn get_verifications(env: Env, project_id: u64) -> Vec<VerificationRecord> {
        oracle::get_verifications(&env, project_id)
    }

    pub fn get_project_progress(env: Env, project_id: u64) -> ProjectProgress {
        oracle::get_project_progress(&env, project_id)
    }
}
