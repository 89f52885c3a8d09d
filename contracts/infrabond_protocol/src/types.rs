//! # Types
//!
//! Shared data structures used across all modules of the protocol.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`]: written once at registration; never mutated.
//! - [`ProjectState`]: written on every bond purchase and lifecycle transition.
//!
//! The public API exposes the reconstructed [`Project`] struct for convenience.
//! [`Market`] follows the same split ([`MarketConfig`] / [`MarketState`]):
//! trades are the high-frequency write path and only touch the small state
//! entry.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProjectStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Pending ──► Funding ──► Active ──► Completed
//!     │           │          └─────► Failed
//!     │           └────────────────► Failed
//!     └────────────────────────────► Failed
//! ```
//!
//! `Pending → Funding` is driven by the oracle role, `Funding → Active` is
//! automatic in the purchase that meets the goal, and the terminal states
//! (`Completed`, `Failed`) are only ever written by the milestone oracle
//! module. Backward transitions and transitions out of terminal states are
//! rejected.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Lifecycle status of a project.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectStatus {
    /// Registered; not yet open for contributions.
    Pending,
    /// Accepting bond purchases.
    Funding,
    /// Fully funded; work in progress.
    Active,
    /// All milestones verified.
    Completed,
    /// Abandoned or rejected by the oracle.
    Failed,
}

impl ProjectStatus {
    /// Terminal statuses are permanent.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Failed)
    }
}

/// Immutable project configuration, written once at registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub sponsor: Address,
    pub name: String,
    pub metadata_uri: String,
    /// Collateral asset for bonds, revenue deposits, and the market.
    pub token: Address,
    pub funding_goal: i128,
    /// Denomination of a single bond lot; registration metadata for the
    /// presentation layer. Share accounting is 1:1 in collateral units.
    pub bond_price: i128,
    pub created_at: u64,
}

/// Mutable project state, updated on purchases and lifecycle transitions.
///
/// Kept small so that the frequent writes (purchases) are cheap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub funding_raised: i128,
    pub status: ProjectStatus,
}

/// Full on-chain representation of a project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Unique identifier (auto-incremented).
    pub id: u64,
    /// Address that registered the project and receives the raised capital.
    pub sponsor: Address,
    pub name: String,
    pub metadata_uri: String,
    pub token: Address,
    pub funding_goal: i128,
    pub funding_raised: i128,
    pub bond_price: i128,
    pub status: ProjectStatus,
    pub created_at: u64,
}

/// A single deliverable gating project progress.
///
/// Indices into the per-project milestone vector are fixed at setup time.
/// `completed` is monotonic: once set it is never cleared.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub description: String,
    pub target_date: u64,
    pub completed: bool,
    pub completed_at: u64,
}

/// One entry in the append-only verification audit log.
///
/// Every verification attempt is recorded, including rejections
/// (`verified == false`). Entries are never mutated or deleted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerificationRecord {
    pub milestone_index: u32,
    pub verified: bool,
    pub evidence_uri: String,
    pub data_sources: Vec<String>,
    /// Adjudicated confidence score in [0, 100], produced off-chain.
    pub confidence: u32,
    pub timestamp: u64,
}

/// Milestone completion summary for a project.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectProgress {
    pub completed: u32,
    pub total: u32,
}

/// Which side of a binary market an outcome share backs.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Yes,
    No,
}

/// Immutable market configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketConfig {
    pub id: u64,
    pub project_id: u64,
    pub question: String,
    /// LMSR liquidity parameter, in collateral base units.
    pub b: i128,
    /// Earliest moment a natural (non-forced) resolution is permitted.
    pub resolution_time: u64,
}

/// Mutable market state, updated on every trade and on resolution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketState {
    /// Outstanding YES shares, in base units.
    pub yes_pool: i128,
    /// Outstanding NO shares, in base units.
    pub no_pool: i128,
    /// Collateral held by the book: seed plus net trade flow.
    pub collateral: i128,
    pub resolved: bool,
    /// Only meaningful once `resolved` is true.
    pub outcome: bool,
}

/// Full market view, reconstructed from the config/state split.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Market {
    pub id: u64,
    pub project_id: u64,
    pub question: String,
    pub b: i128,
    pub resolution_time: u64,
    pub yes_pool: i128,
    pub no_pool: i128,
    pub collateral: i128,
    pub resolved: bool,
    pub outcome: bool,
}

/// Per-project yield distribution pool.
///
/// `acc_per_share` is a monotonically increasing revenue-per-share
/// accumulator scaled by [`crate::lmsr::SCALE`]; together with per-holder
/// checkpoints it distributes revenue in constant time per deposit and per
/// claim, without iterating the holder set.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct YieldPool {
    pub total_revenue: i128,
    pub acc_per_share: i128,
}
