//! # Milestone oracle
//!
//! The coordination point of the protocol: the only writer of milestone
//! completion, of terminal project status, and the only caller of forced
//! market resolution. It consumes the `(verified, evidence_uri,
//! data_sources, confidence)` tuple as opaque, already-adjudicated input
//! from the off-chain verification pipeline: no trust is re-derived from
//! raw evidence here.
//!
//! Every verification attempt, accepted or rejected, is appended to the
//! per-project [`VerificationRecord`] log. The log is the canonical audit
//! trail; it is never mutated or truncated.

use soroban_sdk::{panic_with_error, Address, Env, String, Vec};

use crate::events;
use crate::market;
use crate::rbac;
use crate::storage;
use crate::types::{Milestone, ProjectProgress, ProjectStatus, VerificationRecord};
use crate::Error;

const MAX_CONFIDENCE: u32 = 100;

/// Fix the project's milestone list. Oracle-only, exactly once per project;
/// `descriptions` and `target_dates` must be equal-length and non-empty.
pub fn setup_milestones(
    env: &Env,
    caller: Address,
    project_id: u64,
    descriptions: Vec<String>,
    target_dates: Vec<u64>,
) {
    caller.require_auth();
    rbac::require_oracle(env, &caller);

    storage::load_project_config(env, project_id);
    if descriptions.is_empty() || descriptions.len() != target_dates.len() {
        panic_with_error!(env, Error::InvalidArrayLengths);
    }
    if storage::has_milestones(env, project_id) {
        panic_with_error!(env, Error::MilestonesAlreadySetup);
    }

    let mut milestones = Vec::new(env);
    for i in 0..descriptions.len() {
        milestones.push_back(Milestone {
            description: descriptions.get_unchecked(i),
            target_date: target_dates.get_unchecked(i),
            completed: false,
            completed_at: 0,
        });
    }
    storage::save_milestones(env, project_id, &milestones);
    events::milestones_setup(env, project_id, milestones.len());
}

/// Record one verification attempt for a milestone.
///
/// Always appends to the audit log, whether or not `verified` is true.
/// A true verdict completes the milestone; completing the last outstanding
/// milestone moves a non-terminal project to `Completed` and force-resolves
/// its market to YES.
pub fn verify_milestone(
    env: &Env,
    caller: Address,
    project_id: u64,
    index: u32,
    verified: bool,
    evidence_uri: String,
    data_sources: Vec<String>,
    confidence: u32,
) {
    caller.require_auth();
    rbac::require_oracle(env, &caller);

    let mut milestones = storage::load_milestones(env, project_id);
    if index >= milestones.len() {
        panic_with_error!(env, Error::InvalidMilestoneIndex);
    }
    if confidence > MAX_CONFIDENCE {
        panic_with_error!(env, Error::InvalidConfidence);
    }
    let mut milestone = milestones.get_unchecked(index);
    if milestone.completed {
        panic_with_error!(env, Error::MilestoneAlreadyCompleted);
    }

    let mut log = storage::load_verifications(env, project_id);
    log.push_back(VerificationRecord {
        milestone_index: index,
        verified,
        evidence_uri,
        data_sources,
        confidence,
        timestamp: env.ledger().timestamp(),
    });
    storage::save_verifications(env, project_id, &log);
    events::milestone_verified(env, project_id, index, verified, confidence);

    if !verified {
        return;
    }

    milestone.completed = true;
    milestone.completed_at = env.ledger().timestamp();
    milestones.set(index, milestone);
    storage::save_milestones(env, project_id, &milestones);

    let all_completed = milestones.iter().all(|m| m.completed);
    if all_completed {
        let mut state = storage::load_project_state(env, project_id);
        // Terminal states are permanent; a project already marked Failed
        // keeps its audit log growing but never becomes Completed.
        if !state.status.is_terminal() {
            state.status = ProjectStatus::Completed;
            storage::save_project_state(env, project_id, &state);
            events::status_changed(env, project_id, ProjectStatus::Completed);
            market::resolve_for_project(env, project_id, true);
        }
    }
}

/// Force a non-terminal project to `Failed` and resolve its market to NO.
pub fn mark_project_failed(env: &Env, caller: Address, project_id: u64, reason: String) {
    caller.require_auth();
    rbac::require_oracle(env, &caller);

    let mut state = storage::load_project_state(env, project_id);
    if state.status.is_terminal() {
        panic_with_error!(env, Error::TerminalStatus);
    }
    state.status = ProjectStatus::Failed;
    storage::save_project_state(env, project_id, &state);

    events::status_changed(env, project_id, ProjectStatus::Failed);
    events::project_failed(env, project_id, reason);
    market::resolve_for_project(env, project_id, false);
}

pub fn get_milestones(env: &Env, project_id: u64) -> Vec<Milestone> {
    storage::load_milestones(env, project_id)
}

pub fn get_verifications(env: &Env, project_id: u64) -> Vec<VerificationRecord> {
    storage::load_verifications(env, project_id)
}

pub fn get_project_progress(env: &Env, project_id: u64) -> ProjectProgress {
    let milestones = storage::load_milestones(env, project_id);
    let mut completed = 0u32;
    for milestone in milestones.iter() {
        if milestone.completed {
            completed += 1;
        }
    }
    ProjectProgress {
        completed,
        total: milestones.len(),
    }
}
