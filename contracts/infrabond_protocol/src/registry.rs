//! # Registry
//!
//! Project metadata and the status lifecycle. Registration is the only
//! write anyone but the oracle role performs here; after funding opens,
//! status is owned by the funding path (`Funding → Active`, automatic) and
//! by the milestone oracle module (terminal transitions).

use soroban_sdk::{panic_with_error, Address, Env, String, Vec};

use crate::events::{self, ProjectCreated};
use crate::rbac;
use crate::storage;
use crate::types::{Project, ProjectStatus};
use crate::Error;

/// Register a new project. `sponsor` must authorize and hold a
/// registration-capable role. The project starts `Pending`; the oracle
/// opens it for funding via [`update_status`].
pub fn register_project(
    env: &Env,
    sponsor: Address,
    name: String,
    metadata_uri: String,
    token: Address,
    funding_goal: i128,
    bond_price: i128,
) -> Project {
    sponsor.require_auth();
    rbac::require_can_register(env, &sponsor);

    if funding_goal <= 0 || bond_price <= 0 {
        panic_with_error!(env, Error::InvalidFundingParams);
    }

    let id = storage::next_project_id(env);
    let project = Project {
        id,
        sponsor: sponsor.clone(),
        name,
        metadata_uri,
        token: token.clone(),
        funding_goal,
        funding_raised: 0,
        bond_price,
        status: ProjectStatus::Pending,
        created_at: env.ledger().timestamp(),
    };
    storage::save_project(env, &project);

    events::project_created(
        env,
        ProjectCreated {
            project_id: id,
            sponsor,
            token,
            funding_goal,
            bond_price,
        },
    );
    project
}

/// Privileged status update. The only transition this entry point owns is
/// `Pending → Funding`; everything later is driven by the purchase that
/// meets the goal or by the milestone oracle module.
pub fn update_status(env: &Env, caller: Address, project_id: u64, status: ProjectStatus) {
    caller.require_auth();
    rbac::require_oracle(env, &caller);

    let mut state = storage::load_project_state(env, project_id);
    if !(state.status == ProjectStatus::Pending && status == ProjectStatus::Funding) {
        panic_with_error!(env, Error::InvalidStatusTransition);
    }
    state.status = status;
    storage::save_project_state(env, project_id, &state);
    events::status_changed(env, project_id, status);
}

pub fn get_project(env: &Env, project_id: u64) -> Project {
    storage::load_project(env, project_id)
}

pub fn get_all_projects(env: &Env) -> Vec<Project> {
    let mut projects = Vec::new(env);
    for id in 0..storage::project_count(env) {
        projects.push_back(storage::load_project(env, id));
    }
    projects
}

pub fn get_active_projects(env: &Env) -> Vec<Project> {
    let mut projects = Vec::new(env);
    for id in 0..storage::project_count(env) {
        let project = storage::load_project(env, id);
        if project.status == ProjectStatus::Active {
            projects.push_back(project);
        }
    }
    projects
}
