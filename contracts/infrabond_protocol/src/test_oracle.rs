extern crate std;

use soroban_sdk::{testutils::Address as _, token, vec, Address, Env, String, Vec};

use crate::invariants;
use crate::lmsr::SCALE;
use crate::{Error, InfrabondProtocol, InfrabondProtocolClient, ProjectStatus, Role, Side};

fn setup() -> (Env, InfrabondProtocolClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(InfrabondProtocol, ());
    let client = InfrabondProtocolClient::new(&env, &contract_id);
    let super_admin = Address::generate(&env);
    client.init(&super_admin);
    (env, client, super_admin)
}

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

/// Host-side error a reverted invocation surfaces through the `try_` client.
fn contract_error(e: Error) -> soroban_sdk::Error {
    soroban_sdk::Error::from_contract_error(e as u32)
}

/// Fully funded project in `Active` with its market created.
/// Returns (project_id, market_id, oracle, token).
fn active_project<'a>(
    env: &Env,
    client: &InfrabondProtocolClient,
    super_admin: &Address,
) -> (u64, u64, Address, token::Client<'a>) {
    let token_admin = Address::generate(env);
    let token = create_token(env, &token_admin);
    let sponsor = Address::generate(env);
    client.grant_role(super_admin, &sponsor, &Role::ProjectManager);
    let goal = 500 * SCALE;
    let project = client.register_project(
        &sponsor,
        &String::from_str(env, "Bridge retrofit"),
        &String::from_str(env, "ipfs://metadata"),
        &token.address,
        &goal,
        &SCALE,
    );
    let oracle = Address::generate(env);
    client.set_oracle(super_admin, &oracle);
    client.update_status(&oracle, &project.id, &ProjectStatus::Funding);
    client.create_bond(&project.id);

    let sac = token::StellarAssetClient::new(env, &token.address);
    let backer = Address::generate(env);
    sac.mint(&backer, &goal);
    client.purchase_bonds(&project.id, &backer, &goal);

    let creator = Address::generate(env);
    sac.mint(&creator, &(1_000 * SCALE));
    let market_id = client.create_market(
        &creator,
        &project.id,
        &String::from_str(env, "Will all milestones verify?"),
        &u64::MAX,
        &None,
    );
    (project.id, market_id, oracle, token)
}

fn milestone_plan(env: &Env, n: u32) -> (Vec<String>, Vec<u64>) {
    let mut descriptions = Vec::new(env);
    let mut target_dates = Vec::new(env);
    for i in 0..n {
        descriptions.push_back(String::from_str(env, "deliverable"));
        target_dates.push_back(86_400 * (i as u64 + 1));
    }
    (descriptions, target_dates)
}

fn verify(
    client: &InfrabondProtocolClient,
    env: &Env,
    oracle: &Address,
    project_id: u64,
    index: u32,
    verified: bool,
    confidence: u32,
) {
    client.verify_milestone(
        oracle,
        &project_id,
        &index,
        &verified,
        &String::from_str(env, "ipfs://evidence"),
        &vec![env, String::from_str(env, "news"), String::from_str(env, "satellite")],
        &confidence,
    );
}

// ── Setup ────────────────────────────────────────────────────────────

#[test]
fn setup_requires_oracle_role() {
    let (env, client, super_admin) = setup();
    let (project_id, _, _, _) = active_project(&env, &client, &super_admin);
    let outsider = Address::generate(&env);
    let (descriptions, target_dates) = milestone_plan(&env, 2);

    assert_eq!(
        client.try_setup_milestones(&outsider, &project_id, &descriptions, &target_dates),
        Err(Ok(contract_error(Error::NotAuthorized)))
    );
}

#[test]
fn setup_rejects_bad_arrays() {
    let (env, client, super_admin) = setup();
    let (project_id, _, oracle, _) = active_project(&env, &client, &super_admin);

    let empty: Vec<String> = Vec::new(&env);
    let no_dates: Vec<u64> = Vec::new(&env);
    assert_eq!(
        client.try_setup_milestones(&oracle, &project_id, &empty, &no_dates),
        Err(Ok(contract_error(Error::InvalidArrayLengths)))
    );

    let (descriptions, _) = milestone_plan(&env, 3);
    let (_, short_dates) = milestone_plan(&env, 2);
    assert_eq!(
        client.try_setup_milestones(&oracle, &project_id, &descriptions, &short_dates),
        Err(Ok(contract_error(Error::InvalidArrayLengths)))
    );
}

#[test]
fn setup_is_one_shot() {
    let (env, client, super_admin) = setup();
    let (project_id, _, oracle, _) = active_project(&env, &client, &super_admin);
    let (descriptions, target_dates) = milestone_plan(&env, 2);

    client.setup_milestones(&oracle, &project_id, &descriptions, &target_dates);
    assert_eq!(
        client.try_setup_milestones(&oracle, &project_id, &descriptions, &target_dates),
        Err(Ok(contract_error(Error::MilestonesAlreadySetup)))
    );

    let milestones = client.get_milestones(&project_id);
    assert_eq!(milestones.len(), 2);
    assert!(!milestones.get_unchecked(0).completed);
}

// ── Verification ─────────────────────────────────────────────────────

#[test]
fn verify_before_setup_fails() {
    let (env, client, super_admin) = setup();
    let (project_id, _, oracle, _) = active_project(&env, &client, &super_admin);

    let result = client.try_verify_milestone(
        &oracle,
        &project_id,
        &0,
        &true,
        &String::from_str(&env, "ipfs://evidence"),
        &vec![&env, String::from_str(&env, "news")],
        &90,
    );
    assert_eq!(result, Err(Ok(contract_error(Error::MilestonesNotSetup))));
}

#[test]
fn verify_validates_index_and_confidence() {
    let (env, client, super_admin) = setup();
    let (project_id, _, oracle, _) = active_project(&env, &client, &super_admin);
    let (descriptions, target_dates) = milestone_plan(&env, 2);
    client.setup_milestones(&oracle, &project_id, &descriptions, &target_dates);

    let bad_index = client.try_verify_milestone(
        &oracle,
        &project_id,
        &2,
        &true,
        &String::from_str(&env, "ipfs://evidence"),
        &vec![&env, String::from_str(&env, "news")],
        &90,
    );
    assert_eq!(bad_index, Err(Ok(contract_error(Error::InvalidMilestoneIndex))));

    let bad_confidence = client.try_verify_milestone(
        &oracle,
        &project_id,
        &0,
        &true,
        &String::from_str(&env, "ipfs://evidence"),
        &vec![&env, String::from_str(&env, "news")],
        &101,
    );
    assert_eq!(bad_confidence, Err(Ok(contract_error(Error::InvalidConfidence))));

    // Rejected attempts left no records behind.
    assert_eq!(client.get_verifications(&project_id).len(), 0);
}

#[test]
fn rejection_appends_record_without_completing() {
    let (env, client, super_admin) = setup();
    let (project_id, _, oracle, _) = active_project(&env, &client, &super_admin);
    let (descriptions, target_dates) = milestone_plan(&env, 2);
    client.setup_milestones(&oracle, &project_id, &descriptions, &target_dates);

    verify(&client, &env, &oracle, project_id, 0, false, 35);

    let records = client.get_verifications(&project_id);
    assert_eq!(records.len(), 1);
    let record = records.get_unchecked(0);
    assert_eq!(record.milestone_index, 0);
    assert!(!record.verified);
    assert_eq!(record.confidence, 35);

    let progress = client.get_project_progress(&project_id);
    assert_eq!(progress.completed, 0);
    assert_eq!(progress.total, 2);
    // A rejected milestone can be retried later.
    verify(&client, &env, &oracle, project_id, 0, true, 88);
    assert_eq!(client.get_project_progress(&project_id).completed, 1);
    assert_eq!(client.get_verifications(&project_id).len(), 2);
}

#[test]
fn completed_milestone_cannot_be_reverified() {
    let (env, client, super_admin) = setup();
    let (project_id, _, oracle, _) = active_project(&env, &client, &super_admin);
    let (descriptions, target_dates) = milestone_plan(&env, 2);
    client.setup_milestones(&oracle, &project_id, &descriptions, &target_dates);

    verify(&client, &env, &oracle, project_id, 0, true, 95);
    let result = client.try_verify_milestone(
        &oracle,
        &project_id,
        &0,
        &true,
        &String::from_str(&env, "ipfs://evidence"),
        &vec![&env, String::from_str(&env, "news")],
        &95,
    );
    assert_eq!(result, Err(Ok(contract_error(Error::MilestoneAlreadyCompleted))));

    // No double counting.
    let progress = client.get_project_progress(&project_id);
    assert_eq!(progress.completed, 1);
}

/// Scenario: 4 milestones; verifying 0,1,2 leaves progress 3/4 with the
/// project still `Active`; verifying 3 completes the project and resolves
/// the market to YES.
#[test]
fn completing_all_milestones_completes_project() {
    let (env, client, super_admin) = setup();
    let (project_id, market_id, oracle, _) = active_project(&env, &client, &super_admin);
    let (descriptions, target_dates) = milestone_plan(&env, 4);
    client.setup_milestones(&oracle, &project_id, &descriptions, &target_dates);

    let mut last_progress = 0;
    for index in 0..3u32 {
        verify(&client, &env, &oracle, project_id, index, true, 90);
        let progress = client.get_project_progress(&project_id);
        invariants::assert_progress_monotonic(last_progress, progress.completed, 4);
        last_progress = progress.completed;
    }
    assert_eq!(last_progress, 3);
    assert_eq!(client.get_project(&project_id).status, ProjectStatus::Active);
    assert!(!client.get_market(&market_id).resolved);

    verify(&client, &env, &oracle, project_id, 3, true, 97);

    let project = client.get_project(&project_id);
    assert_eq!(project.status, ProjectStatus::Completed);
    invariants::assert_valid_status_transition(&ProjectStatus::Active, &ProjectStatus::Completed);

    // Forced resolution ignores resolution_time (set to u64::MAX here).
    let market = client.get_market(&market_id);
    assert!(market.resolved);
    assert!(market.outcome);

    // Terminal: late failure is rejected.
    assert_eq!(
        client.try_mark_project_failed(&oracle, &project_id, &String::from_str(&env, "late")),
        Err(Ok(contract_error(Error::TerminalStatus)))
    );

    // Completed milestones carry their verification timestamps.
    let milestones = client.get_milestones(&project_id);
    assert!(milestones.iter().all(|m| m.completed));
}

// ── Failure path ─────────────────────────────────────────────────────

#[test]
fn mark_failed_resolves_market_to_no() {
    let (env, client, super_admin) = setup();
    let (project_id, market_id, oracle, token) = active_project(&env, &client, &super_admin);

    let pessimist = Address::generate(&env);
    token::StellarAssetClient::new(&env, &token.address).mint(&pessimist, &(100 * SCALE));
    client.buy(&market_id, &pessimist, &Side::No, &(20 * SCALE));

    client.mark_project_failed(&oracle, &project_id, &String::from_str(&env, "abandoned"));

    assert_eq!(client.get_project(&project_id).status, ProjectStatus::Failed);
    let market = client.get_market(&market_id);
    assert!(market.resolved);
    assert!(!market.outcome);

    // NO holders redeem 1:1.
    assert_eq!(client.claim_winnings(&market_id, &pessimist), 20 * SCALE);

    assert_eq!(
        client.try_mark_project_failed(&oracle, &project_id, &String::from_str(&env, "again")),
        Err(Ok(contract_error(Error::TerminalStatus)))
    );
}

#[test]
fn mark_failed_requires_oracle() {
    let (env, client, super_admin) = setup();
    let (project_id, _, _, _) = active_project(&env, &client, &super_admin);
    let outsider = Address::generate(&env);

    assert_eq!(
        client.try_mark_project_failed(&outsider, &project_id, &String::from_str(&env, "no")),
        Err(Ok(contract_error(Error::NotAuthorized)))
    );
}

#[test]
fn mark_failed_allowed_from_pending() {
    let (env, client, super_admin) = setup();
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);
    let sponsor = Address::generate(&env);
    client.grant_role(&super_admin, &sponsor, &Role::ProjectManager);
    let project = client.register_project(
        &sponsor,
        &String::from_str(&env, "x"),
        &String::from_str(&env, "y"),
        &token.address,
        &1_000,
        &1,
    );
    let oracle = Address::generate(&env);
    client.set_oracle(&super_admin, &oracle);

    client.mark_project_failed(&oracle, &project.id, &String::from_str(&env, "rejected"));
    assert_eq!(client.get_project(&project.id).status, ProjectStatus::Failed);
}

/// Terminal states are permanent: milestone verification keeps feeding the
/// audit log after a failure, but the project never becomes Completed and
/// the NO resolution stands.
#[test]
fn failure_is_permanent_despite_later_verifications() {
    let (env, client, super_admin) = setup();
    let (project_id, market_id, oracle, _) = active_project(&env, &client, &super_admin);
    let (descriptions, target_dates) = milestone_plan(&env, 2);
    client.setup_milestones(&oracle, &project_id, &descriptions, &target_dates);

    verify(&client, &env, &oracle, project_id, 0, true, 90);
    client.mark_project_failed(&oracle, &project_id, &String::from_str(&env, "stalled"));

    verify(&client, &env, &oracle, project_id, 1, true, 90);

    assert_eq!(client.get_project(&project_id).status, ProjectStatus::Failed);
    assert_eq!(client.get_project_progress(&project_id).completed, 2);
    let market = client.get_market(&market_id);
    assert!(market.resolved);
    assert!(!market.outcome);
    assert_eq!(client.get_verifications(&project_id).len(), 2);
}
