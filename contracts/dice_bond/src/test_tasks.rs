extern crate std;

use ed25519_dalek::{Signer, SigningKey};
use soroban_sdk::{testutils::Address as _, Address, BytesN};

use crate::storage::{DiceTier, LeaderboardCategory, MATURITY_PERIOD, REFERRAL_REWARD, SCALE};
use crate::test_helpers::TestSetup;
use crate::{DiceBond, DiceBondClient, Error, TaskProof};

#[test]
fn test_complete_task() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let proof = s.sign_task(bond_id, 1, None);
    let count = s.client.complete_task(&owner, &bond_id, &1, &proof);

    assert_eq!(count, 1);
    assert!(s.client.is_task_completed(&bond_id, &1));
    assert!(!s.client.is_task_completed(&bond_id, &2));
    assert_eq!(s.client.get_holder_stats(&owner).tasks_completed, 1);

    let board = s
        .client
        .get_leaderboard(&(LeaderboardCategory::TasksCompleted as u32), &10);
    assert_eq!(board.len(), 1);
    assert_eq!(board.get(0).unwrap().holder, owner);
    assert_eq!(board.get(0).unwrap().value, 1);
}

#[test]
fn test_task_replay_rejected() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let proof = s.sign_task(bond_id, 7, None);
    s.client.complete_task(&owner, &bond_id, &7, &proof);

    assert_eq!(
        s.client.try_complete_task(&owner, &bond_id, &7, &proof),
        Err(Ok(Error::AlreadyCompleted))
    );
    assert_eq!(s.client.get_bond(&bond_id).tasks_completed, 1);
}

#[test]
fn test_untrusted_signer_rejected() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let stranger = SigningKey::from_bytes(&[42u8; 32]);
    let proof = s.sign_task_with(&stranger, bond_id, 1, None);

    assert_eq!(
        s.client.try_complete_task(&owner, &bond_id, &1, &proof),
        Err(Ok(Error::InvalidProof))
    );
    assert!(!s.client.is_task_completed(&bond_id, &1));
}

#[test]
#[should_panic]
fn test_forged_signature_aborts() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let stranger = SigningKey::from_bytes(&[42u8; 32]);
    let mut proof = s.sign_task_with(&stranger, bond_id, 1, None);
    proof.signer = BytesN::from_array(&s.env, &s.signer.verifying_key().to_bytes());

    s.client.complete_task(&owner, &bond_id, &1, &proof);
}

#[test]
#[should_panic]
fn test_proof_bound_to_task_id() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let proof = s.sign_task(bond_id, 1, None);
    s.client.complete_task(&owner, &bond_id, &2, &proof);
}

#[test]
fn test_message_bound_to_deployment() {
    let s = TestSetup::new();
    let other = DiceBondClient::new(&s.env, &s.env.register(DiceBond, ()));

    assert_ne!(
        s.client.task_message(&1, &1, &None),
        other.task_message(&1, &1, &None)
    );
}

#[test]
#[should_panic]
fn test_proof_for_other_deployment_aborts() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let other = DiceBondClient::new(&s.env, &s.env.register(DiceBond, ()));
    let message = other.task_message(&bond_id, &1, &None);
    let bytes: std::vec::Vec<u8> = message.iter().collect();
    let proof = TaskProof {
        signer: BytesN::from_array(&s.env, &s.signer.verifying_key().to_bytes()),
        signature: BytesN::from_array(&s.env, &s.signer.sign(&bytes).to_bytes()),
        referrer: None,
    };

    s.client.complete_task(&owner, &bond_id, &1, &proof);
}

#[test]
fn test_tier_upgrades_at_thresholds() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    s.complete_tasks(&owner, bond_id, 1, 4);
    assert_eq!(s.client.get_bond(&bond_id).dice_tier, DiceTier::Tier1);

    s.complete_tasks(&owner, bond_id, 5, 1);
    assert_eq!(s.client.get_bond(&bond_id).dice_tier, DiceTier::Tier2);

    s.complete_tasks(&owner, bond_id, 6, 4);
    assert_eq!(s.client.get_bond(&bond_id).dice_tier, DiceTier::Tier2);

    s.complete_tasks(&owner, bond_id, 10, 1);
    let bond = s.client.get_bond(&bond_id);
    assert_eq!(bond.dice_tier, DiceTier::Tier3);
    assert_eq!(bond.tasks_completed, 10);
}

#[test]
fn test_task_requires_owner() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let other = Address::generate(&s.env);
    let bond_id = s.issue_bond(&owner);

    let proof = s.sign_task(bond_id, 1, None);
    assert_eq!(
        s.client.try_complete_task(&other, &bond_id, &1, &proof),
        Err(Ok(Error::NotOwner))
    );
    assert_eq!(
        s.client.try_complete_task(&owner, &42, &1, &proof),
        Err(Ok(Error::BondNotFound))
    );
}

#[test]
fn test_paused_blocks_tasks() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    s.client.pause();
    let proof = s.sign_task(bond_id, 1, None);
    assert_eq!(
        s.client.try_complete_task(&owner, &bond_id, &1, &proof),
        Err(Ok(Error::ContractPaused))
    );
}

#[test]
fn test_rotated_signer() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let next = SigningKey::from_bytes(&[11u8; 32]);
    s.client
        .set_task_signer(&BytesN::from_array(&s.env, &next.verifying_key().to_bytes()));

    let old_proof = s.sign_task(bond_id, 1, None);
    assert_eq!(
        s.client.try_complete_task(&owner, &bond_id, &1, &old_proof),
        Err(Ok(Error::InvalidProof))
    );

    let new_proof = s.sign_task_with(&next, bond_id, 1, None);
    assert_eq!(s.client.complete_task(&owner, &bond_id, &1, &new_proof), 1);
}

#[test]
fn test_referral_accrues_and_claims() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let referrer = Address::generate(&s.env);
    let bond_id = s.issue_bond(&owner);

    let proof = s.sign_task(bond_id, 1, Some(referrer.clone()));
    s.client.complete_task(&owner, &bond_id, &1, &proof);
    let proof = s.sign_task(bond_id, 2, Some(referrer.clone()));
    s.client.complete_task(&owner, &bond_id, &2, &proof);

    assert_eq!(s.client.referral_rewards(&referrer), 2 * REFERRAL_REWARD);
    // Referral rewards never touch the bond's own yield.
    assert_eq!(s.client.get_bond(&bond_id).bonus_yield, 0);

    let claimed = s.client.claim_referral_rewards(&referrer);
    assert_eq!(claimed, 10 * SCALE);
    assert_eq!(s.token.balance(&referrer), 10 * SCALE);
    assert_eq!(s.client.referral_rewards(&referrer), 0);

    assert_eq!(
        s.client.try_claim_referral_rewards(&referrer),
        Err(Ok(Error::NothingToClaim))
    );
}

#[test]
fn test_referral_claim_keeps_balance_when_reserve_short() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let referrer = Address::generate(&s.env);
    let bond_id = s.issue_bond(&owner);

    let proof = s.sign_task(bond_id, 1, Some(referrer.clone()));
    s.client.complete_task(&owner, &bond_id, &1, &proof);

    // Cash settlement drains the reserve down to zero.
    s.fund_treasury(5_000_000);
    s.advance_time(MATURITY_PERIOD);
    s.client.settle_cash(&owner, &bond_id);
    assert_eq!(s.treasury.reserve(), 0);

    assert_eq!(
        s.client.try_claim_referral_rewards(&referrer),
        Err(Ok(Error::InsufficientReserve))
    );
    assert_eq!(s.client.referral_rewards(&referrer), REFERRAL_REWARD);
}
