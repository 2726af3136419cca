use soroban_sdk::{testutils::Address as _, Address};

use randomness_oracle::RequestStatus;

use crate::storage::{MATURITY_PERIOD, MAX_LOCK, MIN_LOCK, PRINCIPAL, SCALE};
use crate::test_helpers::{TestSetup, HOLDER_FUNDS};
use crate::{Error, RollStatus, SettlementPath};

/// Bond with bonus 6.25 from rolls of 6, 3 and 6, ready to settle.
fn matured_bond(s: &TestSetup) -> (Address, u64) {
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);
    s.roll(&owner, bond_id, 5);
    s.roll(&owner, bond_id, 2);
    s.roll(&owner, bond_id, 5);
    s.advance_time(MATURITY_PERIOD);
    (owner, bond_id)
}

#[test]
fn test_cash_settlement_pays_total_value() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);
    s.fund_treasury(67_500_000);

    let record = s.client.settle_cash(&owner, &bond_id);

    assert_eq!(record.path, SettlementPath::Cash);
    assert_eq!(record.total_value, 1_067_500_000); // 106.75
    assert_eq!(record.position_id, None);
    assert_eq!(s.token.balance(&owner), HOLDER_FUNDS - PRINCIPAL + 1_067_500_000);
    assert_eq!(s.treasury.reserve(), 0);

    let bond = s.client.get_bond(&bond_id);
    assert!(bond.settled);
    assert_eq!(s.client.bonds_of(&owner).len(), 0);
    assert_eq!(s.client.get_settlement(&bond_id), Some(record));
}

#[test]
fn test_lock_settlement_at_max_duration() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);

    let record = s.client.settle_lock(&owner, &bond_id, &MAX_LOCK);

    assert_eq!(record.path, SettlementPath::Lock);
    assert_eq!(record.lock_duration, MAX_LOCK);
    let position_id = record.position_id.unwrap();

    let position = s.escrow.get_position(&position_id);
    assert_eq!(position.owner, owner);
    assert_eq!(position.amount, 10_675_000_000); // 1067.5 governance units
    assert_eq!(position.weight, position.amount);
    assert_eq!(s.escrow.voting_weight(&owner), 10_675_000_000);

    // No cash leaves the treasury on the lock path.
    assert_eq!(s.treasury.reserve(), PRINCIPAL);
}

#[test]
fn test_lock_weight_scales_with_duration() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);

    let record = s.client.settle_lock(&owner, &bond_id, &MIN_LOCK);
    let position = s.escrow.get_position(&record.position_id.unwrap());
    assert_eq!(
        position.weight,
        10_675_000_000 * MIN_LOCK as i128 / MAX_LOCK as i128
    );
}

#[test]
fn test_lock_duration_bounds() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);

    assert_eq!(
        s.client.try_settle_lock(&owner, &bond_id, &(MIN_LOCK - 1)),
        Err(Ok(Error::LockDurationOutOfRange))
    );
    assert_eq!(
        s.client.try_settle_lock(&owner, &bond_id, &(MAX_LOCK + 1)),
        Err(Ok(Error::LockDurationOutOfRange))
    );
    assert!(!s.client.get_bond(&bond_id).settled);
}

#[test]
fn test_not_matured() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);
    s.fund_treasury(SCALE);

    s.advance_time(MATURITY_PERIOD - 1);
    assert_eq!(
        s.client.try_settle_cash(&owner, &bond_id),
        Err(Ok(Error::NotMatured))
    );
    assert_eq!(
        s.client.try_settle_lock(&owner, &bond_id, &MIN_LOCK),
        Err(Ok(Error::NotMatured))
    );

    s.advance_time(1);
    s.client.settle_cash(&owner, &bond_id);
}

#[test]
fn test_settles_exactly_once() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);

    s.client.settle_lock(&owner, &bond_id, &MAX_LOCK);

    assert_eq!(
        s.client.try_settle_lock(&owner, &bond_id, &MAX_LOCK),
        Err(Ok(Error::AlreadySettled))
    );
    assert_eq!(
        s.client.try_settle_cash(&owner, &bond_id),
        Err(Ok(Error::AlreadySettled))
    );
    assert_eq!(s.escrow.position_count(), 1);
}

#[test]
fn test_only_owner_settles() {
    let s = TestSetup::new();
    let (_owner, bond_id) = matured_bond(&s);
    let other = Address::generate(&s.env);

    assert_eq!(
        s.client.try_settle_cash(&other, &bond_id),
        Err(Ok(Error::NotOwner))
    );
}

#[test]
fn test_short_reserve_leaves_bond_settleable() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);

    assert_eq!(
        s.client.try_settle_cash(&owner, &bond_id),
        Err(Ok(Error::InsufficientReserve))
    );
    assert!(!s.client.get_bond(&bond_id).settled);
    assert_eq!(s.client.get_settlement(&bond_id), None);
    assert_eq!(s.treasury.reserve(), PRINCIPAL);

    // The other path still works.
    s.client.settle_lock(&owner, &bond_id, &MAX_LOCK);
}

#[test]
fn test_governance_failure_maps_to_lock_failed() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);

    s.escrow.set_router(&Address::generate(&s.env));
    assert_eq!(
        s.client.try_settle_lock(&owner, &bond_id, &MAX_LOCK),
        Err(Ok(Error::LockFailed))
    );
    assert!(!s.client.get_bond(&bond_id).settled);
}

#[test]
fn test_settled_bond_is_inert() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);
    s.advance_time(7 * 86_400);
    s.client.settle_lock(&owner, &bond_id, &MAX_LOCK);

    assert_eq!(
        s.client.try_roll_dice(&owner, &bond_id),
        Err(Ok(Error::AlreadySettled))
    );
    assert_eq!(
        s.client
            .try_transfer(&owner, &bond_id, &Address::generate(&s.env)),
        Err(Ok(Error::AlreadySettled))
    );
    let proof = s.sign_task(bond_id, 1, None);
    assert_eq!(
        s.client.try_complete_task(&owner, &bond_id, &1, &proof),
        Err(Ok(Error::AlreadySettled))
    );
}

#[test]
fn test_late_randomness_is_voided() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);
    let request_id = s.client.roll_dice(&owner, &bond_id);

    s.advance_time(MATURITY_PERIOD);
    s.fund_treasury(SCALE);
    let record = s.client.settle_cash(&owner, &bond_id);
    assert_eq!(record.total_value, PRINCIPAL + 5_000_000);

    assert_eq!(s.deliver(request_id, 5), RequestStatus::Delivered);

    let roll = s.client.get_roll(&request_id);
    assert_eq!(roll.status, RollStatus::Voided);
    assert_eq!(roll.bonus_delta, 0);

    let bond = s.client.get_bond(&bond_id);
    assert_eq!(bond.bonus_yield, 0);
    assert_eq!(bond.pending_rolls, 0);
    assert_eq!(s.client.get_holder_stats(&owner).total_bonus_yield, 0);
}

#[test]
fn test_paused_blocks_settlement() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);

    s.client.pause();
    assert_eq!(
        s.client.try_settle_lock(&owner, &bond_id, &MAX_LOCK),
        Err(Ok(Error::ContractPaused))
    );
    assert_eq!(
        s.client.try_settle_cash(&owner, &bond_id),
        Err(Ok(Error::ContractPaused))
    );
}

#[test]
fn test_preview_settlement() {
    let s = TestSetup::new();
    let owner = s.new_holder();
    let bond_id = s.issue_bond(&owner);

    let preview = s.client.preview_settlement(&bond_id);
    assert!(!preview.matured);
    assert_eq!(preview.total_value, 1_005_000_000);
    assert_eq!(preview.cash_payout, preview.total_value);
    assert_eq!(preview.treasury_reserve, PRINCIPAL);
    assert!(!preview.cash_available);
    assert_eq!(preview.governance_amount, 10_050_000_000);
    assert_eq!(preview.max_lock_weight, preview.governance_amount);
    assert_eq!(
        preview.min_lock_weight,
        10_050_000_000 * MIN_LOCK as i128 / MAX_LOCK as i128
    );

    s.fund_treasury(5_000_000);
    s.advance_time(MATURITY_PERIOD);
    let preview = s.client.preview_settlement(&bond_id);
    assert!(preview.matured);
    assert!(preview.cash_available);

    s.client.settle_cash(&owner, &bond_id);
    assert_eq!(
        s.client.try_preview_settlement(&bond_id),
        Err(Ok(Error::AlreadySettled))
    );
}

#[test]
fn test_owner_of_fails_after_burn() {
    let s = TestSetup::new();
    let (owner, bond_id) = matured_bond(&s);
    s.fund_treasury(67_500_000);
    assert_eq!(s.client.owner_of(&bond_id), owner);

    s.client.settle_cash(&owner, &bond_id);
    assert_eq!(
        s.client.try_owner_of(&bond_id),
        Err(Ok(Error::AlreadySettled))
    );

    let (owner, bond_id) = matured_bond(&s);
    s.client.settle_lock(&owner, &bond_id, &MAX_LOCK);
    assert_eq!(
        s.client.try_owner_of(&bond_id),
        Err(Ok(Error::AlreadySettled))
    );
    assert_eq!(s.client.bonds_of(&owner).len(), 0);
}
