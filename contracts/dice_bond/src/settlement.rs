//! Settlement router: redeems a matured bond exactly once, either by locking
//! its value into a governance position or by paying it out in cash.
//!
//! The external call happens before the burn. If it fails the error
//! propagates, the invocation reverts, and the bond stays settleable.

use soroban_sdk::{Address, Env, Symbol};

use crate::error::Error;
use crate::events::BondSettledEvent;
use crate::interfaces::{GovernanceClient, TreasuryClient, TreasuryError};
use crate::ledger;
use crate::storage::{
    Bond, DataKey, EngineConfig, SettlementPath, SettlementPreview, SettlementRecord,
    GOVERNANCE_RATE, MAX_LOCK, MIN_LOCK, SCALE,
};

/// Converts settled value into governance units.
///
/// Example: 106.75 × 10 = 1067.5
pub fn governance_amount(total_value: i128) -> Option<i128> {
    total_value.checked_mul(GOVERNANCE_RATE)?.checked_div(SCALE)
}

/// Voting weight of a lock: amount × duration / MAX_LOCK.
pub fn lock_weight(amount: i128, lock_duration: u64) -> Option<i128> {
    amount
        .checked_mul(lock_duration as i128)?
        .checked_div(MAX_LOCK as i128)
}

pub fn get_settlement(env: &Env, bond_id: u64) -> Option<SettlementRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Settlement(bond_id))
}

fn load_settleable(env: &Env, owner: &Address, bond_id: u64) -> Result<Bond, Error> {
    let bond = ledger::load_owned(env, owner, bond_id)?;
    if env.ledger().timestamp() < bond.matures_at {
        return Err(Error::NotMatured);
    }
    Ok(bond)
}

pub fn settle_lock(
    env: &Env,
    config: &EngineConfig,
    owner: &Address,
    bond_id: u64,
    lock_duration: u64,
) -> Result<SettlementRecord, Error> {
    let bond = load_settleable(env, owner, bond_id)?;
    if !(MIN_LOCK..=MAX_LOCK).contains(&lock_duration) {
        return Err(Error::LockDurationOutOfRange);
    }

    let total_value = ledger::total_value(&bond)?;
    let amount = governance_amount(total_value).ok_or(Error::Overflow)?;

    let governance = GovernanceClient::new(env, &config.vote_escrow);
    let position_id = match governance.try_create_locked_position(
        &env.current_contract_address(),
        &bond.owner,
        &amount,
        &lock_duration,
    ) {
        Ok(Ok(id)) => id,
        _ => return Err(Error::LockFailed),
    };

    finalize(
        env,
        bond_id,
        SettlementPath::Lock,
        total_value,
        lock_duration,
        Some(position_id),
    )
}

pub fn settle_cash(
    env: &Env,
    config: &EngineConfig,
    owner: &Address,
    bond_id: u64,
) -> Result<SettlementRecord, Error> {
    let bond = load_settleable(env, owner, bond_id)?;
    let total_value = ledger::total_value(&bond)?;

    pay_out(env, config, &bond.owner, total_value)?;

    finalize(env, bond_id, SettlementPath::Cash, total_value, 0, None)
}

/// Asks the treasury to pay `amount` to `recipient`.
pub fn pay_out(
    env: &Env,
    config: &EngineConfig,
    recipient: &Address,
    amount: i128,
) -> Result<(), Error> {
    let treasury = TreasuryClient::new(env, &config.treasury);
    match treasury.try_pay_out(&env.current_contract_address(), recipient, &amount) {
        Ok(Ok(())) => Ok(()),
        Err(Ok(TreasuryError::InsufficientReserve)) => Err(Error::InsufficientReserve),
        _ => Err(Error::PayoutFailed),
    }
}

fn finalize(
    env: &Env,
    bond_id: u64,
    path: SettlementPath,
    total_value: i128,
    lock_duration: u64,
    position_id: Option<u64>,
) -> Result<SettlementRecord, Error> {
    let bond = ledger::burn(env, bond_id)?;

    let record = SettlementRecord {
        bond_id,
        owner: bond.owner.clone(),
        path: path.clone(),
        total_value,
        lock_duration,
        position_id,
        settled_at: env.ledger().timestamp(),
    };
    env.storage()
        .persistent()
        .set(&DataKey::Settlement(bond_id), &record);

    env.events().publish(
        (Symbol::new(env, "bond_settled"), bond_id),
        BondSettledEvent {
            bond_id,
            owner: bond.owner,
            path,
            total_value,
            position_id,
        },
    );

    Ok(record)
}

pub fn preview(env: &Env, config: &EngineConfig, bond_id: u64) -> Result<SettlementPreview, Error> {
    let bond = ledger::load(env, bond_id)?;
    if bond.settled {
        return Err(Error::AlreadySettled);
    }

    let total_value = ledger::total_value(&bond)?;
    let amount = governance_amount(total_value).ok_or(Error::Overflow)?;
    let treasury_reserve = TreasuryClient::new(env, &config.treasury).reserve();

    Ok(SettlementPreview {
        bond_id,
        matured: env.ledger().timestamp() >= bond.matures_at,
        total_value,
        cash_payout: total_value,
        treasury_reserve,
        cash_available: treasury_reserve >= total_value,
        governance_amount: amount,
        min_lock_weight: lock_weight(amount, MIN_LOCK).ok_or(Error::Overflow)?,
        max_lock_weight: lock_weight(amount, MAX_LOCK).ok_or(Error::Overflow)?,
    })
}
