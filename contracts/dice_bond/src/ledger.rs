//! Bond ledger: issuance, ownership registry, yield accounting and burn.
//!
//! `apply_bonus_yield` is reached only from the dice engine and `burn` only
//! from the settlement router; neither is exported as a contract function.

use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::error::Error;
use crate::events::{BondIssuedEvent, BondTransferredEvent};
use crate::storage::{
    Bond, DataKey, DiceTier, EngineConfig, MATURITY_PERIOD, PRINCIPAL, WEEK, WEEKLY_ROLLS,
};
use crate::tiers::calculate_base_yield;

pub fn get_config(env: &Env) -> Result<EngineConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn current_week(env: &Env) -> u64 {
    env.ledger().timestamp() / WEEK
}

pub fn load(env: &Env, bond_id: u64) -> Result<Bond, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Bond(bond_id))
        .ok_or(Error::BondNotFound)
}

pub fn save(env: &Env, bond: &Bond) {
    env.storage()
        .persistent()
        .set(&DataKey::Bond(bond.id), bond);
}

/// Loads a live bond and checks `owner` holds it.
pub fn load_owned(env: &Env, owner: &Address, bond_id: u64) -> Result<Bond, Error> {
    let bond = load(env, bond_id)?;
    if bond.owner != *owner {
        return Err(Error::NotOwner);
    }
    if bond.settled {
        return Err(Error::AlreadySettled);
    }
    Ok(bond)
}

pub fn issued_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::BondCounter)
        .unwrap_or(0)
}

/// Bonds currently held by `owner`. Order is not stable across transfers.
pub fn bonds_of(env: &Env, owner: &Address) -> Vec<u64> {
    let storage = env.storage().persistent();
    let count = owner_bond_count(env, owner);
    let mut ids = Vec::new(env);
    for index in 0..count {
        if let Some(bond_id) = storage.get(&DataKey::OwnerBond(owner.clone(), index)) {
            ids.push_back(bond_id);
        }
    }
    ids
}

fn owner_bond_count(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerBondCount(owner.clone()))
        .unwrap_or(0)
}

// Holdings are one entry per (owner, slot) so no single entry grows with
// the number of bonds an address receives.
fn add_to_owner(env: &Env, owner: &Address, bond_id: u64) -> Result<(), Error> {
    let storage = env.storage().persistent();
    let slot = owner_bond_count(env, owner);
    storage.set(&DataKey::OwnerBond(owner.clone(), slot), &bond_id);
    storage.set(&DataKey::BondSlot(bond_id), &slot);
    let count = slot.checked_add(1).ok_or(Error::Overflow)?;
    storage.set(&DataKey::OwnerBondCount(owner.clone()), &count);
    Ok(())
}

/// Swap-removes the bond from its owner's slots.
fn remove_from_owner(env: &Env, owner: &Address, bond_id: u64) -> Result<(), Error> {
    let storage = env.storage().persistent();
    let slot: u32 = storage
        .get(&DataKey::BondSlot(bond_id))
        .ok_or(Error::BondNotFound)?;
    let last = owner_bond_count(env, owner)
        .checked_sub(1)
        .ok_or(Error::BondNotFound)?;

    if slot != last {
        let moved: u64 = storage
            .get(&DataKey::OwnerBond(owner.clone(), last))
            .ok_or(Error::BondNotFound)?;
        storage.set(&DataKey::OwnerBond(owner.clone(), slot), &moved);
        storage.set(&DataKey::BondSlot(moved), &slot);
    }
    storage.remove(&DataKey::OwnerBond(owner.clone(), last));
    storage.remove(&DataKey::BondSlot(bond_id));

    let key = DataKey::OwnerBondCount(owner.clone());
    if last == 0 {
        storage.remove(&key);
    } else {
        storage.set(&key, &last);
    }
    Ok(())
}

/// Creates one bond for `owner`. Principal, issue time, maturity and base
/// yield are fixed here and never written again.
pub fn issue(env: &Env, config: &EngineConfig, owner: &Address) -> Result<Bond, Error> {
    let issued = issued_count(env);
    if issued >= config.max_supply {
        return Err(Error::SupplyExhausted);
    }
    let bond_id = issued.checked_add(1).ok_or(Error::Overflow)?;

    let issued_at = env.ledger().timestamp();
    let matures_at = issued_at
        .checked_add(MATURITY_PERIOD)
        .ok_or(Error::Overflow)?;
    let base_yield = calculate_base_yield(PRINCIPAL).ok_or(Error::Overflow)?;

    let bond = Bond {
        id: bond_id,
        owner: owner.clone(),
        principal: PRINCIPAL,
        issued_at,
        matures_at,
        base_yield,
        bonus_yield: 0,
        dice_tier: DiceTier::Tier1,
        tasks_completed: 0,
        rolls_remaining: WEEKLY_ROLLS,
        roll_week: current_week(env),
        best_roll: 0,
        pending_rolls: 0,
        settled: false,
    };

    save(env, &bond);
    add_to_owner(env, owner, bond_id)?;
    env.storage()
        .instance()
        .set(&DataKey::BondCounter, &bond_id);

    env.events().publish(
        (Symbol::new(env, "bond_issued"), bond_id),
        BondIssuedEvent {
            bond_id,
            owner: owner.clone(),
            principal: bond.principal,
            base_yield,
            matures_at,
        },
    );

    Ok(bond)
}

pub fn transfer(env: &Env, owner: &Address, bond_id: u64, new_owner: &Address) -> Result<(), Error> {
    let mut bond = load_owned(env, owner, bond_id)?;
    if *owner == *new_owner {
        return Ok(());
    }

    bond.owner = new_owner.clone();
    save(env, &bond);
    remove_from_owner(env, owner, bond_id)?;
    add_to_owner(env, new_owner, bond_id)?;

    env.events().publish(
        (Symbol::new(env, "bond_transferred"), bond_id),
        BondTransferredEvent {
            bond_id,
            from: owner.clone(),
            to: new_owner.clone(),
        },
    );
    Ok(())
}

pub fn total_yield(bond: &Bond) -> Result<i128, Error> {
    bond.base_yield
        .checked_add(bond.bonus_yield)
        .ok_or(Error::Overflow)
}

/// principal + base_yield + bonus_yield. The only place redemption value is computed.
pub fn total_value(bond: &Bond) -> Result<i128, Error> {
    bond.principal
        .checked_add(total_yield(bond)?)
        .ok_or(Error::Overflow)
}

/// Adds a non-negative bonus to the bond. Caller persists the bond.
pub(crate) fn apply_bonus_yield(bond: &mut Bond, delta: i128) -> Result<(), Error> {
    if delta < 0 {
        return Err(Error::Overflow);
    }
    bond.bonus_yield = bond
        .bonus_yield
        .checked_add(delta)
        .ok_or(Error::Overflow)?;
    Ok(())
}

/// Marks the bond settled and removes it from its owner's holdings.
pub(crate) fn burn(env: &Env, bond_id: u64) -> Result<Bond, Error> {
    let mut bond = load(env, bond_id)?;
    if bond.settled {
        return Err(Error::AlreadySettled);
    }
    bond.settled = true;
    save(env, &bond);
    remove_from_owner(env, &bond.owner, bond_id)?;
    Ok(bond)
}

/// Effective allowance for the current week.
pub fn rolls_remaining(env: &Env, bond: &Bond) -> u32 {
    if bond.roll_week != current_week(env) {
        WEEKLY_ROLLS
    } else {
        bond.rolls_remaining
    }
}
