#![no_std]

mod error;
mod events;
mod storage;
mod weight;

pub use error::Error;
pub use storage::{LockedPosition, PositionStatus};

use events::{PositionLockedEvent, PositionReleasedEvent};
use storage::DataKey;
use weight::calculate_weight;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

/// Governance escrow. A single router (the bond engine) opens time-locked
/// positions on behalf of holders; each position carries a fixed voting weight.
#[contract]
pub struct VoteEscrow;

#[contractimpl]
impl VoteEscrow {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    pub fn initialize(env: Env, admin: Address, router: Address, max_lock: u64) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }
        if max_lock == 0 {
            return Err(Error::InvalidConfig);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Router, &router);
        env.storage().instance().set(&DataKey::MaxLock, &max_lock);
        env.storage().instance().set(&DataKey::PositionCounter, &0u64);
        env.storage().instance().set(&DataKey::TotalWeight, &0i128);

        Ok(())
    }

    /// Point the escrow at a new router.
    pub fn set_router(env: Env, router: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Router, &router);
        Ok(())
    }

    // ============================================
    // LOCKS
    // ============================================

    /// Open a locked position for `owner`. Returns the position id.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not the router
    /// - `InvalidAmount`: Amount <= 0
    /// - `InvalidDuration`: Duration is 0 or above max_lock
    pub fn create_locked_position(
        env: Env,
        router: Address,
        owner: Address,
        amount: i128,
        lock_duration: u64,
    ) -> Result<u64, Error> {
        let configured: Address = env
            .storage()
            .instance()
            .get(&DataKey::Router)
            .ok_or(Error::NotInitialized)?;
        if router != configured {
            return Err(Error::Unauthorized);
        }
        router.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let max_lock = Self::max_lock(env.clone());
        if lock_duration == 0 || lock_duration > max_lock {
            return Err(Error::InvalidDuration);
        }

        let weight = calculate_weight(amount, lock_duration, max_lock).ok_or(Error::InvalidAmount)?;

        let locked_at = env.ledger().timestamp();
        let unlock_at = locked_at
            .checked_add(lock_duration)
            .ok_or(Error::InvalidDuration)?;

        let position_id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::PositionCounter)
            .unwrap_or(0);
        let new_position_id = position_id + 1;

        let position = LockedPosition {
            id: new_position_id,
            owner: owner.clone(),
            amount,
            lock_duration,
            weight,
            locked_at,
            unlock_at,
            status: PositionStatus::Locked,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Position(new_position_id), &position);
        env.storage()
            .instance()
            .set(&DataKey::PositionCounter, &new_position_id);
        Self::adjust_weight(&env, &owner, weight)?;

        env.events().publish(
            (Symbol::new(&env, "position_locked"), new_position_id),
            PositionLockedEvent {
                position_id: new_position_id,
                owner,
                amount,
                lock_duration,
                weight,
            },
        );

        Ok(new_position_id)
    }

    /// Release an expired position. Its weight stops counting.
    ///
    /// # Errors
    /// - `PositionNotFound`: No such position
    /// - `NotPositionOwner`: Caller does not own it
    /// - `InvalidStatus`: Already released
    /// - `StillLocked`: Before unlock_at
    pub fn release(env: Env, owner: Address, position_id: u64) -> Result<(), Error> {
        owner.require_auth();

        let mut position = Self::get_position(env.clone(), position_id)?;
        if position.owner != owner {
            return Err(Error::NotPositionOwner);
        }
        if position.status != PositionStatus::Locked {
            return Err(Error::InvalidStatus);
        }
        if env.ledger().timestamp() < position.unlock_at {
            return Err(Error::StillLocked);
        }

        position.status = PositionStatus::Released;
        env.storage()
            .persistent()
            .set(&DataKey::Position(position_id), &position);
        Self::adjust_weight(&env, &owner, -position.weight)?;

        env.events().publish(
            (Symbol::new(&env, "position_released"), position_id),
            PositionReleasedEvent {
                position_id,
                owner,
                weight: position.weight,
            },
        );
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_position(env: Env, position_id: u64) -> Result<LockedPosition, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Position(position_id))
            .ok_or(Error::PositionNotFound)
    }

    /// Sum of the weights of `owner`'s locked positions.
    pub fn voting_weight(env: Env, owner: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::OwnerWeight(owner))
            .unwrap_or(0)
    }

    pub fn total_weight(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalWeight)
            .unwrap_or(0)
    }

    pub fn position_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::PositionCounter)
            .unwrap_or(0)
    }

    pub fn max_lock(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::MaxLock)
            .unwrap_or(0)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn adjust_weight(env: &Env, owner: &Address, delta: i128) -> Result<(), Error> {
        let owner_key = DataKey::OwnerWeight(owner.clone());
        let owner_weight = Self::voting_weight(env.clone(), owner.clone())
            .checked_add(delta)
            .ok_or(Error::InvalidAmount)?;
        if owner_weight == 0 {
            env.storage().persistent().remove(&owner_key);
        } else {
            env.storage().persistent().set(&owner_key, &owner_weight);
        }

        let total = Self::total_weight(env.clone())
            .checked_add(delta)
            .ok_or(Error::InvalidAmount)?;
        env.storage().instance().set(&DataKey::TotalWeight, &total);
        Ok(())
    }
}
