//! Dice roll engine.
//!
//! A roll is two invocations joined by a correlation record:
//! `request_roll` consumes one weekly roll and asks the oracle for
//! randomness; the oracle later calls back into `fulfill`, which resolves the
//! record and credits the bonus. Nothing blocks between the two. A request
//! the oracle never answers leaves its roll spent, and cannot be cancelled.

use soroban_sdk::{Address, Env, Symbol};

use crate::error::Error;
use crate::events::{RollFulfilledEvent, RollPendingEvent};
use crate::interfaces::RandomnessClient;
use crate::leaderboard::{self, Leaderboard};
use crate::ledger;
use crate::storage::{
    DataKey, EngineConfig, LeaderboardCategory, RollRecord, RollResult, RollStatus, WEEKLY_ROLLS,
};
use crate::tiers::{calculate_bonus_delta, dice_result};

/// Consumes a roll and dispatches a randomness request. Returns the request id.
pub fn request_roll(
    env: &Env,
    config: &EngineConfig,
    owner: &Address,
    bond_id: u64,
) -> Result<u64, Error> {
    let mut bond = ledger::load_owned(env, owner, bond_id)?;

    let week = ledger::current_week(env);
    if bond.roll_week != week {
        bond.roll_week = week;
        bond.rolls_remaining = WEEKLY_ROLLS;
    }
    if bond.rolls_remaining == 0 {
        return Err(Error::NoRollsRemaining);
    }
    // Spent at request time so outstanding requests count against the allowance.
    bond.rolls_remaining -= 1;

    // A failed dispatch returns before anything is written, and the error
    // reverts the invocation, so the roll is not consumed.
    let oracle = RandomnessClient::new(env, &config.randomness_oracle);
    let request_id = match oracle.try_request_randomness(&env.current_contract_address()) {
        Ok(Ok(id)) => id,
        _ => return Err(Error::RandomnessUnavailable),
    };
    let pending_key = DataKey::PendingRoll(request_id);
    if env.storage().persistent().has(&pending_key)
        || env.storage().persistent().has(&DataKey::Roll(request_id))
    {
        return Err(Error::InvalidRequest);
    }

    bond.pending_rolls = bond.pending_rolls.checked_add(1).ok_or(Error::Overflow)?;
    ledger::save(env, &bond);

    env.storage().persistent().set(&pending_key, &bond_id);
    env.storage().persistent().set(
        &DataKey::Roll(request_id),
        &RollRecord {
            request_id,
            bond_id,
            status: RollStatus::Pending,
            dice_result: 0,
            bonus_delta: 0,
            requested_at: env.ledger().timestamp(),
            fulfilled_at: 0,
        },
    );

    env.events().publish(
        (Symbol::new(env, "roll_pending"), bond_id),
        RollPendingEvent {
            bond_id,
            request_id,
            rolls_remaining: bond.rolls_remaining,
        },
    );

    Ok(request_id)
}

/// Resolves a pending request with the delivered random word.
pub fn fulfill(
    env: &Env,
    config: &EngineConfig,
    oracle: &Address,
    request_id: u64,
    random: u64,
) -> Result<RollResult, Error> {
    if *oracle != config.randomness_oracle {
        return Err(Error::UnauthorizedCallback);
    }
    oracle.require_auth();

    let pending_key = DataKey::PendingRoll(request_id);
    let bond_id: u64 = env
        .storage()
        .persistent()
        .get(&pending_key)
        .ok_or(Error::InvalidRequest)?;
    let mut record: RollRecord = env
        .storage()
        .persistent()
        .get(&DataKey::Roll(request_id))
        .ok_or(Error::InvalidRequest)?;
    let mut bond = ledger::load(env, bond_id)?;

    let tier = bond.dice_tier;
    let result = dice_result(tier, random);
    bond.pending_rolls = bond.pending_rolls.saturating_sub(1);

    // A bond settled while its request was in flight is inert: the request
    // is consumed but credits nothing.
    let (bonus_delta, status) = if bond.settled {
        (0, RollStatus::Voided)
    } else {
        let delta = calculate_bonus_delta(bond.principal, tier, result).ok_or(Error::Overflow)?;
        ledger::apply_bonus_yield(&mut bond, delta)?;
        (delta, RollStatus::Fulfilled)
    };

    let new_best = !bond.settled && result > bond.best_roll;
    if new_best {
        bond.best_roll = result;
    }
    ledger::save(env, &bond);

    if status == RollStatus::Fulfilled {
        let mut stats = leaderboard::holder_stats(env, &bond.owner);
        stats.total_bonus_yield = stats
            .total_bonus_yield
            .checked_add(bonus_delta)
            .ok_or(Error::Overflow)?;

        let board = Leaderboard::new(env);
        board.update(
            LeaderboardCategory::CumulativeYield,
            &bond.owner,
            stats.total_bonus_yield,
        );
        if new_best && result > stats.best_roll {
            stats.best_roll = result;
            board.update(LeaderboardCategory::HighestRoll, &bond.owner, result as i128);
        }
        leaderboard::save_holder_stats(env, &bond.owner, &stats);
    }

    env.storage().persistent().remove(&pending_key);
    record.status = status;
    record.dice_result = result;
    record.bonus_delta = bonus_delta;
    record.fulfilled_at = env.ledger().timestamp();
    env.storage()
        .persistent()
        .set(&DataKey::Roll(request_id), &record);

    env.events().publish(
        (Symbol::new(env, "roll_fulfilled"), bond_id),
        RollFulfilledEvent {
            bond_id,
            request_id,
            dice_result: result,
            bonus_delta,
            bonus_yield: bond.bonus_yield,
        },
    );

    Ok(RollResult {
        request_id,
        bond_id,
        dice_tier: tier,
        dice_result: result,
        bonus_delta,
        bonus_yield: bond.bonus_yield,
    })
}
