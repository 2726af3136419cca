//! Task verification gateway.
//!
//! Proofs are ed25519 signatures by the configured task signer over
//! `TASK_DOMAIN || contract XDR || bond_id || task_id || referral flag [|| referrer XDR]`.
//! Each (bond_id, task_id) pair is accepted once.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, Env, Symbol};

use crate::error::Error;
use crate::events::{ReferralEvent, TaskCompletedEvent, TierUpgradedEvent};
use crate::leaderboard::{self, Leaderboard};
use crate::ledger;
use crate::storage::{
    DataKey, DiceTier, EngineConfig, LeaderboardCategory, TaskProof, REFERRAL_REWARD,
    TASK_DOMAIN,
};

pub fn task_message(env: &Env, bond_id: u64, task_id: u32, referrer: &Option<Address>) -> Bytes {
    let mut message = Bytes::from_array(env, TASK_DOMAIN);
    message.append(&env.current_contract_address().to_xdr(env));
    message.extend_from_array(&bond_id.to_be_bytes());
    message.extend_from_array(&task_id.to_be_bytes());
    match referrer {
        Some(referrer) => {
            message.push_back(1);
            message.append(&referrer.clone().to_xdr(env));
        }
        None => message.push_back(0),
    }
    message
}

pub fn is_completed(env: &Env, bond_id: u64, task_id: u32) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::TaskDone(bond_id, task_id))
}

pub fn referral_rewards(env: &Env, referrer: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::ReferralRewards(referrer.clone()))
        .unwrap_or(0)
}

pub fn set_referral_rewards(env: &Env, referrer: &Address, amount: i128) {
    let key = DataKey::ReferralRewards(referrer.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
    }
}

/// Verifies the proof and records the completion. Returns the bond's new task count.
pub fn complete(
    env: &Env,
    config: &EngineConfig,
    owner: &Address,
    bond_id: u64,
    task_id: u32,
    proof: &TaskProof,
) -> Result<u32, Error> {
    let mut bond = ledger::load_owned(env, owner, bond_id)?;

    if is_completed(env, bond_id, task_id) {
        return Err(Error::AlreadyCompleted);
    }
    if proof.signer != config.task_signer {
        return Err(Error::InvalidProof);
    }
    let message = task_message(env, bond_id, task_id, &proof.referrer);
    // Traps on a bad signature, which aborts the whole invocation.
    env.crypto()
        .ed25519_verify(&config.task_signer, &message, &proof.signature);

    let now = env.ledger().timestamp();
    env.storage()
        .persistent()
        .set(&DataKey::TaskDone(bond_id, task_id), &now);

    bond.tasks_completed = bond
        .tasks_completed
        .checked_add(1)
        .ok_or(Error::Overflow)?;
    let old_tier = bond.dice_tier;
    let earned = DiceTier::for_tasks(bond.tasks_completed);
    if earned > old_tier {
        bond.dice_tier = earned;
        env.events().publish(
            (Symbol::new(env, "tier_upgraded"), bond_id),
            TierUpgradedEvent {
                bond_id,
                old_tier,
                new_tier: earned,
            },
        );
    }
    ledger::save(env, &bond);

    let mut stats = leaderboard::holder_stats(env, owner);
    stats.tasks_completed = stats
        .tasks_completed
        .checked_add(1)
        .ok_or(Error::Overflow)?;
    leaderboard::save_holder_stats(env, owner, &stats);
    Leaderboard::new(env).update(
        LeaderboardCategory::TasksCompleted,
        owner,
        stats.tasks_completed as i128,
    );

    if let Some(referrer) = &proof.referrer {
        let balance = referral_rewards(env, referrer)
            .checked_add(REFERRAL_REWARD)
            .ok_or(Error::Overflow)?;
        set_referral_rewards(env, referrer, balance);
        env.events().publish(
            (Symbol::new(env, "referral_accrued"), referrer.clone()),
            ReferralEvent {
                referrer: referrer.clone(),
                amount: REFERRAL_REWARD,
                balance,
            },
        );
    }

    env.events().publish(
        (Symbol::new(env, "task_completed"), bond_id),
        TaskCompletedEvent {
            bond_id,
            task_id,
            tasks_completed: bond.tasks_completed,
        },
    );

    Ok(bond.tasks_completed)
}
