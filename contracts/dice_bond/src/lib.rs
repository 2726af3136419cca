#![no_std]

mod dice;
mod error;
mod events;
mod interfaces;
mod leaderboard;
mod ledger;
mod settlement;
mod storage;
mod tasks;
mod tiers;

pub use error::{Error, ErrorCategory};
pub use interfaces::TreasuryError;
pub use storage::{
    Bond, BondStatus, DiceTier, EngineConfig, HolderStats, LeaderboardCategory, LeaderboardEntry,
    RarityTier, RollRecord, RollResult, RollStatus, SettlementPath, SettlementPreview,
    SettlementRecord, TaskProof,
};

use events::{ReferralEvent, SignerRotatedEvent};
use interfaces::TreasuryClient;
use leaderboard::Leaderboard;
use storage::{DataKey, PRINCIPAL};
use tiers::rarity_for;

use soroban_sdk::{contract, contractimpl, token, Address, Bytes, BytesN, Env, Symbol, Vec};

#[contract]
pub struct DiceBond;

#[contractimpl]
impl DiceBond {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the engine
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidConfig`: max_supply is zero
    pub fn initialize(env: Env, admin: Address, config: EngineConfig) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }
        if config.max_supply == 0 {
            return Err(Error::InvalidConfig);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Paused, &false);
        env.storage().instance().set(&DataKey::BondCounter, &0u64);

        Ok(())
    }

    /// Pause contract (emergency). Randomness callbacks and views keep working.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &true);
        env.events().publish((Symbol::new(&env, "paused"),), admin);
        Ok(())
    }

    /// Unpause contract
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Self::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &false);
        env.events().publish((Symbol::new(&env, "unpaused"),), admin);
        Ok(())
    }

    /// Rotate the ed25519 key trusted to sign task proofs.
    /// Proofs signed by the old key stop verifying immediately.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn set_task_signer(env: Env, new_signer: BytesN<32>) -> Result<(), Error> {
        Self::require_admin(&env)?;

        let mut config = ledger::get_config(&env)?;
        let old_signer = config.task_signer.clone();
        config.task_signer = new_signer.clone();
        env.storage().instance().set(&DataKey::Config, &config);

        env.events().publish(
            (Symbol::new(&env, "signer_rotated"),),
            SignerRotatedEvent {
                old_signer,
                new_signer,
            },
        );
        Ok(())
    }

    // ============================================
    // BOND LEDGER
    // ============================================

    /// Buy one bond at the fixed principal.
    ///
    /// The principal moves from `owner` straight into the treasury.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `SupplyExhausted`: max_supply already reached
    pub fn issue(env: Env, owner: Address) -> Result<u64, Error> {
        let ids = Self::issue_batch(env, owner, 1)?;
        ids.first().ok_or(Error::Overflow)
    }

    /// Buy `quantity` bonds in one payment. All or nothing.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `ZeroQuantity`: quantity is zero
    /// - `SupplyExhausted`: Batch would exceed max_supply
    pub fn issue_batch(env: Env, owner: Address, quantity: u32) -> Result<Vec<u64>, Error> {
        Self::check_not_paused(&env)?;

        if quantity == 0 {
            return Err(Error::ZeroQuantity);
        }

        owner.require_auth();

        let config = ledger::get_config(&env)?;
        let remaining = config.max_supply.saturating_sub(ledger::issued_count(&env));
        if quantity as u64 > remaining {
            return Err(Error::SupplyExhausted);
        }

        let amount = PRINCIPAL
            .checked_mul(quantity as i128)
            .ok_or(Error::Overflow)?;

        let stablecoin = token::Client::new(&env, &config.stablecoin);
        stablecoin.transfer(&owner, &config.treasury, &amount);

        TreasuryClient::new(&env, &config.treasury)
            .receive_inflow(&env.current_contract_address(), &amount);

        let mut ids = Vec::new(&env);
        for _ in 0..quantity {
            let bond = ledger::issue(&env, &config, &owner)?;
            ids.push_back(bond.id);
        }
        Ok(ids)
    }

    /// Move a live bond to another holder. Yield and tier travel with it.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `BondNotFound`: No such bond
    /// - `NotOwner`: Caller does not hold the bond
    /// - `AlreadySettled`: Bond has been burned
    pub fn transfer(env: Env, owner: Address, bond_id: u64, new_owner: Address) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        owner.require_auth();
        ledger::transfer(&env, &owner, bond_id, &new_owner)
    }

    // ============================================
    // DICE ROLLS
    // ============================================

    /// Spend one of this week's rolls and request randomness.
    /// Returns the request id; the bonus lands when the oracle calls back.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `BondNotFound`, `NotOwner`, `AlreadySettled`
    /// - `NoRollsRemaining`: Weekly allowance used up
    /// - `RandomnessUnavailable`: Oracle refused the request (roll not consumed)
    pub fn roll_dice(env: Env, owner: Address, bond_id: u64) -> Result<u64, Error> {
        Self::check_not_paused(&env)?;
        owner.require_auth();

        let config = ledger::get_config(&env)?;
        dice::request_roll(&env, &config, &owner, bond_id)
    }

    /// Randomness callback. Only the configured oracle may call it.
    /// Not gated by pause, so delivered randomness always lands.
    ///
    /// # Errors
    /// - `UnauthorizedCallback`: Caller is not the configured oracle
    /// - `InvalidRequest`: Unknown or already fulfilled request
    pub fn on_random_delivered(
        env: Env,
        oracle: Address,
        request_id: u64,
        random: u64,
    ) -> Result<RollResult, Error> {
        let config = ledger::get_config(&env)?;
        dice::fulfill(&env, &config, &oracle, request_id, random)
    }

    // ============================================
    // TASKS & REFERRALS
    // ============================================

    /// Record an off-chain task attested by the task signer.
    /// Returns the bond's new task count.
    ///
    /// A signature that does not verify aborts the invocation.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `BondNotFound`, `NotOwner`, `AlreadySettled`
    /// - `AlreadyCompleted`: Task already recorded for this bond
    /// - `InvalidProof`: Proof names a signer other than the trusted key
    pub fn complete_task(
        env: Env,
        owner: Address,
        bond_id: u64,
        task_id: u32,
        proof: TaskProof,
    ) -> Result<u32, Error> {
        Self::check_not_paused(&env)?;
        owner.require_auth();

        let config = ledger::get_config(&env)?;
        tasks::complete(&env, &config, &owner, bond_id, task_id, &proof)
    }

    /// Pay out accrued referral rewards from the treasury.
    ///
    /// Rewards accrue per completed task and are pulled here rather than
    /// transferred at completion, so a task never fails on a short reserve.
    /// They are paid from the same reserve that backs bond principal.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `NothingToClaim`: No rewards accrued
    /// - `InsufficientReserve`: Treasury short; balance is kept
    pub fn claim_referral_rewards(env: Env, referrer: Address) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        referrer.require_auth();

        let amount = tasks::referral_rewards(&env, &referrer);
        if amount == 0 {
            return Err(Error::NothingToClaim);
        }

        let config = ledger::get_config(&env)?;
        settlement::pay_out(&env, &config, &referrer, amount)?;
        tasks::set_referral_rewards(&env, &referrer, 0);

        env.events().publish(
            (Symbol::new(&env, "referral_claimed"), referrer.clone()),
            ReferralEvent {
                referrer,
                amount,
                balance: 0,
            },
        );
        Ok(amount)
    }

    // ============================================
    // SETTLEMENT
    // ============================================

    /// Convert a matured bond into a locked governance position.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `BondNotFound`, `NotOwner`, `AlreadySettled`
    /// - `NotMatured`: Before matures_at
    /// - `LockDurationOutOfRange`: Outside [MIN_LOCK, MAX_LOCK]
    /// - `LockFailed`: Governance contract rejected the position
    pub fn settle_lock(
        env: Env,
        owner: Address,
        bond_id: u64,
        lock_duration: u64,
    ) -> Result<SettlementRecord, Error> {
        Self::check_not_paused(&env)?;
        owner.require_auth();

        let config = ledger::get_config(&env)?;
        settlement::settle_lock(&env, &config, &owner, bond_id, lock_duration)
    }

    /// Redeem a matured bond for principal plus all yield in stablecoin.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `BondNotFound`, `NotOwner`, `AlreadySettled`
    /// - `NotMatured`: Before matures_at
    /// - `InsufficientReserve`: Treasury cannot cover total value
    /// - `PayoutFailed`: Treasury failed for another reason
    pub fn settle_cash(env: Env, owner: Address, bond_id: u64) -> Result<SettlementRecord, Error> {
        Self::check_not_paused(&env)?;
        owner.require_auth();

        let config = ledger::get_config(&env)?;
        settlement::settle_cash(&env, &config, &owner, bond_id)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_config(env: Env) -> Result<EngineConfig, Error> {
        ledger::get_config(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false)
    }

    /// Get bond details
    pub fn get_bond(env: Env, bond_id: u64) -> Result<Bond, Error> {
        ledger::load(&env, bond_id)
    }

    /// Snapshot for display: yield, tier, rarity, allowance and time left.
    pub fn get_bond_status(env: Env, bond_id: u64) -> Result<BondStatus, Error> {
        let bond = ledger::load(&env, bond_id)?;
        let now = env.ledger().timestamp();

        Ok(BondStatus {
            bond_id,
            owner: bond.owner.clone(),
            principal: bond.principal,
            base_yield: bond.base_yield,
            bonus_yield: bond.bonus_yield,
            total_yield: ledger::total_yield(&bond)?,
            dice_tier: bond.dice_tier,
            rarity: rarity_for(bond.bonus_yield),
            tasks_completed: bond.tasks_completed,
            rolls_remaining: ledger::rolls_remaining(&env, &bond),
            pending_rolls: bond.pending_rolls,
            matures_at: bond.matures_at,
            seconds_to_maturity: bond.matures_at.saturating_sub(now),
            settled: bond.settled,
        })
    }

    pub fn owner_of(env: Env, bond_id: u64) -> Result<Address, Error> {
        let bond = ledger::load(&env, bond_id)?;
        if bond.settled {
            return Err(Error::AlreadySettled);
        }
        Ok(bond.owner)
    }

    /// Live bonds held by `owner`, in acquisition order.
    pub fn bonds_of(env: Env, owner: Address) -> Vec<u64> {
        ledger::bonds_of(&env, &owner)
    }

    /// Number of bonds ever issued, settled ones included.
    pub fn total_supply(env: Env) -> u64 {
        ledger::issued_count(&env)
    }

    pub fn get_total_yield(env: Env, bond_id: u64) -> Result<i128, Error> {
        ledger::total_yield(&ledger::load(&env, bond_id)?)
    }

    pub fn get_rarity(env: Env, bond_id: u64) -> Result<RarityTier, Error> {
        Ok(rarity_for(ledger::load(&env, bond_id)?.bonus_yield))
    }

    pub fn rolls_remaining(env: Env, bond_id: u64) -> Result<u32, Error> {
        let bond = ledger::load(&env, bond_id)?;
        Ok(ledger::rolls_remaining(&env, &bond))
    }

    /// # Errors
    /// - `InvalidRequest`: No roll with this request id
    pub fn get_roll(env: Env, request_id: u64) -> Result<RollRecord, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Roll(request_id))
            .ok_or(Error::InvalidRequest)
    }

    pub fn is_roll_pending(env: Env, request_id: u64) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::PendingRoll(request_id))
    }

    /// Bytes the task signer must sign for this completion.
    pub fn task_message(env: Env, bond_id: u64, task_id: u32, referrer: Option<Address>) -> Bytes {
        tasks::task_message(&env, bond_id, task_id, &referrer)
    }

    pub fn is_task_completed(env: Env, bond_id: u64, task_id: u32) -> bool {
        tasks::is_completed(&env, bond_id, task_id)
    }

    pub fn referral_rewards(env: Env, referrer: Address) -> i128 {
        tasks::referral_rewards(&env, &referrer)
    }

    /// Top `limit` holders of a category (0 yield, 1 highest roll, 2 tasks).
    ///
    /// # Errors
    /// - `InvalidCategory`: category above 2
    /// - `InvalidLimit`: limit is 0 or above 10
    pub fn get_leaderboard(
        env: Env,
        category: u32,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, Error> {
        Leaderboard::new(&env).query(category, limit)
    }

    pub fn get_holder_stats(env: Env, holder: Address) -> HolderStats {
        leaderboard::holder_stats(&env, &holder)
    }

    /// What each settlement path would pay out right now.
    pub fn preview_settlement(env: Env, bond_id: u64) -> Result<SettlementPreview, Error> {
        let config = ledger::get_config(&env)?;
        settlement::preview(&env, &config, bond_id)
    }

    pub fn get_settlement(env: Env, bond_id: u64) -> Option<SettlementRecord> {
        settlement::get_settlement(&env, bond_id)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_admin(env: &Env) -> Result<Address, Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(admin)
    }

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        let paused = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false);

        if paused {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_leaderboard;
#[cfg(test)]
mod test_settlement;
#[cfg(test)]
mod test_tasks;
