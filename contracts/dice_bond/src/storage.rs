use soroban_sdk::{contracttype, Address, BytesN};

// Constants
pub const SCALE: i128 = 10_000_000; // 7 decimals
pub const BASIS_POINTS: i128 = 10_000;

pub const ONE_DAY: u64 = 86_400;
pub const WEEK: u64 = 7 * ONE_DAY;
/// Money-market year (ACT/360).
pub const YEAR: u64 = 360 * ONE_DAY;

/// Every bond is issued at the same face value (100.0000000).
pub const PRINCIPAL: i128 = 100 * SCALE;
pub const MATURITY_PERIOD: u64 = 90 * ONE_DAY;
pub const BASE_APY_BPS: i128 = 200;

pub const WEEKLY_ROLLS: u32 = 3;

pub const TIER2_TASKS: u32 = 5;
pub const TIER3_TASKS: u32 = 10;
pub const REFERRAL_REWARD: i128 = 5 * SCALE;

pub const MIN_LOCK: u64 = 90 * ONE_DAY;
pub const MAX_LOCK: u64 = 1460 * ONE_DAY;
/// Governance units minted per unit of settled value, scaled.
pub const GOVERNANCE_RATE: i128 = 10 * SCALE;

pub const LEADERBOARD_CAPACITY: u32 = 10;

/// Domain separator prepended to every task proof message.
pub const TASK_DOMAIN: &[u8; 13] = b"DICEBOND-TASK";

/// Dice tier of a bond. Only ever moves forward.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum DiceTier {
    Tier1 = 1,
    Tier2 = 2,
    Tier3 = 3,
}

/// Display classification derived from accumulated bonus yield.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum RarityTier {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Stellar asset used for principal and cash payouts
    pub stablecoin: Address,
    /// Custody contract holding the reserve
    pub treasury: Address,
    /// Only address allowed to deliver randomness
    pub randomness_oracle: Address,
    /// Governance contract receiving lock conversions
    pub vote_escrow: Address,
    /// ed25519 key that signs task proofs
    pub task_signer: BytesN<32>,
    /// Hard cap on bonds ever issued
    pub max_supply: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bond {
    pub id: u64,
    pub owner: Address,
    pub principal: i128,
    pub issued_at: u64,
    pub matures_at: u64,
    pub base_yield: i128,
    /// Non-decreasing; only fulfilled rolls add to it
    pub bonus_yield: i128,
    pub dice_tier: DiceTier,
    pub tasks_completed: u32,
    /// Allowance left in `roll_week`
    pub rolls_remaining: u32,
    /// Week number (timestamp / WEEK) the allowance belongs to
    pub roll_week: u64,
    pub best_roll: u32,
    /// Requests dispatched and not yet fulfilled
    pub pending_rolls: u32,
    pub settled: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RollStatus {
    Pending = 0,
    Fulfilled = 1,
    /// Delivered after the bond was settled; nothing credited
    Voided = 2,
}

/// Read model for one randomness request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RollRecord {
    pub request_id: u64,
    pub bond_id: u64,
    pub status: RollStatus,
    pub dice_result: u32,
    pub bonus_delta: i128,
    pub requested_at: u64,
    pub fulfilled_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RollResult {
    pub request_id: u64,
    pub bond_id: u64,
    pub dice_tier: DiceTier,
    pub dice_result: u32,
    pub bonus_delta: i128,
    pub bonus_yield: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskProof {
    /// Public key the proof claims to be signed by
    pub signer: BytesN<32>,
    pub signature: BytesN<64>,
    /// Set for referral tasks; receives REFERRAL_REWARD
    pub referrer: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HolderStats {
    pub total_bonus_yield: i128,
    pub best_roll: u32,
    pub tasks_completed: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LeaderboardEntry {
    pub holder: Address,
    pub value: i128,
    pub achieved_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeaderboardCategory {
    CumulativeYield = 0,
    HighestRoll = 1,
    TasksCompleted = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SettlementPath {
    Lock = 0,
    Cash = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementRecord {
    pub bond_id: u64,
    pub owner: Address,
    pub path: SettlementPath,
    pub total_value: i128,
    /// 0 for cash settlements
    pub lock_duration: u64,
    pub position_id: Option<u64>,
    pub settled_at: u64,
}

/// Read-only snapshot for the status surface.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondStatus {
    pub bond_id: u64,
    pub owner: Address,
    pub principal: i128,
    pub base_yield: i128,
    pub bonus_yield: i128,
    pub total_yield: i128,
    pub dice_tier: DiceTier,
    pub rarity: RarityTier,
    pub tasks_completed: u32,
    pub rolls_remaining: u32,
    pub pending_rolls: u32,
    pub matures_at: u64,
    pub seconds_to_maturity: u64,
    pub settled: bool,
}

/// What each settlement path would yield right now.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementPreview {
    pub bond_id: u64,
    pub matured: bool,
    pub total_value: i128,
    pub cash_payout: i128,
    pub treasury_reserve: i128,
    pub cash_available: bool,
    pub governance_amount: i128,
    pub min_lock_weight: i128,
    pub max_lock_weight: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    Initialized,
    Paused,
    /// Number of bonds ever issued; also the last assigned id
    BondCounter,
    Bond(u64),
    OwnerBondCount(Address),
    OwnerBond(Address, u32), // (owner, slot) -> bond_id
    BondSlot(u64),
    /// Correlation record: request_id -> bond_id
    PendingRoll(u64),
    Roll(u64),
    TaskDone(u64, u32), // (bond_id, task_id)
    HolderStats(Address),
    Leaderboard(LeaderboardCategory),
    ReferralRewards(Address),
    Settlement(u64),
}
