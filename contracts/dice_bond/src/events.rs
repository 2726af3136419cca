use soroban_sdk::{contracttype, Address, BytesN};

use crate::storage::{DiceTier, LeaderboardCategory, SettlementPath};

#[contracttype]
#[derive(Clone, Debug)]
pub struct BondIssuedEvent {
    pub bond_id: u64,
    pub owner: Address,
    pub principal: i128,
    pub base_yield: i128,
    pub matures_at: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BondTransferredEvent {
    pub bond_id: u64,
    pub from: Address,
    pub to: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RollPendingEvent {
    pub bond_id: u64,
    pub request_id: u64,
    pub rolls_remaining: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RollFulfilledEvent {
    pub bond_id: u64,
    pub request_id: u64,
    pub dice_result: u32,
    pub bonus_delta: i128,
    pub bonus_yield: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TaskCompletedEvent {
    pub bond_id: u64,
    pub task_id: u32,
    pub tasks_completed: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TierUpgradedEvent {
    pub bond_id: u64,
    pub old_tier: DiceTier,
    pub new_tier: DiceTier,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ReferralEvent {
    pub referrer: Address,
    pub amount: i128,
    pub balance: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct LeaderboardUpdatedEvent {
    pub category: LeaderboardCategory,
    pub holder: Address,
    pub value: i128,
    /// 1-based rank, 0 when the holder did not make the table
    pub rank: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BondSettledEvent {
    pub bond_id: u64,
    pub owner: Address,
    pub path: SettlementPath,
    pub total_value: i128,
    pub position_id: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SignerRotatedEvent {
    pub old_signer: BytesN<32>,
    pub new_signer: BytesN<32>,
}
