use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionLockedEvent {
    pub position_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub lock_duration: u64,
    pub weight: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionReleasedEvent {
    pub position_id: u64,
    pub owner: Address,
    pub weight: i128,
}
