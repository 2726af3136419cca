use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PositionStatus {
    /// Counting toward voting weight
    Locked = 0,
    /// Expired and released by its owner
    Released = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedPosition {
    /// Unique position ID
    pub id: u64,
    pub owner: Address,
    /// Governance units locked
    pub amount: i128,
    pub lock_duration: u64,
    /// amount × lock_duration / max_lock
    pub weight: i128,
    pub locked_at: u64,
    pub unlock_at: u64,
    pub status: PositionStatus,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    /// Only address allowed to open positions
    Router,
    MaxLock,
    Position(u64), // Position ID → LockedPosition
    PositionCounter,
    OwnerWeight(Address),
    TotalWeight,
    Initialized,
}
