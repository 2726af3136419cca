use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RequestStatus {
    /// Waiting for the keeper
    Pending = 0,
    /// Consumer accepted the random word
    Delivered = 1,
    /// Consumer returned an error; its state was left untouched
    Rejected = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RandomnessRequest {
    pub id: u64,
    pub consumer: Address,
    /// Ledger sequence the request was made in
    pub requested_ledger: u32,
    pub status: RequestStatus,
    /// 0 until fulfilled
    pub random: u64,
    pub fulfilled_ledger: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    /// Off-chain service allowed to fulfill requests
    Keeper,
    MinConfirmations,
    Paused,
    Consumer(Address),
    RequestCounter,
    Request(u64),
}
