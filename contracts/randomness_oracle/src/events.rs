use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct RandomnessRequestedEvent {
    pub request_id: u64,
    pub consumer: Address,
    pub requested_ledger: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RandomnessDeliveredEvent {
    pub request_id: u64,
    pub consumer: Address,
    pub random: u64,
}

/// Consumer refused the callback (stale or unknown request on its side).
#[contracttype]
#[derive(Clone, Debug)]
pub struct FulfillmentRejectedEvent {
    pub request_id: u64,
    pub consumer: Address,
}
