use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InflowEvent {
    pub operator: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayoutEvent {
    pub operator: Address,
    pub recipient: Address,
    pub amount: i128,
    pub reserve_after: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorEvent {
    pub operator: Address,
    pub enabled: bool,
}
