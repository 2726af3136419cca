use soroban_sdk::{contracttype, Address};

/// Running totals of what operators have booked in and paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Accounting {
    pub total_inflow: i128,
    pub total_paid_out: i128,
    pub payout_count: u64,
}

impl Accounting {
    pub fn empty() -> Self {
        Accounting {
            total_inflow: 0,
            total_paid_out: 0,
            payout_count: 0,
        }
    }
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    /// Asset held in reserve
    Token,
    Operators(Address),
    Accounting,
}
