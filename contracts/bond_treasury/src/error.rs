use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Authorization errors
    NotOperator = 6,

    // Amount errors
    InvalidAmount = 5,

    // Reserve errors. Code is part of the payout interface consumers match on.
    InsufficientReserve = 41,
}
