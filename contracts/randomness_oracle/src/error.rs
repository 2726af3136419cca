use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller is not the keeper
    NotKeeper = 10,
    /// Consumer has not been registered by the admin
    UnknownConsumer = 11,

    // ============================================
    // REQUEST ERRORS (20-29)
    // ============================================
    RequestNotFound = 20,
    /// Request already delivered or rejected
    AlreadyFulfilled = 21,
    /// Fewer than min_confirmations ledgers since the request
    NotConfirmed = 22,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    ContractPaused = 50,
}
