use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// max_lock must be positive
    InvalidConfig = 3,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller is not the configured router
    Unauthorized = 10,
    /// Caller does not own the position
    NotPositionOwner = 11,

    // ============================================
    // POSITION ERRORS (20-29)
    // ============================================
    /// Locked position not found
    PositionNotFound = 20,
    /// Position already released
    InvalidStatus = 21,
    /// Lock has not expired yet
    StillLocked = 22,

    // ============================================
    // AMOUNT ERRORS (30-39)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 30,
    /// Lock duration must be in (0, max_lock]
    InvalidDuration = 31,
}
