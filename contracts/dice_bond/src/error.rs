use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller does not own the bond
    NotOwner = 11,
    /// Randomness callback did not come from the configured oracle
    UnauthorizedCallback = 12,
    /// Task proof was not produced by the trusted signer
    InvalidProof = 13,

    // ============================================
    // STATE INVARIANT ERRORS (20-29)
    // ============================================
    /// No bond with this id
    BondNotFound = 20,
    /// Issuance would exceed max_supply
    SupplyExhausted = 21,
    /// Batch issuance with quantity 0
    ZeroQuantity = 22,
    /// Bond has already been settled and burned
    AlreadySettled = 23,
    /// Bond has not reached matures_at
    NotMatured = 24,
    /// Task already recorded for this bond
    AlreadyCompleted = 25,
    /// Lock duration outside [MIN_LOCK, MAX_LOCK]
    LockDurationOutOfRange = 26,

    // ============================================
    // RESOURCE EXHAUSTION ERRORS (30-39)
    // ============================================
    /// Weekly roll allowance used up
    NoRollsRemaining = 30,
    /// Treasury cannot cover the payout
    InsufficientReserve = 31,
    /// No referral rewards accrued
    NothingToClaim = 32,

    // ============================================
    // EXTERNAL COLLABORATOR ERRORS (40-49)
    // ============================================
    /// Randomness request could not be dispatched
    RandomnessUnavailable = 40,
    /// Unknown or already consumed randomness request
    InvalidRequest = 41,
    /// Treasury payout failed for a reason other than reserve
    PayoutFailed = 42,
    /// Governance position could not be created
    LockFailed = 43,

    // ============================================
    // QUERY ERRORS (50-59)
    // ============================================
    /// Leaderboard category out of range
    InvalidCategory = 50,
    /// Leaderboard limit must be in 1..=10
    InvalidLimit = 51,

    // ============================================
    // OPERATIONAL ERRORS (60-69)
    // ============================================
    /// Checked arithmetic overflowed
    Overflow = 60,
    /// Contract is paused
    ContractPaused = 61,
    /// Initialization parameters rejected
    InvalidConfig = 62,
}

/// Coarse grouping used by clients to decide how to surface an error.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    Initialization,
    /// Wrong caller. Never retried.
    Authorization,
    /// Safe to show to the end user as-is.
    StateInvariant,
    /// Recoverable by waiting or choosing another settlement path.
    ResourceExhaustion,
    External,
    Input,
    Arithmetic,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::AlreadyInitialized | Error::NotInitialized | Error::InvalidConfig => {
                ErrorCategory::Initialization
            }
            Error::NotOwner | Error::UnauthorizedCallback | Error::InvalidProof => {
                ErrorCategory::Authorization
            }
            Error::BondNotFound
            | Error::SupplyExhausted
            | Error::ZeroQuantity
            | Error::AlreadySettled
            | Error::NotMatured
            | Error::AlreadyCompleted
            | Error::LockDurationOutOfRange
            | Error::ContractPaused => ErrorCategory::StateInvariant,
            Error::NoRollsRemaining | Error::InsufficientReserve | Error::NothingToClaim => {
                ErrorCategory::ResourceExhaustion
            }
            Error::RandomnessUnavailable
            | Error::InvalidRequest
            | Error::PayoutFailed
            | Error::LockFailed => ErrorCategory::External,
            Error::InvalidCategory | Error::InvalidLimit => ErrorCategory::Input,
            Error::Overflow => ErrorCategory::Arithmetic,
        }
    }

    /// True when the same call may succeed later without any change by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::NoRollsRemaining
                | Error::InsufficientReserve
                | Error::RandomnessUnavailable
                | Error::NotMatured
        )
    }
}
