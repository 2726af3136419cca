//! Interfaces of the contracts this engine calls out to.
//!
//! Only the functions the engine needs are declared; any contract exposing
//! the same signatures can be configured in their place.

use soroban_sdk::{contractclient, contracterror, Address, Env};

/// Errors surfaced by the treasury's `pay_out`. Codes match the treasury contract.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TreasuryError {
    InsufficientReserve = 41,
}

#[contractclient(name = "RandomnessClient")]
pub trait RandomnessInterface {
    /// Registers a request and returns its id. The oracle later calls
    /// `on_random_delivered` on `consumer`.
    fn request_randomness(env: Env, consumer: Address) -> u64;
}

#[contractclient(name = "TreasuryClient")]
pub trait TreasuryInterface {
    fn pay_out(
        env: Env,
        operator: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<(), TreasuryError>;

    fn receive_inflow(env: Env, operator: Address, amount: i128);

    fn reserve(env: Env) -> i128;
}

#[contractclient(name = "GovernanceClient")]
pub trait GovernanceInterface {
    fn create_locked_position(
        env: Env,
        router: Address,
        owner: Address,
        amount: i128,
        lock_duration: u64,
    ) -> u64;
}
