#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::{RandomnessRequest, RequestStatus};

use events::{FulfillmentRejectedEvent, RandomnessDeliveredEvent, RandomnessRequestedEvent};
use storage::DataKey;

use soroban_sdk::{contract, contractclient, contractimpl, Address, Env, Symbol, Val};

/// Callback every consumer exposes. The returned value is ignored; only
/// success or failure of the call is recorded.
#[contractclient(name = "ConsumerClient")]
pub trait RandomnessConsumer {
    fn on_random_delivered(env: Env, oracle: Address, request_id: u64, random: u64) -> Val;
}

/// Request/fulfill randomness oracle. Registered consumers ask for a word;
/// an off-chain keeper delivers it once enough ledgers have closed, and the
/// oracle forwards it to the consumer's callback.
#[contract]
pub struct RandomnessOracle;

#[contractimpl]
impl RandomnessOracle {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        keeper: Address,
        min_confirmations: u32,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Keeper, &keeper);
        env.storage()
            .instance()
            .set(&DataKey::MinConfirmations, &min_confirmations);
        env.storage().instance().set(&DataKey::RequestCounter, &0u64);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    pub fn register_consumer(env: Env, consumer: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage()
            .instance()
            .set(&DataKey::Consumer(consumer), &true);
        Ok(())
    }

    pub fn remove_consumer(env: Env, consumer: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage()
            .instance()
            .remove(&DataKey::Consumer(consumer));
        Ok(())
    }

    pub fn set_keeper(env: Env, keeper: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Keeper, &keeper);
        Ok(())
    }

    /// Stop accepting new requests. Pending ones can still be fulfilled.
    pub fn pause(env: Env) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        Self::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    // ============================================
    // REQUEST / FULFILL
    // ============================================

    /// Register a randomness request for `consumer`. Returns the request id.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `UnknownConsumer`: Consumer not registered
    pub fn request_randomness(env: Env, consumer: Address) -> Result<u64, Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        if Self::is_paused(env.clone()) {
            return Err(Error::ContractPaused);
        }
        if !Self::is_consumer(env.clone(), consumer.clone()) {
            return Err(Error::UnknownConsumer);
        }

        consumer.require_auth();

        let counter: u64 = env
            .storage()
            .instance()
            .get(&DataKey::RequestCounter)
            .unwrap_or(0);
        let request_id = counter + 1;
        let requested_ledger = env.ledger().sequence();

        env.storage().persistent().set(
            &DataKey::Request(request_id),
            &RandomnessRequest {
                id: request_id,
                consumer: consumer.clone(),
                requested_ledger,
                status: RequestStatus::Pending,
                random: 0,
                fulfilled_ledger: 0,
            },
        );
        env.storage()
            .instance()
            .set(&DataKey::RequestCounter, &request_id);

        env.events().publish(
            (Symbol::new(&env, "randomness_requested"), request_id),
            RandomnessRequestedEvent {
                request_id,
                consumer,
                requested_ledger,
            },
        );

        Ok(request_id)
    }

    /// Deliver `random` for a pending request and forward it to the consumer.
    ///
    /// A consumer that errors does not fail this call: the request is marked
    /// `Rejected` and a `fulfillment_rejected` event is published.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotKeeper`: Caller is not the keeper
    /// - `RequestNotFound`: Unknown request id
    /// - `AlreadyFulfilled`: Request no longer pending
    /// - `NotConfirmed`: Too few ledgers since the request
    pub fn fulfill(
        env: Env,
        keeper: Address,
        request_id: u64,
        random: u64,
    ) -> Result<RequestStatus, Error> {
        let configured: Address = env
            .storage()
            .instance()
            .get(&DataKey::Keeper)
            .ok_or(Error::NotInitialized)?;
        if keeper != configured {
            return Err(Error::NotKeeper);
        }
        keeper.require_auth();

        let mut request = Self::get_request(env.clone(), request_id)?;
        if request.status != RequestStatus::Pending {
            return Err(Error::AlreadyFulfilled);
        }

        let min_confirmations: u32 = env
            .storage()
            .instance()
            .get(&DataKey::MinConfirmations)
            .unwrap_or(0);
        let sequence = env.ledger().sequence();
        if sequence < request.requested_ledger.saturating_add(min_confirmations) {
            return Err(Error::NotConfirmed);
        }

        let consumer = ConsumerClient::new(&env, &request.consumer);
        let accepted = matches!(
            consumer.try_on_random_delivered(&env.current_contract_address(), &request_id, &random),
            Ok(Ok(_))
        );

        request.status = if accepted {
            RequestStatus::Delivered
        } else {
            RequestStatus::Rejected
        };
        request.random = random;
        request.fulfilled_ledger = sequence;
        env.storage()
            .persistent()
            .set(&DataKey::Request(request_id), &request);

        if accepted {
            env.events().publish(
                (Symbol::new(&env, "randomness_delivered"), request_id),
                RandomnessDeliveredEvent {
                    request_id,
                    consumer: request.consumer,
                    random,
                },
            );
        } else {
            env.events().publish(
                (Symbol::new(&env, "fulfillment_rejected"), request_id),
                FulfillmentRejectedEvent {
                    request_id,
                    consumer: request.consumer,
                },
            );
        }

        Ok(request.status)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_request(env: Env, request_id: u64) -> Result<RandomnessRequest, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Request(request_id))
            .ok_or(Error::RequestNotFound)
    }

    pub fn is_consumer(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Consumer(address))
            .unwrap_or(false)
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn min_confirmations(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::MinConfirmations)
            .unwrap_or(0)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }
}
