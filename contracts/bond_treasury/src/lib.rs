#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::Accounting;

use events::{InflowEvent, OperatorEvent, PayoutEvent};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol};

/// Custody contract for the bond reserve. Principal flows in on issuance;
/// operators (the bond engine) draw on it for cash settlements and referral claims.
#[contract]
pub struct BondTreasury;

#[contractimpl]
impl BondTreasury {
    /// Initialize the treasury
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage()
            .instance()
            .set(&DataKey::Accounting, &Accounting::empty());

        Ok(())
    }

    /// Add an operator (bond engine contract)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator.clone()), &true);

        env.events().publish(
            (Symbol::new(&env, "operator_set"),),
            OperatorEvent {
                operator,
                enabled: true,
            },
        );
        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator.clone()));

        env.events().publish(
            (Symbol::new(&env, "operator_set"),),
            OperatorEvent {
                operator,
                enabled: false,
            },
        );
        Ok(())
    }

    /// Book principal that an operator has routed to this contract.
    ///
    /// The tokens arrive by a direct transfer; this only records them.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `InvalidAmount`: Amount <= 0
    pub fn receive_inflow(env: Env, operator: Address, amount: i128) -> Result<(), Error> {
        Self::require_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut accounting = Self::accounting(env.clone());
        accounting.total_inflow = accounting
            .total_inflow
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        env.storage()
            .instance()
            .set(&DataKey::Accounting, &accounting);

        env.events().publish(
            (Symbol::new(&env, "inflow"), operator.clone()),
            InflowEvent { operator, amount },
        );
        Ok(())
    }

    /// Pay `amount` of the reserve asset to `recipient`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientReserve`: Balance below amount; nothing moves
    pub fn pay_out(
        env: Env,
        operator: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::require_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let token_client = token::Client::new(&env, &Self::token(&env)?);
        let reserve = token_client.balance(&env.current_contract_address());
        if reserve < amount {
            return Err(Error::InsufficientReserve);
        }

        token_client.transfer(&env.current_contract_address(), &recipient, &amount);

        let mut accounting = Self::accounting(env.clone());
        accounting.total_paid_out = accounting
            .total_paid_out
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        accounting.payout_count += 1;
        env.storage()
            .instance()
            .set(&DataKey::Accounting, &accounting);

        env.events().publish(
            (Symbol::new(&env, "payout"), recipient.clone()),
            PayoutEvent {
                operator,
                recipient,
                amount,
                reserve_after: reserve - amount,
            },
        );
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Current balance of the reserve asset held here. 0 before initialization.
    pub fn reserve(env: Env) -> i128 {
        match Self::token(&env) {
            Ok(token) => token::Client::new(&env, &token).balance(&env.current_contract_address()),
            Err(_) => 0,
        }
    }

    pub fn accounting(env: Env) -> Accounting {
        env.storage()
            .instance()
            .get::<DataKey, Accounting>(&DataKey::Accounting)
            .unwrap_or(Accounting::empty())
    }

    /// Check if address is an operator
    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(address))
            .unwrap_or(false)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }

    fn require_operator(env: &Env, operator: &Address) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        if !Self::is_operator(env.clone(), operator.clone()) {
            return Err(Error::NotOperator);
        }
        operator.require_auth();
        Ok(())
    }
}
