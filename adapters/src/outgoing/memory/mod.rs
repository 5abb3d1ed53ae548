//! Process-local store backing every outgoing persistence port.
//!
//! Users and reward entries live in `DashMap`s; the ledger chain and the
//! current session sit behind mutexes. A claim takes the reward entry, then
//! the user entry, then the chain, always in that order, and never awaits
//! while holding any of them. Creating a user reserves the username slot
//! before the id slot.

use dashmap::DashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::error;

use classmint_application::error::{AppError, AppResult};
use classmint_application::ports::outgoing::chain_hasher::DynChainHasherPort;
use classmint_application::ports::outgoing::password_hasher::DynPasswordHasherPort;
use domain::auth::{Session, User, UserId};
use domain::ledger::LedgerBlock;
use domain::reward::RewardRecord;
use domain::token::TokenCode;

pub mod reward_store_memory;
pub mod session_store_memory;
pub mod user_store_memory;

pub struct InMemoryStore {
    users: DashMap<UserId, User>,
    usernames: DashMap<String, UserId>,
    rewards: DashMap<TokenCode, RewardRecord>,
    chain: Mutex<Vec<LedgerBlock>>,
    session: Mutex<Option<Session>>,
    password_hasher: DynPasswordHasherPort,
    chain_hasher: DynChainHasherPort,
}

impl InMemoryStore {
    pub fn new(password_hasher: DynPasswordHasherPort, chain_hasher: DynChainHasherPort) -> Self {
        Self {
            users: DashMap::new(),
            usernames: DashMap::new(),
            rewards: DashMap::new(),
            chain: Mutex::new(Vec::new()),
            session: Mutex::new(None),
            password_hasher,
            chain_hasher,
        }
    }

    fn lock_chain(&self) -> AppResult<MutexGuard<'_, Vec<LedgerBlock>>> {
        self.chain.lock().map_err(|_| {
            error!("Ledger chain lock poisoned");
            AppError::InternalServerError
        })
    }

    fn lock_session(&self) -> AppResult<MutexGuard<'_, Option<Session>>> {
        self.session.lock().map_err(|_| {
            error!("Session lock poisoned");
            AppError::InternalServerError
        })
    }
}
