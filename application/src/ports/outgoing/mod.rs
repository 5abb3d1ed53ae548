pub mod chain_hasher;
pub mod ledger_store;
pub mod password_hasher;
pub mod reward_store;
pub mod session_store;
pub mod token_signer;
pub mod user_store;
