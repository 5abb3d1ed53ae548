pub mod auth;
pub mod envelope;
pub mod error;
pub mod ledger;
pub mod redemption;
pub mod reward;
pub mod token;
