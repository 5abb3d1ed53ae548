pub mod auth;
pub mod claim;
pub mod health;
pub mod wallet;
