pub mod auth;
pub mod ledger;
pub mod provisioning;
pub mod redemption;
pub mod rewards;
pub mod wallet;
