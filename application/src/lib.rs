#[cfg(any(feature = "adapters", feature = "axum", feature = "dashmap"))]
compile_error!("application must not depend on adapters/framework crates");

pub mod auth;
pub mod error;
pub mod infrastructure_config;
pub mod ledger;
pub mod ports;
pub mod provisioning;
pub mod redemption;
pub mod rewards;
pub mod wallet;
