use tracing::{info, warn};

use crate::bootstrap::state::SeedSummary;
use classmint_application::infrastructure_config::Config;

pub fn print_api_info(config: &Config, seeded: SeedSummary) {
    let base_url = format!("http://{}", config.server_address());
    info!("Wallet API:");
    info!("  POST {}/api/login", base_url);
    info!("  POST {}/api/logout", base_url);
    info!("  GET  {}/api/verify", base_url);
    info!("  GET  {}/api/users/{{user_id}}/balance", base_url);
    info!("  POST {}/api/claim", base_url);

    info!("Configuration:");
    info!("  Environment: {}", config.environment.env);
    info!("  Session TTL: {}s", config.auth.session_ttl_seconds);
    info!(
        "  Rewards: default expiry {} min, claim timeout {} ms",
        config.rewards.default_expiry_minutes, config.rewards.claim_timeout_ms
    );
    info!(
        "  Seeded {} users and {} rewards",
        seeded.users, seeded.rewards
    );

    if config.rewards.uses_default_secret() {
        warn!("Using the default signing secret; set CLASSMINT_REWARDS__SIGNING_SECRET");
    }
}
