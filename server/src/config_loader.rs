use classmint_application::error::{AppError, AppResult};
use classmint_application::infrastructure_config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::fs;
use std::path::Path;
use tracing::info;

const ENV_PREFIX: &str = "CLASSMINT_";

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;

    let config: Config = figment()
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

/// Defaults, then `config.toml`, then `config.json`, then `CLASSMINT_*`
/// variables with `__` separating nested keys.
fn figment() -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() || !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Set CLASSMINT_REWARDS__SIGNING_SECRET before deploying.");

    Ok(())
}
