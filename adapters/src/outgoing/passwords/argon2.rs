use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::Error as HashError,
};
use classmint_application::error::{AppError, AppResult};
use classmint_application::infrastructure_config::Argon2Config;
use classmint_application::ports::outgoing::password_hasher::PasswordHasherPort;
use password_hash::{SaltString, rand_core::OsRng};

const DEFAULT_OUTPUT_LENGTH: usize = 32;

/// Argon2id credential hashing for seeded and provisioned users.
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn from_config(config: &Argon2Config) -> AppResult<Self> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            Some(config.output_length.unwrap_or(DEFAULT_OUTPUT_LENGTH)),
        )
        .map_err(|e| AppError::ConfigError {
            message: format!("invalid argon2 parameters: {e}"),
        })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_config_or_default(config: &Argon2Config) -> Self {
        Self::from_config(config).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default Argon2 parameters");
            Self::default()
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> AppResult<String> {
        if password.is_empty() {
            return Err(AppError::ValidationError {
                message: "password cannot be empty".to_string(),
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AppError::InternalServerError
            })
    }

    fn verify(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        if password.is_empty() || password_hash.is_empty() {
            return Ok(false);
        }

        let parsed = PasswordHash::new(password_hash).map_err(|e| {
            tracing::error!(error = %e, "Stored password hash is unreadable");
            AppError::InternalServerError
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => {
                tracing::error!(error = %e, "Password verification failed");
                Err(AppError::InternalServerError)
            }
        }
    }
}
