use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use classmint_application::error::{AppError, AppResult};
use classmint_application::ports::outgoing::token_signer::TokenSignerPort;

type HmacSha256 = Hmac<Sha256>;

/// Signs and checks `CM1` envelope payloads with the configured secret.
pub struct HmacTokenSigner {
    mac: HmacSha256,
}

impl HmacTokenSigner {
    pub fn new(secret: &SecretString) -> AppResult<Self> {
        let mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()).map_err(|e| {
            AppError::ConfigError {
                message: format!("unusable signing secret: {e}"),
            }
        })?;
        Ok(Self { mac })
    }
}

impl TokenSignerPort for HmacTokenSigner {
    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.verify_slice(signature).is_ok()
    }
}
