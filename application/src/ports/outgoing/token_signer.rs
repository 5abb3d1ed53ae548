use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
pub trait TokenSignerPort: Send + Sync {
    fn sign(&self, payload: &[u8]) -> Vec<u8>;
    fn verify(&self, payload: &[u8], signature: &[u8]) -> bool;
}

pub type DynTokenSignerPort = Arc<dyn TokenSignerPort>;
