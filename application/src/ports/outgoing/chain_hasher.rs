use std::sync::Arc;

pub trait ChainHasherPort: Send + Sync {
    fn digest(&self, input: &[u8]) -> String;
}

pub type DynChainHasherPort = Arc<dyn ChainHasherPort>;
