use sha2::{Digest, Sha256};

use classmint_application::ports::outgoing::chain_hasher::ChainHasherPort;

/// Lowercase hex SHA-256, the digest the ledger chain is built with.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ChainHasher;

impl ChainHasherPort for Sha256ChainHasher {
    fn digest(&self, input: &[u8]) -> String {
        hex::encode(Sha256::digest(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            Sha256ChainHasher.digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
