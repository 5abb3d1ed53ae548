pub mod sha256_chain;
