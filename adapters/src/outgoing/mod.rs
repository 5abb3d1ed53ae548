pub mod hashing;
pub mod memory;
pub mod passwords;
pub mod signing;
