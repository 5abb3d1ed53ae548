pub mod hmac_sha256;
