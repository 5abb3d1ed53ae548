use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTokenError {
    #[error("token is empty")]
    Empty,

    #[error("unsupported token shape: {0}")]
    UnsupportedShape(&'static str),

    #[error("token code exceeds {max} characters")]
    TooLong { max: usize },

    #[error("token code contains whitespace or control characters")]
    InvalidCharacters,

    #[error("structured token is missing a code")]
    MissingCode,

    #[error("structured token field '{field}' has an invalid value")]
    InvalidField { field: &'static str },

    #[error("serialized token could not be parsed: {0}")]
    Unparsable(String),

    #[error("signed token envelope is invalid: {0}")]
    InvalidEnvelope(&'static str),

    #[error("signed token signature does not verify")]
    BadSignature,

    #[error("claim link does not carry a token")]
    InvalidClaimUrl,

    #[error("token declares conflicting amounts")]
    ConflictingAmount,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed token: {0}")]
    MalformedToken(#[from] MalformedTokenError),

    #[error("Invalid reward: {0}")]
    InvalidReward(String),

    #[error("Ledger error: {0}")]
    Ledger(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
