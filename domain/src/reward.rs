use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{DomainError, DomainResult};
use crate::token::TokenCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardStatus {
    Active,
    Consumed,
    Revoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    AlreadyClaimed,
    Revoked,
    Expired,
}

/// One entry in the reward ledger. `Consumed` and `Revoked` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardRecord {
    pub code: TokenCode,
    pub issued_amount: u64,
    pub expiry: Option<OffsetDateTime>,
    pub status: RewardStatus,
    pub description: String,
    pub created_at: OffsetDateTime,
}

impl RewardRecord {
    pub fn new(
        code: TokenCode,
        issued_amount: u64,
        expiry: Option<OffsetDateTime>,
        description: String,
    ) -> DomainResult<Self> {
        if issued_amount == 0 {
            return Err(DomainError::InvalidReward(
                "issued amount must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            code,
            issued_amount,
            expiry,
            status: RewardStatus::Active,
            description,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    pub fn is_consumed(&self) -> bool {
        self.status == RewardStatus::Consumed
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expiry.is_some_and(|expiry| now > expiry)
    }

    pub fn check_eligible(&self, now: OffsetDateTime) -> Result<(), Ineligible> {
        match self.status {
            RewardStatus::Consumed => Err(Ineligible::AlreadyClaimed),
            RewardStatus::Revoked => Err(Ineligible::Revoked),
            RewardStatus::Active if self.is_expired_at(now) => Err(Ineligible::Expired),
            RewardStatus::Active => Ok(()),
        }
    }

    pub fn consume(&mut self) -> Result<(), Ineligible> {
        match self.status {
            RewardStatus::Active => {
                self.status = RewardStatus::Consumed;
                Ok(())
            }
            RewardStatus::Consumed => Err(Ineligible::AlreadyClaimed),
            RewardStatus::Revoked => Err(Ineligible::Revoked),
        }
    }
}

/// Issued via the admin flow: the envelope string plus what the client
/// needs to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedReward {
    pub code: TokenCode,
    pub amount: u64,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
    pub description: String,
    pub claim_url: String,
}
