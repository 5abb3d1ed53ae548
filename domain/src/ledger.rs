//! Append-only hash chain of redemption events.
//!
//! Each block stores the compact JSON of its [`BlockPayload`] and
//! `record_hash = digest(prev_hash ‖ payload ‖ created_at)`, with the first
//! block linking to the empty string. The digest itself is supplied by the
//! caller so this module stays free of a concrete hash implementation.

use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimData {
    pub claimer: UserId,
    pub amount: u64,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    pub tx_id: u64,
    pub timestamp: i64,
    pub prev_hash: String,
    pub claim_data: ClaimData,
}

impl BlockPayload {
    pub fn to_compact_json(&self) -> DomainResult<String> {
        serde_json::to_string(self).map_err(|e| DomainError::Ledger(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerBlock {
    pub id: u64,
    pub tx_id: u64,
    pub prev_hash: String,
    pub record_hash: String,
    pub created_at: i64,
    pub payload: String,
}

impl LedgerBlock {
    pub fn append<D>(
        prev: Option<&LedgerBlock>,
        tx_id: u64,
        claim_data: ClaimData,
        created_at: i64,
        digest: D,
    ) -> DomainResult<Self>
    where
        D: Fn(&[u8]) -> String,
    {
        let (id, prev_hash) = match prev {
            Some(block) => (block.id + 1, block.record_hash.clone()),
            None => (1, String::new()),
        };

        let payload = BlockPayload {
            tx_id,
            timestamp: created_at,
            prev_hash: prev_hash.clone(),
            claim_data,
        }
        .to_compact_json()?;

        let record_hash = digest(hash_input(&prev_hash, &payload, created_at).as_bytes());

        Ok(Self {
            id,
            tx_id,
            prev_hash,
            record_hash,
            created_at,
            payload,
        })
    }

    pub fn claim_data(&self) -> DomainResult<ClaimData> {
        serde_json::from_str::<BlockPayload>(&self.payload)
            .map(|payload| payload.claim_data)
            .map_err(|e| DomainError::Ledger(format!("block {} payload: {e}", self.id)))
    }
}

fn hash_input(prev_hash: &str, payload: &str, created_at: i64) -> String {
    format!("{prev_hash}{payload}{created_at}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChainVerification {
    Intact {
        length: usize,
        last_hash: Option<String>,
    },
    Broken {
        broken_at: u64,
        expected_hash: String,
        actual_hash: String,
    },
}

impl ChainVerification {
    pub fn is_intact(&self) -> bool {
        matches!(self, Self::Intact { .. })
    }
}

pub fn verify_chain<D>(blocks: &[LedgerBlock], digest: D) -> ChainVerification
where
    D: Fn(&[u8]) -> String,
{
    let mut prev = String::new();

    for block in blocks {
        if block.prev_hash != prev {
            return ChainVerification::Broken {
                broken_at: block.id,
                expected_hash: prev,
                actual_hash: block.prev_hash.clone(),
            };
        }

        let expected = digest(hash_input(&prev, &block.payload, block.created_at).as_bytes());
        if expected != block.record_hash {
            return ChainVerification::Broken {
                broken_at: block.id,
                expected_hash: expected,
                actual_hash: block.record_hash.clone(),
            };
        }

        prev.clone_from(&block.record_hash);
    }

    ChainVerification::Intact {
        length: blocks.len(),
        last_hash: blocks.last().map(|block| block.record_hash.clone()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStatus {
    pub total_blocks: usize,
    pub total_amount: u64,
    pub recent: Vec<LedgerBlock>,
}
