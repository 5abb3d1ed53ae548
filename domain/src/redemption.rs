use serde::Serialize;

use crate::auth::UserId;
use crate::token::TokenCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RedemptionResult {
    pub success: bool,
    pub new_balance: u64,
    pub amount_credited: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionReceipt {
    pub tx_id: u64,
    pub block_hash: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redemption {
    pub result: RedemptionResult,
    pub receipt: RedemptionReceipt,
}

/// What the store reports after atomically consuming a reward and crediting
/// the claimer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCredit {
    pub user_id: UserId,
    pub code: TokenCode,
    pub new_balance: u64,
    pub amount_credited: u64,
    pub receipt: RedemptionReceipt,
}

impl AppliedCredit {
    pub fn into_redemption(self) -> Redemption {
        Redemption {
            result: RedemptionResult {
                success: true,
                new_balance: self.new_balance,
                amount_credited: self.amount_credited,
            },
            receipt: self.receipt,
        }
    }
}
