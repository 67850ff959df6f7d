//! Default max-fee computation.
//!
//! Builders only consult the strategy when the caller did not set a max
//! fee. The fee always scales with the serialized size of the
//! transaction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::TransactionType;
use crate::config::{FEE_MULTIPLIER_HIGH, FEE_MULTIPLIER_LOW, FEE_MULTIPLIER_MEDIUM};
use crate::error::ValidationError;
use crate::model::UInt64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeStrategy {
    /// Every transaction is free.
    Zero,
    /// `size * multiplier`.
    Multiplier(u64),
    /// `size * rate`, with the rate looked up per transaction type.
    RateTable {
        default_rate: u64,
        rates: BTreeMap<TransactionType, u64>,
    },
}

impl FeeStrategy {
    pub fn low() -> Self {
        Self::Multiplier(FEE_MULTIPLIER_LOW)
    }

    pub fn medium() -> Self {
        Self::Multiplier(FEE_MULTIPLIER_MEDIUM)
    }

    pub fn high() -> Self {
        Self::Multiplier(FEE_MULTIPLIER_HIGH)
    }

    /// Per-byte rate for `transaction_type`.
    pub fn rate_for(&self, transaction_type: TransactionType) -> u64 {
        match self {
            Self::Zero => 0,
            Self::Multiplier(multiplier) => *multiplier,
            Self::RateTable {
                default_rate,
                rates,
            } => rates.get(&transaction_type).copied().unwrap_or(*default_rate),
        }
    }

    /// Fee for a serialized transaction of `size` bytes.
    pub fn calculate(
        &self,
        transaction_type: TransactionType,
        size: usize,
    ) -> Result<UInt64, ValidationError> {
        let size = u64::try_from(size)
            .map_err(|_| ValidationError::invalid("max_fee", "transaction size overflows u64"))?;
        size.checked_mul(self.rate_for(transaction_type))
            .map(UInt64::new)
            .ok_or_else(|| ValidationError::invalid("max_fee", "fee overflows u64"))
    }
}

impl Default for FeeStrategy {
    fn default() -> Self {
        Self::Zero
    }
}
