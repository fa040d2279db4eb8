use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One purchase event, already typed and validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub customer_id: String,
    pub timestamp: NaiveDateTime,
    pub amount: f64,
}

impl TransactionRecord {
    pub fn new(customer_id: impl Into<String>, timestamp: NaiveDateTime, amount: f64) -> Self {
        Self {
            customer_id: customer_id.into(),
            timestamp,
            amount,
        }
    }

    /// Negative amounts are accepted (refunds) but flagged by the extractor.
    pub fn is_negative(&self) -> bool {
        self.amount < 0.0
    }
}
