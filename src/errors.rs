//! Error types for the checkout core.
//!
//! Expected business outcomes (no online channel left, tied scores, a
//! dimension with no spread) are not errors. These variants cover bad
//! boundary input and calls made in the wrong checkout phase.

use crate::models::payment::ChannelStatus;

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;

#[derive(thiserror::Error, Debug)]
pub enum CheckoutError {
    #[error("payment method id must not be empty")]
    EmptyMethodId,
    #[error("payment method {method_id} has invalid fee percent {percent}")]
    InvalidFee { method_id: String, percent: f64 },
    #[error("payment method {method_id} has success rate {value} outside 0..=100")]
    InvalidSuccessRate { method_id: String, value: f64 },
    #[error("payment method id {0} appears more than once in the catalog")]
    DuplicateMethodId(String),
    #[error("unknown payment method: {0}")]
    UnknownMethod(String),
    #[error("payment method {method_id} is {status}, not online")]
    MethodUnavailable {
        method_id: String,
        status: ChannelStatus,
    },
    #[error("no payment method selected")]
    NoMethodSelected,
    #[error("no fallback suggestion is pending")]
    NoPendingSuggestion,
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CheckoutError {
    fn from(e: serde_json::Error) -> Self {
        CheckoutError::Serialization(e.to_string())
    }
}
