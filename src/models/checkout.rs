use serde::{Deserialize, Serialize};

use super::payment::{PaymentCategory, PaymentMethod};

/// Severity of a user-facing toast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

/// A notification shown to the shopper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

/// Proposed replacement for a selected channel that stopped being online.
///
/// Lives only until the shopper confirms or declines it, or a later
/// re-evaluation supersedes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSuggestion {
    /// The selected channel that is no longer online.
    pub from: PaymentMethod,
    /// Best-scored online channel at the current subtotal.
    pub to: PaymentMethod,
    /// Fee of `from` at the subtotal the suggestion was made for.
    pub from_fee: u64,
    /// Fee of `to` at the same subtotal.
    pub to_fee: u64,
}

impl FallbackSuggestion {
    /// Signed fee change the shopper accepts by switching (positive = pays more).
    ///
    /// Saturates at the `i64` bounds so the sign is always right.
    pub fn fee_delta(&self) -> i64 {
        let delta = i128::from(self.to_fee) - i128::from(self.from_fee);
        delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

/// Where the checkout's channel selection currently stands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// A channel is selected and online.
    #[default]
    Idle,
    /// Nothing selected; the picker highlights the top-scored online channel.
    Recommending,
    /// The selected channel was just seen to be non-online.
    DegradedDetected,
    /// A fallback suggestion is waiting for the shopper.
    Suggesting,
    /// No online channel is left to offer.
    NoAlternative,
}

/// API request body for the /api/recommend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    /// Transaction subtotal in whole currency units.
    pub subtotal: u64,
    /// Channel list to rank (default: the built-in catalog).
    pub categories: Option<Vec<PaymentCategory>>,
}

/// API request body for the /api/fallback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackRequest {
    /// Channel the shopper picked while it was still online.
    pub selected_method_id: String,
    /// Transaction subtotal in whole currency units.
    pub subtotal: u64,
    /// Current channel list, with live statuses (default: the built-in catalog).
    pub categories: Option<Vec<PaymentCategory>>,
}

/// API response body for the /api/fallback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackResponse {
    pub phase: CheckoutPhase,
    /// Channel still selected after evaluation (None once cleared).
    pub selected: Option<PaymentMethod>,
    pub suggestion: Option<FallbackSuggestion>,
    /// Signed fee change if the suggestion is accepted.
    pub fee_delta: Option<i64>,
    /// Toasts emitted while evaluating.
    pub toasts: Vec<Toast>,
}
