use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{CheckoutError, Result};

/// Live health of a payment channel, as reported by the channel-health feed.
///
/// Only `Online` channels may be selected or recommended. The remaining
/// statuses split into transient outages (expected to recover on their own)
/// and hard outages (channel switched off until an operator intervenes).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// Channel is accepting payments.
    Online,
    /// Channel is up but slow or failing intermittently.
    Degraded,
    /// Channel is not reachable.
    Down,
    /// Planned maintenance window.
    Maintenance,
    /// Switched off automatically after crossing an error threshold.
    AutoDisabled,
}

impl ChannelStatus {
    /// Returns true if a channel with this status can be picked at checkout.
    pub fn is_selectable(&self) -> bool {
        matches!(self, ChannelStatus::Online)
    }

    /// Returns true if the outage is expected to clear without intervention.
    pub fn is_transient_outage(&self) -> bool {
        matches!(self, ChannelStatus::Degraded | ChannelStatus::Maintenance)
    }

    /// Returns true if the channel is off until someone turns it back on.
    pub fn is_hard_outage(&self) -> bool {
        matches!(self, ChannelStatus::Down | ChannelStatus::AutoDisabled)
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelStatus::Online => write!(f, "online"),
            ChannelStatus::Degraded => write!(f, "degraded"),
            ChannelStatus::Down => write!(f, "down"),
            ChannelStatus::Maintenance => write!(f, "maintenance"),
            ChannelStatus::AutoDisabled => write!(f, "auto_disabled"),
        }
    }
}

/// Fee charged by a channel on top of the subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentFee {
    /// Fixed fee in whole currency units (Rupiah).
    pub flat: u64,
    /// Percentage of the subtotal (e.g., 0.7 for 0.7%).
    pub percent: f64,
}

/// A payment channel offered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Unique channel identifier (e.g., "gopay").
    pub id: String,
    /// Display name (e.g., "GoPay").
    pub name: String,
    /// Fee structure.
    pub fee: PaymentFee,
    /// Current channel health.
    pub status: ChannelStatus,
    /// Business rank hint, lower is preferred. May exceed 100.
    pub priority: i32,
    /// Observed success percentage (0.0–100.0).
    pub success_rate: f64,
    /// Observed average processing latency in milliseconds.
    pub avg_latency_ms: u64,
}

impl PaymentMethod {
    /// Check the numeric invariants the scorer relies on.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CheckoutError::EmptyMethodId);
        }
        if !self.fee.percent.is_finite() || self.fee.percent < 0.0 {
            return Err(CheckoutError::InvalidFee {
                method_id: self.id.clone(),
                percent: self.fee.percent,
            });
        }
        if !self.success_rate.is_finite() || !(0.0..=100.0).contains(&self.success_rate) {
            return Err(CheckoutError::InvalidSuccessRate {
                method_id: self.id.clone(),
                value: self.success_rate,
            });
        }
        Ok(())
    }

    pub fn is_online(&self) -> bool {
        self.status.is_selectable()
    }
}

/// A group of channels shown together in the method picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentCategory {
    /// Category identifier (e.g., "ewallet").
    pub id: String,
    /// Display name (e.g., "E-Wallet").
    pub name: String,
    /// Channels in display order.
    pub methods: Vec<PaymentMethod>,
}

impl PaymentCategory {
    pub fn validate(&self) -> Result<()> {
        for method in &self.methods {
            method.validate()?;
        }
        Ok(())
    }
}

/// Validate catalog data entering the checkout core.
///
/// Method ids must be unique across all categories because the coordinator
/// tracks the selected channel by id between health updates.
pub fn validate_catalog(categories: &[PaymentCategory]) -> Result<()> {
    let mut seen = HashSet::new();
    for category in categories {
        category.validate()?;
        for method in &category.methods {
            if !seen.insert(method.id.as_str()) {
                return Err(CheckoutError::DuplicateMethodId(method.id.clone()));
            }
        }
    }
    Ok(())
}

/// Per-component view of a channel score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Fee for the subtotal the score was computed against.
    pub fee: u64,
    pub base_score: f64,
    pub srate_score: f64,
    /// Normalized cost penalty (0.0–100.0), before weighting.
    pub cost_penalty: f64,
    /// Normalized latency penalty (0.0–100.0), before weighting.
    pub latency_penalty: f64,
}

/// A channel paired with its recommendation score. Recomputed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMethod {
    pub method: PaymentMethod,
    /// Weighted score, floored at 0.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}
