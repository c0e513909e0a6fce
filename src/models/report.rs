use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::payment::{ChannelStatus, ScoredMethod};

/// Ranking of every channel in the catalog for one subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    /// Subtotal the fees and cost penalties were computed against.
    pub subtotal: u64,
    /// Id of the channel the picker marks as recommended (None if nothing is online).
    pub recommended: Option<String>,
    /// Online channels across all categories, best first.
    pub overall: Vec<ScoredMethod>,
    /// Per-category rankings, keyed by category id.
    pub by_category: HashMap<String, CategoryRanking>,
    /// Channels that cannot be selected right now.
    pub unavailable: Vec<UnavailableMethod>,
}

/// Ranking within a single category, normalized against that category only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRanking {
    pub name: String,
    /// Top-scored online channel in the category.
    pub recommended: Option<String>,
    /// Online channels in the category, best first.
    pub ranked: Vec<ScoredMethod>,
}

/// A channel excluded from ranking because it is not online.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableMethod {
    pub id: String,
    pub status: ChannelStatus,
}
