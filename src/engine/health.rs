/// Channel-health lookups over the checkout's category list.
///
/// The category list belongs to the checkout page. Everything here reads
/// it and never mutates it:
/// - **Online set**: channels the shopper may pick right now.
/// - **Lookup by id**: the selected channel's latest status after a health update.
/// - **Per-category recommendation**: the badge shown inside each picker group.
use crate::config::ScoringWeights;
use crate::engine::scoring::best_online;
use crate::models::payment::{PaymentCategory, PaymentMethod};

/// Every online channel across all categories, in display order.
pub fn online_methods(categories: &[PaymentCategory]) -> Vec<&PaymentMethod> {
    categories
        .iter()
        .flat_map(|c| c.methods.iter())
        .filter(|m| m.is_online())
        .collect()
}

/// Find a channel by id in any category, whatever its status.
pub fn find_method<'a>(categories: &'a [PaymentCategory], id: &str) -> Option<&'a PaymentMethod> {
    categories
        .iter()
        .flat_map(|c| c.methods.iter())
        .find(|m| m.id == id)
}

/// Best online channel of each category, scored against that category only.
///
/// Returns `(category id, channel)` pairs in category order; categories with
/// nothing online are skipped.
pub fn recommended_per_category<'a>(
    categories: &'a [PaymentCategory],
    subtotal: u64,
    weights: &ScoringWeights,
) -> Vec<(&'a str, &'a PaymentMethod)> {
    categories
        .iter()
        .filter_map(|c| best_online(&c.methods, subtotal, weights).map(|m| (c.id.as_str(), m)))
        .collect()
}
