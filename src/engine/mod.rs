/// Checkout Engine — payment channel ranking and fallback coordination.
///
/// Ranks the online channels for a subtotal and keeps a checkout usable
/// when the selected channel goes offline mid-session.

pub mod fallback;
pub mod health;
pub mod scoring;

use crate::config::ScoringWeights;
use crate::models::payment::{PaymentCategory, PaymentMethod, ScoredMethod};
use self::fallback::{FallbackCoordinator, Notifier};

/// Scorer configured with one set of weights, shared by every checkout session.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutEngine {
    weights: ScoringWeights,
}

impl CheckoutEngine {
    /// Creates an engine with the given scoring weights.
    pub fn new(weights: ScoringWeights) -> Self {
        CheckoutEngine { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Online channels across all categories, best first.
    pub fn rank(&self, categories: &[PaymentCategory], subtotal: u64) -> Vec<ScoredMethod> {
        scoring::rank_methods(
            categories.iter().flat_map(|c| c.methods.iter()),
            subtotal,
            &self.weights,
        )
    }

    /// The channel the picker marks as recommended, if any is online.
    pub fn best<'a>(
        &self,
        categories: &'a [PaymentCategory],
        subtotal: u64,
    ) -> Option<&'a PaymentMethod> {
        scoring::get_best_online_method(categories, subtotal, &self.weights)
    }

    /// Start a coordinator for a new checkout session.
    pub fn start_session<N: Notifier>(&self, notifier: N) -> FallbackCoordinator<N> {
        FallbackCoordinator::new(self.weights, notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_payment_categories;
    use crate::models::checkout::CheckoutPhase;
    use super::fallback::ToastLog;

    #[test]
    fn test_rank_head_is_best() {
        let engine = CheckoutEngine::default();
        let categories = get_payment_categories();
        let ranked = engine.rank(&categories, 150_000);
        let best = engine.best(&categories, 150_000).expect("catalog has online channels");
        assert_eq!(ranked[0].method.id, best.id);
    }

    #[test]
    fn test_new_session_starts_idle() {
        let engine = CheckoutEngine::new(ScoringWeights::default());
        let session = engine.start_session(ToastLog::default());
        assert_eq!(session.phase(), CheckoutPhase::Idle);
        assert!(session.selected().is_none());
    }
}
