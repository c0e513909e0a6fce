/// Ranking report for the payment method picker.
///
/// Scores every online channel for one subtotal, both across the whole
/// catalog and within each category, and lists what is currently unavailable.

use crate::config::ScoringWeights;
use crate::engine::health::recommended_per_category;
use crate::engine::scoring::rank_methods;
use crate::models::payment::{PaymentCategory, PaymentMethod};
use crate::models::report::{CategoryRanking, RankingReport, UnavailableMethod};
use std::collections::HashMap;

/// Generate the ranking report for `subtotal`.
///
/// The overall ranking is normalized across all online channels; each
/// category ranking is normalized within its category, so scores from the
/// two views are not comparable with each other.
pub fn generate_ranking_report(
    categories: &[PaymentCategory],
    subtotal: u64,
    weights: &ScoringWeights,
) -> RankingReport {
    let overall = rank_methods(
        categories.iter().flat_map(|c| c.methods.iter()),
        subtotal,
        weights,
    );

    let picks: HashMap<&str, &PaymentMethod> =
        recommended_per_category(categories, subtotal, weights).into_iter().collect();

    let by_category: HashMap<String, CategoryRanking> = categories
        .iter()
        .map(|c| {
            let ranking = CategoryRanking {
                name: c.name.clone(),
                recommended: picks.get(c.id.as_str()).map(|m| m.id.clone()),
                ranked: rank_methods(&c.methods, subtotal, weights),
            };
            (c.id.clone(), ranking)
        })
        .collect();

    let unavailable = categories
        .iter()
        .flat_map(|c| c.methods.iter())
        .filter(|m| !m.is_online())
        .map(|m| UnavailableMethod {
            id: m.id.clone(),
            status: m.status,
        })
        .collect();

    RankingReport {
        subtotal,
        recommended: overall.first().map(|s| s.method.id.clone()),
        overall,
        by_category,
        unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_payment_categories;
    use crate::engine::scoring::get_best_online_method;
    use crate::models::payment::ChannelStatus;

    #[test]
    fn test_report_recommendation_matches_best_online_method() {
        let categories = get_payment_categories();
        let weights = ScoringWeights::default();
        for subtotal in [10_000, 100_000, 1_000_000] {
            let report = generate_ranking_report(&categories, subtotal, &weights);
            let best = get_best_online_method(&categories, subtotal, &weights).map(|m| m.id.clone());
            assert_eq!(report.recommended, best, "mismatch at subtotal {subtotal}");
        }
    }

    #[test]
    fn test_report_splits_online_and_unavailable() {
        let categories = get_payment_categories();
        let report = generate_ranking_report(&categories, 50_000, &ScoringWeights::default());

        assert_eq!(report.overall.len(), 11);
        assert!(report.overall.iter().all(|s| s.method.is_online()));
        assert!(report.overall.windows(2).all(|w| w[0].score >= w[1].score));

        let unavailable: Vec<(&str, ChannelStatus)> = report
            .unavailable
            .iter()
            .map(|u| (u.id.as_str(), u.status))
            .collect();
        assert_eq!(
            unavailable,
            vec![
                ("linkaja", ChannelStatus::Maintenance),
                ("permata_va", ChannelStatus::Degraded),
            ]
        );
    }

    #[test]
    fn test_report_has_entry_per_category() {
        let categories = get_payment_categories();
        let report = generate_ranking_report(&categories, 50_000, &ScoringWeights::default());
        assert_eq!(report.by_category.len(), categories.len());
        for category in &categories {
            let ranking = &report.by_category[&category.id];
            assert_eq!(ranking.name, category.name);
            assert_eq!(
                ranking.recommended,
                ranking.ranked.first().map(|s| s.method.id.clone())
            );
        }
    }

    #[test]
    fn test_report_serializes_camel_case_keys() {
        let report = generate_ranking_report(&get_payment_categories(), 50_000, &ScoringWeights::default());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("byCategory").is_some());
        assert!(json["overall"][0]["breakdown"].get("costPenalty").is_some());
    }

    #[test]
    fn test_report_with_nothing_online() {
        let mut categories = get_payment_categories();
        for m in categories.iter_mut().flat_map(|c| c.methods.iter_mut()) {
            m.status = ChannelStatus::Down;
        }
        let report = generate_ranking_report(&categories, 50_000, &ScoringWeights::default());
        assert!(report.recommended.is_none());
        assert!(report.overall.is_empty());
        assert_eq!(report.unavailable.len(), 13);
        assert!(report.by_category.values().all(|r| r.recommended.is_none()));
    }
}
