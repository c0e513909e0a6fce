/// Channel scoring for payment method recommendation.
///
/// Ranks online channels by a weighted blend of business priority,
/// success rate, fee and latency. Fee and latency are normalized against
/// whatever candidate set the caller passes in, so a score is only
/// comparable with scores from the same pass.
use std::cmp::Ordering;

use tracing::debug;

use crate::config::ScoringWeights;
use crate::models::payment::{PaymentCategory, PaymentMethod, ScoreBreakdown, ScoredMethod};

/// Fee for `subtotal`, rounded to the nearest whole currency unit.
pub fn calculate_fee(method: &PaymentMethod, subtotal: u64) -> u64 {
    let fee = method.fee.flat as f64 + subtotal as f64 * method.fee.percent / 100.0;
    fee.round() as u64
}

/// Rescale `value` from `[min, max]` into `[0, 1]`.
///
/// Returns 0 when `max == min`: a dimension where every candidate is equal
/// penalizes nobody.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min)
}

/// Fee and latency spread over one candidate set.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_fee: f64,
    max_fee: f64,
    min_latency: f64,
    max_latency: f64,
}

impl Bounds {
    fn single(method: &PaymentMethod, subtotal: u64) -> Self {
        let fee = calculate_fee(method, subtotal) as f64;
        let latency = method.avg_latency_ms as f64;
        Bounds {
            min_fee: fee,
            max_fee: fee,
            min_latency: latency,
            max_latency: latency,
        }
    }

    fn of<'a>(candidates: impl IntoIterator<Item = &'a PaymentMethod>, subtotal: u64) -> Option<Self> {
        candidates.into_iter().fold(None, |acc, m| {
            let next = Bounds::single(m, subtotal);
            Some(match acc {
                None => next,
                Some(b) => Bounds {
                    min_fee: b.min_fee.min(next.min_fee),
                    max_fee: b.max_fee.max(next.max_fee),
                    min_latency: b.min_latency.min(next.min_latency),
                    max_latency: b.max_latency.max(next.max_latency),
                },
            })
        })
    }
}

fn score_with_bounds(
    method: &PaymentMethod,
    subtotal: u64,
    bounds: Bounds,
    weights: &ScoringWeights,
) -> ScoredMethod {
    let fee = calculate_fee(method, subtotal);
    let base_score = 100.0 - method.priority as f64;
    let srate_score = method.success_rate;
    let cost_penalty = normalize(fee as f64, bounds.min_fee, bounds.max_fee) * 100.0;
    let latency_penalty = normalize(
        method.avg_latency_ms as f64,
        bounds.min_latency,
        bounds.max_latency,
    ) * 100.0;

    let raw = base_score * weights.base + srate_score * weights.success_rate
        - cost_penalty * weights.cost
        - latency_penalty * weights.latency;

    ScoredMethod {
        method: method.clone(),
        score: raw.max(0.0),
        breakdown: ScoreBreakdown {
            fee,
            base_score,
            srate_score,
            cost_penalty,
            latency_penalty,
        },
    }
}

/// Score `method` against `all_methods`, with the component breakdown.
///
/// `all_methods` is the competing set that fixes the normalization bounds;
/// it normally contains `method` itself.
pub fn score_method(
    method: &PaymentMethod,
    subtotal: u64,
    all_methods: &[PaymentMethod],
    weights: &ScoringWeights,
) -> ScoredMethod {
    debug_assert!(!all_methods.is_empty(), "scoring against an empty candidate set");
    let bounds =
        Bounds::of(all_methods, subtotal).unwrap_or_else(|| Bounds::single(method, subtotal));
    score_with_bounds(method, subtotal, bounds, weights)
}

/// Recommendation score of `method` among `all_methods`, floored at 0.
pub fn calculate_channel_score(
    method: &PaymentMethod,
    subtotal: u64,
    all_methods: &[PaymentMethod],
    weights: &ScoringWeights,
) -> f64 {
    score_method(method, subtotal, all_methods, weights).score
}

/// Rank the online channels among `candidates`, best first.
///
/// Non-online channels are dropped before normalization, so they never
/// shift the bounds. Equal scores keep their input order.
pub fn rank_methods<'a>(
    candidates: impl IntoIterator<Item = &'a PaymentMethod>,
    subtotal: u64,
    weights: &ScoringWeights,
) -> Vec<ScoredMethod> {
    let online: Vec<&PaymentMethod> = candidates.into_iter().filter(|m| m.is_online()).collect();
    let Some(bounds) = Bounds::of(online.iter().copied(), subtotal) else {
        return Vec::new();
    };

    let mut scored: Vec<ScoredMethod> = online
        .into_iter()
        .map(|m| score_with_bounds(m, subtotal, bounds, weights))
        .collect();

    // sort_by is stable, which keeps ties in input order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

/// Top-scored online channel among `candidates`, or None if none is online.
///
/// Same result as the head of [`rank_methods`], without cloning.
pub fn best_online<'a>(
    candidates: impl IntoIterator<Item = &'a PaymentMethod>,
    subtotal: u64,
    weights: &ScoringWeights,
) -> Option<&'a PaymentMethod> {
    let online: Vec<&'a PaymentMethod> = candidates.into_iter().filter(|m| m.is_online()).collect();
    let bounds = Bounds::of(online.iter().copied(), subtotal)?;

    let mut best: Option<(&'a PaymentMethod, f64)> = None;
    for method in online {
        let score = score_with_bounds(method, subtotal, bounds, weights).score;
        match best {
            // Strictly greater, so the first of equal scores wins.
            Some((_, top)) if score <= top => {}
            _ => best = Some((method, score)),
        }
    }

    if let Some((method, score)) = best {
        debug!(method_id = %method.id, score, subtotal, "best online channel");
    }
    best.map(|(method, _)| method)
}

/// Best online channel across every category, normalized over all of them.
pub fn get_best_online_method<'a>(
    categories: &'a [PaymentCategory],
    subtotal: u64,
    weights: &ScoringWeights,
) -> Option<&'a PaymentMethod> {
    best_online(categories.iter().flat_map(|c| c.methods.iter()), subtotal, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::{ChannelStatus, PaymentFee};

    fn method(
        id: &str,
        priority: i32,
        success_rate: f64,
        percent: f64,
        avg_latency_ms: u64,
    ) -> PaymentMethod {
        PaymentMethod {
            id: id.to_string(),
            name: id.to_string(),
            fee: PaymentFee { flat: 0, percent },
            status: ChannelStatus::Online,
            priority,
            success_rate,
            avg_latency_ms,
        }
    }

    fn category(methods: Vec<PaymentMethod>) -> Vec<PaymentCategory> {
        vec![PaymentCategory {
            id: "all".to_string(),
            name: "All".to_string(),
            methods,
        }]
    }

    fn weights() -> ScoringWeights {
        ScoringWeights::default()
    }

    #[test]
    fn test_fee_rounds_to_nearest_unit() {
        let mut m = method("a", 1, 99.0, 0.7, 100);
        assert_eq!(calculate_fee(&m, 100_000), 700);
        m.fee = PaymentFee { flat: 1000, percent: 1.5 };
        assert_eq!(calculate_fee(&m, 33_333), 1500); // 1000 + 499.995
        m.fee = PaymentFee { flat: 0, percent: 0.5 };
        assert_eq!(calculate_fee(&m, 101), 1); // 0.505
    }

    #[test]
    fn test_fee_at_zero_subtotal_is_flat() {
        let mut m = method("a", 1, 99.0, 2.5, 100);
        m.fee.flat = 4000;
        assert_eq!(calculate_fee(&m, 0), 4000);
        assert_eq!(calculate_fee(&m, 0), calculate_fee(&m, 0));
    }

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(0.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(10.0, 0.0, 10.0), 1.0);
        for v in [850.0, 900.0, 1000.0, 1200.0] {
            let n = normalize(v, 850.0, 1200.0);
            assert!((0.0..=1.0).contains(&n), "normalize({v}) = {n} out of [0,1]");
        }
    }

    #[test]
    fn test_normalize_degenerate_range_is_zero() {
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
        assert_eq!(normalize(99.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn test_score_matches_weighted_formula() {
        let a = method("a", 1, 99.8, 0.7, 850);
        let b = method("b", 10, 99.5, 1.5, 1200);
        let all = vec![a.clone(), b.clone()];

        let score_a = calculate_channel_score(&a, 100_000, &all, &weights());
        let score_b = calculate_channel_score(&b, 100_000, &all, &weights());

        // a: 99 + 99.8 * 1.2, no penalties (cheapest and fastest).
        assert!((score_a - 218.76).abs() < 1e-9, "score_a = {score_a}");
        // b: 90 + 99.5 * 1.2 - 100 * 0.8 - 100 * 0.4
        assert!((score_b - 89.4).abs() < 1e-9, "score_b = {score_b}");
    }

    #[test]
    fn test_score_is_floored_at_zero() {
        let bad = method("bad", 250, 5.0, 5.0, 5000);
        let good = method("good", 1, 99.0, 0.1, 100);
        let all = vec![bad.clone(), good];
        assert_eq!(calculate_channel_score(&bad, 50_000, &all, &weights()), 0.0);
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = method("a", 3, 97.0, 1.0, 900);
        let b = method("b", 7, 98.5, 0.4, 1500);
        let all = vec![a.clone(), b];
        let first = calculate_channel_score(&a, 75_000, &all, &weights());
        for _ in 0..10 {
            assert_eq!(calculate_channel_score(&a, 75_000, &all, &weights()), first);
        }
    }

    #[test]
    fn test_higher_success_rate_never_lowers_score() {
        let other = method("other", 5, 97.0, 1.0, 1000);
        let mut previous = 0.0;
        for rate in [80.0, 90.0, 95.0, 99.0, 100.0] {
            let m = method("m", 5, rate, 0.8, 900);
            let all = vec![m.clone(), other.clone()];
            let score = calculate_channel_score(&m, 100_000, &all, &weights());
            assert!(score >= previous, "score dropped from {previous} to {score} at rate {rate}");
            previous = score;
        }
    }

    #[test]
    fn test_higher_fee_never_raises_score() {
        let other = method("other", 5, 97.0, 1.0, 1000);
        let mut previous = f64::MAX;
        for percent in [0.0, 0.5, 1.0, 2.0, 4.0] {
            let m = method("m", 5, 98.0, percent, 900);
            let all = vec![m.clone(), other.clone()];
            let score = calculate_channel_score(&m, 100_000, &all, &weights());
            assert!(score <= previous, "score rose from {previous} to {score} at {percent}%");
            previous = score;
        }
    }

    #[test]
    fn test_identical_fee_and_latency_reduce_to_base_and_success_rate() {
        let a = method("a", 2, 97.0, 1.0, 1000);
        let b = method("b", 8, 99.5, 1.0, 1000);
        let ranked = rank_methods(&[a, b], 100_000, &weights());

        for s in &ranked {
            assert_eq!(s.breakdown.cost_penalty, 0.0);
            assert_eq!(s.breakdown.latency_penalty, 0.0);
            let expected = (100.0 - s.method.priority as f64) + s.method.success_rate * 1.2;
            assert!((s.score - expected).abs() < 1e-9);
        }
        // a: 98 + 116.4 = 214.4, b: 92 + 119.4 = 211.4
        assert_eq!(ranked[0].method.id, "a");
    }

    #[test]
    fn test_rank_skips_non_online_and_sorts_descending() {
        let mut down = method("down", 1, 100.0, 0.0, 10);
        down.status = ChannelStatus::Down;
        let mid = method("mid", 5, 97.0, 1.0, 1000);
        let top = method("top", 1, 99.0, 0.5, 800);

        let ranked = rank_methods(&[down, mid, top], 100_000, &weights());
        let ids: Vec<&str> = ranked.iter().map(|s| s.method.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "mid"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let first = method("first", 5, 98.0, 1.0, 1000);
        let second = method("second", 5, 98.0, 1.0, 1000);

        let forward = vec![first.clone(), second.clone()];
        let ranked = rank_methods(&forward, 10_000, &weights());
        assert_eq!(ranked[0].method.id, "first");
        let best = best_online(&forward, 10_000, &weights());
        assert_eq!(best.map(|m| m.id.as_str()), Some("first"));

        let reversed = vec![second, first];
        let ranked = rank_methods(&reversed, 10_000, &weights());
        assert_eq!(ranked[0].method.id, "second");
        let best = best_online(&reversed, 10_000, &weights());
        assert_eq!(best.map(|m| m.id.as_str()), Some("second"));
    }

    #[test]
    fn test_best_online_prefers_stronger_channel() {
        let a = method("a", 1, 99.8, 0.7, 850);
        let b = method("b", 10, 99.5, 1.5, 1200);
        let categories = category(vec![b, a]);
        let best = get_best_online_method(&categories, 100_000, &weights());
        assert_eq!(best.map(|m| m.id.as_str()), Some("a"));
    }

    #[test]
    fn test_best_online_is_none_without_online_channels() {
        let mut a = method("a", 1, 99.8, 0.7, 850);
        a.status = ChannelStatus::Maintenance;
        let mut b = method("b", 10, 99.5, 1.5, 1200);
        b.status = ChannelStatus::AutoDisabled;
        let categories = category(vec![a, b]);
        assert!(get_best_online_method(&categories, 100_000, &weights()).is_none());
        assert!(get_best_online_method(&[], 100_000, &weights()).is_none());
    }

    #[test]
    fn test_best_online_agrees_with_rank_head() {
        let methods = vec![
            method("a", 3, 97.5, 1.1, 900),
            method("b", 2, 98.9, 1.8, 1300),
            method("c", 12, 99.9, 0.2, 700),
            method("d", 1, 95.0, 0.0, 2000),
        ];
        for subtotal in [0, 10_000, 250_000, 5_000_000] {
            let head = rank_methods(&methods, subtotal, &weights())
                .into_iter()
                .next()
                .map(|s| s.method.id);
            let best = best_online(&methods, subtotal, &weights()).map(|m| m.id.clone());
            assert_eq!(head, best, "disagreement at subtotal {subtotal}");
        }
    }
}
