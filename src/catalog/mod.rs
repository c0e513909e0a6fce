//! Payment channels offered by the storefront checkout.
//!
//! Mock catalog of Indonesian top-up payment rails grouped the way the
//! method picker shows them. Fees are in Rupiah; success rates and
//! latencies are rolling figures from the channel-health feed. A couple of
//! channels start out non-online so the picker always has something greyed out.

use crate::models::payment::{ChannelStatus, PaymentCategory, PaymentFee, PaymentMethod};

#[allow(clippy::too_many_arguments)]
fn channel(
    id: &str,
    name: &str,
    flat: u64,
    percent: f64,
    status: ChannelStatus,
    priority: i32,
    success_rate: f64,
    avg_latency_ms: u64,
) -> PaymentMethod {
    PaymentMethod {
        id: id.to_string(),
        name: name.to_string(),
        fee: PaymentFee { flat, percent },
        status,
        priority,
        success_rate,
        avg_latency_ms,
    }
}

/// Returns the checkout's payment categories in display order.
///
/// - E-Wallet: instant, percentage fee
/// - Virtual Account: flat fee, slower confirmation, very reliable
/// - QRIS: cheap and fast, one rail for every wallet
/// - Retail Outlet: pay at the counter, highest flat fee
pub fn get_payment_categories() -> Vec<PaymentCategory> {
    use ChannelStatus::*;

    vec![
        PaymentCategory {
            id: "ewallet".to_string(),
            name: "E-Wallet".to_string(),
            methods: vec![
                channel("gopay", "GoPay", 0, 0.7, Online, 1, 99.8, 850),
                channel("dana", "DANA", 0, 1.5, Online, 2, 99.5, 1000),
                channel("ovo", "OVO", 0, 1.5, Online, 3, 99.2, 1200),
                channel("shopeepay", "ShopeePay", 0, 1.8, Online, 4, 98.9, 1100),
                channel("linkaja", "LinkAja", 0, 1.5, Maintenance, 8, 97.5, 1600),
            ],
        },
        PaymentCategory {
            id: "virtual_account".to_string(),
            name: "Virtual Account".to_string(),
            methods: vec![
                channel("bca_va", "BCA Virtual Account", 4000, 0.0, Online, 5, 99.9, 2500),
                channel("mandiri_va", "Mandiri Virtual Account", 4000, 0.0, Online, 6, 99.7, 2600),
                channel("bni_va", "BNI Virtual Account", 4000, 0.0, Online, 6, 99.6, 2800),
                channel("bri_va", "BRI Virtual Account", 3500, 0.0, Online, 7, 99.4, 3000),
                channel("permata_va", "Permata Virtual Account", 3000, 0.0, Degraded, 12, 98.8, 3200),
            ],
        },
        PaymentCategory {
            id: "qris".to_string(),
            name: "QRIS".to_string(),
            methods: vec![channel("qris", "QRIS", 0, 0.7, Online, 2, 99.6, 900)],
        },
        PaymentCategory {
            id: "retail".to_string(),
            name: "Retail Outlet".to_string(),
            methods: vec![
                channel("alfamart", "Alfamart", 5000, 0.0, Online, 15, 97.8, 5000),
                channel("indomaret", "Indomaret", 5000, 0.0, Online, 15, 97.5, 5200),
            ],
        },
    ]
}

/// Returns every channel across all categories, in display order.
pub fn get_all_methods() -> Vec<PaymentMethod> {
    get_payment_categories()
        .into_iter()
        .flat_map(|c| c.methods)
        .collect()
}
