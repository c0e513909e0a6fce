//! CLI tool to generate catalog and ranking files, then replay a checkout session.
//!
//! Produces:
//! - `output/payment_catalog.json` — Payment categories with current statuses
//! - `output/ranking_report.json` — Channel ranking for the demo subtotal
//!
//! Then drives one checkout session through the seeded health feed and
//! prints each fallback decision.

use topup_checkout::catalog::get_payment_categories;
use topup_checkout::config::SimulatorConfig;
use topup_checkout::engine::fallback::{describe_fee_delta, format_rupiah, TracingNotifier};
use topup_checkout::engine::CheckoutEngine;
use topup_checkout::models::checkout::CheckoutPhase;
use topup_checkout::report::generate_ranking_report;
use topup_checkout::simulator::ChannelHealthSimulator;
use topup_checkout::telemetry::init_tracing;

/// Subtotal used for the demo (Rp150.000 of game credits).
const DEMO_SUBTOTAL: u64 = 150_000;
const SESSION_TICKS: usize = 12;

fn main() -> topup_checkout::Result<()> {
    init_tracing("topup_checkout=warn");

    let engine = CheckoutEngine::default();
    let mut categories = get_payment_categories();

    // Catalog and ranking report
    let catalog_json = serde_json::to_string_pretty(&categories)?;
    write_output("output/payment_catalog.json", &catalog_json);
    println!("Wrote output/payment_catalog.json ({} categories)", categories.len());

    let report = generate_ranking_report(&categories, DEMO_SUBTOTAL, engine.weights());
    let report_json = serde_json::to_string_pretty(&report)?;
    write_output("output/ranking_report.json", &report_json);
    println!("Wrote output/ranking_report.json");

    println!();
    println!("=== RANKING FOR {} ===", format_rupiah(DEMO_SUBTOTAL));
    for (rank, scored) in report.overall.iter().enumerate() {
        println!(
            "  {:>2}. {:<26} score {:>7.2}  fee {:>9}  ({:.1}% success, {}ms)",
            rank + 1,
            scored.method.name,
            scored.score,
            format_rupiah(scored.breakdown.fee),
            scored.method.success_rate,
            scored.method.avg_latency_ms
        );
    }
    for unavailable in &report.unavailable {
        println!("      {:<26} {}", unavailable.id, unavailable.status);
    }

    // Replay a checkout session against the health feed
    let sim_config = SimulatorConfig::from_env();
    println!();
    println!("=== CHECKOUT SESSION (seed {}) ===", sim_config.seed);
    let mut feed = ChannelHealthSimulator::new(sim_config);
    let mut session = engine.start_session(TracingNotifier);

    session.on_candidates_changed(&categories, DEMO_SUBTOTAL);
    let Some(first) = session.recommended().map(|m| m.id.clone()) else {
        println!("  No payment method online, nothing to replay.");
        return Ok(());
    };
    session.select_method(&first, &categories, DEMO_SUBTOTAL)?;
    println!("  Selected {}", first);

    for tick in 1..=SESSION_TICKS {
        let changes = feed.tick(&mut categories);
        for change in &changes {
            println!("  [tick {tick:>2}] {} {} -> {}", change.method_id, change.from, change.to);
        }

        match session.on_candidates_changed(&categories, DEMO_SUBTOTAL) {
            CheckoutPhase::Suggesting => {
                if let Some(s) = session.suggestion() {
                    println!(
                        "  [tick {tick:>2}] {} is {}; suggest {} ({})",
                        s.from.name,
                        s.from.status,
                        s.to.name,
                        describe_fee_delta(s.fee_delta())
                    );
                }
                // Odd ticks accept, even ticks decline and pick the recommendation.
                if tick % 2 == 1 {
                    let to = session.confirm_fallback()?;
                    println!("  [tick {tick:>2}] accepted, now paying with {}", to.name);
                } else {
                    session.decline_fallback()?;
                    let pick = session.recommended().map(|m| m.id.clone());
                    println!("  [tick {tick:>2}] declined, picker reopened");
                    if let Some(id) = pick {
                        if session.select_method(&id, &categories, DEMO_SUBTOTAL).is_ok() {
                            println!("  [tick {tick:>2}] picked {id} manually");
                        }
                    }
                }
            }
            CheckoutPhase::NoAlternative => {
                println!("  [tick {tick:>2}] no payment method available");
            }
            CheckoutPhase::Recommending => {
                if let Some(id) = session.recommended().map(|m| m.id.clone()) {
                    session.select_method(&id, &categories, DEMO_SUBTOTAL)?;
                    println!("  [tick {tick:>2}] channels back, picked {id}");
                }
            }
            CheckoutPhase::Idle | CheckoutPhase::DegradedDetected => {}
        }
    }

    println!();
    match session.commit_payment(&categories, DEMO_SUBTOTAL) {
        Ok(method) => println!(
            "Committed payment of {} with {} (fee {})",
            format_rupiah(DEMO_SUBTOTAL),
            method.name,
            format_rupiah(topup_checkout::engine::scoring::calculate_fee(&method, DEMO_SUBTOTAL))
        ),
        Err(e) => println!("Payment not committed: {e}"),
    }
    Ok(())
}

fn write_output(path: &str, contents: &str) {
    std::fs::create_dir_all("output").expect("Failed to create output directory");
    std::fs::write(path, contents).unwrap_or_else(|e| panic!("Failed to write {path}: {e}"));
}
