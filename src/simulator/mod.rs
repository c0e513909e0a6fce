/// Channel-health feed simulator — flips channel statuses between checkout passes.
///
/// Stands in for the live health feed. Each tick may take online channels
/// down and bring others back. The RNG is seeded, so the same config
/// replays the same sequence of status changes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SimulatorConfig;
use crate::models::payment::{ChannelStatus, PaymentCategory};

/// Statuses an online channel can drop into.
const OUTAGE_STATUSES: [ChannelStatus; 4] = [
    ChannelStatus::Degraded,
    ChannelStatus::Down,
    ChannelStatus::Maintenance,
    ChannelStatus::AutoDisabled,
];

/// One status transition produced by the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub method_id: String,
    pub from: ChannelStatus,
    pub to: ChannelStatus,
}

/// Seeded mock of the channel-health feed.
pub struct ChannelHealthSimulator {
    rng: StdRng,
    config: SimulatorConfig,
}

impl ChannelHealthSimulator {
    /// Creates a simulator seeded from `config.seed`.
    pub fn new(config: SimulatorConfig) -> Self {
        ChannelHealthSimulator {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Advance the feed by one step, mutating statuses in place.
    ///
    /// Every channel rolls once: online channels may fail into a random
    /// outage status, the rest may recover to online.
    pub fn tick(&mut self, categories: &mut [PaymentCategory]) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for method in categories.iter_mut().flat_map(|c| c.methods.iter_mut()) {
            let roll: f64 = self.rng.gen();
            let next = if method.is_online() {
                if roll < self.config.degrade_probability {
                    OUTAGE_STATUSES[self.rng.gen_range(0..OUTAGE_STATUSES.len())]
                } else {
                    continue;
                }
            } else if roll < self.config.recovery_probability {
                ChannelStatus::Online
            } else {
                continue;
            };

            debug!(method_id = %method.id, from = %method.status, to = %next, "health feed update");
            changes.push(StatusChange {
                method_id: method.id.clone(),
                from: method.status,
                to: next,
            });
            method.status = next;
        }
        changes
    }
}

impl Default for ChannelHealthSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

/// Force a channel's status. Returns the change, or None if the id is
/// unknown or the status is already `status`.
pub fn set_status(
    categories: &mut [PaymentCategory],
    method_id: &str,
    status: ChannelStatus,
) -> Option<StatusChange> {
    let method = categories
        .iter_mut()
        .flat_map(|c| c.methods.iter_mut())
        .find(|m| m.id == method_id)?;
    if method.status == status {
        return None;
    }
    let change = StatusChange {
        method_id: method.id.clone(),
        from: method.status,
        to: status,
    };
    method.status = status;
    Some(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_payment_categories;

    fn run(config: SimulatorConfig, ticks: usize) -> Vec<Vec<StatusChange>> {
        let mut sim = ChannelHealthSimulator::new(config);
        let mut categories = get_payment_categories();
        (0..ticks).map(|_| sim.tick(&mut categories)).collect()
    }

    #[test]
    fn test_same_seed_replays_same_changes() {
        let a = run(SimulatorConfig::default(), 20);
        let b = run(SimulatorConfig::default(), 20);
        assert_eq!(a, b);
        assert!(a.iter().any(|tick| !tick.is_empty()), "20 ticks should change something");
    }

    #[test]
    fn test_zero_probabilities_change_nothing() {
        let config = SimulatorConfig {
            seed: 7,
            degrade_probability: 0.0,
            recovery_probability: 0.0,
        };
        assert!(run(config, 10).iter().all(|tick| tick.is_empty()));
    }

    #[test]
    fn test_certain_failure_takes_every_online_channel_down() {
        let config = SimulatorConfig {
            seed: 7,
            degrade_probability: 1.0,
            recovery_probability: 0.0,
        };
        let mut sim = ChannelHealthSimulator::new(config);
        let mut categories = get_payment_categories();
        let changes = sim.tick(&mut categories);

        assert_eq!(changes.len(), 11, "every online channel should fail");
        for change in &changes {
            assert_eq!(change.from, ChannelStatus::Online);
            assert!(!change.to.is_selectable());
        }
        assert!(categories.iter().flat_map(|c| &c.methods).all(|m| !m.is_online()));
    }

    #[test]
    fn test_certain_recovery_brings_everything_back() {
        let config = SimulatorConfig {
            seed: 7,
            degrade_probability: 0.0,
            recovery_probability: 1.0,
        };
        let mut sim = ChannelHealthSimulator::new(config);
        let mut categories = get_payment_categories();
        let changes = sim.tick(&mut categories);

        let ids: Vec<&str> = changes.iter().map(|c| c.method_id.as_str()).collect();
        assert_eq!(ids, vec!["linkaja", "permata_va"]);
        assert!(categories.iter().flat_map(|c| &c.methods).all(|m| m.is_online()));
    }

    #[test]
    fn test_set_status() {
        let mut categories = get_payment_categories();
        let change = set_status(&mut categories, "gopay", ChannelStatus::Down).unwrap();
        assert_eq!(change.from, ChannelStatus::Online);
        assert_eq!(change.to, ChannelStatus::Down);

        assert!(set_status(&mut categories, "gopay", ChannelStatus::Down).is_none());
        assert!(set_status(&mut categories, "linkaja_pay", ChannelStatus::Online).is_none());
    }
}
