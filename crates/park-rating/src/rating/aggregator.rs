use super::effect::Effect;
use super::influences::{Evaluation, InfluenceId, INFLUENCES};
use crate::park::{ParkHost, ParkSnapshot};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Park rating of a single park, recalculated incrementally from the
/// influence rule set.
#[derive(Debug, Clone, Default)]
pub struct ParkRating {
    snapshot: ParkSnapshot,
    records: BTreeMap<InfluenceId, Effect>,
    total: i32,
}

impl ParkRating {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes the snapshot from `host` and re-evaluates every influence.
    ///
    /// Returns true if any effect changed since the previous pass.
    pub fn recalculate<H: ParkHost>(&mut self, host: &H) -> bool {
        self.snapshot.refresh(host);
        self.reevaluate()
    }

    /// Re-evaluates every influence against the current snapshot without
    /// consulting the host.
    pub fn reevaluate(&mut self) -> bool {
        let mut any_update = false;
        let mut total: i32 = 0;

        for (order, influence) in INFLUENCES.iter().enumerate() {
            let record = self
                .records
                .entry(influence.id)
                .or_insert_with(|| Effect::new(order));

            if let Evaluation::Updated(effect) = (influence.evaluate)(record, &self.snapshot) {
                trace!(
                    influence = influence.id.key(),
                    active = effect.active,
                    impact = effect.impact,
                    value = %effect.value,
                    "influence updated"
                );
                *record = effect;
                any_update = true;
            }

            total = total.saturating_add(record.contribution());
        }

        self.total = total;
        debug!(total, changed = any_update, "park rating recalculated");
        any_update
    }

    /// Sum of the impacts of all active effects after the last pass.
    pub fn total(&self) -> i32 {
        self.total
    }

    /// Active effects in rule set order.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.records.values().filter(|effect| effect.active)
    }

    /// The stored record for an influence, active or not. `None` until the
    /// first pass has created it.
    pub fn record(&self, id: InfluenceId) -> Option<&Effect> {
        self.records.get(&id)
    }

    pub fn snapshot(&self) -> &ParkSnapshot {
        &self.snapshot
    }

    /// Direct access for hosts that fill the snapshot themselves before
    /// calling [`ParkRating::reevaluate`].
    pub fn snapshot_mut(&mut self) -> &mut ParkSnapshot {
        &mut self.snapshot
    }
}
