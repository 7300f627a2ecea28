use metrics_exporter_prometheus::PrometheusHandle;
use park_rating::park::ParkState;
use park_rating::rating::{ParkRating, RatingReport};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One persistent rating per park, keyed by the caller's park id.
#[derive(Default, Clone)]
pub(crate) struct RatingRegistry {
    parks: Arc<Mutex<HashMap<String, ParkRating>>>,
}

impl RatingRegistry {
    /// A request that panicked mid-update leaves at worst its own park stale,
    /// so a poisoned lock is recovered instead of failing every park.
    fn parks(&self) -> MutexGuard<'_, HashMap<String, ParkRating>> {
        self.parks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recalculates the park's rating against `state`, creating it on first
    /// sight. Returns the change flag and a detached report.
    pub(crate) fn recalculate(&self, park_id: &str, state: &ParkState) -> (bool, RatingReport) {
        let mut guard = self.parks();
        let rating = guard.entry(park_id.to_string()).or_insert_with(|| {
            info!(park_id, "tracking new park");
            ParkRating::new()
        });

        let changed = rating.recalculate(state);
        (changed, RatingReport::capture(rating))
    }

    /// Last computed report, without touching the rating.
    pub(crate) fn report(&self, park_id: &str) -> Option<RatingReport> {
        let guard = self.parks();
        guard.get(park_id).map(RatingReport::capture)
    }

    pub(crate) fn forget(&self, park_id: &str) -> bool {
        let mut guard = self.parks();
        guard.remove(park_id).is_some()
    }
}
