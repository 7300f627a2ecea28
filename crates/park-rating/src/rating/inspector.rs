use super::aggregator::ParkRating;
use super::view::RatingReport;
use crate::park::ParkHost;

pub const DEFAULT_POLL_INTERVAL_TICKS: u32 = 10;

/// Polls a [`ParkRating`] on the host's tick clock and hands out a fresh
/// report only when something changed.
#[derive(Debug, Clone)]
pub struct RatingInspector {
    rating: ParkRating,
    interval_ticks: u32,
    /// `None` until the first poll after construction or [`RatingInspector::reset`].
    next_update: Option<u32>,
}

impl Default for RatingInspector {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_TICKS)
    }
}

impl RatingInspector {
    pub fn new(interval_ticks: u32) -> Self {
        Self {
            rating: ParkRating::new(),
            interval_ticks: interval_ticks.max(1),
            next_update: None,
        }
    }

    /// Makes the next [`RatingInspector::check`] run regardless of the tick.
    pub fn reset(&mut self) {
        self.next_update = None;
    }

    /// Recalculates if the poll interval has elapsed. Returns a report when
    /// the rating changed, `None` when the poll was skipped or nothing moved.
    pub fn check<H: ParkHost>(&mut self, host: &H) -> Option<RatingReport> {
        let tick = host.ticks_elapsed();
        if self.next_update.is_some_and(|next| is_before(tick, next)) {
            return None;
        }

        self.next_update = Some(tick.wrapping_add(self.interval_ticks));

        if self.rating.recalculate(host) {
            Some(RatingReport::capture(&self.rating))
        } else {
            None
        }
    }

    pub fn rating(&self) -> &ParkRating {
        &self.rating
    }

    pub fn next_update(&self) -> Option<u32> {
        self.next_update
    }
}

/// Compares positions on the wrapping 32-bit tick counter by signed distance.
fn is_before(tick: u32, next_update: u32) -> bool {
    (tick.wrapping_sub(next_update) as i32) < 0
}
