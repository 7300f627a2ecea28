use super::host::{ParkHost, RideSample};
use serde::{Deserialize, Serialize};

/// Guests strictly above this happiness count as happy.
pub const HAPPY_GUEST_THRESHOLD: u8 = 128;

/// Litter younger than this many ticks does not affect the rating.
pub const LITTER_AGE_THRESHOLD: u32 = 7680;

/// Ride ratings are divided by this before they are summed.
const RIDE_RATING_DIVISOR: i64 = 8;

/// Aggregated counts read from the host simulation for one rating pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkSnapshot {
    pub difficult_park_rating: bool,
    pub guests: GuestSummary,
    pub rides: RideSummary,
    /// Litter items older than [`LITTER_AGE_THRESHOLD`].
    pub litter: u32,
    pub casualty_penalty: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSummary {
    pub total: u32,
    pub happy: u32,
    pub lost: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideSummary {
    pub total: u32,
    /// Sum of `100 - downtime` over all rides.
    pub uptime: u32,
    pub with_ratings: u32,
    /// Sum of excitement ratings, each floored after dividing by 8. A rated
    /// ride with a negative component lowers the sum.
    pub excitement: i64,
    /// Sum of intensity ratings, each floored after dividing by 8.
    pub intensity: i64,
}

impl ParkSnapshot {
    /// Re-reads every field from the host. All fields are recomputed
    /// before any of them is written.
    pub fn refresh<H: ParkHost>(&mut self, host: &H) {
        let guests = summarize_guests(host);
        let rides = summarize_rides(host.rides());
        let litter = count_aged_litter(host);

        *self = Self {
            difficult_park_rating: host.has_difficult_park_rating(),
            guests,
            rides,
            litter,
            casualty_penalty: host.casualty_penalty(),
        };
    }
}

fn summarize_guests<H: ParkHost>(host: &H) -> GuestSummary {
    let mut happy = 0;
    let mut lost = 0;

    for guest in host.guests().filter(|guest| guest.in_park) {
        if guest.happiness > HAPPY_GUEST_THRESHOLD {
            happy += 1;
        }
        if guest.leaving_park && guest.lost {
            lost += 1;
        }
    }

    GuestSummary {
        total: host.guest_count(),
        happy,
        lost,
    }
}

fn summarize_rides(rides: impl Iterator<Item = RideSample>) -> RideSummary {
    let mut summary = RideSummary::default();

    for ride in rides {
        summary.total = summary.total.saturating_add(1);
        summary.uptime = summary
            .uptime
            .saturating_add(u32::from(100u8.saturating_sub(ride.downtime)));

        if ride.has_ratings() {
            summary.excitement = summary
                .excitement
                .saturating_add(scaled_rating(ride.excitement));
            summary.intensity = summary
                .intensity
                .saturating_add(scaled_rating(ride.intensity));
            summary.with_ratings = summary.with_ratings.saturating_add(1);
        }
    }

    summary
}

/// Floors towards negative infinity, so an unrated `-1` scales to `-1`.
fn scaled_rating(raw: i32) -> i64 {
    i64::from(raw).div_euclid(RIDE_RATING_DIVISOR)
}

fn count_aged_litter<H: ParkHost>(host: &H) -> u32 {
    let current_tick = host.ticks_elapsed();
    let aged = host
        .litter()
        .filter(|item| litter_age(current_tick, item.creation_tick) >= LITTER_AGE_THRESHOLD)
        .count();
    u32::try_from(aged).unwrap_or(u32::MAX)
}

/// Age on the host's 32-bit tick counter. Creation ticks ahead of the
/// current tick wrap around instead of going negative.
pub fn litter_age(current_tick: u32, creation_tick: u32) -> u32 {
    current_tick.wrapping_sub(creation_tick)
}
