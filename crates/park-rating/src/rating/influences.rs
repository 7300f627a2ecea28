//! The rule set: every influence that can push the park rating up or down.
//!
//! Each rule reads the snapshot, derives a cheap cache key from the fields
//! it depends on, and only rebuilds its effect when that key moved or the
//! effect was inactive. Rules whose input has no meaningful value (no rides,
//! no guests) deactivate their effect instead of computing a degenerate one.

use super::effect::Effect;
use crate::park::ParkSnapshot;
use serde::{Deserialize, Serialize};

/// Identifies an influence. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceId {
    Difficulty,
    Guests,
    HappyGuests,
    LostGuests,
    RideUptime,
    RideAverageExcitement,
    RideAverageIntensity,
    RideTotalExcitement,
    RideTotalIntensity,
    Litter,
    Casualties,
}

impl InfluenceId {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Guests => "guests",
            Self::HappyGuests => "happy_guests",
            Self::LostGuests => "lost_guests",
            Self::RideUptime => "ride_uptime",
            Self::RideAverageExcitement => "ride_average_excitement",
            Self::RideAverageIntensity => "ride_average_intensity",
            Self::RideTotalExcitement => "ride_total_excitement",
            Self::RideTotalIntensity => "ride_total_intensity",
            Self::Litter => "litter",
            Self::Casualties => "casualties",
        }
    }
}

/// Outcome of running one influence against its current effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Unchanged,
    Updated(Effect),
}

impl Evaluation {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

pub type Evaluate = fn(&Effect, &ParkSnapshot) -> Evaluation;

/// An entry of the rule set.
#[derive(Clone, Copy)]
pub struct Influence {
    pub id: InfluenceId,
    pub evaluate: Evaluate,
}

/// All influences, in evaluation order. An influence's index here is the
/// `order` stored in its effect.
pub static INFLUENCES: [Influence; 11] = [
    Influence {
        id: InfluenceId::Difficulty,
        evaluate: difficulty,
    },
    Influence {
        id: InfluenceId::Guests,
        evaluate: number_of_guests,
    },
    Influence {
        id: InfluenceId::HappyGuests,
        evaluate: number_of_happy_guests,
    },
    Influence {
        id: InfluenceId::LostGuests,
        evaluate: number_of_lost_guests,
    },
    Influence {
        id: InfluenceId::RideUptime,
        evaluate: ride_uptime,
    },
    Influence {
        id: InfluenceId::RideAverageExcitement,
        evaluate: ride_average_excitement,
    },
    Influence {
        id: InfluenceId::RideAverageIntensity,
        evaluate: ride_average_intensity,
    },
    Influence {
        id: InfluenceId::RideTotalExcitement,
        evaluate: ride_total_excitement,
    },
    Influence {
        id: InfluenceId::RideTotalIntensity,
        evaluate: ride_total_intensity,
    },
    Influence {
        id: InfluenceId::Litter,
        evaluate: litter,
    },
    Influence {
        id: InfluenceId::Casualties,
        evaluate: casualties,
    },
];

const DIFFICULTY_PENALTY: i32 = -100;
const GUEST_CAP: u32 = 2000;
const GUESTS_PER_POINT: u32 = 13;
const FREE_LOST_GUESTS: u32 = 25;
const LOST_GUEST_PENALTY: i32 = -7;
const TARGET_AVERAGE_EXCITEMENT: f64 = 46.0;
const TARGET_AVERAGE_INTENSITY: f64 = 65.0;
const RIDE_TOTAL_RATING_CAP: i64 = 1000;
const LITTER_CAP: u32 = 150;
const LITTER_PENALTY: i32 = -4;
/// Converts summed ride ratings back to the in-game display scale.
const RATING_DISPLAY_SCALE: f64 = 0.08;

/// Display and scoring fields of an active effect.
struct Reading {
    name: &'static str,
    value: String,
    impact: i32,
    maximum: Option<i32>,
    note: &'static str,
}

fn is_cached(current: &Effect, key: u64) -> bool {
    current.active && current.cache == key
}

fn activate(current: &Effect, cache: u64, reading: Reading) -> Evaluation {
    Evaluation::Updated(Effect {
        active: true,
        name: reading.name.to_string(),
        value: reading.value,
        impact: reading.impact,
        note: reading.note.to_string(),
        maximum: reading.maximum,
        cache,
        order: current.order,
    })
}

/// Only reports a change when the effect was active before.
fn deactivate(current: &Effect) -> Evaluation {
    if !current.active {
        return Evaluation::Unchanged;
    }

    Evaluation::Updated(Effect {
        active: false,
        cache: 0,
        ..current.clone()
    })
}

/// Packs two counts into one key so a change in either is detected.
fn pack(high: u32, low: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Parks with the "difficult park rating" scenario option take a flat penalty.
fn difficulty(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    let enabled = park.difficult_park_rating;
    if current.active == enabled {
        return Evaluation::Unchanged;
    }
    if !enabled {
        return deactivate(current);
    }

    activate(
        current,
        1,
        Reading {
            name: "Difficulty",
            value: "enabled".to_string(),
            impact: DIFFICULTY_PENALTY,
            maximum: None,
            note: "Setting for 'difficult park rating'",
        },
    )
}

fn number_of_guests(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    let guest_count = park.guests.total;
    let key = u64::from(guest_count);
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    let impact = guest_count.min(GUEST_CAP) / GUESTS_PER_POINT;
    activate(
        current,
        key,
        Reading {
            name: "Guests",
            value: format!("{guest_count}/{GUEST_CAP}"),
            impact: saturating_i32(impact),
            maximum: Some(153),
            note: "+1 for every 13 guests, max. +153",
        },
    )
}

/// Rewards the share of happy guests, up to 83%.
fn number_of_happy_guests(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    let total = park.guests.total;
    if total == 0 {
        return deactivate(current);
    }

    let happy = park.guests.happy;
    let key = pack(total, happy);
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    // floor(2 * min(250, happy * 300 / total)) without going through floats.
    let impact = (600 * u64::from(happy) / u64::from(total)).min(500);
    let percentage = 100 * u64::from(happy) / u64::from(total);
    activate(
        current,
        key,
        Reading {
            name: "Happy guests",
            value: format!("{happy}/{total} ({percentage}%)"),
            impact: impact as i32,
            maximum: Some(500),
            note: "+6 for every percent, max. +500 (83%)",
        },
    )
}

fn number_of_lost_guests(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    let lost = park.guests.lost;
    let key = u64::from(lost);
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    let impact = if lost > FREE_LOST_GUESTS {
        saturating_i32(lost - FREE_LOST_GUESTS).saturating_mul(LOST_GUEST_PENALTY)
    } else {
        0
    };
    activate(
        current,
        key,
        Reading {
            name: "Lost guests",
            value: lost.to_string(),
            impact,
            maximum: None,
            note: "-7 per lost guest after the first 25",
        },
    )
}

fn ride_uptime(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    let ride_count = park.rides.total;
    if ride_count == 0 {
        return deactivate(current);
    }

    let total_uptime = park.rides.uptime;
    let key = pack(total_uptime, ride_count);
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    let average_uptime = total_uptime / ride_count;
    activate(
        current,
        key,
        Reading {
            name: "Average ride uptime",
            value: format!("{average_uptime}%"),
            impact: saturating_i32(average_uptime).saturating_mul(2),
            maximum: Some(200),
            note: "+2 for every percent, max. +200",
        },
    )
}

/// Penalizes parks whose rides are on average too gentle or too wild.
fn ride_average_excitement(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    ride_average_rating(
        current,
        park.rides.excitement,
        park.rides.with_ratings,
        TARGET_AVERAGE_EXCITEMENT,
        "Average ride excitement",
        "3.68",
    )
}

fn ride_average_intensity(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    ride_average_rating(
        current,
        park.rides.intensity,
        park.rides.with_ratings,
        TARGET_AVERAGE_INTENSITY,
        "Average ride intensity",
        "5.20",
    )
}

fn ride_average_rating(
    current: &Effect,
    rating_total: i64,
    with_ratings: u32,
    target: f64,
    name: &'static str,
    target_label: &str,
) -> Evaluation {
    if with_ratings == 0 {
        return deactivate(current);
    }

    let average = rating_total as f64 / f64::from(with_ratings);
    let key = average.to_bits();
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    activate(
        current,
        key,
        Reading {
            name,
            value: format!(
                "{:.2}/{target_label}",
                average * RATING_DISPLAY_SCALE
            ),
            impact: average_rating_impact(average, target),
            maximum: Some(50),
            note: "Closer is better, max. +50",
        },
    )
}

/// 50 points minus one for every two units between the average and target.
fn average_rating_impact(average: f64, target: f64) -> i32 {
    let distance = (average - target).abs();
    50 - ((distance / 2.0).floor() as i32).min(50)
}

fn ride_total_excitement(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    ride_total_rating(current, park.rides.excitement, "Total ride excitement")
}

fn ride_total_intensity(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    ride_total_rating(current, park.rides.intensity, "Total ride intensity")
}

fn ride_total_rating(current: &Effect, rating_total: i64, name: &'static str) -> Evaluation {
    // Bit pattern of the sum; negative totals get keys of their own.
    let key = rating_total as u64;
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    activate(
        current,
        key,
        Reading {
            name,
            value: format!(
                "{:.1}/80.0",
                rating_total as f64 * RATING_DISPLAY_SCALE
            ),
            impact: capped_total_impact(rating_total),
            maximum: Some(100),
            note: "Max. +100",
        },
    )
}

/// floor(min(total, 1000) / 10), flooring negative totals downwards.
fn capped_total_impact(rating_total: i64) -> i32 {
    let capped = rating_total.min(RIDE_TOTAL_RATING_CAP).div_euclid(10);
    i32::try_from(capped).unwrap_or(i32::MIN)
}

fn litter(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    let litter_count = park.litter;
    let key = u64::from(litter_count);
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    activate(
        current,
        key,
        Reading {
            name: "Amount of litter",
            value: format!("{litter_count}/{LITTER_CAP}"),
            impact: LITTER_PENALTY * saturating_i32(litter_count.min(LITTER_CAP)),
            maximum: None,
            note: "-4 per piece of litter",
        },
    )
}

/// Penalty points from crashed vehicles and recently drowned guests.
fn casualties(current: &Effect, park: &ParkSnapshot) -> Evaluation {
    let penalty = park.casualty_penalty;
    let key = u64::from(penalty);
    if is_cached(current, key) {
        return Evaluation::Unchanged;
    }

    activate(
        current,
        key,
        Reading {
            name: "Casualty penalty",
            value: format!("{penalty}/1000"),
            impact: -saturating_i32(penalty),
            maximum: None,
            note: "-200 per crashed train until -500, -25 per drowned guest",
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::park::{GuestSummary, RideSummary};

    fn run(id: InfluenceId, park: &ParkSnapshot) -> Effect {
        let (order, influence) = INFLUENCES
            .iter()
            .enumerate()
            .find(|(_, influence)| influence.id == id)
            .expect("influence registered");

        match (influence.evaluate)(&Effect::new(order), park) {
            Evaluation::Updated(effect) => effect,
            Evaluation::Unchanged => panic!("expected {id:?} to produce an effect"),
        }
    }

    fn with_guests(total: u32, happy: u32, lost: u32) -> ParkSnapshot {
        ParkSnapshot {
            guests: GuestSummary { total, happy, lost },
            ..ParkSnapshot::default()
        }
    }

    fn with_rides(rides: RideSummary) -> ParkSnapshot {
        ParkSnapshot {
            rides,
            ..ParkSnapshot::default()
        }
    }

    #[test]
    fn rule_set_follows_declaration_order() {
        for pair in INFLUENCES.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
        assert_eq!(INFLUENCES[0].id, InfluenceId::Difficulty);
        assert_eq!(INFLUENCES[10].id, InfluenceId::Casualties);
    }

    #[test]
    fn guests_award_one_point_per_thirteen() {
        let effect = run(InfluenceId::Guests, &with_guests(1310, 0, 0));
        assert_eq!(effect.impact, 100);
        assert!(effect.value.contains("1310"), "{}", effect.value);
        assert_eq!(effect.order, 1);
    }

    #[test]
    fn guests_cap_at_two_thousand() {
        let effect = run(InfluenceId::Guests, &with_guests(2600, 0, 0));
        assert_eq!(effect.impact, 153);
        assert!(effect.value.contains("2600"));
        assert!(effect.is_at_maximum());
    }

    #[test]
    fn happy_guests_scale_with_share() {
        let full = run(InfluenceId::HappyGuests, &with_guests(500, 500, 0));
        assert_eq!(full.impact, 500);
        assert!(full.value.contains("500/500"));

        let half = run(InfluenceId::HappyGuests, &with_guests(500, 250, 0));
        assert_eq!(half.impact, 300);
        assert_eq!(half.value, "250/500 (50%)");

        let none = run(InfluenceId::HappyGuests, &with_guests(500, 0, 0));
        assert_eq!(none.impact, 0);
        assert!(none.value.contains("0/500"));
    }

    #[test]
    fn happy_guests_floor_after_doubling() {
        // 300 / 7 = 42.857..., doubled is 85.71..., floored to 85.
        let effect = run(InfluenceId::HappyGuests, &with_guests(7, 1, 0));
        assert_eq!(effect.impact, 85);
    }

    #[test]
    fn happy_guests_without_guests_stay_inactive() {
        let park = with_guests(0, 0, 0);
        let evaluation = number_of_happy_guests(&Effect::new(2), &park);
        assert_eq!(evaluation, Evaluation::Unchanged);
    }

    #[test]
    fn lost_guests_penalize_past_twenty_five() {
        let many = run(InfluenceId::LostGuests, &with_guests(0, 0, 500));
        assert_eq!(many.impact, -3325);
        assert!(many.value.contains("500"));

        let few = run(InfluenceId::LostGuests, &with_guests(0, 0, 25));
        assert_eq!(few.impact, 0);
        assert!(few.active);
    }

    #[test]
    fn ride_uptime_doubles_average_percentage() {
        let rides = |uptime| RideSummary {
            total: 10,
            uptime,
            ..RideSummary::default()
        };

        let full = run(InfluenceId::RideUptime, &with_rides(rides(1000)));
        assert_eq!(full.impact, 200);
        assert_eq!(full.value, "100%");

        let half = run(InfluenceId::RideUptime, &with_rides(rides(500)));
        assert_eq!(half.impact, 100);
        assert_eq!(half.value, "50%");

        let none = run(InfluenceId::RideUptime, &with_rides(rides(0)));
        assert_eq!(none.impact, 0);
        assert_eq!(none.value, "0%");
    }

    #[test]
    fn average_excitement_on_target_scores_maximum() {
        let effect = run(
            InfluenceId::RideAverageExcitement,
            &with_rides(RideSummary {
                total: 10,
                with_ratings: 10,
                excitement: 460,
                ..RideSummary::default()
            }),
        );

        assert_eq!(effect.impact, 50);
        assert_eq!(effect.value, "3.68/3.68");
        assert!(effect.is_at_maximum());
    }

    #[test]
    fn average_intensity_loses_a_point_per_two_units() {
        let effect = run(
            InfluenceId::RideAverageIntensity,
            &with_rides(RideSummary {
                total: 4,
                with_ratings: 4,
                intensity: 4 * 75,
                ..RideSummary::default()
            }),
        );

        assert_eq!(effect.impact, 45);
        assert_eq!(effect.value, "6.00/5.20");
    }

    #[test]
    fn average_rating_impact_bottoms_out_at_zero() {
        assert_eq!(average_rating_impact(46.0, 46.0), 50);
        assert_eq!(average_rating_impact(47.5, 46.0), 50);
        assert_eq!(average_rating_impact(42.0, 46.0), 48);
        assert_eq!(average_rating_impact(500.0, 46.0), 0);
    }

    #[test]
    fn total_ratings_cap_at_one_hundred() {
        let effect = run(
            InfluenceId::RideTotalExcitement,
            &with_rides(RideSummary {
                excitement: 1500,
                ..RideSummary::default()
            }),
        );
        assert_eq!(effect.impact, 100);
        assert_eq!(effect.value, "120.0/80.0");

        let effect = run(
            InfluenceId::RideTotalIntensity,
            &with_rides(RideSummary {
                intensity: 455,
                ..RideSummary::default()
            }),
        );
        assert_eq!(effect.impact, 45);
        assert_eq!(effect.value, "36.4/80.0");
    }

    #[test]
    fn negative_rating_totals_floor_downwards() {
        assert_eq!(capped_total_impact(-1), -1);
        assert_eq!(capped_total_impact(-25), -3);
        assert_eq!(capped_total_impact(i64::MAX), 100);

        let effect = run(
            InfluenceId::RideTotalExcitement,
            &with_rides(RideSummary {
                excitement: -2,
                ..RideSummary::default()
            }),
        );
        assert_eq!(effect.impact, -1);
        assert_eq!(effect.value, "-0.2/80.0");
    }

    #[test]
    fn litter_penalty_caps_at_one_hundred_fifty_items() {
        let park = |litter| ParkSnapshot {
            litter,
            ..ParkSnapshot::default()
        };

        assert_eq!(run(InfluenceId::Litter, &park(50)).impact, -200);
        assert_eq!(run(InfluenceId::Litter, &park(400)).impact, -600);
        assert_eq!(run(InfluenceId::Litter, &park(400)).value, "400/150");
    }

    #[test]
    fn casualties_subtract_penalty() {
        let park = ParkSnapshot {
            casualty_penalty: 246,
            ..ParkSnapshot::default()
        };

        let effect = run(InfluenceId::Casualties, &park);
        assert_eq!(effect.impact, -246);
        assert_eq!(effect.value, "246/1000");
    }

    #[test]
    fn unchanged_key_on_active_effect_skips_rebuild() {
        let park = with_guests(1310, 0, 0);
        let effect = run(InfluenceId::Guests, &park);

        assert_eq!(number_of_guests(&effect, &park), Evaluation::Unchanged);
    }

    #[test]
    fn deactivation_clears_cache_and_keeps_details() {
        let park = with_rides(RideSummary {
            total: 2,
            uptime: 150,
            ..RideSummary::default()
        });
        let effect = run(InfluenceId::RideUptime, &park);

        let Evaluation::Updated(inactive) = ride_uptime(&effect, &ParkSnapshot::default()) else {
            panic!("expected deactivation to report a change");
        };
        assert!(!inactive.active);
        assert_eq!(inactive.cache, 0);
        assert_eq!(inactive.name, effect.name);

        assert_eq!(
            ride_uptime(&inactive, &ParkSnapshot::default()),
            Evaluation::Unchanged
        );
    }

    #[test]
    fn ride_uptime_notices_ride_count_changes() {
        let before = with_rides(RideSummary {
            total: 2,
            uptime: 100,
            ..RideSummary::default()
        });
        let after = with_rides(RideSummary {
            total: 1,
            uptime: 100,
            ..RideSummary::default()
        });

        let effect = run(InfluenceId::RideUptime, &before);
        let Evaluation::Updated(updated) = ride_uptime(&effect, &after) else {
            panic!("ride count change must be detected");
        };
        assert_eq!(updated.impact, 200);
    }

    #[test]
    fn difficulty_toggles_with_flag() {
        let enabled = ParkSnapshot {
            difficult_park_rating: true,
            ..ParkSnapshot::default()
        };

        let effect = run(InfluenceId::Difficulty, &enabled);
        assert_eq!(effect.impact, -100);
        assert_eq!(effect.value, "enabled");

        assert_eq!(difficulty(&effect, &enabled), Evaluation::Unchanged);
        assert!(difficulty(&effect, &ParkSnapshot::default()).is_updated());
        assert_eq!(
            difficulty(&Effect::new(0), &ParkSnapshot::default()),
            Evaluation::Unchanged
        );
    }
}
