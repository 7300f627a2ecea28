use super::host::{GuestSample, LitterSample, ParkHost, RideSample};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Guests whose lost countdown drops below this are considered lost.
const LOST_COUNTDOWN_THRESHOLD: u8 = 90;

/// A recorded park, loaded from JSON, standing in for a live host simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParkState {
    #[serde(default)]
    pub ticks_elapsed: u32,
    #[serde(default)]
    pub difficult_park_rating: bool,
    /// Park-reported guest count. Falls back to the number of recorded
    /// guests when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
    #[serde(default)]
    pub guests: Vec<GuestRecord>,
    #[serde(default)]
    pub rides: Vec<RideRecord>,
    #[serde(default)]
    pub entities: Vec<MapEntity>,
    #[serde(default)]
    pub casualty_penalty: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRecord {
    #[serde(default = "default_in_park")]
    pub in_park: bool,
    #[serde(default)]
    pub happiness: u8,
    #[serde(default)]
    pub leaving_park: bool,
    #[serde(default = "default_lost_countdown")]
    pub lost_countdown: u8,
}

impl Default for GuestRecord {
    fn default() -> Self {
        Self {
            in_park: default_in_park(),
            happiness: 0,
            leaving_park: false,
            lost_countdown: default_lost_countdown(),
        }
    }
}

impl GuestRecord {
    pub fn is_lost(&self) -> bool {
        self.lost_countdown < LOST_COUNTDOWN_THRESHOLD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideRecord {
    #[serde(default)]
    pub downtime: u8,
    #[serde(default = "unrated")]
    pub excitement: i32,
    #[serde(default = "unrated")]
    pub intensity: i32,
}

impl Default for RideRecord {
    fn default() -> Self {
        Self {
            downtime: 0,
            excitement: unrated(),
            intensity: unrated(),
        }
    }
}

/// Map entities other than guests. Kinds the rating ignores collapse into
/// [`MapEntity::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEntity {
    Litter { creation_tick: u32 },
    #[serde(other)]
    Other,
}

fn default_in_park() -> bool {
    true
}

fn default_lost_countdown() -> u8 {
    u8::MAX
}

fn unrated() -> i32 {
    -1
}

#[derive(Debug, thiserror::Error)]
pub enum ParkStateError {
    #[error("failed to read park state: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse park state: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParkState {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ParkStateError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParkStateError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads a JSON array of states, one per recorded tick.
    pub fn frames_from_path(path: impl AsRef<Path>) -> Result<Vec<Self>, ParkStateError> {
        let file = File::open(path)?;
        Self::frames_from_reader(BufReader::new(file))
    }

    pub fn frames_from_reader<R: Read>(reader: R) -> Result<Vec<Self>, ParkStateError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl ParkHost for ParkState {
    fn has_difficult_park_rating(&self) -> bool {
        self.difficult_park_rating
    }

    fn guest_count(&self) -> u32 {
        self.guest_count
            .unwrap_or_else(|| u32::try_from(self.guests.len()).unwrap_or(u32::MAX))
    }

    fn guests(&self) -> impl Iterator<Item = GuestSample> + '_ {
        self.guests.iter().map(|guest| GuestSample {
            in_park: guest.in_park,
            happiness: guest.happiness,
            leaving_park: guest.leaving_park,
            lost: guest.is_lost(),
        })
    }

    fn rides(&self) -> impl Iterator<Item = RideSample> + '_ {
        self.rides.iter().map(|ride| RideSample {
            downtime: ride.downtime,
            excitement: ride.excitement,
            intensity: ride.intensity,
        })
    }

    fn litter(&self) -> impl Iterator<Item = LitterSample> + '_ {
        self.entities.iter().filter_map(|entity| match entity {
            MapEntity::Litter { creation_tick } => Some(LitterSample {
                creation_tick: *creation_tick,
            }),
            MapEntity::Other => None,
        })
    }

    fn ticks_elapsed(&self) -> u32 {
        self.ticks_elapsed
    }

    fn casualty_penalty(&self) -> u32 {
        self.casualty_penalty
    }
}
