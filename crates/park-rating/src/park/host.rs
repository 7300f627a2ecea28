use serde::{Deserialize, Serialize};

/// Read-only view of the host simulation, borrowed for the duration of one
/// snapshot refresh.
pub trait ParkHost {
    /// Whether the scenario enables the "difficult park rating" option.
    fn has_difficult_park_rating(&self) -> bool;

    /// Guest count as reported by the park itself.
    fn guest_count(&self) -> u32;

    fn guests(&self) -> impl Iterator<Item = GuestSample> + '_;

    fn rides(&self) -> impl Iterator<Item = RideSample> + '_;

    /// Every entity of kind litter currently on the map.
    fn litter(&self) -> impl Iterator<Item = LitterSample> + '_;

    /// Elapsed ticks on the host's 32-bit counter.
    fn ticks_elapsed(&self) -> u32;

    /// Penalty points from crashed vehicles and drowned guests.
    fn casualty_penalty(&self) -> u32;
}

/// The guest state consulted by the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSample {
    pub in_park: bool,
    /// Happiness on the host's 0-255 scale.
    pub happiness: u8,
    pub leaving_park: bool,
    pub lost: bool,
}

/// Raw ride ratings are in host units (hundredths); a negative value means
/// the ride has not been rated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideSample {
    /// Downtime percentage, 0-100.
    pub downtime: u8,
    pub excitement: i32,
    pub intensity: i32,
}

impl RideSample {
    pub fn has_ratings(&self) -> bool {
        self.excitement > 0 || self.intensity > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LitterSample {
    pub creation_tick: u32,
}
