//! Park-side inputs of the rating: the host contract, the aggregated
//! snapshot, and a recorded park that can stand in for a live host.

pub mod host;
pub mod snapshot;
pub mod state;

pub use host::{GuestSample, LitterSample, ParkHost, RideSample};
pub use snapshot::{
    litter_age, GuestSummary, ParkSnapshot, RideSummary, HAPPY_GUEST_THRESHOLD,
    LITTER_AGE_THRESHOLD,
};
pub use state::{GuestRecord, MapEntity, ParkState, ParkStateError, RideRecord};
