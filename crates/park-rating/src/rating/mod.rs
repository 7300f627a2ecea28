mod aggregator;
mod effect;
pub mod influences;
mod inspector;
pub mod view;

pub use aggregator::ParkRating;
pub use effect::Effect;
pub use influences::{Evaluation, Influence, InfluenceId, INFLUENCES};
pub use inspector::{RatingInspector, DEFAULT_POLL_INTERVAL_TICKS};
pub use view::{display_order, sorted_effects, EffectRow, ImpactTone, RatingReport};
