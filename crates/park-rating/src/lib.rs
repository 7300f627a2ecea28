//! Incremental park rating engine.
//!
//! A [`rating::ParkRating`] owns a [`park::ParkSnapshot`] and one
//! [`rating::Effect`] per influence. Each call to
//! [`rating::ParkRating::recalculate`] refreshes the snapshot from a
//! [`park::ParkHost`], re-runs the influences whose inputs moved, and reports
//! whether anything changed.

pub mod config;
pub mod error;
pub mod park;
pub mod rating;
pub mod telemetry;
