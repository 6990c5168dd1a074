//! Room membership tracking

mod tracker;

pub use tracker::RoomTracker;
