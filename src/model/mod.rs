//! Data model for the schedule index
//!
//! Contains the indexed timetable consulted by every query, the entity
//! types it is built from, and the spatial grid used for geographic
//! walking edges.

pub mod geometry;
pub mod grid;
pub mod time;
pub mod timetable;
pub mod types;

pub use grid::SpatialGrid;
pub use timetable::Timetable;
pub use types::{
    Route, RouteId, Station, StationEntry, StationId, Stop, StopEvent, StopId, Time, Trip,
    TripEvent, TripId, WalkEdge, WalkSource,
};
