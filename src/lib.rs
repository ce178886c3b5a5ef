//! Meeting-point search over static public transit schedules.
//!
//! Given a set of participants, each with an origin (a named station or a
//! geographic point) and a common departure instant, the engine finds the
//! first platform at which every participant can independently be present
//! and reconstructs each participant's journey. A heatmap mode instead
//! enumerates every common platform together with each participant's
//! earliest arrival there.
//!
//! The crate is split the same way the data flows:
//!
//! - [`loading`] ingests the raw feed tables and builds the [`Timetable`],
//! - [`model`] holds the indexed schedule and the spatial grid,
//! - [`routing`] runs the interleaved multi-source search and assembles
//!   journeys,
//! - [`algo`] builds heatmaps on top of the same search driver.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use model::{Time, Timetable};

/// Pedestrian speed used for synthesized walking edges, metres per second.
pub const WALK_SPEED_MPS: f64 = 1.3;

/// Longest synthesized (geographic) walk a participant will take.
pub const MAX_WALK_TIME_S: Time = 600;

/// Candidate radius for geographic walks: `WALK_SPEED_MPS * MAX_WALK_TIME_S`.
pub const MAX_WALK_RADIUS_M: f64 = 780.0;

/// Per-participant travel cap. Frontier entries above this are dropped
/// without relaxation.
pub const MAX_TRIP_TIME_S: Time = 7200;

/// Floor for any emitted walking step.
pub const MIN_TRAVEL_S: Time = 10;

/// Floor applied to traversal times provided by pathways and transfers.
pub const PROVIDED_WALK_FLOOR_S: Time = 30;

/// How far a participant starting from a geographic point may walk to reach
/// their first stop.
pub const MAX_INITIAL_WALK_M: f64 = 1000.0;

/// Spatial grid cell height in degrees of latitude.
pub const DLAT: f64 = 0.004;

/// Spatial grid cell width in degrees of longitude.
pub const DLON: f64 = 0.007;

/// Upper bound on participants per query.
pub const MAX_PARTICIPANTS: usize = 5;

/// Default safety cap on search loop iterations.
pub const DEFAULT_ITERATION_CAP: u64 = 200_000_000;
