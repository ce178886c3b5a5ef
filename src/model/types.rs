use geo::Point;

/// Seconds since service midnight. GTFS times may exceed 24:00:00, so this
/// is not bounded by 86 400.
pub type Time = u32;

/// Dense index of a stop (platform) in the timetable.
pub type StopId = usize;

/// Dense index of a station (a group of platforms).
pub type StationId = usize;

/// Dense index of a trip.
pub type TripId = usize;

/// Dense index of a route.
pub type RouteId = usize;

/// A boardable platform or pedestrian node from the feed.
#[derive(Debug, Clone)]
pub struct Stop {
    /// Feed identifier, kept for display and export.
    pub feed_id: String,
    pub name: String,
    pub desc: String,
    pub geometry: Point<f64>,
    pub location_type: u8,
    pub station: StationId,
    /// Walk edges leaving this stop: range into `Timetable::walk_edges`.
    pub walks_start: usize,
    pub walks_len: usize,
    /// Departure rows at this stop: range into `Timetable::stop_events`,
    /// sorted ascending by departure.
    pub events_start: usize,
    pub events_len: usize,
}

/// Logical grouping of platforms sharing a `parent_station`.
#[derive(Debug, Clone)]
pub struct Station {
    pub feed_id: String,
    pub name: String,
    /// Range into `Timetable::station_platforms`.
    pub platforms_start: usize,
    pub platforms_len: usize,
}

/// One retained departure row at a stop.
#[derive(Debug, Clone, Copy)]
pub struct StopEvent {
    pub trip: TripId,
    /// Position of this row within the trip's event slice.
    pub pos: u32,
    pub seq: u32,
    pub departure: Time,
}

/// One stop-time row within a trip, ordered by `seq`.
#[derive(Debug, Clone, Copy)]
pub struct TripEvent {
    pub stop: StopId,
    pub seq: u32,
    /// Missing arrivals are kept but skipped by ride expansion.
    pub arrival: Option<Time>,
    pub departure: Time,
}

/// Trip metadata plus its stop-time rows.
#[derive(Debug, Clone)]
pub struct Trip {
    pub feed_id: String,
    pub route: Option<RouteId>,
    pub headsign: String,
    pub direction: String,
    pub shape: String,
    /// Range into `Timetable::trip_events`, sorted ascending by `seq`.
    pub events_start: usize,
    pub events_len: usize,
}

/// Route metadata referenced by trips.
#[derive(Debug, Clone)]
pub struct Route {
    pub feed_id: String,
    pub short_name: String,
    pub long_name: String,
    pub route_type: Option<i32>,
    pub agency: String,
}

/// Where a walking edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkSource {
    Pathways,
    Transfers,
    Geo,
    Address,
}

/// Directed pedestrian link between two stops.
#[derive(Debug, Clone, Copy)]
pub struct WalkEdge {
    pub to: StopId,
    /// Traversal seconds, already floor-clamped for provided edges.
    pub time: Time,
    pub source: WalkSource,
}

/// Entry of the ranked lookup list consulted by the station resolver.
#[derive(Debug, Clone)]
pub struct StationEntry {
    pub station: StationId,
    pub name: String,
    pub lower_name: String,
    /// Retained stop-time rows across the station's platforms.
    pub popularity: u32,
}
