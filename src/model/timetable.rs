//! The indexed schedule consulted by every query.

use geo::Point;
use hashbrown::{HashMap, HashSet};

use crate::model::grid::SpatialGrid;
use crate::model::types::{
    Route, RouteId, Station, StationEntry, StationId, Stop, StopEvent, StopId, Trip, TripEvent,
    TripId, WalkEdge,
};

/// Query structures built once from a raw feed.
///
/// Read-only after the build; any number of concurrent searches may share a
/// reference. All hot-path collections are dense vectors addressed by the
/// interned ids, with per-entity start/len ranges into flat side arrays.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    pub(crate) stops: Vec<Stop>,
    pub(crate) stop_index: HashMap<String, StopId>,
    pub(crate) stations: Vec<Station>,
    pub(crate) station_index: HashMap<String, StationId>,
    pub(crate) station_platforms: Vec<StopId>,
    pub(crate) walk_edges: Vec<WalkEdge>,
    pub(crate) provided_pairs: HashSet<(StopId, StopId)>,
    pub(crate) stop_events: Vec<StopEvent>,
    pub(crate) trips: Vec<Trip>,
    pub(crate) trip_index: HashMap<String, TripId>,
    pub(crate) trip_events: Vec<TripEvent>,
    pub(crate) routes: Vec<Route>,
    pub(crate) route_index: HashMap<String, RouteId>,
    pub(crate) station_lookup: Vec<StationEntry>,
    pub(crate) grid: SpatialGrid,
}

impl Timetable {
    pub fn stop(&self, stop: StopId) -> &Stop {
        &self.stops[stop]
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Dense id for a feed stop id.
    pub fn stop_id(&self, feed_id: &str) -> Option<StopId> {
        self.stop_index.get(feed_id).copied()
    }

    pub fn station(&self, station: StationId) -> &Station {
        &self.stations[station]
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn station_id(&self, feed_id: &str) -> Option<StationId> {
        self.station_index.get(feed_id).copied()
    }

    pub fn station_of(&self, stop: StopId) -> StationId {
        self.stops[stop].station
    }

    /// Exactly the stops mapping to `station`.
    pub fn platforms(&self, station: StationId) -> &[StopId] {
        let s = &self.stations[station];
        &self.station_platforms[s.platforms_start..s.platforms_start + s.platforms_len]
    }

    /// Departure rows at a stop, sorted ascending by departure.
    pub fn rows_at_stop(&self, stop: StopId) -> &[StopEvent] {
        let s = &self.stops[stop];
        &self.stop_events[s.events_start..s.events_start + s.events_len]
    }

    pub fn trip(&self, trip: TripId) -> &Trip {
        &self.trips[trip]
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn trip_id(&self, feed_id: &str) -> Option<TripId> {
        self.trip_index.get(feed_id).copied()
    }

    /// Stop-time rows of a trip, sorted ascending by sequence.
    pub fn trip_rows(&self, trip: TripId) -> &[TripEvent] {
        let t = &self.trips[trip];
        &self.trip_events[t.events_start..t.events_start + t.events_len]
    }

    pub fn route(&self, route: RouteId) -> &Route {
        &self.routes[route]
    }

    pub fn route_id(&self, feed_id: &str) -> Option<RouteId> {
        self.route_index.get(feed_id).copied()
    }

    /// Walk edges leaving a stop, in build order (pathways then transfers).
    pub fn walk_edges(&self, stop: StopId) -> &[WalkEdge] {
        let s = &self.stops[stop];
        &self.walk_edges[s.walks_start..s.walks_start + s.walks_len]
    }

    /// Whether an explicit pathway or transfer covers this ordered pair.
    pub fn is_provided_pair(&self, from: StopId, to: StopId) -> bool {
        self.provided_pairs.contains(&(from, to))
    }

    /// Ranked station list consulted by the resolver.
    pub fn station_lookup(&self) -> &[StationEntry] {
        &self.station_lookup
    }

    /// Stops within `radius_m` of another stop, excluding it.
    pub fn nearby_stops_within_radius(
        &self,
        origin: StopId,
        radius_m: f64,
    ) -> Vec<(StopId, f64)> {
        self.grid
            .nearby(&self.stops, self.stops[origin].geometry, radius_m, Some(origin))
    }

    /// Stops within `radius_m` of an arbitrary point.
    pub fn stops_near_point(&self, point: Point<f64>, radius_m: f64) -> Vec<(StopId, f64)> {
        self.grid.nearby(&self.stops, point, radius_m, None)
    }

    /// Human-readable platform label used in logs and reports.
    pub fn stop_label(&self, stop: StopId) -> String {
        let s = &self.stops[stop];
        let platform = if !s.desc.is_empty() {
            &s.desc
        } else if !s.name.is_empty() {
            &s.name
        } else {
            &s.feed_id
        };
        let station = &self.stations[s.station];
        format!(
            "{platform} [{}] • {} [{}]",
            s.feed_id, station.name, station.feed_id
        )
    }
}
