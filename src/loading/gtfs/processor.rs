use std::collections::BTreeMap;

use geo::Point;
use hashbrown::{HashMap, HashSet};
use log::warn;

use super::raw_types::Feed;
use crate::model::grid::SpatialGrid;
use crate::model::time::parse_hms;
use crate::model::types::{
    Route, RouteId, Station, StationEntry, StationId, Stop, StopEvent, StopId, Trip, TripEvent,
    TripId, WalkEdge, WalkSource,
};
use crate::model::Timetable;
use crate::PROVIDED_WALK_FLOOR_S;

/// Build the indexed timetable from raw feed tables.
///
/// The build is pure and deterministic: the same feed always produces the
/// same timetable, so re-ingesting unchanged data yields identical query
/// results.
pub fn build_timetable(feed: &Feed) -> Timetable {
    let (mut stops, stop_index, parents) = intern_stops(feed);
    let (mut stations, station_index, station_platforms) = intern_stations(&mut stops, &parents);
    assign_station_names(&mut stations, &stops, &stop_index, &station_platforms);

    let (routes, route_index) = intern_routes(feed);
    let grouped = group_stop_times(feed, &stop_index);
    let (trips, trip_index, trip_events) = intern_trips(feed, &route_index, grouped);
    let stop_events = fill_stop_events(&mut stops, &trips, &trip_events);

    let (walk_edges, provided_pairs) = fill_walk_edges(feed, &mut stops, &stop_index);
    let grid = SpatialGrid::build(&stops);
    let station_lookup = build_station_lookup(&stations, &station_platforms, &stops);

    Timetable {
        stops,
        stop_index,
        stations,
        station_index,
        station_platforms,
        walk_edges,
        provided_pairs,
        stop_events,
        trips,
        trip_index,
        trip_events,
        routes,
        route_index,
        station_lookup,
        grid,
    }
}

/// Intern stops in feed order. The returned `parents` vector carries each
/// stop's raw `parent_station` (empty when absent) for station grouping.
fn intern_stops(feed: &Feed) -> (Vec<Stop>, HashMap<String, StopId>, Vec<String>) {
    let mut stops = Vec::with_capacity(feed.stops.len());
    let mut stop_index: HashMap<String, StopId> = HashMap::with_capacity(feed.stops.len());
    let mut parents = Vec::with_capacity(feed.stops.len());

    for raw in &feed.stops {
        if raw.stop_id.is_empty() || stop_index.contains_key(&raw.stop_id) {
            warn!("Skipping duplicate or unnamed stop record '{}'", raw.stop_id);
            continue;
        }
        let lat = raw.stop_lat.trim().parse::<f64>().unwrap_or(f64::NAN);
        let lon = raw.stop_lon.trim().parse::<f64>().unwrap_or(f64::NAN);
        stop_index.insert(raw.stop_id.clone(), stops.len());
        parents.push(raw.parent_station.clone());
        stops.push(Stop {
            feed_id: raw.stop_id.clone(),
            name: raw.stop_name.clone(),
            desc: raw.stop_desc.clone(),
            geometry: Point::new(lon, lat),
            location_type: raw.location_type.trim().parse().unwrap_or(0),
            station: 0,
            walks_start: 0,
            walks_len: 0,
            events_start: 0,
            events_len: 0,
        });
    }
    (stops, stop_index, parents)
}

/// Group platforms into stations: the station identifier is the
/// `parent_station` when present, otherwise the stop's own id.
fn intern_stations(
    stops: &mut [Stop],
    parents: &[String],
) -> (Vec<Station>, HashMap<String, StationId>, Vec<StopId>) {
    let mut stations: Vec<Station> = Vec::new();
    let mut station_index: HashMap<String, StationId> = HashMap::new();
    let mut members: Vec<Vec<StopId>> = Vec::new();

    for (idx, stop) in stops.iter_mut().enumerate() {
        let identifier = if parents[idx].is_empty() {
            stop.feed_id.as_str()
        } else {
            parents[idx].as_str()
        };
        let station = match station_index.get(identifier) {
            Some(&existing) => existing,
            None => {
                station_index.insert(identifier.to_string(), stations.len());
                stations.push(Station {
                    feed_id: identifier.to_string(),
                    name: String::new(),
                    platforms_start: 0,
                    platforms_len: 0,
                });
                members.push(Vec::new());
                stations.len() - 1
            }
        };
        stop.station = station;
        members[station].push(idx);
    }

    let mut station_platforms = Vec::with_capacity(stops.len());
    for (station, member_list) in stations.iter_mut().zip(members) {
        station.platforms_start = station_platforms.len();
        station.platforms_len = member_list.len();
        station_platforms.extend(member_list);
    }
    (stations, station_index, station_platforms)
}

/// Display name: the explicit station record's name if one exists, else the
/// most frequent member name (ties broken by name), else the identifier.
fn assign_station_names(
    stations: &mut [Station],
    stops: &[Stop],
    stop_index: &HashMap<String, StopId>,
    station_platforms: &[StopId],
) {
    for station in stations.iter_mut() {
        if let Some(&own) = stop_index.get(&station.feed_id) {
            if stops[own].location_type == 1 && !stops[own].name.is_empty() {
                station.name = stops[own].name.clone();
                continue;
            }
        }
        let platforms =
            &station_platforms[station.platforms_start..station.platforms_start + station.platforms_len];
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for &p in platforms {
            if !stops[p].name.is_empty() {
                *counts.entry(stops[p].name.as_str()).or_default() += 1;
            }
        }
        let best = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| (*name).to_string());
        station.name = best.unwrap_or_else(|| station.feed_id.clone());
    }
}

fn intern_routes(feed: &Feed) -> (Vec<Route>, HashMap<String, RouteId>) {
    let mut routes = Vec::with_capacity(feed.routes.len());
    let mut route_index: HashMap<String, RouteId> = HashMap::with_capacity(feed.routes.len());
    for raw in &feed.routes {
        if raw.route_id.is_empty() || route_index.contains_key(&raw.route_id) {
            continue;
        }
        route_index.insert(raw.route_id.clone(), routes.len());
        routes.push(Route {
            feed_id: raw.route_id.clone(),
            short_name: raw.route_short_name.clone(),
            long_name: raw.route_long_name.clone(),
            route_type: raw.route_type.trim().parse().ok(),
            agency: raw.agency_id.clone(),
        });
    }
    (routes, route_index)
}

struct DecoratedRow {
    stop: StopId,
    seq: u32,
    arrival: Option<u32>,
    departure: u32,
}

/// Decorate stop-time rows and group them by trip. Rows with a missing or
/// malformed departure are discarded; missing arrivals are kept as `None`.
/// The `BTreeMap` fixes the trip interning order to the `trip_id` sort.
fn group_stop_times(
    feed: &Feed,
    stop_index: &HashMap<String, StopId>,
) -> BTreeMap<String, Vec<DecoratedRow>> {
    let mut grouped: BTreeMap<String, Vec<DecoratedRow>> = BTreeMap::new();
    for raw in &feed.stop_times {
        let Some(&stop) = stop_index.get(&raw.stop_id) else {
            warn!("stop_times row references unknown stop '{}'", raw.stop_id);
            continue;
        };
        let Some(departure) = parse_hms(&raw.departure_time) else {
            continue;
        };
        let Ok(seq) = raw.stop_sequence.trim().parse::<u32>() else {
            warn!(
                "stop_times row for trip '{}' has unparseable stop_sequence '{}'",
                raw.trip_id, raw.stop_sequence
            );
            continue;
        };
        grouped.entry(raw.trip_id.clone()).or_default().push(DecoratedRow {
            stop,
            seq,
            arrival: parse_hms(&raw.arrival_time),
            departure,
        });
    }
    grouped
}

fn intern_trips(
    feed: &Feed,
    route_index: &HashMap<String, RouteId>,
    grouped: BTreeMap<String, Vec<DecoratedRow>>,
) -> (Vec<Trip>, HashMap<String, TripId>, Vec<TripEvent>) {
    let meta_by_id: HashMap<&str, &super::raw_types::FeedTrip> = feed
        .trips
        .iter()
        .map(|t| (t.trip_id.as_str(), t))
        .collect();

    let mut trips = Vec::with_capacity(grouped.len());
    let mut trip_index: HashMap<String, TripId> = HashMap::with_capacity(grouped.len());
    let mut trip_events: Vec<TripEvent> = Vec::new();

    for (trip_id, mut rows) in grouped {
        rows.sort_by_key(|r| r.seq);
        let events_start = trip_events.len();
        let events_len = rows.len();
        trip_events.extend(rows.into_iter().map(|r| TripEvent {
            stop: r.stop,
            seq: r.seq,
            arrival: r.arrival,
            departure: r.departure,
        }));

        let meta = meta_by_id.get(trip_id.as_str());
        trip_index.insert(trip_id.clone(), trips.len());
        trips.push(Trip {
            feed_id: trip_id,
            route: meta.and_then(|m| route_index.get(&m.route_id).copied()),
            headsign: meta.map(|m| m.trip_headsign.clone()).unwrap_or_default(),
            direction: meta.map(|m| m.direction_id.clone()).unwrap_or_default(),
            shape: meta.map(|m| m.shape_id.clone()).unwrap_or_default(),
            events_start,
            events_len,
        });
    }
    (trips, trip_index, trip_events)
}

/// Bucket trip rows per stop, sorted ascending by departure (stable, so
/// equal departures keep trip order).
fn fill_stop_events(
    stops: &mut [Stop],
    trips: &[Trip],
    trip_events: &[TripEvent],
) -> Vec<StopEvent> {
    let mut per_stop: Vec<Vec<StopEvent>> = vec![Vec::new(); stops.len()];
    for (trip_id, trip) in trips.iter().enumerate() {
        let rows = &trip_events[trip.events_start..trip.events_start + trip.events_len];
        for (pos, row) in rows.iter().enumerate() {
            per_stop[row.stop].push(StopEvent {
                trip: trip_id,
                pos: pos as u32,
                seq: row.seq,
                departure: row.departure,
            });
        }
    }

    let mut stop_events = Vec::with_capacity(trip_events.len());
    for (stop, mut events) in stops.iter_mut().zip(per_stop) {
        events.sort_by_key(|e| e.departure);
        stop.events_start = stop_events.len();
        stop.events_len = events.len();
        stop_events.extend(events);
    }
    stop_events
}

/// Walk edges from pathways, then transfers. Every provided pair is
/// recorded so geographic synthesis never shadows explicit data.
fn fill_walk_edges(
    feed: &Feed,
    stops: &mut [Stop],
    stop_index: &HashMap<String, StopId>,
) -> (Vec<WalkEdge>, HashSet<(StopId, StopId)>) {
    let mut per_stop: Vec<Vec<WalkEdge>> = vec![Vec::new(); stops.len()];
    let mut provided_pairs: HashSet<(StopId, StopId)> = HashSet::new();

    let add = |per_stop: &mut Vec<Vec<WalkEdge>>,
                   pairs: &mut HashSet<(StopId, StopId)>,
                   from: &str,
                   to: &str,
                   seconds: &str,
                   source: WalkSource| {
        let (Some(&from), Some(&to)) = (stop_index.get(from), stop_index.get(to)) else {
            return;
        };
        let Ok(seconds) = seconds.trim().parse::<i64>() else {
            return;
        };
        let time = seconds.max(i64::from(PROVIDED_WALK_FLOOR_S)) as u32;
        per_stop[from].push(WalkEdge { to, time, source });
        pairs.insert((from, to));
    };

    for r in &feed.pathways {
        add(
            &mut per_stop,
            &mut provided_pairs,
            &r.from_stop_id,
            &r.to_stop_id,
            &r.traversal_time,
            WalkSource::Pathways,
        );
    }
    for r in &feed.transfers {
        add(
            &mut per_stop,
            &mut provided_pairs,
            &r.from_stop_id,
            &r.to_stop_id,
            &r.min_transfer_time,
            WalkSource::Transfers,
        );
    }

    let mut walk_edges = Vec::new();
    for (stop, edges) in stops.iter_mut().zip(per_stop) {
        stop.walks_start = walk_edges.len();
        stop.walks_len = edges.len();
        walk_edges.extend(edges);
    }
    (walk_edges, provided_pairs)
}

/// Ranked station list: popularity is the number of retained stop-time rows
/// across the station's platforms; duplicates by lowercased name keep the
/// most popular entry.
fn build_station_lookup(
    stations: &[Station],
    station_platforms: &[StopId],
    stops: &[Stop],
) -> Vec<StationEntry> {
    let mut entries: Vec<StationEntry> = stations
        .iter()
        .enumerate()
        .map(|(idx, station)| {
            let platforms = &station_platforms
                [station.platforms_start..station.platforms_start + station.platforms_len];
            let popularity = platforms.iter().map(|&p| stops[p].events_len as u32).sum();
            StationEntry {
                station: idx,
                name: station.name.clone(),
                lower_name: station.name.to_lowercase(),
                popularity,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.popularity
            .cmp(&a.popularity)
            .then_with(|| a.name.cmp(&b.name))
    });
    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(e.lower_name.clone()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::gtfs::raw_types::{FeedPathway, FeedStop, FeedStopTime, FeedTrip};

    fn stop(id: &str, name: &str, parent: &str, location_type: &str) -> FeedStop {
        FeedStop {
            stop_id: id.to_string(),
            stop_name: name.to_string(),
            stop_lat: "52.52".to_string(),
            stop_lon: "13.40".to_string(),
            location_type: location_type.to_string(),
            parent_station: parent.to_string(),
            ..FeedStop::default()
        }
    }

    fn stop_time(trip: &str, stop: &str, seq: &str, arr: &str, dep: &str) -> FeedStopTime {
        FeedStopTime {
            trip_id: trip.to_string(),
            stop_id: stop.to_string(),
            stop_sequence: seq.to_string(),
            arrival_time: arr.to_string(),
            departure_time: dep.to_string(),
        }
    }

    #[test]
    fn explicit_station_record_names_the_station() {
        let feed = Feed {
            stops: vec![
                stop("hub", "Central", "", "1"),
                stop("hub-1", "Central Pl. 1", "hub", "0"),
                stop("hub-2", "Central Pl. 2", "hub", "0"),
            ],
            ..Feed::default()
        };
        let tt = build_timetable(&feed);
        let station = tt.station_id("hub").unwrap();
        assert_eq!(tt.station(station).name, "Central");
        assert_eq!(tt.platforms(station).len(), 3);
    }

    #[test]
    fn majority_member_name_wins_with_lexicographic_ties() {
        let feed = Feed {
            stops: vec![
                stop("a-1", "Zoo", "a", "0"),
                stop("a-2", "Zoo", "a", "0"),
                stop("a-3", "Aquarium", "a", "0"),
                stop("b-1", "Beta", "b", "0"),
                stop("b-2", "Alpha", "b", "0"),
            ],
            ..Feed::default()
        };
        let tt = build_timetable(&feed);
        assert_eq!(tt.station(tt.station_id("a").unwrap()).name, "Zoo");
        // equal counts: the lexicographically smaller name wins
        assert_eq!(tt.station(tt.station_id("b").unwrap()).name, "Alpha");
    }

    #[test]
    fn provided_walk_edges_are_floor_clamped() {
        let feed = Feed {
            stops: vec![stop("p1", "P1", "", "0"), stop("p2", "P2", "", "0")],
            pathways: vec![FeedPathway {
                from_stop_id: "p1".to_string(),
                to_stop_id: "p2".to_string(),
                traversal_time: "5".to_string(),
            }],
            ..Feed::default()
        };
        let tt = build_timetable(&feed);
        let p1 = tt.stop_id("p1").unwrap();
        let p2 = tt.stop_id("p2").unwrap();
        let edges = tt.walk_edges(p1);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].time, PROVIDED_WALK_FLOOR_S);
        assert_eq!(edges[0].source, WalkSource::Pathways);
        assert!(tt.is_provided_pair(p1, p2));
        assert!(!tt.is_provided_pair(p2, p1));
    }

    #[test]
    fn rows_at_stop_sorted_by_departure_and_bad_rows_dropped() {
        let feed = Feed {
            stops: vec![stop("s", "S", "", "0"), stop("t", "T", "", "0")],
            trips: vec![FeedTrip {
                trip_id: "t1".to_string(),
                ..FeedTrip::default()
            }],
            stop_times: vec![
                stop_time("t2", "s", "1", "10:30:00", "10:30:00"),
                stop_time("t1", "s", "1", "", "10:00:00"),
                // malformed departure: silently discarded
                stop_time("t3", "s", "1", "10:10:00", "oops"),
                stop_time("t1", "t", "2", "10:05:00", "10:05:00"),
            ],
            ..Feed::default()
        };
        let tt = build_timetable(&feed);
        let s = tt.stop_id("s").unwrap();
        let rows = tt.rows_at_stop(s);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].departure <= rows[1].departure);
        assert_eq!(rows[0].departure, 36000);
        // the kept t1 row has no arrival
        let t1 = tt.trip_id("t1").unwrap();
        assert_eq!(tt.trip_rows(t1)[0].arrival, None);
        assert!(tt.trip_id("t3").is_none());
    }

    #[test]
    fn station_lookup_ranked_and_deduplicated() {
        let feed = Feed {
            stops: vec![
                stop("busy", "Markt", "", "0"),
                stop("quiet", "markt", "", "0"),
                stop("other", "Rathaus", "", "0"),
            ],
            trips: vec![FeedTrip {
                trip_id: "t1".to_string(),
                ..FeedTrip::default()
            }],
            stop_times: vec![
                stop_time("t1", "busy", "1", "08:00:00", "08:00:00"),
                stop_time("t1", "busy", "2", "08:10:00", "08:10:00"),
            ],
            ..Feed::default()
        };
        let tt = build_timetable(&feed);
        let lookup = tt.station_lookup();
        // "markt" deduplicated by lowercased name, the popular one kept
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup[0].name, "Markt");
        assert_eq!(lookup[0].popularity, 2);
        assert_eq!(lookup[1].name, "Rathaus");
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let feed = Feed {
            stops: vec![stop("a", "A", "", "0"), stop("b", "B", "", "0")],
            trips: vec![FeedTrip {
                trip_id: "t1".to_string(),
                ..FeedTrip::default()
            }],
            stop_times: vec![
                stop_time("t1", "a", "1", "09:00:00", "09:00:00"),
                stop_time("t1", "b", "2", "09:07:00", "09:07:00"),
            ],
            ..Feed::default()
        };
        let first = build_timetable(&feed);
        let second = build_timetable(&feed);
        assert_eq!(format!("{:?}", first.stops), format!("{:?}", second.stops));
        assert_eq!(
            format!("{:?}", first.stop_events),
            format!("{:?}", second.stop_events)
        );
        assert_eq!(
            format!("{:?}", first.station_lookup),
            format!("{:?}", second.station_lookup)
        );
    }
}

