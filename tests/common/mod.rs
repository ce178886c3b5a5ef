//! Shared in-memory feed fixtures for the scenario tests.
#![allow(dead_code)]

use treffpunkt::loading::gtfs::{Feed, FeedPathway, FeedStop, FeedStopTime, FeedTrip};

pub fn stop(id: &str, name: &str, lat: f64, lon: f64) -> FeedStop {
    FeedStop {
        stop_id: id.to_string(),
        stop_name: name.to_string(),
        stop_lat: lat.to_string(),
        stop_lon: lon.to_string(),
        ..FeedStop::default()
    }
}

pub fn trip(id: &str, route: &str) -> FeedTrip {
    FeedTrip {
        trip_id: id.to_string(),
        route_id: route.to_string(),
        ..FeedTrip::default()
    }
}

pub fn stop_time(trip: &str, stop: &str, seq: u32, at: &str) -> FeedStopTime {
    FeedStopTime {
        trip_id: trip.to_string(),
        stop_id: stop.to_string(),
        stop_sequence: seq.to_string(),
        arrival_time: at.to_string(),
        departure_time: at.to_string(),
    }
}

pub fn pathway(from: &str, to: &str, seconds: i64) -> FeedPathway {
    FeedPathway {
        from_stop_id: from.to_string(),
        to_stop_id: to.to_string(),
        traversal_time: seconds.to_string(),
    }
}

/// Two riders on separate trips converging at M (scenario feed).
pub fn two_rider_feed() -> Feed {
    Feed {
        stops: vec![
            stop("A", "A", 0.0, 0.0),
            stop("B", "B", 0.0, 0.1),
            stop("M", "M", 0.1, 0.05),
        ],
        trips: vec![trip("T_AB", "r1"), trip("T_BA", "r2")],
        stop_times: vec![
            stop_time("T_AB", "A", 1, "10:00:00"),
            stop_time("T_AB", "M", 2, "10:06:00"),
            stop_time("T_BA", "B", 1, "10:00:00"),
            stop_time("T_BA", "M", 2, "10:06:00"),
        ],
        ..Feed::default()
    }
}

/// Two trips sharing a transfer hub X before their terminus M.
pub fn transfer_hub_feed() -> Feed {
    Feed {
        stops: vec![
            stop("A", "A", 0.0, 0.0),
            stop("X", "X", 0.1, 0.0),
            stop("B", "B", 0.2, 0.0),
            stop("M", "M", 0.3, 0.0),
        ],
        trips: vec![trip("T_AX", "r1"), trip("T_BX", "r2")],
        stop_times: vec![
            stop_time("T_AX", "A", 1, "10:00:00"),
            stop_time("T_AX", "X", 2, "10:03:00"),
            stop_time("T_AX", "M", 3, "10:08:00"),
            stop_time("T_BX", "B", 1, "10:00:00"),
            stop_time("T_BX", "X", 2, "10:04:00"),
            stop_time("T_BX", "M", 3, "10:09:00"),
        ],
        ..Feed::default()
    }
}

/// A line of `n` stations, trips in both directions every `headway`
/// seconds, `hop` seconds per segment.
pub fn line_feed(n: usize, trips_per_direction: usize, headway: u32, hop: u32) -> Feed {
    let mut feed = Feed::default();
    for i in 0..n {
        feed.stops.push(stop(
            &format!("S{i}"),
            &format!("Station {i}"),
            0.0,
            i as f64 * 0.05,
        ));
    }
    let base = 36000; // 10:00:00
    for k in 0..trips_per_direction {
        let fwd = format!("fwd{k}");
        let bwd = format!("bwd{k}");
        feed.trips.push(trip(&fwd, "line"));
        feed.trips.push(trip(&bwd, "line"));
        for i in 0..n {
            let t = base + k as u32 * headway + i as u32 * hop;
            feed.stop_times
                .push(stop_time(&fwd, &format!("S{i}"), i as u32 + 1, &hms(t)));
            feed.stop_times.push(stop_time(
                &bwd,
                &format!("S{}", n - 1 - i),
                i as u32 + 1,
                &hms(t),
            ));
        }
    }
    feed
}

pub fn hms(sec: u32) -> String {
    format!("{:02}:{:02}:{:02}", sec / 3600, (sec % 3600) / 60, sec % 60)
}
