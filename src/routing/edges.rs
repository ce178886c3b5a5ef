//! The three classes of outgoing edges generated from a settled stop.

use crate::model::types::{StopId, Time, WalkSource};
use crate::routing::journey::{Step, StepKind};
use crate::routing::queue::MinQueue;
use crate::routing::SearchKey;
use crate::{Timetable, MAX_WALK_RADIUS_M, MAX_WALK_TIME_S, MIN_TRAVEL_S, WALK_SPEED_MPS};

/// Enumerate every edge leaving `stop` at wall-clock `now` with the given
/// accumulated travel time, pushing one frontier entry per edge.
pub(crate) fn expand_from(
    timetable: &Timetable,
    queue: &mut MinQueue<SearchKey, Step>,
    midpoint_m: &[u32],
    stop: StopId,
    now: Time,
    elapsed: Time,
) {
    push_walk_edges(timetable, queue, midpoint_m, stop, now, elapsed);
    push_geo_walks(timetable, queue, midpoint_m, stop, now, elapsed);
    push_rides(timetable, queue, midpoint_m, stop, now, elapsed);
}

/// Walks along explicit pathway and transfer edges.
pub(crate) fn push_walk_edges(
    timetable: &Timetable,
    queue: &mut MinQueue<SearchKey, Step>,
    midpoint_m: &[u32],
    stop: StopId,
    now: Time,
    elapsed: Time,
) {
    for edge in timetable.walk_edges(stop) {
        let walk = edge.time.max(MIN_TRAVEL_S);
        queue.push(
            SearchKey {
                elapsed: elapsed + walk,
                arrival: now + walk,
                midpoint_m: midpoint_m[edge.to],
                stop: edge.to,
            },
            Step {
                from: Some(stop),
                to: edge.to,
                depart: now,
                arrive: now + walk,
                kind: StepKind::Walk {
                    source: edge.source,
                    duration: walk,
                    distance_m: None,
                },
            },
        );
    }
}

/// Synthesized walks to nearby stops. Pairs covered by an explicit pathway
/// or transfer are never synthesized.
pub(crate) fn push_geo_walks(
    timetable: &Timetable,
    queue: &mut MinQueue<SearchKey, Step>,
    midpoint_m: &[u32],
    stop: StopId,
    now: Time,
    elapsed: Time,
) {
    for (cand, dist_m) in timetable.nearby_stops_within_radius(stop, MAX_WALK_RADIUS_M) {
        if timetable.is_provided_pair(stop, cand) {
            continue;
        }
        let walk = ((dist_m / WALK_SPEED_MPS).ceil() as Time).max(MIN_TRAVEL_S);
        if walk > MAX_WALK_TIME_S {
            continue;
        }
        queue.push(
            SearchKey {
                elapsed: elapsed + walk,
                arrival: now + walk,
                midpoint_m: midpoint_m[cand],
                stop: cand,
            },
            Step {
                from: Some(stop),
                to: cand,
                depart: now,
                arrive: now + walk,
                kind: StepKind::Walk {
                    source: WalkSource::Geo,
                    duration: walk,
                    distance_m: Some(dist_m.round() as u32),
                },
            },
        );
    }
}

/// Transit rides: for every boardable departure, one entry per reachable
/// downstream stop of the same trip. No alighting decision is made here;
/// the heap arbitrates.
pub(crate) fn push_rides(
    timetable: &Timetable,
    queue: &mut MinQueue<SearchKey, Step>,
    midpoint_m: &[u32],
    stop: StopId,
    now: Time,
    elapsed: Time,
) {
    let rows = timetable.rows_at_stop(stop);
    let first = rows.partition_point(|r| r.departure < now);
    for boarding in &rows[first..] {
        let wait = boarding.departure - now;
        let trip_rows = timetable.trip_rows(boarding.trip);
        for downstream in &trip_rows[boarding.pos as usize + 1..] {
            if downstream.seq <= boarding.seq {
                continue;
            }
            let Some(arrival) = downstream.arrival else {
                continue;
            };
            let Some(ride) = arrival.checked_sub(boarding.departure) else {
                continue;
            };
            queue.push(
                SearchKey {
                    elapsed: elapsed + wait + ride,
                    arrival,
                    midpoint_m: midpoint_m[downstream.stop],
                    stop: downstream.stop,
                },
                Step {
                    from: Some(stop),
                    to: downstream.stop,
                    depart: boarding.departure,
                    arrive: arrival,
                    kind: StepKind::Ride {
                        trip: boarding.trip,
                        wait,
                        ride,
                    },
                },
            );
        }
    }
}
