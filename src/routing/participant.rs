//! Per-participant search state, seeding and path reconstruction.

use fixedbitset::FixedBitSet;
use geo::Point;
use log::debug;

use crate::model::geometry::{haversine_m, midpoint};
use crate::model::types::{StopId, Time, WalkSource};
use crate::routing::edges;
use crate::routing::journey::{Journey, Step, StepKind};
use crate::routing::queue::MinQueue;
use crate::routing::resolver::{pick_start_platform, resolve_station};
use crate::routing::SearchKey;
use crate::{Error, Timetable, MAX_INITIAL_WALK_M, MIN_TRAVEL_S, WALK_SPEED_MPS};

/// Where a participant starts, as supplied by the caller.
#[derive(Debug, Clone)]
pub enum Origin {
    /// A station by (partial) name, optionally pinned to a platform.
    Station {
        query: String,
        platform: Option<String>,
    },
    /// A geographic point; the participant walks to every stop within
    /// `MAX_INITIAL_WALK_M` first.
    Point { lat: f64, lon: f64 },
}

/// One participant of a query.
#[derive(Debug, Clone)]
pub struct ParticipantSpec {
    pub label: String,
    pub origin: Origin,
}

impl ParticipantSpec {
    pub fn at_station(label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: Origin::Station {
                query: query.into(),
                platform: None,
            },
        }
    }

    pub fn at_point(label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            label: label.into(),
            origin: Origin::Point { lat, lon },
        }
    }
}

/// A resolved origin, reported back to the caller.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedOrigin {
    Station {
        station: crate::model::types::StationId,
        platform: StopId,
    },
    Point(Point<f64>),
}

/// Exclusive per-query search state of one participant.
pub(crate) struct Participant {
    pub label: String,
    pub origin: ResolvedOrigin,
    pub t0: Time,
    pub queue: MinQueue<SearchKey, Step>,
    /// Minimum elapsed per stop, `Time::MAX` while unsettled. Assigned at
    /// most once per stop.
    pub best_elapsed: Vec<Time>,
    /// Stops present in `first_arrival`/`first_elapsed`.
    pub reached: FixedBitSet,
    pub first_arrival: Vec<Time>,
    pub first_elapsed: Vec<Time>,
    /// The step that settled each stop, for path reconstruction.
    pub parent: Vec<Option<Step>>,
}

impl Participant {
    fn new(label: String, origin: ResolvedOrigin, t0: Time, stop_count: usize) -> Self {
        Self {
            label,
            origin,
            t0,
            queue: MinQueue::new(),
            best_elapsed: vec![Time::MAX; stop_count],
            reached: FixedBitSet::with_capacity(stop_count),
            first_arrival: vec![Time::MAX; stop_count],
            first_elapsed: vec![Time::MAX; stop_count],
            parent: vec![None; stop_count],
        }
    }

    fn seed_station(&mut self, timetable: &Timetable, midpoint_m: &[u32], platform: StopId) {
        self.queue.push(
            SearchKey {
                elapsed: 0,
                arrival: self.t0,
                midpoint_m: midpoint_m[platform],
                stop: platform,
            },
            Step {
                from: None,
                to: platform,
                depart: self.t0,
                arrive: self.t0,
                kind: StepKind::Start,
            },
        );
        edges::expand_from(timetable, &mut self.queue, midpoint_m, platform, self.t0, 0);
    }

    fn seed_address(
        &mut self,
        timetable: &Timetable,
        midpoint_m: &[u32],
        point: Point<f64>,
    ) -> Result<(), Error> {
        let mut seeded = false;
        for (stop, dist_m) in timetable.stops_near_point(point, MAX_INITIAL_WALK_M) {
            let walk = ((dist_m / WALK_SPEED_MPS).ceil() as Time).max(MIN_TRAVEL_S);
            self.queue.push(
                SearchKey {
                    elapsed: walk,
                    arrival: self.t0 + walk,
                    midpoint_m: midpoint_m[stop],
                    stop,
                },
                Step {
                    from: None,
                    to: stop,
                    depart: self.t0,
                    arrive: self.t0 + walk,
                    kind: StepKind::Walk {
                        source: WalkSource::Address,
                        duration: walk,
                        distance_m: Some(dist_m.round() as u32),
                    },
                },
            );
            seeded = true;
        }
        if seeded {
            Ok(())
        } else {
            Err(Error::NoStationsNearAddress {
                lat: point.y(),
                lon: point.x(),
            })
        }
    }

    /// Walk the parent chain back from `stop` and return the step sequence
    /// from the origin. Each parent settled strictly before its child, so
    /// the chain always terminates at a seed.
    pub(crate) fn journey_to(&self, stop: StopId) -> Journey {
        let mut steps = Vec::new();
        let mut current = stop;
        while let Some(step) = &self.parent[current] {
            steps.push(step.clone());
            match step.from {
                Some(previous) => current = previous,
                None => break,
            }
        }
        steps.reverse();
        Journey {
            steps,
            arrival: self.first_arrival[stop],
            elapsed: self.first_elapsed[stop],
        }
    }
}

/// Resolve every origin, compute the per-stop midpoint distances and seed
/// each participant's frontier.
pub(crate) fn prime_participants(
    timetable: &Timetable,
    specs: &[ParticipantSpec],
    departure: Time,
) -> Result<(Vec<Participant>, Vec<u32>), Error> {
    let mut origins = Vec::with_capacity(specs.len());
    for spec in specs {
        let origin = match &spec.origin {
            Origin::Station { query, platform } => {
                let (station, name) = resolve_station(timetable, query)?;
                debug!(
                    "Participant {}: query '{}' resolved to station '{}'",
                    spec.label, query, name
                );
                let platform = match platform {
                    Some(feed_id) => {
                        let stop = timetable.stop_id(feed_id).ok_or_else(|| {
                            Error::StartPlatformMismatch {
                                platform: feed_id.clone(),
                                station: name.to_string(),
                            }
                        })?;
                        if timetable.station_of(stop) != station {
                            return Err(Error::StartPlatformMismatch {
                                platform: feed_id.clone(),
                                station: name.to_string(),
                            });
                        }
                        stop
                    }
                    None => pick_start_platform(timetable, station, departure)
                        .ok_or_else(|| Error::NoDeparturePlatform(name.to_string()))?,
                };
                debug!(
                    "Participant {}: starting at {}",
                    spec.label,
                    timetable.stop_label(platform)
                );
                ResolvedOrigin::Station { station, platform }
            }
            Origin::Point { lat, lon } => ResolvedOrigin::Point(Point::new(*lon, *lat)),
        };
        origins.push(origin);
    }

    // Midpoint of the origins, cached per stop: a tiebreaker that biases
    // expansion toward the centroid without affecting elapsed ordering.
    let points: Vec<Point<f64>> = origins
        .iter()
        .map(|origin| match origin {
            ResolvedOrigin::Station { platform, .. } => timetable.stop(*platform).geometry,
            ResolvedOrigin::Point(point) => *point,
        })
        .collect();
    let mid = midpoint(&points);
    let midpoint_m: Vec<u32> = timetable
        .stops()
        .iter()
        .map(|stop| {
            let d = haversine_m(mid, stop.geometry);
            if d.is_finite() {
                d.round() as u32
            } else {
                u32::MAX
            }
        })
        .collect();

    let mut participants = Vec::with_capacity(specs.len());
    for (spec, origin) in specs.iter().zip(origins) {
        let mut participant =
            Participant::new(spec.label.clone(), origin, departure, timetable.stop_count());
        match origin {
            ResolvedOrigin::Station { platform, .. } => {
                participant.seed_station(timetable, &midpoint_m, platform);
            }
            ResolvedOrigin::Point(point) => {
                participant.seed_address(timetable, &midpoint_m, point)?;
            }
        }
        debug!(
            "Participant {}: initial frontier size {}",
            participant.label,
            participant.queue.len()
        );
        participants.push(participant);
    }
    Ok((participants, midpoint_m))
}
