//! The all-stops variant of the meeting search.
//!
//! Instead of terminating at the first common platform, the search keeps
//! draining every frontier (bounded by the travel cap and the iteration
//! budget) and records, for every stop all participants can reach, each
//! participant's earliest arrival.

use geojson::{Feature, FeatureCollection, Geometry};
use hashbrown::HashMap;
use rayon::prelude::*;
use serde_json::json;

use crate::model::types::{StopId, Time};
use crate::routing::driver::{run_search, SearchLimits, Termination, VisitPolicy};
use crate::routing::participant::{prime_participants, Participant, ParticipantSpec};
use crate::{Error, Timetable, MAX_PARTICIPANTS, MAX_TRIP_TIME_S};

/// Emit `on_stop_update` at most once per this many iterations.
const STOP_UPDATE_INTERVAL: u64 = 5000;

/// Emit `on_progress` whenever the explored frontier grows by this many
/// minutes.
const PROGRESS_STEP_MIN: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct HeatmapQuery {
    pub participants: Vec<ParticipantSpec>,
    /// Seconds since service midnight.
    pub departure: Time,
    pub limits: SearchLimits,
}

impl HeatmapQuery {
    pub fn new(participants: Vec<ParticipantSpec>, departure: Time) -> Self {
        Self {
            participants,
            departure,
            limits: SearchLimits::default(),
        }
    }
}

/// One commonly reachable stop.
#[derive(Debug, Clone)]
pub struct HeatmapStop {
    pub stop: StopId,
    pub lat: f64,
    pub lon: f64,
    /// Sum of the per-participant elapsed times.
    pub total_elapsed: Time,
    /// Worst participant's elapsed time.
    pub max_elapsed: Time,
    pub per_participant: Vec<Time>,
}

#[derive(Debug, Clone)]
pub struct HeatmapResponse {
    /// Recording order; consumers decide the ranking.
    pub results: Vec<HeatmapStop>,
    pub iterations: u64,
    pub total_stops_reached: usize,
    pub termination: Termination,
}

/// Throttled progress notification.
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    /// Explored share of the travel cap, 0–100.
    pub percent: f64,
    pub explored_minutes: f64,
    pub iterations: u64,
    pub stops_found: usize,
}

/// Optional observation hooks. Both are observation points only; no search
/// state escapes through them.
#[derive(Default)]
pub struct HeatmapCallbacks<'a> {
    pub on_progress: Option<Box<dyn FnMut(ProgressUpdate) + 'a>>,
    pub on_stop_update: Option<Box<dyn FnMut(&HeatmapStop) + 'a>>,
}

struct HeatmapPolicy<'a, 'c> {
    timetable: &'a Timetable,
    records: Vec<HeatmapStop>,
    index_of: HashMap<StopId, usize>,
    callbacks: &'a mut HeatmapCallbacks<'c>,
    next_progress_min: f64,
    last_stop_emit: Option<u64>,
}

impl VisitPolicy for HeatmapPolicy<'_, '_> {
    fn on_common_stop(
        &mut self,
        participants: &[Participant],
        stop: StopId,
        iterations: u64,
    ) -> bool {
        let per_participant: Vec<Time> = participants
            .iter()
            .map(|p| p.first_elapsed[stop])
            .collect();
        let total_elapsed = per_participant.iter().sum();
        let max_elapsed = per_participant.iter().copied().max().unwrap_or(0);

        let idx = match self.index_of.get(&stop) {
            Some(&idx) => {
                if max_elapsed >= self.records[idx].max_elapsed {
                    return false;
                }
                let record = &mut self.records[idx];
                record.total_elapsed = total_elapsed;
                record.max_elapsed = max_elapsed;
                record.per_participant = per_participant;
                idx
            }
            None => {
                let geometry = self.timetable.stop(stop).geometry;
                self.index_of.insert(stop, self.records.len());
                self.records.push(HeatmapStop {
                    stop,
                    lat: geometry.y(),
                    lon: geometry.x(),
                    total_elapsed,
                    max_elapsed,
                    per_participant,
                });
                self.records.len() - 1
            }
        };

        if self
            .last_stop_emit
            .is_none_or(|last| iterations.saturating_sub(last) >= STOP_UPDATE_INTERVAL)
        {
            if let Some(cb) = &mut self.callbacks.on_stop_update {
                cb(&self.records[idx]);
                self.last_stop_emit = Some(iterations);
            }
        }
        false
    }

    fn on_cap_dropped(&mut self, _participant: usize) {}

    fn on_iteration(&mut self, _: &[Participant], iterations: u64, max_elapsed: Time) {
        let explored_minutes = f64::from(max_elapsed) / 60.0;
        if explored_minutes >= self.next_progress_min {
            if let Some(cb) = &mut self.callbacks.on_progress {
                cb(ProgressUpdate {
                    percent: (f64::from(max_elapsed) / f64::from(MAX_TRIP_TIME_S) * 100.0)
                        .min(100.0),
                    explored_minutes,
                    iterations,
                    stops_found: self.records.len(),
                });
            }
            self.next_progress_min = explored_minutes + PROGRESS_STEP_MIN;
        }
    }
}

/// Enumerate every stop all participants can reach, with their earliest
/// arrivals.
///
/// # Errors
///
/// Validation and resolution failures surface before any search work.
pub fn heatmap(
    timetable: &Timetable,
    query: &HeatmapQuery,
    callbacks: &mut HeatmapCallbacks,
) -> Result<HeatmapResponse, Error> {
    if query.participants.is_empty() {
        return Err(Error::TooFewParticipants);
    }
    if query.participants.len() > MAX_PARTICIPANTS {
        return Err(Error::TooManyParticipants);
    }

    let (mut participants, midpoint_m) =
        prime_participants(timetable, &query.participants, query.departure)?;

    let (results, stats) = {
        let mut policy = HeatmapPolicy {
            timetable,
            records: Vec::new(),
            index_of: HashMap::new(),
            callbacks: &mut *callbacks,
            next_progress_min: PROGRESS_STEP_MIN,
            last_stop_emit: None,
        };
        let stats = run_search(
            timetable,
            &mut participants,
            &midpoint_m,
            &query.limits,
            &mut policy,
        );
        (policy.records, stats)
    };
    if let Some(cb) = &mut callbacks.on_progress {
        cb(ProgressUpdate {
            percent: 100.0,
            explored_minutes: f64::from(stats.max_elapsed) / 60.0,
            iterations: stats.iterations,
            stops_found: results.len(),
        });
    }

    let total_stops_reached = results.len();
    Ok(HeatmapResponse {
        results,
        iterations: stats.iterations,
        total_stops_reached,
        termination: stats.termination,
    })
}

/// Run the same heatmap for several departure instants in parallel. The
/// runs are independent; callbacks are not available in bulk mode.
pub fn bulk_heatmaps(
    timetable: &Timetable,
    participants: &[ParticipantSpec],
    departures: &[Time],
    limits: &SearchLimits,
) -> Result<Vec<HeatmapResponse>, Error> {
    departures
        .par_iter()
        .map(|&departure| {
            heatmap(
                timetable,
                &HeatmapQuery {
                    participants: participants.to_vec(),
                    departure,
                    limits: limits.clone(),
                },
                &mut HeatmapCallbacks::default(),
            )
        })
        .collect()
}

/// Convert heatmap results into a `GeoJSON` `FeatureCollection` of points.
///
/// # Panics
///
/// Panics if `Feature::from_json_value` fails to parse the JSON value,
/// which cannot happen for the shapes built here.
pub fn heatmap_to_geojson(timetable: &Timetable, response: &HeatmapResponse) -> FeatureCollection {
    let features = response
        .results
        .iter()
        .map(|record| {
            let point = timetable.stop(record.stop).geometry;
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new((&point).into()),
                "properties": {
                    "stop": timetable.stop(record.stop).feed_id,
                    "name": timetable.stop_label(record.stop),
                    "total_elapsed": record.total_elapsed,
                    "max_elapsed": record.max_elapsed,
                    "per_participant": record.per_participant,
                }
            });
            Feature::from_json_value(value).unwrap()
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}
