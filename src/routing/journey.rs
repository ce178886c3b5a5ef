//! Journey steps and their human-readable rendering.

use crate::model::time::format_hm;
use crate::model::types::{StopId, Time, TripId, WalkSource};
use crate::Timetable;

/// One movement in a participant's journey. `from` is `None` for the
/// starting entry and for address-to-stop seed walks.
#[derive(Debug, Clone)]
pub struct Step {
    pub from: Option<StopId>,
    pub to: StopId,
    pub depart: Time,
    pub arrive: Time,
    pub kind: StepKind,
}

#[derive(Debug, Clone)]
pub enum StepKind {
    Start,
    Walk {
        source: WalkSource,
        duration: Time,
        distance_m: Option<u32>,
    },
    Ride {
        trip: TripId,
        wait: Time,
        ride: Time,
    },
}

/// A reconstructed path to one stop: the step sequence from the origin,
/// plus the first arrival there and the elapsed travel time.
#[derive(Debug, Clone)]
pub struct Journey {
    pub steps: Vec<Step>,
    pub arrival: Time,
    pub elapsed: Time,
}

/// Route-type display names for the common GTFS codes.
fn route_type_name(route_type: Option<i32>) -> String {
    match route_type {
        Some(0) | Some(900) => "Tram".to_string(),
        Some(2) | Some(100) => "Rail".to_string(),
        Some(3) | Some(700) => "Bus".to_string(),
        Some(400) => "Subway/Metro".to_string(),
        Some(other) => format!("Type{other}"),
        None => "Type?".to_string(),
    }
}

/// One-line description of a step, for logs and reports.
pub fn describe_step(timetable: &Timetable, step: &Step) -> String {
    match &step.kind {
        StepKind::Start => format!(
            "START at {} on {}",
            format_hm(step.depart),
            timetable.stop_label(step.to)
        ),
        StepKind::Walk {
            source,
            duration,
            distance_m,
        } => {
            let from = match step.from {
                Some(stop) => timetable.stop_label(stop),
                None => "origin".to_string(),
            };
            let extra = match distance_m {
                Some(d) if *source == WalkSource::Geo || *source == WalkSource::Address => {
                    format!(" (≈{d} m)")
                }
                _ => String::new(),
            };
            format!(
                "WALK({source:?}) {} {from} → {} in {}m{extra}",
                format_hm(step.depart),
                timetable.stop_label(step.to),
                duration / 60
            )
        }
        StepKind::Ride { trip, wait, ride } => {
            let trip_meta = timetable.trip(*trip);
            let (kind, short) = match trip_meta.route {
                Some(route) => {
                    let r = timetable.route(route);
                    (route_type_name(r.route_type), r.short_name.clone())
                }
                None => (route_type_name(None), String::new()),
            };
            let line = if short.is_empty() {
                "(route?)".to_string()
            } else {
                short
            };
            let from = match step.from {
                Some(stop) => timetable.stop_label(stop),
                None => "origin".to_string(),
            };
            format!(
                "RIDE {} {from} → {} • wait {}m ride {}m on {kind} {line}",
                format_hm(step.depart),
                timetable.stop_label(step.to),
                wait / 60,
                ride / 60
            )
        }
    }
}
