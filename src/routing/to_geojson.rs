//! GeoJSON export of reconstructed journeys.

use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use crate::routing::journey::{Journey, StepKind};
use crate::Timetable;

/// Convert a journey into a `GeoJSON` `FeatureCollection`, one feature per
/// step. Steps without a source stop (seeds) become point features.
///
/// # Panics
///
/// Panics if `Feature::from_json_value` fails to parse the JSON value,
/// which cannot happen for the shapes built here.
pub fn journey_to_geojson(timetable: &Timetable, journey: &Journey) -> FeatureCollection {
    let mut features = Vec::with_capacity(journey.steps.len());

    for (idx, step) in journey.steps.iter().enumerate() {
        let to = timetable.stop(step.to).geometry;
        let geometry = match step.from {
            Some(from) => {
                let line: LineString<f64> =
                    vec![timetable.stop(from).geometry.0, to.0].into();
                Geometry::new((&line).into())
            }
            None => Geometry::new((&to).into()),
        };

        let properties = match &step.kind {
            StepKind::Start => json!({
                "leg_type": "start",
                "stop": timetable.stop(step.to).feed_id,
            }),
            StepKind::Walk {
                source,
                duration,
                distance_m,
            } => json!({
                "leg_type": "walk",
                "source": format!("{source:?}").to_uppercase(),
                "duration": duration,
                "distance_m": distance_m,
            }),
            StepKind::Ride { trip, wait, ride } => {
                let trip_meta = timetable.trip(*trip);
                let route_short = trip_meta
                    .route
                    .map(|r| timetable.route(r).short_name.clone())
                    .unwrap_or_default();
                json!({
                    "leg_type": "ride",
                    "trip": trip_meta.feed_id,
                    "route": route_short,
                    "headsign": trip_meta.headsign,
                    "wait": wait,
                    "ride": ride,
                })
            }
        };

        let mut properties = properties;
        properties["leg_index"] = json!(idx);
        properties["from_name"] = json!(step
            .from
            .map(|f| timetable.stop_label(f))
            .unwrap_or_default());
        properties["to_name"] = json!(timetable.stop_label(step.to));
        properties["departure_time"] = json!(step.depart);
        properties["arrival_time"] = json!(step.arrive);

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": properties,
        });
        features.push(Feature::from_json_value(value).unwrap());
    }

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

/// Convert a journey to a `GeoJSON` string.
pub fn journey_to_geojson_string(timetable: &Timetable, journey: &Journey) -> String {
    serde_json::to_string(&journey_to_geojson(timetable, journey)).unwrap_or_default()
}
