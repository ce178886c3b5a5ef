//! Contract tests for the all-stops heatmap mode.

mod common;

use common::line_feed;
use treffpunkt::prelude::*;
use treffpunkt::MAX_TRIP_TIME_S;

const TEN_AM: Time = 36000;

fn line_specs() -> Vec<ParticipantSpec> {
    vec![
        ParticipantSpec::at_station("A", "Station 0"),
        ParticipantSpec::at_station("B", "Station 11"),
    ]
}

fn line_timetable() -> Timetable {
    // 12 stations, 6 trips each way, 10-minute headway, 2 minutes per hop
    build_timetable(&line_feed(12, 6, 600, 120))
}

#[test]
fn every_commonly_reachable_stop_is_reported_consistently() {
    let tt = line_timetable();
    let response = heatmap(
        &tt,
        &HeatmapQuery::new(line_specs(), TEN_AM),
        &mut HeatmapCallbacks::default(),
    )
    .unwrap();

    assert_eq!(response.results.len(), 12);
    assert_eq!(response.total_stops_reached, 12);
    assert_eq!(response.termination, Termination::QueueExhausted);
    for record in &response.results {
        assert_eq!(record.per_participant.len(), 2);
        assert_eq!(
            record.total_elapsed,
            record.per_participant.iter().sum::<Time>()
        );
        assert_eq!(
            record.max_elapsed,
            *record.per_participant.iter().max().unwrap()
        );
        assert!(record.max_elapsed <= MAX_TRIP_TIME_S);
    }
}

#[test]
fn progress_callbacks_fire_and_finish_at_one_hundred_percent() {
    let tt = line_timetable();
    let mut progress: Vec<ProgressUpdate> = Vec::new();
    let mut stop_updates = 0usize;
    let mut callbacks = HeatmapCallbacks {
        on_progress: Some(Box::new(|update| progress.push(update))),
        on_stop_update: Some(Box::new(|_| stop_updates += 1)),
    };
    let response = heatmap(&tt, &HeatmapQuery::new(line_specs(), TEN_AM), &mut callbacks)
        .unwrap();
    drop(callbacks);

    assert!(!progress.is_empty());
    let last = progress.last().unwrap();
    assert_eq!(last.percent, 100.0);
    assert_eq!(last.iterations, response.iterations);
    assert_eq!(last.stops_found, response.results.len());
    // explored minutes only ever grow
    for pair in progress.windows(2) {
        assert!(pair[0].explored_minutes <= pair[1].explored_minutes);
    }
    assert!(stop_updates >= 1);
}

#[test]
fn iteration_capped_heatmap_still_reports_final_progress() {
    let tt = line_timetable();
    let mut final_percent = 0.0f64;
    let mut callbacks = HeatmapCallbacks {
        on_progress: Some(Box::new(|update| final_percent = update.percent)),
        on_stop_update: None,
    };
    let mut query = HeatmapQuery::new(line_specs(), TEN_AM);
    query.limits = SearchLimits::with_iteration_cap(10);
    let response = heatmap(&tt, &query, &mut callbacks).unwrap();
    drop(callbacks);

    assert_eq!(response.termination, Termination::IterationLimit);
    assert_eq!(response.iterations, 10);
    assert_eq!(final_percent, 100.0);
}

#[test]
fn heatmap_covers_the_meeting_stop() {
    let tt = line_timetable();
    let heat = heatmap(
        &tt,
        &HeatmapQuery::new(line_specs(), TEN_AM),
        &mut HeatmapCallbacks::default(),
    )
    .unwrap();
    let meeting =
        plan_meeting(&tt, &MeetingQuery::new(line_specs(), TEN_AM)).unwrap();
    let Some(MeetingOutcome::Met { stop }) = meeting.meeting else {
        panic!("expected a meeting");
    };
    // The meeting stop must be one of the heatmap's records, with the same
    // per-participant elapsed times.
    let record = heat.results.iter().find(|r| r.stop == stop).unwrap();
    let elapsed: Vec<Time> = meeting
        .participants
        .iter()
        .map(|r| r.elapsed.unwrap())
        .collect();
    assert_eq!(record.per_participant, elapsed);
}

#[test]
fn bulk_runs_match_individual_runs() {
    let tt = line_timetable();
    let departures = [TEN_AM, TEN_AM + 600];
    let bulk = bulk_heatmaps(&tt, &line_specs(), &departures, &SearchLimits::default()).unwrap();
    assert_eq!(bulk.len(), 2);
    for (response, &departure) in bulk.iter().zip(&departures) {
        let single = heatmap(
            &tt,
            &HeatmapQuery::new(line_specs(), departure),
            &mut HeatmapCallbacks::default(),
        )
        .unwrap();
        assert_eq!(
            format!("{:?}", response.results),
            format!("{:?}", single.results)
        );
        assert_eq!(response.iterations, single.iterations);
    }
}

#[test]
fn heatmap_geojson_carries_every_record() {
    let tt = line_timetable();
    let response = heatmap(
        &tt,
        &HeatmapQuery::new(line_specs(), TEN_AM),
        &mut HeatmapCallbacks::default(),
    )
    .unwrap();
    let collection = heatmap_to_geojson(&tt, &response);
    assert_eq!(collection.features.len(), response.results.len());
}

#[test]
fn single_participant_heatmaps_are_allowed() {
    let tt = line_timetable();
    let response = heatmap(
        &tt,
        &HeatmapQuery::new(vec![ParticipantSpec::at_station("A", "Station 0")], TEN_AM),
        &mut HeatmapCallbacks::default(),
    )
    .unwrap();
    assert_eq!(response.results.len(), 12);

    let none = heatmap(
        &tt,
        &HeatmapQuery::new(vec![], TEN_AM),
        &mut HeatmapCallbacks::default(),
    );
    assert!(matches!(none, Err(Error::TooFewParticipants)));
}
