//! The meeting-point query: validation, priming, search and assembly.

use log::debug;

use crate::model::types::{StopId, Time};
use crate::routing::driver::{run_search, SearchLimits, SearchStats, Termination, VisitPolicy};
use crate::routing::journey::Journey;
use crate::routing::participant::{prime_participants, Participant, ParticipantSpec, ResolvedOrigin};
use crate::{Error, Timetable, MAX_PARTICIPANTS};

/// A meeting-point request: participants and a common departure instant.
#[derive(Debug, Clone)]
pub struct MeetingQuery {
    pub participants: Vec<ParticipantSpec>,
    /// Seconds since service midnight.
    pub departure: Time,
    pub limits: SearchLimits,
}

impl MeetingQuery {
    pub fn new(participants: Vec<ParticipantSpec>, departure: Time) -> Self {
        Self {
            participants,
            departure,
            limits: SearchLimits::default(),
        }
    }
}

/// How the meeting search ended, when it produced a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingOutcome {
    /// Every participant can reach this stop.
    Met { stop: StopId },
    /// No meeting; this participant crossed the travel cap first.
    CapExceeded { participant: String },
}

/// Per-participant view of the finished search.
#[derive(Debug, Clone)]
pub struct ParticipantReport {
    pub label: String,
    pub origin: ResolvedOrigin,
    pub t0: Time,
    /// Arrival and elapsed seconds at the meeting stop, when one was found.
    pub arrival: Option<Time>,
    pub elapsed: Option<Time>,
    pub journey: Option<Journey>,
}

#[derive(Debug, Clone)]
pub struct MeetingResponse {
    pub meeting: Option<MeetingOutcome>,
    /// Wall-clock meeting instant: the latest participant arrival.
    pub meet_time: Option<Time>,
    /// Spread between the slowest and fastest participant.
    pub fairness_gap: Option<Time>,
    pub participants: Vec<ParticipantReport>,
    pub stats: SearchStats,
}

/// Log a frontier summary every ten explored minutes.
const PROGRESS_STEP_S: Time = 600;

struct MeetingPolicy {
    met: Option<StopId>,
    capped: Option<usize>,
    next_progress: Time,
}

impl VisitPolicy for MeetingPolicy {
    fn on_common_stop(
        &mut self,
        _participants: &[Participant],
        stop: StopId,
        _iterations: u64,
    ) -> bool {
        self.met = Some(stop);
        true
    }

    fn on_cap_dropped(&mut self, participant: usize) {
        self.capped.get_or_insert(participant);
    }

    fn on_iteration(&mut self, participants: &[Participant], iterations: u64, max_elapsed: Time) {
        if max_elapsed >= self.next_progress {
            let reached: Vec<String> = participants
                .iter()
                .map(|p| format!("{}:{}", p.label, p.reached.count_ones(..)))
                .collect();
            debug!(
                "frontier elapsed ≥ {}m after {iterations} iterations | reached: {}",
                self.next_progress / 60,
                reached.join(", ")
            );
            self.next_progress += PROGRESS_STEP_S;
        }
    }
}

/// Find the first stop every participant can reach, and each participant's
/// journey to it.
///
/// # Errors
///
/// Validation and resolution failures surface before any search work; cap
/// and budget exhaustion are reported in the response, not as errors.
pub fn plan_meeting(timetable: &Timetable, query: &MeetingQuery) -> Result<MeetingResponse, Error> {
    if query.participants.len() < 2 {
        return Err(Error::TooFewParticipants);
    }
    if query.participants.len() > MAX_PARTICIPANTS {
        return Err(Error::TooManyParticipants);
    }

    let (mut participants, midpoint_m) =
        prime_participants(timetable, &query.participants, query.departure)?;

    let mut policy = MeetingPolicy {
        met: None,
        capped: None,
        next_progress: PROGRESS_STEP_S,
    };
    let mut stats = run_search(
        timetable,
        &mut participants,
        &midpoint_m,
        &query.limits,
        &mut policy,
    );

    let meeting = match policy.met {
        Some(stop) => {
            debug!("Found common platform {}", timetable.stop_label(stop));
            Some(MeetingOutcome::Met { stop })
        }
        None => policy.capped.map(|idx| {
            stats.termination = Termination::CapExceeded;
            MeetingOutcome::CapExceeded {
                participant: participants[idx].label.clone(),
            }
        }),
    };

    let met_stop = match &meeting {
        Some(MeetingOutcome::Met { stop }) => Some(*stop),
        _ => None,
    };

    let reports: Vec<ParticipantReport> = participants
        .iter()
        .map(|participant| {
            let (arrival, elapsed, journey) = match met_stop {
                Some(stop) => (
                    Some(participant.first_arrival[stop]),
                    Some(participant.first_elapsed[stop]),
                    Some(participant.journey_to(stop)),
                ),
                None => (None, None, None),
            };
            ParticipantReport {
                label: participant.label.clone(),
                origin: participant.origin,
                t0: participant.t0,
                arrival,
                elapsed,
                journey,
            }
        })
        .collect();

    let meet_time = met_stop.and_then(|_| reports.iter().filter_map(|r| r.arrival).max());
    let fairness_gap = met_stop.and_then(|_| {
        let elapsed: Vec<Time> = reports.iter().filter_map(|r| r.elapsed).collect();
        match (elapsed.iter().max(), elapsed.iter().min()) {
            (Some(max), Some(min)) => Some(max - min),
            _ => None,
        }
    });

    Ok(MeetingResponse {
        meeting,
        meet_time,
        fairness_gap,
        participants: reports,
        stats,
    })
}
