//! The interleaved multi-source search loop shared by meeting and heatmap
//! queries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::trace;

use crate::model::types::{StopId, Time};
use crate::routing::edges;
use crate::routing::journey::StepKind;
use crate::routing::participant::Participant;
use crate::{Timetable, DEFAULT_ITERATION_CAP, MAX_TRIP_TIME_S};

/// How often the cancellation flag is polled, in loop iterations.
const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Caller-adjustable search budgets. The per-relaxation travel cap is the
/// fixed `MAX_TRIP_TIME_S`; only the loop iteration bound and cancellation
/// are configurable.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    pub iteration_cap: u64,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            iteration_cap: DEFAULT_ITERATION_CAP,
            cancel: None,
        }
    }
}

impl SearchLimits {
    pub fn with_iteration_cap(iteration_cap: u64) -> Self {
        Self {
            iteration_cap,
            ..Self::default()
        }
    }
}

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A common stop was found (meeting mode only).
    Met,
    /// No meeting, and at least one participant crossed the travel cap.
    CapExceeded,
    /// Every frontier drained without a meeting.
    QueueExhausted,
    /// The iteration safety cap was hit.
    IterationLimit,
    /// The host cancelled the search.
    Cancelled,
}

/// Diagnostics for a finished search.
#[derive(Debug, Clone)]
pub struct SearchStats {
    pub iterations: u64,
    /// Settled (stop, participant) pairs.
    pub total_visited: usize,
    /// Largest elapsed value ever popped.
    pub max_elapsed: Time,
    pub termination: Termination,
    /// Final frontier size per participant.
    pub queue_sizes: Vec<usize>,
}

/// What a search mode does at the loop's observation points. The driver
/// owns relaxation and expansion; policies only decide termination and
/// recording.
pub(crate) trait VisitPolicy {
    /// `stop` has now been settled by every participant. Return `true` to
    /// terminate the search.
    fn on_common_stop(
        &mut self,
        participants: &[Participant],
        stop: StopId,
        iterations: u64,
    ) -> bool;

    /// An entry above the travel cap was popped and dropped.
    fn on_cap_dropped(&mut self, participant: usize);

    /// Called once per popped entry, before relaxation.
    fn on_iteration(&mut self, participants: &[Participant], iterations: u64, max_elapsed: Time);
}

/// Run the interleaved search until the policy terminates it or a budget
/// runs out.
///
/// Each participant's heap is an independent time-dependent Dijkstra; the
/// driver always pops the globally smallest elapsed head, so per-participant
/// pop sequences stay monotone and the first commonly-settled stop minimizes
/// the worst participant's travel time.
pub(crate) fn run_search<P: VisitPolicy>(
    timetable: &Timetable,
    participants: &mut [Participant],
    midpoint_m: &[u32],
    limits: &SearchLimits,
    policy: &mut P,
) -> SearchStats {
    let mut iterations: u64 = 0;
    let mut total_visited: usize = 0;
    let mut max_elapsed: Time = 0;

    let termination = loop {
        if iterations >= limits.iteration_cap {
            break Termination::IterationLimit;
        }
        if iterations % CANCEL_POLL_INTERVAL == 0 {
            if let Some(flag) = &limits.cancel {
                if flag.load(Ordering::Relaxed) {
                    break Termination::Cancelled;
                }
            }
        }

        // The head with the smallest key across all frontiers; ties fall to
        // the earlier participant, keeping the loop deterministic.
        let mut best: Option<(usize, crate::routing::SearchKey)> = None;
        for (idx, participant) in participants.iter().enumerate() {
            if let Some(&key) = participant.queue.peek() {
                if best.is_none_or(|(_, current)| key < current) {
                    best = Some((idx, key));
                }
            }
        }
        let Some((owner, _)) = best else {
            break Termination::QueueExhausted;
        };
        let Some((key, step)) = participants[owner].queue.pop() else {
            break Termination::QueueExhausted;
        };

        iterations += 1;
        max_elapsed = max_elapsed.max(key.elapsed);
        policy.on_iteration(participants, iterations, max_elapsed);

        if key.elapsed > MAX_TRIP_TIME_S {
            // Dropping instead of terminating lets the other participants
            // keep draining their frontiers.
            policy.on_cap_dropped(owner);
            continue;
        }

        let stop = key.stop;
        let arrive = step.arrive;
        let is_start = matches!(step.kind, StepKind::Start);
        {
            let participant = &mut participants[owner];
            if participant.best_elapsed[stop] <= key.elapsed {
                continue;
            }
            participant.best_elapsed[stop] = key.elapsed;
            total_visited += 1;
            if !is_start {
                participant.parent[stop] = Some(step);
            }
            if !participant.reached.contains(stop) {
                participant.reached.insert(stop);
                participant.first_arrival[stop] = arrive;
                participant.first_elapsed[stop] = key.elapsed;
            } else if key.elapsed < participant.first_elapsed[stop] {
                participant.first_arrival[stop] = arrive;
                participant.first_elapsed[stop] = key.elapsed;
            }
        }
        trace!(
            "settle owner={owner} stop={stop} elapsed={} arrive={arrive}",
            key.elapsed
        );

        if participants.iter().all(|q| q.reached.contains(stop))
            && policy.on_common_stop(participants, stop, iterations)
        {
            break Termination::Met;
        }

        edges::expand_from(
            timetable,
            &mut participants[owner].queue,
            midpoint_m,
            stop,
            arrive,
            key.elapsed,
        );
    };

    SearchStats {
        iterations,
        total_visited,
        max_elapsed,
        termination,
        queue_sizes: participants.iter().map(|p| p.queue.len()).collect(),
    }
}
