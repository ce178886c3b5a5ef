//! Station name resolution and start-platform selection.

use crate::model::types::{StationId, StopId, Time};
use crate::{Error, Timetable};

/// Resolve a textual station query against the ranked lookup list.
///
/// Matches are scored exact > prefix > substring; equal scores fall back
/// to popularity, match position and name.
pub fn resolve_station<'a>(
    timetable: &'a Timetable,
    query: &str,
) -> Result<(StationId, &'a str), Error> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let mut matches: Vec<(u8, &crate::model::types::StationEntry, usize)> = Vec::new();
    for entry in timetable.station_lookup() {
        let Some(idx) = entry.lower_name.find(&needle) else {
            continue;
        };
        let score = if entry.lower_name == needle {
            3
        } else if idx == 0 {
            2
        } else {
            1
        };
        matches.push((score, entry, idx));
    }
    if matches.is_empty() {
        return Err(Error::NoStationMatch(query.trim().to_string()));
    }

    matches.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.popularity.cmp(&a.1.popularity))
            .then_with(|| a.2.cmp(&b.2))
            .then_with(|| a.1.name.cmp(&b.1.name))
    });
    let best = matches[0].1;
    Ok((best.station, timetable.station(best.station).name.as_str()))
}

/// Pick the platform of `station` with the earliest departure at or after
/// `t0`. Falls back to the station's first platform when nothing departs
/// any more, so dead-hour searches stay seedable; `None` only for a
/// station with zero platforms.
pub fn pick_start_platform(
    timetable: &Timetable,
    station: StationId,
    t0: Time,
) -> Option<StopId> {
    let platforms = timetable.platforms(station);
    let mut best: Option<(Time, StopId)> = None;
    for &platform in platforms {
        let rows = timetable.rows_at_stop(platform);
        let idx = rows.partition_point(|r| r.departure < t0);
        if let Some(row) = rows.get(idx) {
            if best.is_none_or(|(dep, _)| row.departure < dep) {
                best = Some((row.departure, platform));
            }
        }
    }
    best.map(|(_, platform)| platform)
        .or_else(|| platforms.first().copied())
}
