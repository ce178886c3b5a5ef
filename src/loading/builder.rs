use log::info;

use super::config::TimetableConfig;
use super::gtfs::parser::{deserialize_feed_file, deserialize_optional_file};
use super::gtfs::{build_timetable, Feed};
use crate::{Error, Timetable};

/// Read the feed tables from every configured directory and build the
/// timetable.
///
/// # Errors
///
/// Returns an error if no directory is configured or a required table
/// cannot be read.
pub fn load_timetable(config: &TimetableConfig) -> Result<Timetable, Error> {
    if config.feed_dirs.is_empty() {
        return Err(Error::InvalidData(
            "No feed directories provided in the configuration".to_string(),
        ));
    }

    let mut feed = Feed::default();
    for dir in &config.feed_dirs {
        info!("Loading feed tables from {}", dir.display());
        feed.stops.extend(deserialize_feed_file(&dir.join("stops.txt"))?);
        feed.stop_times
            .extend(deserialize_feed_file(&dir.join("stop_times.txt"))?);
        feed.trips.extend(deserialize_feed_file(&dir.join("trips.txt"))?);
        feed.routes
            .extend(deserialize_feed_file(&dir.join("routes.txt"))?);
        feed.pathways
            .extend(deserialize_optional_file(&dir.join("pathways.txt"))?);
        feed.transfers
            .extend(deserialize_optional_file(&dir.join("transfers.txt"))?);
    }
    info!(
        "Read {} stops, {} stop-time rows, {} trips, {} routes",
        feed.stops.len(),
        feed.stop_times.len(),
        feed.trips.len(),
        feed.routes.len()
    );

    let timetable = build_timetable(&feed);
    info!(
        "Timetable ready: {} stops, {} stations, {} trips",
        timetable.stop_count(),
        timetable.station_count(),
        timetable.trip_count()
    );
    Ok(timetable)
}
