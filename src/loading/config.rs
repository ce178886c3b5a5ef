use std::path::PathBuf;

/// Loader configuration.
///
/// Each directory must contain `stops.txt`, `stop_times.txt`, `trips.txt`
/// and `routes.txt`; `pathways.txt` and `transfers.txt` are optional.
/// Multiple directories are merged into one timetable.
#[derive(Debug, Clone, Default)]
pub struct TimetableConfig {
    pub feed_dirs: Vec<PathBuf>,
}
