// Re-export key components
pub use crate::algo::heatmap::{
    bulk_heatmaps, heatmap, heatmap_to_geojson, HeatmapCallbacks, HeatmapQuery, HeatmapResponse,
    HeatmapStop, ProgressUpdate,
};
pub use crate::loading::gtfs::{build_timetable, Feed};
pub use crate::loading::{load_timetable, TimetableConfig};
pub use crate::model::time::{format_hm, parse_hms, parse_start_time};
pub use crate::model::Timetable;
pub use crate::routing::to_geojson::{journey_to_geojson, journey_to_geojson_string};
pub use crate::routing::{
    describe_step, pick_start_platform, plan_meeting, resolve_station, Journey, MeetingOutcome,
    MeetingQuery, MeetingResponse, Origin, ParticipantSpec, ResolvedOrigin, SearchLimits,
    SearchStats, Step, StepKind, Termination,
};

// Core identifier types
pub use crate::model::{RouteId, StationId, StopId, Time, TripId, WalkSource};

pub use crate::error::Error;
