use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_desc: String,
    pub stop_lat: String,
    pub stop_lon: String,
    pub location_type: String,
    pub parent_station: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedStopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedTrip {
    pub route_id: String,
    pub trip_id: String,
    pub trip_headsign: String,
    pub direction_id: String,
    pub shape_id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedRoute {
    pub route_id: String,
    pub agency_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_type: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedPathway {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub traversal_time: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedTransfer {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub min_transfer_time: String,
}

/// The six logical tables of a feed, before indexing.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub stops: Vec<FeedStop>,
    pub stop_times: Vec<FeedStopTime>,
    pub trips: Vec<FeedTrip>,
    pub routes: Vec<FeedRoute>,
    pub pathways: Vec<FeedPathway>,
    pub transfers: Vec<FeedTransfer>,
}
