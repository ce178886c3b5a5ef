//! Higher-level analyses built on the search driver.

pub mod heatmap;

pub use heatmap::{
    bulk_heatmaps, heatmap, heatmap_to_geojson, HeatmapCallbacks, HeatmapQuery, HeatmapResponse,
    HeatmapStop, ProgressUpdate,
};
