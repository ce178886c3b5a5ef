//! Equirectangular spatial grid over stop coordinates.

use geo::Point;
use hashbrown::HashMap;

use crate::model::geometry::{cell_for, haversine_m};
use crate::model::types::{Stop, StopId};
use crate::{DLAT, DLON};

const M_PER_DEG_LAT: f64 = 111_320.0;

/// Buckets stop ids by the grid cell their coordinates fall into. The grid
/// is only a candidate filter; membership in a radius is decided by the
/// exact haversine check in [`SpatialGrid::nearby`].
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cells: HashMap<(i32, i32), Vec<StopId>>,
}

impl SpatialGrid {
    /// Bucket every stop with finite coordinates.
    pub fn build(stops: &[Stop]) -> Self {
        let mut cells: HashMap<(i32, i32), Vec<StopId>> = HashMap::new();
        for (idx, stop) in stops.iter().enumerate() {
            let (lat, lon) = (stop.geometry.y(), stop.geometry.x());
            if lat.is_finite() && lon.is_finite() {
                cells.entry(cell_for(lat, lon)).or_default().push(idx);
            }
        }
        Self { cells }
    }

    /// Stops within `radius_m` of `origin`, with their exact distances.
    ///
    /// `exclude` drops the origin stop itself when querying around a stop.
    /// Output order follows the cell scan and is deterministic; duplicates
    /// cannot occur because every stop lives in exactly one cell.
    pub fn nearby(
        &self,
        stops: &[Stop],
        origin: Point<f64>,
        radius_m: f64,
        exclude: Option<StopId>,
    ) -> Vec<(StopId, f64)> {
        let (lat0, lon0) = (origin.y(), origin.x());
        let (ci, cj) = cell_for(lat0, lon0);
        let m_per_deg_lon = M_PER_DEG_LAT * lat0.to_radians().cos();
        let nlat = ((radius_m / M_PER_DEG_LAT) / DLAT).ceil() as i32 + 1;
        let nlon = ((radius_m / m_per_deg_lon) / DLON).ceil() as i32 + 1;

        let mut found = Vec::new();
        for di in -nlat..=nlat {
            for dj in -nlon..=nlon {
                let Some(cell) = self.cells.get(&(ci + di, cj + dj)) else {
                    continue;
                };
                for &cand in cell {
                    if Some(cand) == exclude {
                        continue;
                    }
                    let d = haversine_m(origin, stops[cand].geometry);
                    if d <= radius_m {
                        found.push((cand, d));
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_at(feed_id: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            feed_id: feed_id.to_string(),
            name: feed_id.to_string(),
            desc: String::new(),
            geometry: Point::new(lon, lat),
            location_type: 0,
            station: 0,
            walks_start: 0,
            walks_len: 0,
            events_start: 0,
            events_len: 0,
        }
    }

    #[test]
    fn finds_stops_inside_radius_only() {
        // ~111 m per 0.001 degrees of latitude
        let stops = vec![
            stop_at("origin", 52.520, 13.405),
            stop_at("near", 52.521, 13.405),
            stop_at("far", 52.540, 13.405),
        ];
        let grid = SpatialGrid::build(&stops);
        let hits = grid.nearby(&stops, stops[0].geometry, 300.0, Some(0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 1);
        assert!((hits[0].1 - 111.2).abs() < 1.0);
    }

    #[test]
    fn excludes_origin_stop() {
        let stops = vec![stop_at("a", 52.52, 13.405), stop_at("b", 52.52, 13.405)];
        let grid = SpatialGrid::build(&stops);
        let hits = grid.nearby(&stops, stops[0].geometry, 100.0, Some(0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 1);
        assert_eq!(hits[0].1, 0.0);
    }

    #[test]
    fn skips_non_finite_coordinates() {
        let stops = vec![stop_at("ok", 52.52, 13.405), stop_at("nan", f64::NAN, 13.405)];
        let grid = SpatialGrid::build(&stops);
        let hits = grid.nearby(&stops, stops[0].geometry, 1000.0, Some(0));
        assert!(hits.is_empty());
    }
}
