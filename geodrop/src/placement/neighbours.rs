//! Grid hash for fixed-radius neighbour queries.

use std::collections::HashMap;

use crate::cluster::GridCell;
use crate::coord::{Coordinate, MAX_LON, MIN_LON};
use crate::post::{Post, PostId};

/// Spatial hash of post locations with cell size equal to the query radius.
///
/// Any point within `radius` of a query lies in the query's cell or one of
/// its eight neighbours, so a lookup touches at most nine buckets. Queries
/// within `radius` of the antimeridian also look at the cells on the far
/// side of the seam.
#[derive(Debug, Clone)]
pub(crate) struct NeighbourIndex {
    radius: f64,
    cells: HashMap<GridCell, Vec<(PostId, Coordinate)>>,
}

impl NeighbourIndex {
    /// Index the given posts for queries of `radius` degrees.
    pub(crate) fn build<'a>(posts: impl IntoIterator<Item = &'a Post>, radius: f64) -> Self {
        let mut cells: HashMap<GridCell, Vec<(PostId, Coordinate)>> = HashMap::new();
        for post in posts {
            cells
                .entry(bucket(
                    post.location.latitude,
                    seam_longitude(post.location.longitude),
                    radius,
                ))
                .or_default()
                .push((post.id.clone(), post.location));
        }
        Self { radius, cells }
    }

    /// Posts within the query radius of `coord`, in no particular order.
    pub(crate) fn within<'a>(
        &'a self,
        coord: &'a Coordinate,
    ) -> impl Iterator<Item = &'a (PostId, Coordinate)> + 'a {
        let lat = coord.latitude;
        let lon = seam_longitude(coord.longitude);

        let mut cells: Vec<GridCell> = bucket(lat, lon, self.radius).neighbourhood().collect();
        if lon + self.radius >= MAX_LON {
            cells.extend(bucket(lat, lon - 360.0, self.radius).neighbourhood());
        }
        if lon - self.radius <= MIN_LON {
            cells.extend(bucket(lat, lon + 360.0, self.radius).neighbourhood());
        }
        // Large radii can make the wrapped neighbourhoods overlap
        cells.sort_unstable();
        cells.dedup();

        cells
            .into_iter()
            .filter_map(move |cell| self.cells.get(&cell))
            .flatten()
            .filter(move |(_, location)| location.planar_distance(coord) <= self.radius)
    }
}

/// -180° and 180° are the same meridian; bucket both on the eastern side.
fn seam_longitude(lon: f64) -> f64 {
    if lon <= MIN_LON {
        MAX_LON
    } else {
        lon
    }
}

fn bucket(lat: f64, lon: f64, radius: f64) -> GridCell {
    // Shifted query longitudes fall outside [-180, 180]
    let point = Coordinate {
        latitude: lat,
        longitude: lon,
    };
    GridCell::containing(&point, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post_at(id: &str, lat: f64, lon: f64) -> Post {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        Post::new(id, Coordinate::new(lat, lon).unwrap(), 0, created)
    }

    #[test]
    fn test_within_finds_across_cell_edges() {
        // 0.0999 and 0.1001 fall in different cells of size 0.1
        let posts = vec![post_at("a", 0.0999, 0.0), post_at("b", 0.1001, 0.0), post_at("c", 5.0, 5.0)];
        let index = NeighbourIndex::build(&posts, 0.1);

        let query = posts[0].location;
        let mut found: Vec<_> = index.within(&query).map(|(id, _)| id.as_str()).collect();
        found.sort();
        assert_eq!(found, vec!["a", "b"]);
    }

    #[test]
    fn test_within_respects_radius() {
        let posts = vec![post_at("a", 0.0, 0.0), post_at("b", 0.0, 0.15)];
        let index = NeighbourIndex::build(&posts, 0.1);
        let query = posts[0].location;
        assert_eq!(index.within(&query).count(), 1);
    }

    #[test]
    fn test_within_wraps_antimeridian() {
        let posts = vec![
            post_at("east", 0.0, 180.0),
            post_at("west", 0.0, -180.0),
            post_at("near_west", 0.0, -179.99995),
            post_at("far", 0.0, 179.9),
        ];
        let index = NeighbourIndex::build(&posts, 0.0001);

        for query in &posts[..3] {
            let mut found: Vec<_> = index.within(&query.location).map(|(id, _)| id.as_str()).collect();
            found.sort();
            assert_eq!(found, vec!["east", "near_west", "west"], "query {}", query.id);
        }
    }

    #[test]
    fn test_wide_radius_counts_each_post_once() {
        let posts = vec![post_at("a", 0.0, 179.0), post_at("b", 0.0, -179.0)];
        let index = NeighbourIndex::build(&posts, 200.0);
        assert_eq!(index.within(&posts[0].location).count(), 2);
    }
}
