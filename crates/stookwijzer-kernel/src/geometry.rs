//! Point-in-polygon matching over GeoJSON-shaped geometry.
//!
//! Uses the even-odd crossing rule: cast a horizontal ray from the point and
//! count how many ring edges it crosses. Points exactly on an edge may land on
//! either side.

use stookwijzer_types::{GeoPoint, Geometry, Polygon, Ring};

/// Even-odd test against one ring. An empty ring contains nothing.
///
/// The ring may or may not repeat its first vertex at the end; a repeated
/// closing vertex produces a zero-length edge that never counts as a crossing.
pub fn point_in_ring(point: GeoPoint, ring: &Ring) -> bool {
    let vertices = ring.points();
    let Some(last) = vertices.len().checked_sub(1) else {
        return false;
    };

    let (x, y) = (point.lon(), point.lat());
    let mut inside = false;
    let mut j = last;
    for (i, vi) in vertices.iter().enumerate() {
        let vj = vertices[j];
        let (xi, yi) = (vi.lon(), vi.lat());
        let (xj, yj) = (vj.lon(), vj.lat());

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inside the outer boundary and outside every hole.
pub fn point_in_polygon_part(point: GeoPoint, polygon: &Polygon) -> bool {
    point_in_ring(point, &polygon.outer)
        && !polygon.holes.iter().any(|hole| point_in_ring(point, hole))
}

/// Tests a point against optional region geometry.
///
/// A `MultiPolygon` contains the point when any of its parts does. Missing
/// geometry contains nothing.
pub fn point_in_polygon(point: GeoPoint, geometry: Option<&Geometry>) -> bool {
    match geometry {
        Some(Geometry::Polygon(polygon)) => point_in_polygon_part(point, polygon),
        Some(Geometry::MultiPolygon(parts)) => {
            parts.iter().any(|part| point_in_polygon_part(point, part))
        }
        None => false,
    }
}
