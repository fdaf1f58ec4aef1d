//! Plain 2D point type and the small set of geometric primitives the rest of
//! the crate is built on: distances, arclength resampling, and grid-step
//! estimation for a point cloud sampled on a regular grid.

use std::ops::{Add, Mul, Sub};

/// A physical-space coordinate.
///
/// Kept as a plain `{x, y}` struct rather than reusing `geo::Point` directly
/// so that the Matryoshka table (§3 `Matryoshka M`) can do the linear
/// contraction arithmetic without going through `geo`'s trait machinery.
/// Conversions to `geo` types are provided where an algorithm (point-in-
/// polygon, etc.) needs them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    pub fn distance_to(&self, other: Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point2 {
    type Output = Point2;
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;
    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<Point2> for geo::Point<f64> {
    fn from(p: Point2) -> Self {
        geo::Point::new(p.x, p.y)
    }
}

impl From<geo::Point<f64>> for Point2 {
    fn from(p: geo::Point<f64>) -> Self {
        Point2::new(p.x(), p.y())
    }
}

/// Linear interpolation between two points, `t` in `[0, 1]`.
pub fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

/// Shortest distance from `p` to the segment `a -> b`.
pub fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < f64::EPSILON {
        return p.distance_to(a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    p.distance_to(closest)
}

/// Perimeter of a closed polyline (edge `last -> first` included).
pub fn polyline_perimeter(polyline: &[Point2]) -> f64 {
    if polyline.len() < 2 {
        return 0.0;
    }
    let n = polyline.len();
    (0..n)
        .map(|i| polyline[i].distance_to(polyline[(i + 1) % n]))
        .sum()
}

/// Shortest distance from `p` to a closed polyline.
pub fn point_to_polyline_distance(p: Point2, polyline: &[Point2]) -> f64 {
    let n = polyline.len();
    (0..n)
        .map(|i| point_segment_distance(p, polyline[i], polyline[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Resample a closed polyline to exactly `n` points, equi-spaced in
/// arclength, via linear interpolation between the original vertices (C1,
/// C3). `polyline` must have at least 2 distinct points and non-zero
/// perimeter.
pub fn arclength_resample(polyline: &[Point2], n: usize) -> Vec<Point2> {
    assert!(n > 0, "arclength_resample requires n > 0");
    let m = polyline.len();
    assert!(m >= 2, "arclength_resample requires at least 2 points");

    let perimeter = polyline_perimeter(polyline);
    if perimeter <= f64::EPSILON {
        return vec![polyline[0]; n];
    }

    let step = perimeter / n as f64;

    // Cumulative arclength at each original vertex, edge lengths in between.
    let mut cum = Vec::with_capacity(m + 1);
    cum.push(0.0);
    for i in 0..m {
        let edge_len = polyline[i].distance_to(polyline[(i + 1) % m]);
        cum.push(cum[i] + edge_len);
    }

    let mut out = Vec::with_capacity(n);
    let mut edge = 0usize;
    for k in 0..n {
        let target = step * k as f64;
        while edge + 1 < m && cum[edge + 1] < target {
            edge += 1;
        }
        let seg_start = cum[edge];
        let seg_len = cum[edge + 1] - seg_start;
        let t = if seg_len > f64::EPSILON {
            ((target - seg_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(lerp(polyline[edge], polyline[(edge + 1) % m], t));
    }
    out
}

/// True if `p` lies inside the closed polygon traced by `boundary` (§8 P6
/// "point_in_polygon(centre_i, boundary_i) = true"), via `geo`'s
/// point-in-polygon test.
pub fn point_in_polygon(p: Point2, boundary: &[Point2]) -> bool {
    if boundary.len() < 3 {
        return false;
    }
    let mut coords: Vec<(f64, f64)> = boundary.iter().map(|q| (q.x, q.y)).collect();
    coords.push(coords[0]);
    let polygon = geo::Polygon::new(geo::LineString::from(coords), vec![]);
    geo::Contains::contains(&polygon, &geo::Point::new(p.x, p.y))
}

/// Minimum non-zero coordinate difference across both axes of a point cloud
/// sampled on a regular grid (C1 `grid_cell_size`). Used to classify whether
/// a point lies on a valid grid cell when no explicit grid override is
/// supplied (§6 `grid`).
pub fn grid_cell_size(points: &[Point2]) -> f64 {
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let min_gap = |vals: &[f64]| -> Option<f64> {
        vals.windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > f64::EPSILON)
            .fold(None, |acc, d| Some(acc.map_or(d, |m: f64| m.min(d))))
    };

    match (min_gap(&xs), min_gap(&ys)) {
        (Some(gx), Some(gy)) => gx.min(gy),
        (Some(gx), None) => gx,
        (None, Some(gy)) => gy,
        (None, None) => 1.0,
    }
}
