//! Matryoshka builder and forward map (C5, C6; §4.5, §4.6).
//!
//! A `Matryoshka` is the per-segment bijection `[0,1]^2 -> R^2`: a table of
//! `L` nested layers, each a copy of the beautified boundary linearly
//! contracted toward the segment's centre, with the innermost layer
//! collapsed onto the centre itself. The forward map looks a point up by
//! bilinear interpolation between the two layers and two boundary vertices
//! that bracket it.

use crate::geometry::{lerp, Point2};

/// A single segment's nested-layer parameterisation.
///
/// `table[l * b + k]` is `T[l, k]` in the layer/boundary-index grid (§3).
#[derive(Debug, Clone)]
pub struct Matryoshka {
    layers: usize,
    points: usize,
    table: Vec<Point2>,
    centre: Point2,
}

impl Matryoshka {
    /// Builds the nested-layer table from a beautified boundary of `B`
    /// points and a centre, with `layers` (`L >= 2`) nesting levels (C5).
    ///
    /// `boundary` is assumed already beautified (fixed length, arclength
    /// equi-spaced, rotated to the seed-nearest vertex) by [`crate::beautify`].
    pub fn build(boundary: &[Point2], centre: Point2, layers: usize) -> Matryoshka {
        assert!(layers >= 2, "Matryoshka requires at least 2 layers");
        assert!(boundary.len() >= 2, "Matryoshka requires a boundary with >= 2 points");

        let b = boundary.len();
        let mut table = Vec::with_capacity(layers * b);
        for l in 0..layers {
            let frac = l as f64 / (layers - 1) as f64;
            for &p in boundary {
                table.push(lerp(p, centre, frac));
            }
        }
        Matryoshka {
            layers,
            points: b,
            table,
            centre,
        }
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn centre(&self) -> Point2 {
        self.centre
    }

    fn at(&self, l: usize, k: usize) -> Point2 {
        self.table[l * self.points + k]
    }

    /// Forward map `f(alpha, beta)`, `alpha` depth in `[0,1]`, `beta` angular
    /// position in `[0,1]` (periodic: values outside `[0,1]` wrap) (C6).
    pub fn map(&self, alpha: f64, beta: f64) -> Point2 {
        let l_max = self.layers - 1;
        let r = alpha.clamp(0.0, 1.0) * l_max as f64;
        let l0 = r.floor() as usize;
        let l1 = (l0 + 1).min(l_max);
        let t = r - l0 as f64;

        let b = self.points as f64;
        // Wrap beta into [0, 1) before scaling, so the map is periodic.
        let beta_wrapped = beta - beta.floor();
        let s = beta_wrapped * b;
        let k0 = (s.floor() as usize) % self.points;
        let k1 = (k0 + 1) % self.points;
        let u = s - s.floor();

        let p00 = self.at(l0, k0);
        let p01 = self.at(l0, k1);
        let p10 = self.at(l1, k0);
        let p11 = self.at(l1, k1);

        let top = p00 * (1.0 - u) + p01 * u;
        let bottom = p10 * (1.0 - u) + p11 * u;
        top * (1.0 - t) + bottom * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_boundary(n: usize) -> Vec<Point2> {
        // A square boundary traced counter-clockwise, beautified to n points
        // by naive even subdivision of each edge (enough for these tests,
        // which don't need true arclength equi-spacing).
        let corners = [
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ];
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let t = i as f64 / n as f64 * 4.0;
            let edge = t.floor() as usize % 4;
            let frac = t - t.floor();
            out.push(lerp(corners[edge], corners[(edge + 1) % 4], frac));
        }
        out
    }

    #[test]
    fn inner_layer_collapses_to_centre() {
        let boundary = unit_square_boundary(64);
        let centre = Point2::new(0.0, 0.0);
        let m = Matryoshka::build(&boundary, centre, 5);
        for k in [0usize, 10, 40] {
            let beta = k as f64 / m.points() as f64;
            let p = m.map(1.0, beta);
            assert_relative_eq!(p.x, centre.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, centre.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn outer_layer_traces_boundary() {
        let boundary = unit_square_boundary(64);
        let m = Matryoshka::build(&boundary, Point2::new(0.0, 0.0), 5);
        for (k, &expected) in boundary.iter().enumerate() {
            let beta = k as f64 / boundary.len() as f64;
            let p = m.map(0.0, beta);
            assert_relative_eq!(p.x, expected.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, expected.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn beta_is_periodic() {
        let boundary = unit_square_boundary(32);
        let m = Matryoshka::build(&boundary, Point2::new(0.0, 0.0), 4);
        let a = m.map(0.3, 0.25);
        let b = m.map(0.3, 1.25);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
    }

    #[test]
    fn two_layers_is_pure_linear_blend_to_centre() {
        let boundary = unit_square_boundary(16);
        let centre = Point2::new(0.0, 0.0);
        let m = Matryoshka::build(&boundary, centre, 2);
        let beta = 0.125;
        let boundary_pt = m.map(0.0, beta);
        let half = m.map(0.5, beta);
        assert_relative_eq!(half.x, (boundary_pt.x + centre.x) / 2.0, epsilon = 1e-9);
        assert_relative_eq!(half.y, (boundary_pt.y + centre.y) / 2.0, epsilon = 1e-9);
    }
}
