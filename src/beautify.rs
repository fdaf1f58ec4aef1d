//! Border beautifier (C3, §4.3): resamples an extracted boundary to a fixed
//! point count equi-spaced in arclength, then rotates it so index 0 sits at
//! the vertex closest to the segment's seed centre. This gives every layer
//! of a segment's Matryoshka a common parameter origin.

use crate::geometry::{arclength_resample, Point2};

/// Default beautified boundary length (§4.3, §3 "Beautified boundary").
pub const DEFAULT_BORDER_POINTS: usize = 400;

/// Resample `boundary` to `n` points and rotate so index 0 is nearest `seed`.
pub fn beautify_border(boundary: &[Point2], seed: Point2, n: usize) -> Vec<Point2> {
    let resampled = arclength_resample(boundary, n);

    let (closest_idx, _) = resampled
        .iter()
        .enumerate()
        .map(|(i, &p)| (i, p.distance_to(seed)))
        .fold((0usize, f64::INFINITY), |best, cur| {
            if cur.1 < best.1 {
                cur
            } else {
                best
            }
        });

    if closest_idx == 0 {
        return resampled;
    }
    let mut rotated = Vec::with_capacity(resampled.len());
    rotated.extend_from_slice(&resampled[closest_idx..]);
    rotated.extend_from_slice(&resampled[..closest_idx]);
    rotated
}
