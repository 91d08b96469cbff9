// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed-form area and centroid formulas
//!
//! Pure 2D primitives shared by the discretizer, the plastic-centroid
//! solver and the cover transform: the polygon shoelace formula, rectangle
//! and annular-wedge closed forms, and segment interpolation helpers.
//! Wedge angles are radians here; the data model carries degrees and call
//! sites convert.

use crate::error::{Error, Result};
use nalgebra::Point2;

/// Signed areas below this are treated as degenerate
pub const AREA_EPS: f64 = 1.0e-12;

/// Centroid and signed area of a polygon via the shoelace formula.
///
/// `area = 0.5 * Σ (x_i * y_{i+1} - x_{i+1} * y_i)`, positive for
/// counter-clockwise vertex order; the centroid weights the same cross
/// terms divided by `6 * area`.
///
/// Fails with [`Error::DegenerateGeometry`] when the area is numerically
/// zero (collinear vertices) since the centroid division is undefined.
pub fn polygon_centroid_area(vertices: &[Point2<f64>]) -> Result<(Point2<f64>, f64)> {
    if vertices.len() < 3 {
        return Err(Error::DegenerateGeometry(format!(
            "polygon needs at least 3 vertices, got {}",
            vertices.len()
        )));
    }

    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (idx, a) in vertices.iter().enumerate() {
        let b = &vertices[(idx + 1) % vertices.len()];
        let cross = a.x * b.y - b.x * a.y;
        area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    area *= 0.5;

    if area.abs() <= AREA_EPS {
        return Err(Error::DegenerateGeometry(
            "polygon area is numerically zero".to_string(),
        ));
    }
    Ok((Point2::new(cx / (6.0 * area), cy / (6.0 * area)), area))
}

/// Area of an axis-aligned rectangle given two opposite corners
#[inline]
pub fn rect_area(y1: f64, z1: f64, y2: f64, z2: f64) -> f64 {
    ((y2 - y1) * (z2 - z1)).abs()
}

/// Centroid (midpoint) of an axis-aligned rectangle
#[inline]
pub fn rect_centroid(y1: f64, z1: f64, y2: f64, z2: f64) -> Point2<f64> {
    Point2::new((y1 + y2) / 2.0, (z1 + z2) / 2.0)
}

/// Area of an annular wedge, angles in radians
#[inline]
pub fn wedge_area(r_inner: f64, r_outer: f64, theta0: f64, theta1: f64) -> f64 {
    0.5 * (r_outer * r_outer - r_inner * r_inner) * (theta1 - theta0)
}

/// Radial coordinate of an annular wedge centroid.
///
/// `2 * (ri^2 + ri*re + re^2) / (3 * (ri + re))`, the exact radial moment
/// of the ring; combined with the midpoint angle this gives the wedge
/// centroid in polar form.
#[inline]
pub fn wedge_centroid_radius(r_inner: f64, r_outer: f64) -> f64 {
    2.0 * (r_inner * r_inner + r_inner * r_outer + r_outer * r_outer)
        / (3.0 * (r_inner + r_outer))
}

/// Euclidean distance between two points
#[inline]
pub fn distance_between_points(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (b - a).norm()
}

/// Point on segment `a -> b` at arc-length `dist` from `a`.
///
/// Fails when the segment has zero length.
pub fn point_between_points(a: Point2<f64>, b: Point2<f64>, dist: f64) -> Result<Point2<f64>> {
    let total = distance_between_points(a, b);
    if total <= AREA_EPS {
        return Err(Error::DegenerateGeometry(
            "zero-length segment in arc-length interpolation".to_string(),
        ));
    }
    Ok(a + (b - a) * (dist / total))
}
