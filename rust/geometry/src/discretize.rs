// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fiber discretization
//!
//! Expands a patch or layer element into its concrete fibers: layers become
//! evenly spaced point fibers, rectangular and quadrilateral patches a
//! bilinear grid of cells, circular patches a polar grid of annular wedges.
//! Fibers are emitted in nested-loop insertion order; the order is stable
//! but carries no meaning.

use fibsec_core::{FiberElement, MaterialTag, SectionDefinition};
use nalgebra::Point2;

use crate::error::{Error, Result};
use crate::primitives::{polygon_centroid_area, wedge_area, wedge_centroid_radius};

/// One discretized fiber: position, area, material.
///
/// Derived, ephemeral data — fibers are produced on demand and never stored
/// back into a [`SectionDefinition`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fiber {
    /// Centroid of the fiber in `(y, z)` coordinates
    pub position: Point2<f64>,
    /// Fiber area
    pub area: f64,
    /// Material tag of the parent element
    pub material: MaterialTag,
}

impl Fiber {
    /// Radius of the equivalent circle, used when drawing bar fibers
    pub fn display_radius(&self) -> f64 {
        (self.area / std::f64::consts::PI).sqrt()
    }
}

/// What to do when a quad patch fails the convexity/orientation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonConvexPolicy {
    /// Warn and subdivide anyway; some legacy sections bend this rule
    #[default]
    Warn,
    /// Fail with [`Error::NonConvexPatch`]
    Reject,
}

/// Discretization options
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscretizeOptions {
    pub non_convex: NonConvexPolicy,
}

/// Discretize every element of a section, in element order
pub fn discretize_section(
    section: &SectionDefinition,
    options: &DiscretizeOptions,
) -> Result<Vec<Fiber>> {
    let mut fibers = Vec::new();
    for element in &section.elements {
        fibers.extend(discretize(element, options)?);
    }
    Ok(fibers)
}

/// Discretize one element into its fibers
pub fn discretize(element: &FiberElement, options: &DiscretizeOptions) -> Result<Vec<Fiber>> {
    match *element {
        FiberElement::RectPatch {
            material,
            n_fib_y,
            n_fib_z,
            y1,
            z1,
            y2,
            z2,
        } => {
            let (i, j, k, l) = rect_corners(y1, z1, y2, z2);
            quad_fibers(material, n_fib_y, n_fib_z, i, j, k, l, options)
        }
        FiberElement::QuadPatch {
            material,
            n_ij,
            n_jk,
            i,
            j,
            k,
            l,
        } => quad_fibers(
            material,
            n_ij,
            n_jk,
            Point2::new(i.0, i.1),
            Point2::new(j.0, j.1),
            Point2::new(k.0, k.1),
            Point2::new(l.0, l.1),
            options,
        ),
        FiberElement::CircPatch {
            material,
            n_circ,
            n_rad,
            center,
            r_inner,
            r_outer,
            angle0,
            angle1,
        } => Ok(circ_patch_fibers(
            material,
            n_circ,
            n_rad,
            Point2::new(center.0, center.1),
            r_inner,
            r_outer,
            angle0,
            angle1,
        )),
        FiberElement::StraightLayer {
            material,
            n_bars,
            bar_area,
            start,
            end,
        } => {
            let ys = linspace(start.0, end.0, n_bars as usize);
            let zs = linspace(start.1, end.1, n_bars as usize);
            Ok(ys
                .into_iter()
                .zip(zs)
                .map(|(y, z)| Fiber {
                    position: Point2::new(y, z),
                    area: bar_area,
                    material,
                })
                .collect())
        }
        FiberElement::CircLayer {
            material,
            n_bars,
            bar_area,
            center,
            radius,
            angle0,
            angle1,
        } => Ok(circ_layer_fibers(
            material,
            n_bars,
            bar_area,
            Point2::new(center.0, center.1),
            radius,
            angle0,
            angle1,
        )),
    }
}

/// Expand rect corners `(y1,z1)-(y2,z2)` to quad corners I, J, K, L
pub(crate) fn rect_corners(
    y1: f64,
    z1: f64,
    y2: f64,
    z2: f64,
) -> (Point2<f64>, Point2<f64>, Point2<f64>, Point2<f64>) {
    (
        Point2::new(y1, z1),
        Point2::new(y2, z1),
        Point2::new(y2, z2),
        Point2::new(y1, z2),
    )
}

/// Check quad corners for convexity, counter-clockwise order and
/// collinearity via the three corner cross products. Returns a description
/// of the violation, if any.
pub(crate) fn quad_convexity_violation(
    i: Point2<f64>,
    j: Point2<f64>,
    k: Point2<f64>,
    l: Point2<f64>,
) -> Option<String> {
    let out_ij_ik = (j.x - i.x) * (k.y - i.y) - (k.x - i.x) * (j.y - i.y);
    let out_ik_il = (k.x - i.x) * (l.y - i.y) - (l.x - i.x) * (k.y - i.y);
    let out_ij_il = (j.x - i.x) * (l.y - i.y) - (l.x - i.x) * (j.y - i.y);
    if out_ij_ik <= 0.0 || out_ik_il <= 0.0 || out_ij_il <= 0.0 {
        Some(format!(
            "corners are non-convex, clockwise, or collinear (cross products {:.3}, {:.3}, {:.3})",
            out_ij_ik, out_ik_il, out_ij_il
        ))
    } else {
        None
    }
}

/// Bilinear subdivision of a quadrilateral into `n_ij` x `n_jk` cell fibers.
///
/// Edges IJ and LK are subdivided into `n_ij + 1` stations, then each grid
/// row is interpolated from the IJ station to the LK station with
/// `n_jk + 1` stations. Each cell contributes one fiber at its shoelace
/// centroid.
#[allow(clippy::too_many_arguments)]
fn quad_fibers(
    material: MaterialTag,
    n_ij: u32,
    n_jk: u32,
    i: Point2<f64>,
    j: Point2<f64>,
    k: Point2<f64>,
    l: Point2<f64>,
    options: &DiscretizeOptions,
) -> Result<Vec<Fiber>> {
    if let Some(violation) = quad_convexity_violation(i, j, k, l) {
        match options.non_convex {
            NonConvexPolicy::Warn => {
                tracing::warn!(material, "quad patch: {violation}");
            }
            NonConvexPolicy::Reject => return Err(Error::NonConvexPatch(violation)),
        }
    }

    let n_ij = n_ij as usize;
    let n_jk = n_jk as usize;
    let ij = linspace_points(i, j, n_ij + 1);
    let lk = linspace_points(l, k, n_ij + 1);

    let grid: Vec<Vec<Point2<f64>>> = ij
        .iter()
        .zip(&lk)
        .map(|(&a, &b)| linspace_points(a, b, n_jk + 1))
        .collect();

    let mut fibers = Vec::with_capacity(n_ij * n_jk);
    for row in 0..n_ij {
        for col in 0..n_jk {
            let cell = [
                grid[row][col],
                grid[row][col + 1],
                grid[row + 1][col + 1],
                grid[row + 1][col],
            ];
            let (position, signed_area) = polygon_centroid_area(&cell)?;
            fibers.push(Fiber {
                position,
                area: signed_area.abs(),
                material,
            });
        }
    }
    Ok(fibers)
}

/// Polar subdivision of an annular sector into `n_rad` x `n_circ` wedge
/// fibers, radius ring outer loop, angle inner. Every cell uses the exact
/// wedge closed forms; no linear approximation is introduced here.
#[allow(clippy::too_many_arguments)]
fn circ_patch_fibers(
    material: MaterialTag,
    n_circ: u32,
    n_rad: u32,
    center: Point2<f64>,
    r_inner: f64,
    r_outer: f64,
    angle0: f64,
    angle1: f64,
) -> Vec<Fiber> {
    let theta0 = angle0.to_radians();
    let theta1 = angle1.to_radians();
    let dr = (r_outer - r_inner) / n_rad as f64;
    let dth = (theta1 - theta0) / n_circ as f64;

    let mut fibers = Vec::with_capacity((n_rad * n_circ) as usize);
    for ring in 0..n_rad {
        let rj = r_inner + ring as f64 * dr;
        let rj1 = rj + dr;
        for seg in 0..n_circ {
            let thi = theta0 + seg as f64 * dth;
            let thi1 = thi + dth;
            let r_centroid = wedge_centroid_radius(rj, rj1);
            let theta_centroid = (thi + thi1) / 2.0;
            fibers.push(Fiber {
                position: Point2::new(
                    center.x + r_centroid * theta_centroid.cos(),
                    center.y + r_centroid * theta_centroid.sin(),
                ),
                area: wedge_area(rj, rj1, thi, thi1),
                material,
            });
        }
    }
    fibers
}

/// Bar fibers evenly spaced on an arc.
///
/// A full-circle span is reduced to `360 - 360/n` degrees so the last bar
/// does not coincide with the first.
fn circ_layer_fibers(
    material: MaterialTag,
    n_bars: u32,
    bar_area: f64,
    center: Point2<f64>,
    radius: f64,
    angle0: f64,
    angle1: f64,
) -> Vec<Fiber> {
    let angle1 = if angle1 - angle0 >= 360.0 {
        angle0 + 360.0 - 360.0 / n_bars as f64
    } else {
        angle1
    };
    linspace(angle0.to_radians(), angle1.to_radians(), n_bars as usize)
        .into_iter()
        .map(|theta| Fiber {
            position: Point2::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            ),
            area: bar_area,
            material,
        })
        .collect()
}

/// `n` values evenly spaced from `a` to `b`, both ends included.
/// With `n == 1` the single value is `a`.
fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![a];
    }
    (0..n)
        .map(|step| {
            let t = step as f64 / (n - 1) as f64;
            a * (1.0 - t) + b * t
        })
        .collect()
}

fn linspace_points(a: Point2<f64>, b: Point2<f64>, n: usize) -> Vec<Point2<f64>> {
    linspace(a.x, b.x, n)
        .into_iter()
        .zip(linspace(a.y, b.y, n))
        .map(|(x, y)| Point2::new(x, y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn opts() -> DiscretizeOptions {
        DiscretizeOptions::default()
    }

    #[test]
    fn quad_2x2_produces_four_quarter_cells() {
        let quad = FiberElement::QuadPatch {
            material: 1,
            n_ij: 2,
            n_jk: 2,
            i: (0.0, 0.0),
            j: (10.0, 0.0),
            k: (10.0, 10.0),
            l: (0.0, 10.0),
        };
        let fibers = discretize(&quad, &opts()).unwrap();
        assert_eq!(fibers.len(), 4);
        for fiber in &fibers {
            assert_relative_eq!(fiber.area, 25.0, epsilon = 1.0e-12);
        }
        let mut centers: Vec<(f64, f64)> = fibers
            .iter()
            .map(|f| (f.position.x, f.position.y))
            .collect();
        centers.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            centers,
            vec![(2.5, 2.5), (2.5, 7.5), (7.5, 2.5), (7.5, 7.5)]
        );
    }

    #[test]
    fn rect_patch_grid_covers_the_rectangle() {
        let rect = FiberElement::RectPatch {
            material: 2,
            n_fib_y: 5,
            n_fib_z: 3,
            y1: 0.0,
            z1: 0.0,
            y2: 10.0,
            z2: 6.0,
        };
        let fibers = discretize(&rect, &opts()).unwrap();
        assert_eq!(fibers.len(), 15);
        let total: f64 = fibers.iter().map(|f| f.area).sum();
        assert_relative_eq!(total, 60.0, epsilon = 1.0e-9);
        // First cell sits at the I corner
        assert_relative_eq!(fibers[0].position.x, 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(fibers[0].position.y, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn straight_layer_includes_both_endpoints() {
        let layer = FiberElement::StraightLayer {
            material: 3,
            n_bars: 5,
            bar_area: 0.79,
            start: (-12.0, -7.0),
            end: (-12.0, 7.0),
        };
        let fibers = discretize(&layer, &opts()).unwrap();
        assert_eq!(fibers.len(), 5);
        let zs: Vec<f64> = fibers.iter().map(|f| f.position.y).collect();
        assert_eq!(zs, vec![-7.0, -3.5, 0.0, 3.5, 7.0]);
        assert!(fibers.iter().all(|f| f.position.x == -12.0));
        assert_relative_eq!(
            fibers[0].display_radius(),
            (0.79 / std::f64::consts::PI).sqrt()
        );
    }

    #[test]
    fn single_bar_layer_sits_at_the_start() {
        let layer = FiberElement::StraightLayer {
            material: 3,
            n_bars: 1,
            bar_area: 1.0,
            start: (2.0, 3.0),
            end: (9.0, 9.0),
        };
        let fibers = discretize(&layer, &opts()).unwrap();
        assert_eq!(fibers.len(), 1);
        assert_eq!(fibers[0].position, Point2::new(2.0, 3.0));
    }

    #[test]
    fn full_circle_layer_drops_the_seam_bar() {
        let layer = FiberElement::CircLayer {
            material: 3,
            n_bars: 4,
            bar_area: 0.5,
            center: (1.0, 2.0),
            radius: 5.0,
            angle0: 0.0,
            angle1: 360.0,
        };
        let fibers = discretize(&layer, &opts()).unwrap();
        assert_eq!(fibers.len(), 4);
        // Bars at 0, 90, 180, 270 degrees; no duplicate at 360
        assert_relative_eq!(fibers[0].position.x, 6.0, epsilon = 1.0e-9);
        assert_relative_eq!(fibers[1].position.y, 7.0, epsilon = 1.0e-9);
        assert_relative_eq!(fibers[2].position.x, -4.0, epsilon = 1.0e-9);
        assert_relative_eq!(fibers[3].position.y, -3.0, epsilon = 1.0e-9);
    }

    #[test]
    fn partial_arc_layer_includes_both_end_bars() {
        let layer = FiberElement::CircLayer {
            material: 3,
            n_bars: 3,
            bar_area: 0.5,
            center: (0.0, 0.0),
            radius: 2.0,
            angle0: 0.0,
            angle1: 180.0,
        };
        let fibers = discretize(&layer, &opts()).unwrap();
        let angles: Vec<f64> = fibers
            .iter()
            .map(|f| f.position.y.atan2(f.position.x).to_degrees())
            .collect();
        assert_relative_eq!(angles[0], 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(angles[1], 90.0, epsilon = 1.0e-9);
        assert_relative_eq!(angles[2], 180.0, epsilon = 1.0e-9);
    }

    #[test]
    fn circ_patch_cells_sum_to_the_annulus() {
        let patch = FiberElement::CircPatch {
            material: 1,
            n_circ: 8,
            n_rad: 4,
            center: (0.0, 0.0),
            r_inner: 5.0,
            r_outer: 10.0,
            angle0: 0.0,
            angle1: 360.0,
        };
        let fibers = discretize(&patch, &opts()).unwrap();
        assert_eq!(fibers.len(), 32);
        let total: f64 = fibers.iter().map(|f| f.area).sum();
        assert_relative_eq!(
            total,
            std::f64::consts::PI * 75.0,
            epsilon = 1.0e-9
        );
        // Symmetric ring: area-weighted centroid at the center
        let my: f64 = fibers.iter().map(|f| f.area * f.position.x).sum();
        let mz: f64 = fibers.iter().map(|f| f.area * f.position.y).sum();
        assert_relative_eq!(my / total, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(mz / total, 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn clockwise_quad_respects_policy() {
        let quad = FiberElement::QuadPatch {
            material: 1,
            n_ij: 2,
            n_jk: 2,
            i: (0.0, 0.0),
            j: (0.0, 10.0),
            k: (10.0, 10.0),
            l: (10.0, 0.0),
        };
        // Default policy warns and proceeds
        let fibers = discretize(&quad, &opts()).unwrap();
        assert_eq!(fibers.len(), 4);

        let strict = DiscretizeOptions {
            non_convex: NonConvexPolicy::Reject,
        };
        assert!(matches!(
            discretize(&quad, &strict),
            Err(Error::NonConvexPatch(_))
        ));
    }

    #[test]
    fn section_discretization_preserves_element_order() {
        let section = SectionDefinition::new(1, 1.0)
            .with_appended(FiberElement::StraightLayer {
                material: 1,
                n_bars: 2,
                bar_area: 1.0,
                start: (0.0, 0.0),
                end: (1.0, 0.0),
            })
            .with_appended(FiberElement::StraightLayer {
                material: 2,
                n_bars: 3,
                bar_area: 1.0,
                start: (0.0, 1.0),
                end: (1.0, 1.0),
            });
        let fibers = discretize_section(&section, &opts()).unwrap();
        assert_eq!(fibers.len(), 5);
        assert_eq!(fibers[0].material, 1);
        assert_eq!(fibers[4].material, 2);
    }
}
