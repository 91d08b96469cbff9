// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plastic centroid solver
//!
//! Aggregates one `(area, centroid)` pair per element, weights it by the
//! caller-supplied material strength, and produces the strength-weighted
//! centroid of the whole section plus a re-centered copy of the section.
//! Re-centering puts the origin at the plastic centroid so a zero-length
//! element carries no parasitic eccentricity in downstream analysis.

use fibsec_core::{FiberElement, SectionDefinition};
use nalgebra::Point2;
use rustc_hash::FxHashMap;

use crate::discretize::{discretize, DiscretizeOptions};
use crate::error::{Error, Result};
use crate::primitives::{
    polygon_centroid_area, rect_area, rect_centroid, wedge_area, wedge_centroid_radius, AREA_EPS,
};

/// Material tag to strength scalar, supplied by the caller and read-only
/// during a solve
pub type StrengthMap = FxHashMap<fibsec_core::MaterialTag, f64>;

/// Decimal places kept after re-centering, to stabilize numeric
/// comparisons and serialized output
const RECENTER_DECIMALS: i32 = 4;

/// Result of [`recenter`]: the solved centroid and the translated section
#[derive(Debug, Clone, PartialEq)]
pub struct RecenteredSection {
    /// Plastic centroid of the input section, in its original coordinates
    pub centroid: Point2<f64>,
    /// New section with every element translated by minus the centroid,
    /// coordinates rounded to four decimals
    pub section: SectionDefinition,
}

/// Strength-weighted centroid of a whole section.
///
/// Every material tag referenced by the section must have a strength
/// entry; missing tags fail with [`Error::MissingMaterialStrength`] before
/// any aggregation. A zero weighted-area sum fails with
/// [`Error::ZeroTotalArea`].
pub fn plastic_centroid(
    section: &SectionDefinition,
    strengths: &StrengthMap,
) -> Result<Point2<f64>> {
    for element in &section.elements {
        if !strengths.contains_key(&element.material()) {
            return Err(Error::MissingMaterialStrength(element.material()));
        }
    }

    let mut total_weighted_area = 0.0;
    let mut weighted_y = 0.0;
    let mut weighted_z = 0.0;
    for element in &section.elements {
        let strength = strengths[&element.material()];
        let (centroid, area) = element_aggregate(element)?;
        total_weighted_area += area * strength;
        weighted_y += area * centroid.x * strength;
        weighted_z += area * centroid.y * strength;
    }

    if total_weighted_area.abs() <= AREA_EPS {
        return Err(Error::ZeroTotalArea);
    }
    Ok(Point2::new(
        weighted_y / total_weighted_area,
        weighted_z / total_weighted_area,
    ))
}

/// Solve the plastic centroid and return the section redrawn about it.
///
/// Re-applying the solver to the returned section yields a centroid within
/// the rounding tolerance of the origin.
pub fn recenter(section: &SectionDefinition, strengths: &StrengthMap) -> Result<RecenteredSection> {
    let centroid = plastic_centroid(section, strengths)?;
    let recentered = section
        .translated(-centroid.x, -centroid.y)
        .rounded(RECENTER_DECIMALS);
    Ok(RecenteredSection {
        centroid,
        section: recentered,
    })
}

/// One `(centroid, area)` pair for the whole element.
///
/// Patches use the closed forms; layers use the bar count times the bar
/// area, with the centroid of a circular layer taken as the mean of its
/// actual bar positions (exact, since the bars are the fibers).
fn element_aggregate(element: &FiberElement) -> Result<(Point2<f64>, f64)> {
    match *element {
        FiberElement::RectPatch {
            y1, z1, y2, z2, ..
        } => Ok((rect_centroid(y1, z1, y2, z2), rect_area(y1, z1, y2, z2))),
        FiberElement::QuadPatch { i, j, k, l, .. } => {
            let corners = [
                Point2::new(i.0, i.1),
                Point2::new(j.0, j.1),
                Point2::new(k.0, k.1),
                Point2::new(l.0, l.1),
            ];
            polygon_centroid_area(&corners)
        }
        FiberElement::CircPatch {
            center,
            r_inner,
            r_outer,
            angle0,
            angle1,
            ..
        } => {
            let theta0 = angle0.to_radians();
            let theta1 = angle1.to_radians();
            let area = wedge_area(r_inner, r_outer, theta0, theta1);
            Ok((
                wedge_centroid(
                    Point2::new(center.0, center.1),
                    r_inner,
                    r_outer,
                    theta0,
                    theta1,
                ),
                area,
            ))
        }
        FiberElement::StraightLayer {
            n_bars,
            bar_area,
            start,
            end,
            ..
        } => Ok((
            Point2::new((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0),
            bar_area * n_bars as f64,
        )),
        FiberElement::CircLayer {
            n_bars, bar_area, ..
        } => {
            let bars = discretize(element, &DiscretizeOptions::default())?;
            let n = bars.len() as f64;
            let mean_y = bars.iter().map(|b| b.position.x).sum::<f64>() / n;
            let mean_z = bars.iter().map(|b| b.position.y).sum::<f64>() / n;
            Ok((Point2::new(mean_y, mean_z), bar_area * n_bars as f64))
        }
    }
}

/// Exact centroid of an annular sector.
///
/// The radial moment is [`wedge_centroid_radius`]; the angular average over
/// the span contracts it by `sin(dth/2) / (dth/2)` along the mid-angle
/// direction. A full circle contracts to the center.
fn wedge_centroid(
    center: Point2<f64>,
    r_inner: f64,
    r_outer: f64,
    theta0: f64,
    theta1: f64,
) -> Point2<f64> {
    let dth = theta1 - theta0;
    let chord = if dth.abs() <= AREA_EPS {
        1.0
    } else {
        (dth / 2.0).sin() / (dth / 2.0)
    };
    let r = wedge_centroid_radius(r_inner, r_outer) * chord;
    let mid = (theta0 + theta1) / 2.0;
    Point2::new(center.x + r * mid.cos(), center.y + r * mid.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn strengths(pairs: &[(u32, f64)]) -> StrengthMap {
        pairs.iter().copied().collect()
    }

    fn rect(material: u32, y1: f64, z1: f64, y2: f64, z2: f64) -> FiberElement {
        FiberElement::RectPatch {
            material,
            n_fib_y: 2,
            n_fib_z: 2,
            y1,
            z1,
            y2,
            z2,
        }
    }

    #[test]
    fn single_rect_centroid_is_geometric() {
        let section = SectionDefinition::new(1, 1.0).with_appended(rect(1, 0.0, 0.0, 10.0, 6.0));
        let cp = plastic_centroid(&section, &strengths(&[(1, 25.0)])).unwrap();
        assert_eq!(cp, Point2::new(5.0, 3.0));
    }

    #[test]
    fn strength_weighting_shifts_the_centroid() {
        let section = SectionDefinition::new(1, 1.0)
            .with_appended(rect(1, 0.0, 0.0, 2.0, 2.0))
            .with_appended(rect(2, 2.0, 0.0, 4.0, 2.0));
        // Equal areas (4 each); strengths 1 and 3 pull the centroid toward
        // the second rectangle: (4*1*1 + 4*3*3) / (4*1 + 4*3) = 2.5
        let cp = plastic_centroid(&section, &strengths(&[(1, 1.0), (2, 3.0)])).unwrap();
        assert_relative_eq!(cp.x, 2.5, epsilon = 1.0e-12);
        assert_relative_eq!(cp.y, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn missing_strength_fails_before_aggregation() {
        let section = SectionDefinition::new(1, 1.0)
            .with_appended(rect(1, 0.0, 0.0, 2.0, 2.0))
            .with_appended(rect(7, 2.0, 0.0, 4.0, 2.0));
        assert!(matches!(
            plastic_centroid(&section, &strengths(&[(1, 1.0)])),
            Err(Error::MissingMaterialStrength(7))
        ));
    }

    #[test]
    fn zero_strengths_are_rejected() {
        let section = SectionDefinition::new(1, 1.0).with_appended(rect(1, 0.0, 0.0, 2.0, 2.0));
        assert!(matches!(
            plastic_centroid(&section, &strengths(&[(1, 0.0)])),
            Err(Error::ZeroTotalArea)
        ));
    }

    #[test]
    fn full_circle_patch_centroid_is_its_center() {
        let section = SectionDefinition::new(1, 1.0).with_appended(FiberElement::CircPatch {
            material: 1,
            n_circ: 8,
            n_rad: 2,
            center: (3.0, -2.0),
            r_inner: 1.0,
            r_outer: 4.0,
            angle0: 0.0,
            angle1: 360.0,
        });
        let cp = plastic_centroid(&section, &strengths(&[(1, 1.0)])).unwrap();
        assert_relative_eq!(cp.x, 3.0, epsilon = 1.0e-12);
        assert_relative_eq!(cp.y, -2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn half_annulus_centroid_matches_closed_form() {
        let centroid = wedge_centroid(Point2::new(0.0, 0.0), 1.0, 2.0, 0.0, PI);
        // z = (4 / (3 pi)) * (re^3 - ri^3) / (re^2 - ri^2) = 28 / (9 pi)
        assert_relative_eq!(centroid.x, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(centroid.y, 28.0 / (9.0 * PI), epsilon = 1.0e-12);
    }

    #[test]
    fn wedge_centroid_agrees_with_fine_discretization() {
        let (ri, re) = (5.0, 10.0);
        let (a0, a1) = (30.0_f64, 120.0_f64);
        let exact = wedge_centroid(
            Point2::new(0.0, 0.0),
            ri,
            re,
            a0.to_radians(),
            a1.to_radians(),
        );

        let patch = FiberElement::CircPatch {
            material: 1,
            n_circ: 512,
            n_rad: 64,
            center: (0.0, 0.0),
            r_inner: ri,
            r_outer: re,
            angle0: a0,
            angle1: a1,
        };
        let fibers = discretize(&patch, &DiscretizeOptions::default()).unwrap();
        let total: f64 = fibers.iter().map(|f| f.area).sum();
        let y: f64 = fibers.iter().map(|f| f.area * f.position.x).sum::<f64>() / total;
        let z: f64 = fibers.iter().map(|f| f.area * f.position.y).sum::<f64>() / total;
        assert_relative_eq!(y, exact.x, epsilon = 1.0e-5);
        assert_relative_eq!(z, exact.y, epsilon = 1.0e-5);
    }

    #[test]
    fn recenter_round_trips_to_the_origin() {
        let section = SectionDefinition::new(1, 1.0e6)
            .with_appended(rect(2, -15.0, -10.0, 15.0, 10.0))
            .with_appended(FiberElement::StraightLayer {
                material: 3,
                n_bars: 5,
                bar_area: 0.79,
                start: (-12.0, -7.0),
                end: (-12.0, 7.0),
            })
            .translated(40.0, -13.0);
        let map = strengths(&[(2, 30.0), (3, 420.0)]);

        let recentered = recenter(&section, &map).unwrap();
        let cp = plastic_centroid(&recentered.section, &map).unwrap();
        assert!(cp.x.abs() < 1.0e-3);
        assert!(cp.y.abs() < 1.0e-3);
    }
}
