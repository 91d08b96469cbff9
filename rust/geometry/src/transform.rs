// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section transforms: cover splitting and patterned replication
//!
//! [`cover`] splits one patch into an interior core plus up to four edge
//! (or two ring) cover patches, assigning the covers the next material
//! tag. [`replicate`] stamps translated copies of an element along a
//! fixed step, as used for bar rows repeated through a section depth.

use fibsec_core::FiberElement;
use nalgebra::Point2;

use crate::error::{Error, Result};
use crate::primitives::{distance_between_points, point_between_points};

/// Cover thickness specification, matched against the patch shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverMargins {
    /// Per-edge thickness for rectangular and quadrilateral patches.
    /// `below`/`up` act along the I-to-J edge direction, `left`/`right`
    /// across it. A zero margin suppresses that cover patch.
    Edges {
        left: f64,
        right: f64,
        up: f64,
        below: f64,
    },
    /// Inner and outer ring thickness for circular patches
    Radial { inner: f64, outer: f64 },
}

/// Split a patch into a core patch and its cover patches.
///
/// The core keeps the element's material and fiber counts; cover patches
/// take `material + 1` and a single fiber across their thickness. Layers
/// and mismatched margin kinds fail with [`Error::UnsupportedCover`].
pub fn cover(element: &FiberElement, margins: &CoverMargins) -> Result<Vec<FiberElement>> {
    match (*element, *margins) {
        (
            FiberElement::RectPatch {
                material,
                n_fib_y,
                n_fib_z,
                y1,
                z1,
                y2,
                z2,
            },
            CoverMargins::Edges {
                left,
                right,
                up,
                below,
            },
        ) => {
            let cover_material = material + 1;
            let mut out = vec![FiberElement::RectPatch {
                material,
                n_fib_y,
                n_fib_z,
                y1: y1 + below,
                z1: z1 + left,
                y2: y2 - up,
                z2: z2 - right,
            }];
            if left > 0.0 {
                out.push(FiberElement::RectPatch {
                    material: cover_material,
                    n_fib_y,
                    n_fib_z: 1,
                    y1: y1 + below,
                    z1,
                    y2: y2 - up,
                    z2: z1 + left,
                });
            }
            if right > 0.0 {
                out.push(FiberElement::RectPatch {
                    material: cover_material,
                    n_fib_y,
                    n_fib_z: 1,
                    y1: y1 + below,
                    z1: z2 - right,
                    y2: y2 - up,
                    z2,
                });
            }
            if below > 0.0 {
                out.push(FiberElement::RectPatch {
                    material: cover_material,
                    n_fib_y: 1,
                    n_fib_z,
                    y1,
                    z1,
                    y2: y1 + below,
                    z2,
                });
            }
            if up > 0.0 {
                out.push(FiberElement::RectPatch {
                    material: cover_material,
                    n_fib_y: 1,
                    n_fib_z,
                    y1: y2 - up,
                    z1,
                    y2,
                    z2,
                });
            }
            Ok(out)
        }
        (
            FiberElement::QuadPatch {
                material,
                n_ij,
                n_jk,
                i,
                j,
                k,
                l,
            },
            CoverMargins::Edges {
                left,
                right,
                up,
                below,
            },
        ) => {
            let cover_material = material + 1;
            let pi = Point2::new(i.0, i.1);
            let pj = Point2::new(j.0, j.1);
            let pk = Point2::new(k.0, k.1);
            let pl = Point2::new(l.0, l.1);

            // Insets along the two I-to-J-direction edges, then across
            // the patch between them
            let len_ij = distance_between_points(pi, pj);
            let len_lk = distance_between_points(pl, pk);
            let ij_b = split_point(pi, pj, below)?;
            let ij_u = split_point(pi, pj, len_ij - up)?;
            let lk_b = split_point(pl, pk, below)?;
            let lk_u = split_point(pl, pk, len_lk - up)?;

            let len_b = distance_between_points(ij_b, lk_b);
            let len_u = distance_between_points(ij_u, lk_u);
            let b_l = split_point(ij_b, lk_b, left)?;
            let b_r = split_point(ij_b, lk_b, len_b - right)?;
            let u_l = split_point(ij_u, lk_u, left)?;
            let u_r = split_point(ij_u, lk_u, len_u - right)?;

            let mut out = vec![FiberElement::QuadPatch {
                material,
                n_ij,
                n_jk,
                i: tuple(&b_l),
                j: tuple(&u_l),
                k: tuple(&u_r),
                l: tuple(&b_r),
            }];
            if left > 0.0 {
                out.push(FiberElement::QuadPatch {
                    material: cover_material,
                    n_ij,
                    n_jk: 1,
                    i: tuple(&ij_b),
                    j: tuple(&ij_u),
                    k: tuple(&u_l),
                    l: tuple(&b_l),
                });
            }
            if right > 0.0 {
                out.push(FiberElement::QuadPatch {
                    material: cover_material,
                    n_ij,
                    n_jk: 1,
                    i: tuple(&b_r),
                    j: tuple(&u_r),
                    k: tuple(&lk_u),
                    l: tuple(&lk_b),
                });
            }
            if below > 0.0 {
                out.push(FiberElement::QuadPatch {
                    material: cover_material,
                    n_ij: 1,
                    n_jk,
                    i,
                    j: tuple(&ij_b),
                    k: tuple(&lk_b),
                    l,
                });
            }
            if up > 0.0 {
                out.push(FiberElement::QuadPatch {
                    material: cover_material,
                    n_ij: 1,
                    n_jk,
                    i: tuple(&ij_u),
                    j,
                    k,
                    l: tuple(&lk_u),
                });
            }
            Ok(out)
        }
        (
            FiberElement::CircPatch {
                material,
                n_circ,
                n_rad,
                center,
                r_inner,
                r_outer,
                angle0,
                angle1,
            },
            CoverMargins::Radial { inner, outer },
        ) => {
            let cover_material = material + 1;
            let mut out = vec![FiberElement::CircPatch {
                material,
                n_circ,
                n_rad,
                center,
                r_inner: r_inner + inner,
                r_outer: r_outer - outer,
                angle0,
                angle1,
            }];
            if inner > 0.0 {
                out.push(FiberElement::CircPatch {
                    material: cover_material,
                    n_circ,
                    n_rad: 1,
                    center,
                    r_inner,
                    r_outer: r_inner + inner,
                    angle0,
                    angle1,
                });
            }
            if outer > 0.0 {
                out.push(FiberElement::CircPatch {
                    material: cover_material,
                    n_circ,
                    n_rad: 1,
                    center,
                    r_inner: r_outer - outer,
                    r_outer,
                    angle0,
                    angle1,
                });
            }
            Ok(out)
        }
        (FiberElement::CircPatch { .. }, CoverMargins::Edges { .. }) => Err(
            Error::UnsupportedCover("circular patches take radial margins".to_string()),
        ),
        (_, CoverMargins::Radial { .. }) => Err(Error::UnsupportedCover(
            "radial margins apply to circular patches only".to_string(),
        )),
        (FiberElement::StraightLayer { .. }, _) | (FiberElement::CircLayer { .. }, _) => Err(
            Error::UnsupportedCover("bar layers carry no cover".to_string()),
        ),
    }
}

/// Translated copies of an element on a fixed grid step.
///
/// Returns the original followed by `copies` elements shifted by
/// `k * (dy, dz)` for `k = 1..=copies`.
pub fn replicate(element: &FiberElement, dy: f64, dz: f64, copies: u32) -> Vec<FiberElement> {
    let mut out = Vec::with_capacity(copies as usize + 1);
    out.push(*element);
    for k in 1..=copies {
        out.push(element.translated(k as f64 * dy, k as f64 * dz));
    }
    out
}

/// Point at `dist` along the `a -> b` segment, rounded to four decimals so
/// the split edges of adjacent patches land on identical coordinates
fn split_point(a: Point2<f64>, b: Point2<f64>, dist: f64) -> Result<Point2<f64>> {
    let p = point_between_points(a, b, dist)?;
    Ok(Point2::new(round4(p.x), round4(p.y)))
}

fn tuple(p: &Point2<f64>) -> (f64, f64) {
    (p.x, p.y)
}

fn round4(value: f64) -> f64 {
    (value * 1.0e4).round() / 1.0e4
}
