// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fiber section data model
//!
//! A section is an ordered list of patch/layer elements, each tied to a
//! material tag. Elements are immutable value objects: every transform
//! produces a new element or a new section, so speculative edits
//! (preview-before-commit) never touch the original.

/// Positive integer identifying a material.
///
/// The engine never resolves a tag itself; callers map tags to strength
/// scalars (solver) or colors (rendering).
pub type MaterialTag = u32;

/// One patch or layer element of a fiber section.
///
/// Coordinates are `(y, z)` pairs in one canonical unit, angles in degrees,
/// matching the fiber-section command language the wire format mirrors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FiberElement {
    /// Axis-aligned rectangle from `(y1, z1)` to `(y2, z2)`, subdivided
    /// into `n_fib_y` × `n_fib_z` cells
    RectPatch {
        material: MaterialTag,
        n_fib_y: u32,
        n_fib_z: u32,
        y1: f64,
        z1: f64,
        y2: f64,
        z2: f64,
    },
    /// General quadrilateral with corners I, J, K, L in counter-clockwise
    /// order, subdivided bilinearly into `n_ij` × `n_jk` cells
    QuadPatch {
        material: MaterialTag,
        n_ij: u32,
        n_jk: u32,
        i: (f64, f64),
        j: (f64, f64),
        k: (f64, f64),
        l: (f64, f64),
    },
    /// Annular sector subdivided into `n_circ` × `n_rad` wedge cells
    CircPatch {
        material: MaterialTag,
        n_circ: u32,
        n_rad: u32,
        center: (f64, f64),
        r_inner: f64,
        r_outer: f64,
        angle0: f64,
        angle1: f64,
    },
    /// `n_bars` point fibers of area `bar_area` evenly spaced on a segment,
    /// both endpoints included
    StraightLayer {
        material: MaterialTag,
        n_bars: u32,
        bar_area: f64,
        start: (f64, f64),
        end: (f64, f64),
    },
    /// `n_bars` point fibers of area `bar_area` evenly spaced on an arc
    CircLayer {
        material: MaterialTag,
        n_bars: u32,
        bar_area: f64,
        center: (f64, f64),
        radius: f64,
        angle0: f64,
        angle1: f64,
    },
}

impl FiberElement {
    /// Material tag of this element
    pub fn material(&self) -> MaterialTag {
        match *self {
            FiberElement::RectPatch { material, .. }
            | FiberElement::QuadPatch { material, .. }
            | FiberElement::CircPatch { material, .. }
            | FiberElement::StraightLayer { material, .. }
            | FiberElement::CircLayer { material, .. } => material,
        }
    }

    /// Rigid translation by `(dy, dz)`.
    ///
    /// Circular elements translate only their center; radius and angles are
    /// unchanged, so copies do not rotate to follow the translation
    /// direction.
    pub fn translated(&self, dy: f64, dz: f64) -> FiberElement {
        let shift = |(y, z): (f64, f64)| (y + dy, z + dz);
        match *self {
            FiberElement::RectPatch {
                material,
                n_fib_y,
                n_fib_z,
                y1,
                z1,
                y2,
                z2,
            } => FiberElement::RectPatch {
                material,
                n_fib_y,
                n_fib_z,
                y1: y1 + dy,
                z1: z1 + dz,
                y2: y2 + dy,
                z2: z2 + dz,
            },
            FiberElement::QuadPatch {
                material,
                n_ij,
                n_jk,
                i,
                j,
                k,
                l,
            } => FiberElement::QuadPatch {
                material,
                n_ij,
                n_jk,
                i: shift(i),
                j: shift(j),
                k: shift(k),
                l: shift(l),
            },
            FiberElement::CircPatch {
                material,
                n_circ,
                n_rad,
                center,
                r_inner,
                r_outer,
                angle0,
                angle1,
            } => FiberElement::CircPatch {
                material,
                n_circ,
                n_rad,
                center: shift(center),
                r_inner,
                r_outer,
                angle0,
                angle1,
            },
            FiberElement::StraightLayer {
                material,
                n_bars,
                bar_area,
                start,
                end,
            } => FiberElement::StraightLayer {
                material,
                n_bars,
                bar_area,
                start: shift(start),
                end: shift(end),
            },
            FiberElement::CircLayer {
                material,
                n_bars,
                bar_area,
                center,
                radius,
                angle0,
                angle1,
            } => FiberElement::CircLayer {
                material,
                n_bars,
                bar_area,
                center: shift(center),
                radius,
                angle0,
                angle1,
            },
        }
    }

    /// Same element with every coordinate rounded to `decimals` places.
    ///
    /// Only positional coordinates are rounded; counts, areas, radii and
    /// angles are untouched. Used after re-centering to stabilize numeric
    /// comparisons and serialized output.
    pub fn rounded(&self, decimals: i32) -> FiberElement {
        let r = |v: f64| round_to(v, decimals);
        let rp = |(y, z): (f64, f64)| (round_to(y, decimals), round_to(z, decimals));
        match *self {
            FiberElement::RectPatch {
                material,
                n_fib_y,
                n_fib_z,
                y1,
                z1,
                y2,
                z2,
            } => FiberElement::RectPatch {
                material,
                n_fib_y,
                n_fib_z,
                y1: r(y1),
                z1: r(z1),
                y2: r(y2),
                z2: r(z2),
            },
            FiberElement::QuadPatch {
                material,
                n_ij,
                n_jk,
                i,
                j,
                k,
                l,
            } => FiberElement::QuadPatch {
                material,
                n_ij,
                n_jk,
                i: rp(i),
                j: rp(j),
                k: rp(k),
                l: rp(l),
            },
            FiberElement::CircPatch {
                material,
                n_circ,
                n_rad,
                center,
                r_inner,
                r_outer,
                angle0,
                angle1,
            } => FiberElement::CircPatch {
                material,
                n_circ,
                n_rad,
                center: rp(center),
                r_inner,
                r_outer,
                angle0,
                angle1,
            },
            FiberElement::StraightLayer {
                material,
                n_bars,
                bar_area,
                start,
                end,
            } => FiberElement::StraightLayer {
                material,
                n_bars,
                bar_area,
                start: rp(start),
                end: rp(end),
            },
            FiberElement::CircLayer {
                material,
                n_bars,
                bar_area,
                center,
                radius,
                angle0,
                angle1,
            } => FiberElement::CircLayer {
                material,
                n_bars,
                bar_area,
                center: rp(center),
                radius,
                angle0,
                angle1,
            },
        }
    }
}

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// A complete fiber section: header data plus an ordered element list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionDefinition {
    /// Section tag from the `['section', 'Fiber', tag, '-GJ', gj]` header
    pub tag: u32,
    /// Torsional stiffness, opaque to the engine
    pub gj: f64,
    /// Ordered patch/layer elements
    pub elements: Vec<FiberElement>,
}

impl SectionDefinition {
    /// Create an empty section
    pub fn new(tag: u32, gj: f64) -> Self {
        Self {
            tag,
            gj,
            elements: Vec::new(),
        }
    }

    /// New section with one more element appended
    pub fn with_appended(&self, element: FiberElement) -> SectionDefinition {
        let mut out = self.clone();
        out.elements.push(element);
        out
    }

    /// New section with element `index` replaced by `replacement`.
    ///
    /// The replacement elements are appended at the end of the list, the way
    /// the cover and replicate workflows splice their results in. Returns
    /// `None` when `index` is out of bounds.
    pub fn with_replaced(
        &self,
        index: usize,
        replacement: impl IntoIterator<Item = FiberElement>,
    ) -> Option<SectionDefinition> {
        if index >= self.elements.len() {
            return None;
        }
        let mut out = self.clone();
        out.elements.remove(index);
        out.elements.extend(replacement);
        Some(out)
    }

    /// New section with every element translated by `(dy, dz)`
    pub fn translated(&self, dy: f64, dz: f64) -> SectionDefinition {
        SectionDefinition {
            tag: self.tag,
            gj: self.gj,
            elements: self.elements.iter().map(|e| e.translated(dy, dz)).collect(),
        }
    }

    /// New section with every coordinate rounded to `decimals` places
    pub fn rounded(&self, decimals: i32) -> SectionDefinition {
        SectionDefinition {
            tag: self.tag,
            gj: self.gj,
            elements: self.elements.iter().map(|e| e.rounded(decimals)).collect(),
        }
    }
}
