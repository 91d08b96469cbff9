// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fibsec_core::MaterialTag;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the fiber geometry engine
#[derive(Error, Debug)]
pub enum Error {
    /// Polygon area is numerically zero, its centroid is undefined
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Quad corners are non-convex, clockwise, or collinear and the
    /// discretizer was asked to reject such patches
    #[error("Non-convex quad patch: {0}")]
    NonConvexPatch(String),

    /// Strength-weighted area sums to zero, the plastic centroid is undefined
    #[error("Zero total weighted area: plastic centroid is undefined")]
    ZeroTotalArea,

    /// A material tag referenced by the section has no strength entry
    #[error("No strength supplied for material tag {0}")]
    MissingMaterialStrength(MaterialTag),

    /// Cover margins do not apply to this element
    #[error("Unsupported cover: {0}")]
    UnsupportedCover(String),

    /// Section format error from the core crate
    #[error("Core error: {0}")]
    Core(#[from] fibsec_core::Error),
}
