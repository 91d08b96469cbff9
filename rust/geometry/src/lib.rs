//! fibsec geometry engine
//!
//! Turns [`fibsec_core`] section definitions into fibers, solves the
//! strength-weighted plastic centroid, and applies cover and replication
//! transforms, using nalgebra for the plane geometry.

pub mod centroid;
pub mod discretize;
pub mod error;
pub mod primitives;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use centroid::{plastic_centroid, recenter, RecenteredSection, StrengthMap};
pub use discretize::{discretize, discretize_section, DiscretizeOptions, Fiber, NonConvexPolicy};
pub use error::{Error, Result};
pub use transform::{cover, replicate, CoverMargins};
