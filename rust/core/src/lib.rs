// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # fibsec Core
//!
//! Data model and wire format for fiber cross-sections, built with
//! [nom](https://docs.rs/nom).
//!
//! A section is an ordered list of patch and layer elements in the shape of
//! the fiber-section command language:
//!
//! ```text
//! [
//! ['section', 'Fiber', 1, '-GJ', 1000000.0],
//! ['patch', 'rect', 2, 10, 10, -15.0, -10.0, 15.0, 10.0],
//! ['layer', 'straight', 3, 5, 0.79, -12.0, -7.0, -12.0, 7.0]
//! ]
//! ```
//!
//! This crate parses and validates that format into a typed
//! [`SectionDefinition`] and serializes it back; the geometry engine lives
//! in `fibsec-geometry`.
//!
//! ## Quick Start
//!
//! ```rust
//! use fibsec_core::{parse_section, write_section};
//!
//! let text = "[['section', 'Fiber', 1, '-GJ', 1000000.0],
//!             ['patch', 'rect', 2, 10, 10, -15.0, -10.0, 15.0, 10.0]]";
//! let section = parse_section(text).unwrap();
//! let recentered = section.translated(-0.5, 0.0).rounded(4);
//! println!("{}", write_section(&recentered));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the data model

pub mod error;
pub mod parser;
pub mod section;
pub mod writer;

pub use error::{Error, Result};
pub use parser::{parse_section, parse_value_tree, Value};
pub use section::{FiberElement, MaterialTag, SectionDefinition};
pub use writer::{write_element, write_section};
