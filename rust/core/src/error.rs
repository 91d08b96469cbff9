// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for section parsing and serialization
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing a section definition
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a well-shaped list of section/patch/layer rows.
    /// The whole operation fails; no partial section is produced.
    #[error("Invalid section format: {0}")]
    InvalidSectionFormat(String),

    /// The input could not be tokenized at all
    #[error("Syntax error near byte {offset}: {detail}")]
    Syntax { offset: usize, detail: String },
}
