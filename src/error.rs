//! Error types for bookgen operations.

use thiserror::Error;

/// Errors that can end a generation run or a single assembler.
///
/// Failures of individual chapter generations are not represented here:
/// they are recovered inside the run (see [`GenerationError`]).
///
/// [`GenerationError`]: crate::source::GenerationError
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("cannot assemble document: {0}")]
    Assembly(String),

    #[error("generation run cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;
