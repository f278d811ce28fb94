//! Error types for template minification

use thiserror::Error;

use crate::minify::MinifyError;

/// All minification errors
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the input or writing the output failed.
    ///
    /// Errors come from `fs-err`, so the message names the path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Minification failed: {0}")]
    Minify(#[from] MinifyError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
