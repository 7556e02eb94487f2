//! Error taxonomy. Every variant ends the process with exit code 1.

use std::io;

use thiserror::Error;

use crate::args::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    UnrecognizedOptions(#[from] ParseError),

    #[error("Character set inclusion and exclusion options cannot be used together")]
    InclusionExclusion,

    /// The engine applied something other than what was asked for.
    #[error("Cannot set {field} value to {value}")]
    CannotSetTo { field: &'static str, value: i64 },

    #[error("Failed to read the password")]
    ReadPassword(#[source] io::Error),

    #[error("Cannot copy to clipboard")]
    Clipboard(#[source] arboard::Error),
}


// end of source
