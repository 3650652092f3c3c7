pub(crate) mod run;
mod shaper;

pub use shaper::Shaper;

use core::fmt;

use crate::unicode::UnicodeError;

/// Errors surfaced by shaper construction; shape-time failures are logged
/// and collapse to returning the caller's origin.
#[derive(Debug)]
pub enum ShaperError {
    /// No primary typeface was given and the provider has no default.
    NoDefaultTypeface,
    /// Input exceeds the 32-bit byte offsets shaping engines support.
    TextTooLong { bytes: usize },
    /// Unicode analysis failed.
    Unicode(UnicodeError),
}

impl fmt::Display for ShaperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaperError::NoDefaultTypeface => {
                write!(f, "no primary typeface and no provider default")
            }
            ShaperError::TextTooLong { bytes } => {
                write!(f, "input of {bytes} bytes exceeds 32-bit offsets")
            }
            ShaperError::Unicode(err) => write!(f, "unicode analysis failed: {err}"),
        }
    }
}

impl std::error::Error for ShaperError {}

impl From<UnicodeError> for ShaperError {
    fn from(err: UnicodeError) -> Self {
        ShaperError::Unicode(err)
    }
}

/// Convenient result alias for shaping operations.
pub type Result<T> = std::result::Result<T, ShaperError>;
