//! Definition of errors.

use std::path::PathBuf;

/// A specialized Result type for Legato.
pub type Result<T, E = LegatoError> = std::result::Result<T, E>;

/// The error type for Legato.
#[derive(Debug, thiserror::Error)]
pub enum LegatoError {
    /// The input span contains no characters.
    ///
    /// Segmenting an empty span is a caller contract violation, not an empty
    /// result.
    #[error("EmptySpanError: the input span contains no characters")]
    EmptySpan,

    /// The original-offset array is shorter than the input span.
    #[error(
        "MalformedOffsetsError: offset array holds {got} entries \
         but the span has {expected} characters"
    )]
    MalformedOffsets {
        /// Number of characters in the span.
        expected: usize,
        /// Number of entries in the offset array.
        got: usize,
    },

    /// No segmentation path reaches the end of the span.
    #[error("NoPathFoundError: no segmentation path reaches the end of the span")]
    NoPathFound,

    /// A configured special token is absent from the vocabulary.
    #[error("TokenNotFoundError: the special token {0:?} could not be found in the vocabulary")]
    TokenNotFound(String),

    /// A vocabulary file does not exist.
    #[error("FileNotFoundError: vocabulary file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The error variant for [`InvalidArgumentError`].
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// The error variant for [`TryFromIntError`](std::num::TryFromIntError).
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// The error variant for [`ParseFloatError`](std::num::ParseFloatError).
    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// The error variant for [`std::io::Error`].
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The error variant for [`serde_json::Error`].
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LegatoError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }
}

/// Error used when the argument is invalid.
#[derive(Debug, thiserror::Error)]
#[error("InvalidArgumentError: {arg}: {msg}")]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

/// Error used when the input format is invalid.
#[derive(Debug, thiserror::Error)]
#[error("InvalidFormatError: {arg}: {msg}")]
pub struct InvalidFormatError {
    /// Name of the format.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}
