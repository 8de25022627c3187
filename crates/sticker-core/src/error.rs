//! Sticker core errors
//!
//! Each module has its own error enum ([`NormalizeError`], [`PackError`]).
//! All of them report an [`ErrorKind`], which is the stable contract callers
//! branch on, and an optional localization key for the message shown to the
//! user. Display strings are for logs only.

use std::fmt;

use crate::normalize::NormalizeError;
use crate::pack::PackError;

/// Machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The image could not be decoded or has no readable dimensions
    Decode,
    /// The encoded sticker exceeds the byte limit
    TooLarge,
    /// An animated sticker is not square
    NotSquare,
    /// An animated sticker is wider than the maximum dimension
    DimensionsTooLarge,
    /// An animated sticker is narrower than the minimum dimension
    DimensionsTooSmall,
    /// An animated sticker does not loop forever
    MustLoopForever,
    /// The static sticker could not be re-encoded
    Encode,
    /// Session credentials could not be resolved
    Authentication,
    /// A sticker slot has no image data
    MissingImageData,
    /// Key generation or encryption failed
    Encryption,
    /// Connecting to or uploading through the sticker service failed
    Upload,
    /// Configuration could not be loaded
    Config,
}

impl ErrorKind {
    /// Stable snake_case name, suitable for logs and FFI boundaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::TooLarge => "too_large",
            Self::NotSquare => "not_square",
            Self::DimensionsTooLarge => "dimensions_too_large",
            Self::DimensionsTooSmall => "dimensions_too_small",
            Self::MustLoopForever => "must_loop_forever",
            Self::Encode => "encode",
            Self::Authentication => "authentication",
            Self::MissingImageData => "missing_image_data",
            Self::Encryption => "encryption",
            Self::Upload => "upload",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sticker core error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Normalizer error
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    /// Pack assembly or upload error
    #[error(transparent)]
    Pack(#[from] PackError),
    /// Configuration error
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Machine-readable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Normalize(e) => e.kind(),
            Self::Pack(e) => e.kind(),
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Localization key for the user-facing message, if there is one
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            Self::Normalize(e) => e.message_key(),
            Self::Pack(e) => e.message_key(),
            Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_unique() {
        let kinds = [
            ErrorKind::Decode,
            ErrorKind::TooLarge,
            ErrorKind::NotSquare,
            ErrorKind::DimensionsTooLarge,
            ErrorKind::DimensionsTooSmall,
            ErrorKind::MustLoopForever,
            ErrorKind::Encode,
            ErrorKind::Authentication,
            ErrorKind::MissingImageData,
            ErrorKind::Encryption,
            ErrorKind::Upload,
            ErrorKind::Config,
        ];
        let names: std::collections::HashSet<_> = kinds.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), kinds.len());
    }

    #[test]
    fn test_wrapped_errors_keep_their_kind() {
        let err = Error::from(NormalizeError::NotSquare {
            width: 20,
            height: 30,
        });
        assert_eq!(err.kind(), ErrorKind::NotSquare);
        assert_eq!(
            err.message_key(),
            Some("StickerCreator--Toasts--APNG--notSquare")
        );

        let err = Error::from(PackError::MissingImageData { index: 2 });
        assert_eq!(err.kind(), ErrorKind::MissingImageData);

        let err = Error::Config("bad json".to_string());
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message_key().is_none());
    }
}
