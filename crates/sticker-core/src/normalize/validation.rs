//! Validation rules for sticker images
//!
//! Animated stickers cannot be re-encoded, so they are accepted only if they
//! already satisfy every constraint installing clients rely on.

use crate::constant::{MAX_STICKER_BYTE_LENGTH, MAX_STICKER_DIMENSION, MIN_STICKER_DIMENSION};
use crate::normalize::apng::AnimationControl;
use crate::normalize::types::NormalizeError;

/// Reject buffers larger than the service accepts
pub(crate) fn validate_byte_length(size: usize) -> Result<(), NormalizeError> {
    if size > MAX_STICKER_BYTE_LENGTH {
        return Err(NormalizeError::TooLarge {
            size,
            max_size: MAX_STICKER_BYTE_LENGTH,
        });
    }
    Ok(())
}

/// Validate an animated sticker as-is
///
/// Checks run in a fixed order (size, squareness, upper bound, lower bound,
/// looping) and the first violation is reported.
pub(crate) fn validate_animated(
    size: usize,
    width: u32,
    height: u32,
    control: &AnimationControl,
) -> Result<(), NormalizeError> {
    validate_byte_length(size)?;

    if width != height {
        return Err(NormalizeError::NotSquare { width, height });
    }

    if width > MAX_STICKER_DIMENSION {
        return Err(NormalizeError::DimensionsTooLarge {
            dimension: width,
            max_dimension: MAX_STICKER_DIMENSION,
        });
    }

    if width < MIN_STICKER_DIMENSION {
        return Err(NormalizeError::DimensionsTooSmall {
            dimension: width,
            min_dimension: MIN_STICKER_DIMENSION,
        });
    }

    if !control.loops_forever() {
        return Err(NormalizeError::MustLoopForever {
            plays: control.num_plays,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const FOREVER: AnimationControl = AnimationControl {
        num_frames: 4,
        num_plays: 0,
    };

    fn kind_of(result: Result<(), NormalizeError>) -> Option<ErrorKind> {
        result.err().map(|e| e.kind())
    }

    #[test]
    fn test_valid_animation_passes() {
        assert!(validate_animated(250_000, 400, 400, &FOREVER).is_ok());
        assert!(validate_animated(MAX_STICKER_BYTE_LENGTH, 512, 512, &FOREVER).is_ok());
        assert!(validate_animated(1_000, 10, 10, &FOREVER).is_ok());
    }

    #[test]
    fn test_each_rule_is_enforced_independently() {
        assert_eq!(
            kind_of(validate_animated(MAX_STICKER_BYTE_LENGTH + 1, 400, 400, &FOREVER)),
            Some(ErrorKind::TooLarge)
        );
        assert_eq!(
            kind_of(validate_animated(1_000, 400, 300, &FOREVER)),
            Some(ErrorKind::NotSquare)
        );
        assert_eq!(
            kind_of(validate_animated(1_000, 513, 513, &FOREVER)),
            Some(ErrorKind::DimensionsTooLarge)
        );
        assert_eq!(
            kind_of(validate_animated(1_000, 9, 9, &FOREVER)),
            Some(ErrorKind::DimensionsTooSmall)
        );
        let finite = AnimationControl {
            num_frames: 4,
            num_plays: 1,
        };
        assert_eq!(
            kind_of(validate_animated(1_000, 400, 400, &finite)),
            Some(ErrorKind::MustLoopForever)
        );
    }

    #[test]
    fn test_byte_length_boundary() {
        assert!(validate_byte_length(MAX_STICKER_BYTE_LENGTH).is_ok());
        assert!(matches!(
            validate_byte_length(MAX_STICKER_BYTE_LENGTH + 1),
            Err(NormalizeError::TooLarge {
                size,
                max_size: MAX_STICKER_BYTE_LENGTH,
            }) if size == MAX_STICKER_BYTE_LENGTH + 1
        ));
    }
}
