//! Counter-reset command encoding for the 8-Encoder unit.
//!
//! The unit has one reset flag register per channel starting at
//! [`ENCODER_RESET`]. Writing 1 to a flag zeroes that counter. Any set of
//! channels is reset with a single write that starts at the lowest selected
//! flag and runs through the highest, carrying 0 for the channels in between
//! that should be left alone.

use heapless::Vec;

use crate::registers::{CHANNEL_COUNT, ENCODER_RESET};

/// Register range touched by a reset command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetSpan {
    /// First flag register written.
    pub start_register: u8,
    /// Number of flag bytes written.
    pub len: u8,
}

/// Locate the flag registers covered by `mask`, or `None` for an empty mask.
pub fn reset_span(mask: u8) -> Option<ResetSpan> {
    if mask == 0 {
        return None;
    }
    let low = mask.trailing_zeros() as u8;
    let high = 7 - mask.leading_zeros() as u8;
    Some(ResetSpan {
        start_register: ENCODER_RESET + low,
        len: high - low + 1,
    })
}

/// Flag bytes for the channels of `mask` inside `span`, lowest register
/// first.
///
/// `span` is the result of [`reset_span`] for the same mask, so it never
/// covers more than [`CHANNEL_COUNT`] flags.
pub fn reset_flags(mask: u8, span: ResetSpan) -> Vec<u8, CHANNEL_COUNT> {
    let low = span.start_register - ENCODER_RESET;
    (0..span.len).map(|i| (mask >> (low + i)) & 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags_for(mask: u8) -> Vec<u8, CHANNEL_COUNT> {
        reset_flags(mask, reset_span(mask).unwrap())
    }

    #[test]
    fn empty_mask_has_no_span() {
        assert_eq!(reset_span(0), None);
    }

    #[test]
    fn channels_zero_and_two() {
        assert_eq!(
            reset_span(0b0000_0101),
            Some(ResetSpan { start_register: 0x40, len: 3 })
        );
        assert_eq!(flags_for(0b0000_0101).as_slice(), &[1, 0, 1]);
    }

    #[test]
    fn single_channel_starts_at_its_flag() {
        for channel in 0..8u8 {
            let mask = 1 << channel;
            assert_eq!(
                reset_span(mask),
                Some(ResetSpan { start_register: 0x40 + channel, len: 1 })
            );
            assert_eq!(flags_for(mask).as_slice(), &[1]);
        }
    }

    #[test]
    fn gaps_are_zero_filled() {
        assert_eq!(
            reset_span(0b1001_0100),
            Some(ResetSpan { start_register: 0x42, len: 6 })
        );
        assert_eq!(flags_for(0b1001_0100).as_slice(), &[1, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn full_mask_covers_every_flag() {
        assert_eq!(
            reset_span(0xFF),
            Some(ResetSpan { start_register: 0x40, len: 8 })
        );
        assert_eq!(flags_for(0xFF).as_slice(), &[1; 8]);
    }

    #[test]
    fn span_length_matches_flags() {
        for mask in 1..=u8::MAX {
            let span = reset_span(mask).unwrap();
            let flags = reset_flags(mask, span);
            assert_eq!(span.len as usize, flags.len());
            assert_eq!(flags.first(), Some(&1));
            assert_eq!(flags.last(), Some(&1));
        }
    }
}
