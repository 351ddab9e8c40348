//! Resynchronizing frame assembler.
//!
//! Turns an arbitrary, possibly noisy byte stream into candidate 8-byte
//! frames. The assembler only finds frame boundaries; it does not check
//! the checksum. Pass each candidate to [`Frame::decode`](crate::Frame::decode).
//!
//! There is no length field and no escaping. A marker byte inside a payload
//! is taken as an ordinary byte. If a frame is cut short and a new one
//! starts, the assembler keeps counting from the old marker and the result
//! fails its checksum. The assembler then hunts for the next marker.

use heapless::Vec;

use crate::frame::{RawFrame, FRAME_SIZE, MARKER};

/// Assembler mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Discarding bytes until a marker arrives
    Seeking,
    /// Marker seen, collecting the rest of the frame
    Accumulating,
}

/// Result of feeding one byte to the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feed {
    /// Byte was not a marker and was thrown away
    Discarded,
    /// Byte was stored; the frame is not complete yet
    Pending,
    /// Byte completed a candidate frame
    Complete(RawFrame),
}

/// State machine for splitting a byte stream into frames
///
/// One instance per input stream. Instances are independent, so tests
/// (or a board with two links) can run several side by side.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    mode: Mode,
    buffer: Vec<u8, FRAME_SIZE>,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an assembler in [`Mode::Seeking`] with an empty buffer
    pub const fn new() -> Self {
        Self {
            mode: Mode::Seeking,
            buffer: Vec::new(),
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of bytes collected for the current frame
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no bytes are buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop any partial frame and go back to seeking
    pub fn reset(&mut self) {
        self.mode = Mode::Seeking;
        self.buffer.clear();
    }

    /// Feed a single byte to the assembler
    pub fn feed(&mut self, byte: u8) -> Feed {
        match self.mode {
            Mode::Seeking => {
                if byte != MARKER {
                    return Feed::Discarded;
                }
                self.buffer.clear();
                self.push(byte);
                self.mode = Mode::Accumulating;
                Feed::Pending
            }
            Mode::Accumulating => {
                // Interior bytes are stored as-is, marker or not
                self.push(byte);
                if self.buffer.len() < FRAME_SIZE {
                    return Feed::Pending;
                }

                let mut raw = [0u8; FRAME_SIZE];
                raw.copy_from_slice(&self.buffer);
                self.reset();
                Feed::Complete(raw)
            }
        }
    }

    /// Feed bytes until the first complete frame
    ///
    /// Returns the frame and the number of bytes consumed. Bytes after the
    /// frame are left for the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Option<RawFrame>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Feed::Complete(raw) = self.feed(byte) {
                return (Some(raw), i + 1);
            }
        }
        (None, bytes.len())
    }

    fn push(&mut self, byte: u8) {
        // The buffer is drained as soon as it holds FRAME_SIZE bytes, so a
        // full buffer here means the state was corrupted. Start over.
        if self.buffer.push(byte).is_err() {
            debug_assert!(false, "assembler buffer overflow");
            self.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Frame, PAYLOAD_SIZE};
    use proptest::prelude::*;

    fn set_power_frame() -> RawFrame {
        Frame::new(0x02, [0x32, 0, 0, 0]).encode()
    }

    #[test]
    fn test_starts_seeking() {
        let assembler = FrameAssembler::new();
        assert_eq!(assembler.mode(), Mode::Seeking);
        assert!(assembler.is_empty());
    }

    #[test]
    fn test_noise_is_discarded() {
        let mut assembler = FrameAssembler::new();
        for byte in [0x00, 0xFF, 0x12, 0x7D, 0x7F] {
            assert_eq!(assembler.feed(byte), Feed::Discarded);
        }
        assert_eq!(assembler.mode(), Mode::Seeking);
        assert_eq!(assembler.len(), 0);
    }

    #[test]
    fn test_complete_frame() {
        let raw = set_power_frame();
        let mut assembler = FrameAssembler::new();

        for &byte in &raw[..7] {
            assert_eq!(assembler.feed(byte), Feed::Pending);
        }
        assert_eq!(assembler.feed(raw[7]), Feed::Complete(raw));
        assert_eq!(assembler.mode(), Mode::Seeking);
        assert!(assembler.is_empty());
    }

    #[test]
    fn test_partial_frame_persists_across_calls() {
        let raw = set_power_frame();
        let mut assembler = FrameAssembler::new();

        let (frame, consumed) = assembler.feed_bytes(&raw[..5]);
        assert_eq!(frame, None);
        assert_eq!(consumed, 5);
        assert_eq!(assembler.mode(), Mode::Accumulating);
        assert_eq!(assembler.len(), 5);

        let (frame, consumed) = assembler.feed_bytes(&raw[5..]);
        assert_eq!(frame, Some(raw));
        assert_eq!(consumed, 3);
        assert_eq!(assembler.mode(), Mode::Seeking);
    }

    #[test]
    fn test_marker_inside_frame_is_payload() {
        let raw = Frame::new(0x02, [MARKER, MARKER, 0, 0]).encode();
        let mut assembler = FrameAssembler::new();

        let (frame, consumed) = assembler.feed_bytes(&raw);
        assert_eq!(frame, Some(raw));
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_feed_bytes_leaves_trailing_bytes() {
        let raw = set_power_frame();
        let mut stream = [0u8; 11];
        stream[..8].copy_from_slice(&raw);
        stream[8..].copy_from_slice(&[MARKER, 0x03, 0x00]);

        let mut assembler = FrameAssembler::new();
        let (frame, consumed) = assembler.feed_bytes(&stream);
        assert_eq!(frame, Some(raw));
        assert_eq!(consumed, 8);
        assert!(assembler.is_empty());
    }

    /// A truncated frame swallows the start of the next one. The bad
    /// candidate fails decode and the assembler recovers on a later marker.
    #[test]
    fn test_truncated_frame_recovers() {
        let good = set_power_frame();
        let mut assembler = FrameAssembler::new();

        // First three bytes of a frame, then a complete frame
        assembler.feed_bytes(&good[..3]);
        let (bad, consumed) = assembler.feed_bytes(&good);
        let bad = bad.unwrap();
        assert_eq!(consumed, 5);
        assert!(Frame::decode(&bad).is_err());

        // Tail of the swallowed frame holds no marker, then a clean frame
        let (frame, _) = assembler.feed_bytes(&good[5..]);
        assert_eq!(frame, None);
        let (frame, _) = assembler.feed_bytes(&good);
        assert_eq!(frame, Some(good));
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let raw = set_power_frame();
        let mut assembler = FrameAssembler::new();
        assembler.feed_bytes(&raw[..4]);
        assembler.reset();
        assert_eq!(assembler.mode(), Mode::Seeking);
        assert!(assembler.is_empty());

        // Rest of the old frame carries no marker, so nothing comes out
        assert_eq!(assembler.feed_bytes(&raw[4..]), (None, 4));
    }

    proptest! {
        #[test]
        fn prop_resync_after_noise(
            noise in proptest::collection::vec(any::<u8>().prop_filter("not a marker", |b| *b != MARKER), 0..64),
            command in any::<u8>(),
            payload in any::<[u8; PAYLOAD_SIZE]>(),
        ) {
            let raw = Frame::new(command, payload).encode();
            let mut assembler = FrameAssembler::new();
            let mut frames = 0;

            for &byte in noise.iter().chain(raw.iter()) {
                if let Feed::Complete(candidate) = assembler.feed(byte) {
                    prop_assert_eq!(candidate, raw);
                    prop_assert!(Frame::decode(&candidate).is_ok());
                    frames += 1;
                }
            }
            prop_assert_eq!(frames, 1);
        }

        #[test]
        fn prop_len_never_exceeds_frame_size(
            stream in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let mut assembler = FrameAssembler::new();
            for byte in stream {
                assembler.feed(byte);
                prop_assert!(assembler.len() <= FRAME_SIZE);
                if assembler.mode() == Mode::Seeking {
                    prop_assert!(assembler.is_empty());
                }
            }
        }
    }
}
