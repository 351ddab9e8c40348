//! Frame encoding and decoding for the Thermolink protocol.
//!
//! Frame format (always 8 bytes):
//! - MARKER (1 byte): 0x7E synchronization byte
//! - COMMAND (1 byte): request or acknowledgement code
//! - PAYLOAD (4 bytes): command-specific data, zero-filled when unused
//! - RESERVED (1 byte): always 0x00
//! - CHECKSUM (1 byte): 0xFF minus the sum of the previous 7 bytes, mod 256

/// Frame synchronization byte
pub const MARKER: u8 = 0x7E;

/// Complete frame size in bytes
pub const FRAME_SIZE: usize = 8;

/// Payload size in bytes
pub const PAYLOAD_SIZE: usize = 4;

/// Offset of the command code
pub const COMMAND_OFFSET: usize = 1;

/// Offset of the first payload byte
pub const PAYLOAD_OFFSET: usize = 2;

/// Offset of the reserved byte
pub const RESERVED_OFFSET: usize = 6;

/// Offset of the checksum byte
pub const CHECKSUM_OFFSET: usize = 7;

/// Bytes covered by the checksum
const CHECKSUMMED_LEN: usize = FRAME_SIZE - 1;

/// A frame exactly as it appears on the wire
pub type RawFrame = [u8; FRAME_SIZE];

/// Errors that can occur while decoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// First byte is not [`MARKER`]
    MissingMarker,
    /// Stored checksum does not match the recomputed one
    InvalidChecksum {
        /// Checksum computed over bytes 0-6
        expected: u8,
        /// Checksum found at offset 7
        found: u8,
    },
}

/// Additive frame checksum
///
/// Starts at 0xFF and subtracts every byte with 8-bit wraparound. This is
/// not a CRC: two compensating errors in different bytes go unnoticed.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0xFFu8, |chk, &byte| chk.wrapping_sub(byte))
}

/// A decoded or constructed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Request or acknowledgement code
    pub command: u8,
    /// Payload data
    pub payload: [u8; PAYLOAD_SIZE],
}

impl Frame {
    /// Create a new frame with the given command code and payload
    pub const fn new(command: u8, payload: [u8; PAYLOAD_SIZE]) -> Self {
        Self { command, payload }
    }

    /// Create a frame with an all-zero payload
    pub const fn empty(command: u8) -> Self {
        Self::new(command, [0; PAYLOAD_SIZE])
    }

    /// Encode this frame into its wire representation
    pub fn encode(&self) -> RawFrame {
        let mut raw = [0u8; FRAME_SIZE];
        raw[0] = MARKER;
        raw[COMMAND_OFFSET] = self.command;
        raw[PAYLOAD_OFFSET..RESERVED_OFFSET].copy_from_slice(&self.payload);
        raw[RESERVED_OFFSET] = 0x00;
        raw[CHECKSUM_OFFSET] = checksum(&raw[..CHECKSUMMED_LEN]);
        raw
    }

    /// Decode a frame from its wire representation
    ///
    /// The reserved byte is not checked; it is covered by the checksum.
    pub fn decode(raw: &RawFrame) -> Result<Self, FrameError> {
        if raw[0] != MARKER {
            return Err(FrameError::MissingMarker);
        }

        let expected = checksum(&raw[..CHECKSUMMED_LEN]);
        let found = raw[CHECKSUM_OFFSET];
        if expected != found {
            return Err(FrameError::InvalidChecksum { expected, found });
        }

        let mut payload = [0u8; PAYLOAD_SIZE];
        payload.copy_from_slice(&raw[PAYLOAD_OFFSET..RESERVED_OFFSET]);

        Ok(Self {
            command: raw[COMMAND_OFFSET],
            payload,
        })
    }
}
