// The header that prefixes every datagram of the ping-pong protocol.

use crate::error::HeaderError;

/// Byte offset of `payload_size` in the encoded header.
pub const PAYLOAD_SIZE_OFFSET: usize = 0;
/// Byte offset of the `run` flag in the encoded header.
pub const RUN_OFFSET: usize = 4;
/// Byte offset of `fragment_count` in the encoded header.
pub const FRAGMENT_COUNT_OFFSET: usize = 8;
/// Encoded header length in bytes.
pub const HEADER_SIZE: usize = 12;

/// Message header exchanged between leader and follower.
///
/// Encoded in host byte order with the same field offsets as the C record
/// `{ uint32_t payloadSize; bool run; uint32_t subPackets; }`, so a peer that
/// reinterprets its receive buffer as that record reads the same values.
/// The `run` flag is one byte followed by three bytes of padding; `encode`
/// zeroes the padding and `decode` ignores it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PerfTopic {
    /// Size of the whole logical message, not of one fragment.
    pub payload_size: u32,
    /// `false` is the termination signal.
    pub run: bool,
    /// Number of datagrams carrying this message.
    pub fragment_count: u32,
}

impl PerfTopic {
    pub fn new(payload_size: u32, run: bool, fragment_count: u32) -> Self {
        Self {
            payload_size,
            run,
            fragment_count,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[PAYLOAD_SIZE_OFFSET..RUN_OFFSET].copy_from_slice(&self.payload_size.to_ne_bytes());
        out[RUN_OFFSET] = u8::from(self.run);
        out[FRAGMENT_COUNT_OFFSET..HEADER_SIZE]
            .copy_from_slice(&self.fragment_count.to_ne_bytes());
        out
    }

    /// Decode the header from the front of a received datagram.
    /// Bytes past the header are payload filler and are ignored.
    ///
    /// Only the first byte of the `run` word is read (any nonzero value is
    /// `true`). A C peer leaves the three padding bytes after its `bool`
    /// uninitialised.
    pub fn decode(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_SIZE {
            return Err(HeaderError::Truncated {
                len: bytes.len(),
                needed: HEADER_SIZE,
            });
        }

        let payload_size = read_u32(bytes, PAYLOAD_SIZE_OFFSET);
        let run = bytes[RUN_OFFSET] != 0;
        let fragment_count = read_u32(bytes, FRAGMENT_COUNT_OFFSET);

        Ok(Self {
            payload_size,
            run,
            fragment_count,
        })
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_ne_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
