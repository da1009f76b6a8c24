// Translates logical messages to datagrams and back.

use std::fmt;

use super::builder::PerfConfig;
use super::Structs::{PerfTopic, HEADER_SIZE};
use crate::error::{PerfError, Result};
use crate::Core::Channel;

/// Number of datagrams used for a message of `payload_size` bytes.
///
/// Uses truncating division once the message spans several datagrams, so
/// trailing bytes past the last full fragment are never sent
/// (8193 bytes over 4096-byte datagrams is 2 fragments).
pub fn fragment_count(payload_size: u32, max_datagram_size: usize) -> u32 {
    let payload = payload_size as usize;
    if payload <= max_datagram_size {
        1
    } else {
        (payload / max_datagram_size) as u32
    }
}

/// Header encoding plus fragmentation on top of a [`Channel`].
///
/// Fragments carry no sequence number. Both peers must exchange one
/// message at a time for the receive side to stay aligned.
pub struct Framer {
    pub(crate) channel: Channel,
    pub(crate) max_datagram_size: usize,
    send_buffer: Vec<u8>,
    receive_buffer: Vec<u8>,
}

impl Framer {
    pub fn new(channel: Channel, max_datagram_size: usize) -> Result<Self> {
        if max_datagram_size < HEADER_SIZE {
            return Err(PerfError::Config(format!(
                "max datagram size {} is smaller than the {} byte header",
                max_datagram_size, HEADER_SIZE
            )));
        }

        Ok(Self {
            channel,
            max_datagram_size,
            send_buffer: vec![0u8; max_datagram_size],
            receive_buffer: vec![0u8; max_datagram_size],
        })
    }

    /// Open a channel for `config` and wrap it.
    pub fn open(config: &PerfConfig) -> Result<Self> {
        let channel = Channel::open(&config.own_address, &config.peer_address)?;
        Self::new(channel, config.max_datagram_size)
    }

    /// Send one logical message. Returns the number of datagrams written.
    ///
    /// A message that fits is one datagram of `payload_size` bytes (never
    /// shorter than the header). Larger messages go out as `fragment_count`
    /// back-to-back datagrams of `max_datagram_size` bytes, each starting
    /// with the header.
    pub fn send_message(&mut self, payload_size: u32, run: bool) -> Result<u32> {
        let fragments = fragment_count(payload_size, self.max_datagram_size);
        let header = PerfTopic::new(payload_size, run, fragments);

        // 4097..8191 bytes over 4096-byte datagrams still counts one fragment,
        // but that fragment is a full datagram, not the payload size.
        let datagram_len = if payload_size as usize <= self.max_datagram_size {
            (payload_size as usize).max(HEADER_SIZE)
        } else {
            self.max_datagram_size
        };

        let datagram = &mut self.send_buffer[..datagram_len];
        datagram[..HEADER_SIZE].copy_from_slice(&header.encode());

        for _ in 0..fragments {
            self.channel.send_raw(datagram)?;
        }
        Ok(fragments)
    }

    /// Receive one logical message and return the header of its first datagram.
    ///
    /// The remaining `fragment_count - 1` datagrams are drained without
    /// looking at their contents.
    pub fn receive_message(&mut self) -> Result<PerfTopic> {
        let len = self.channel.receive_raw(&mut self.receive_buffer)?;
        let header = PerfTopic::decode(&self.receive_buffer[..len])?;

        if header.fragment_count > 1 {
            tracing::trace!(
                fragments = header.fragment_count,
                "draining trailing fragments"
            );
            for _ in 1..header.fragment_count {
                self.channel.receive_raw(&mut self.receive_buffer)?;
            }
        }
        Ok(header)
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn max_datagram_size(&self) -> usize {
        self.max_datagram_size
    }

    pub fn close(&mut self) -> Result<()> {
        self.channel.close()
    }
}

impl fmt::Debug for Framer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_framer(self, f)
    }
}
