use std::path::PathBuf;

use super::{Follower, Leader};
use crate::error::{PerfError, Result};
use crate::Core::MAX_MESSAGE_SIZE;
use crate::Perf::Structs::HEADER_SIZE;

/// Well-known receive address of the leader role.
pub const LEADER_SOCKET_PATH: &str = "/tmp/udsperf-leader.sock";
/// Well-known receive address of the follower role.
pub const FOLLOWER_SOCKET_PATH: &str = "/tmp/udsperf-follower.sock";

/// Validated settings for one side of a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfConfig {
    /// Address this process binds and receives on.
    pub own_address: PathBuf,
    /// Address this process sends to.
    pub peer_address: PathBuf,
    pub max_datagram_size: usize,
}

pub struct PerfBuilder {
    own_address: Option<PathBuf>,
    peer_address: Option<PathBuf>,
    max_datagram_size: usize,
}

impl Default for PerfBuilder {
    fn default() -> Self {
        Self {
            own_address: None,
            peer_address: None,
            max_datagram_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl PerfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preset with the leader's well-known addresses.
    pub fn leader() -> Self {
        Self::new()
            .with_own_address(LEADER_SOCKET_PATH)
            .with_peer_address(FOLLOWER_SOCKET_PATH)
    }

    /// Builder preset with the follower's well-known addresses.
    pub fn follower() -> Self {
        Self::new()
            .with_own_address(FOLLOWER_SOCKET_PATH)
            .with_peer_address(LEADER_SOCKET_PATH)
    }

    pub fn with_own_address(mut self, address: impl Into<PathBuf>) -> Self {
        self.own_address = Some(address.into());
        self
    }

    pub fn with_peer_address(mut self, address: impl Into<PathBuf>) -> Self {
        self.peer_address = Some(address.into());
        self
    }

    pub fn with_max_datagram_size(mut self, size: usize) -> Self {
        self.max_datagram_size = size;
        self
    }

    pub fn build(self) -> Result<PerfConfig> {
        let own_address = self
            .own_address
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| PerfError::Config("own address is not set".into()))?;
        let peer_address = self
            .peer_address
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| PerfError::Config("peer address is not set".into()))?;

        if own_address == peer_address {
            return Err(PerfError::Config(format!(
                "own and peer address are both {}",
                own_address.display()
            )));
        }

        if self.max_datagram_size < HEADER_SIZE {
            return Err(PerfError::Config(format!(
                "max datagram size {} is smaller than the {} byte header",
                self.max_datagram_size, HEADER_SIZE
            )));
        }

        Ok(PerfConfig {
            own_address,
            peer_address,
            max_datagram_size: self.max_datagram_size,
        })
    }

    pub fn build_leader(self) -> Result<Leader> {
        Leader::open(&self.build()?)
    }

    pub fn build_follower(self) -> Result<Follower> {
        Follower::open(&self.build()?)
    }
}
