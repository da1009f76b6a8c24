use super::builder::PerfConfig;
use super::framer::Framer;
use super::Structs::HEADER_SIZE;
use crate::error::Result;

/// Follower lifecycle. `Echoing` only lasts while a reply is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerState {
    Listening,
    Echoing,
    Terminated,
}

/// The side that echoes every message until it sees `run == false`.
#[derive(Debug)]
pub struct Follower {
    framer: Framer,
    state: FollowerState,
    echoes: u64,
}

impl Follower {
    pub(crate) fn new(framer: Framer) -> Self {
        Self {
            framer,
            state: FollowerState::Listening,
            echoes: 0,
        }
    }

    pub fn open(config: &PerfConfig) -> Result<Self> {
        Ok(Self::new(Framer::open(config)?))
    }

    /// Announce this follower to the leader with a header-only message.
    /// Fails with a send error when no leader is bound yet.
    pub fn register(&mut self) -> Result<()> {
        tracing::info!("registering with the leader");
        self.framer.send_message(HEADER_SIZE as u32, true)?;
        Ok(())
    }

    /// Receive one message and echo it, or stop on the termination signal.
    pub fn step(&mut self) -> Result<FollowerState> {
        if self.state == FollowerState::Terminated {
            return Ok(self.state);
        }

        self.state = FollowerState::Listening;
        let topic = self.framer.receive_message()?;

        if !topic.run {
            tracing::info!(echoes = self.echoes, "termination signal received");
            self.state = FollowerState::Terminated;
            return Ok(self.state);
        }

        self.state = FollowerState::Echoing;
        self.framer.send_message(topic.payload_size, true)?;
        self.echoes += 1;
        self.state = FollowerState::Listening;
        Ok(self.state)
    }

    /// Echo until terminated. Returns the number of echoes sent.
    pub fn run(&mut self) -> Result<u64> {
        while self.step()? != FollowerState::Terminated {}
        Ok(self.echoes)
    }

    pub fn state(&self) -> FollowerState {
        self.state
    }

    pub fn echoes(&self) -> u64 {
        self.echoes
    }

    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    pub fn close(mut self) -> Result<()> {
        self.framer.close()
    }
}
