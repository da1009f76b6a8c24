use super::builder::PerfConfig;
use super::framer::Framer;
use super::meter::{LatencyMeter, LatencyReport};
use super::Structs::{PerfTopic, HEADER_SIZE};
use crate::error::Result;

/// The side that starts the exchange and does the timing.
///
/// Expected call order: [`Leader::await_follower`], then per payload size
/// [`Leader::begin_exchange`], [`Leader::run_loop`], [`Leader::finish`]
/// (or [`Leader::measure`] for all three), then [`Leader::terminate`].
#[derive(Debug)]
pub struct Leader {
    framer: Framer,
}

impl Leader {
    pub(crate) fn new(framer: Framer) -> Self {
        Self { framer }
    }

    pub fn open(config: &PerfConfig) -> Result<Self> {
        Ok(Self::new(Framer::open(config)?))
    }

    /// Block until the follower's registration message arrives.
    pub fn await_follower(&mut self) -> Result<PerfTopic> {
        tracing::info!("waiting for follower");
        let registration = self.framer.receive_message()?;
        tracing::info!(
            payload_size = registration.payload_size,
            "follower registered"
        );
        Ok(registration)
    }

    /// Send the first message of a measured exchange.
    pub fn begin_exchange(&mut self, payload_size: u32) -> Result<()> {
        let fragments = self.framer.send_message(payload_size, true)?;
        tracing::debug!(payload_size, fragments, "exchange started");
        Ok(())
    }

    /// Receive and echo back `round_trips` times.
    pub fn run_loop(&mut self, round_trips: u64) -> Result<()> {
        for _ in 0..round_trips {
            let topic = self.framer.receive_message()?;
            self.framer.send_message(topic.payload_size, true)?;
        }
        Ok(())
    }

    /// Absorb the follower's answer to the last echo of `run_loop`.
    pub fn finish(&mut self) -> Result<PerfTopic> {
        let last = self.framer.receive_message()?;
        tracing::debug!(payload_size = last.payload_size, "exchange done");
        Ok(last)
    }

    /// Tell the follower to stop. It sends no reply.
    pub fn terminate(&mut self) -> Result<()> {
        tracing::info!("sending termination signal");
        self.framer.send_message(HEADER_SIZE as u32, false)?;
        Ok(())
    }

    /// One full exchange for `payload_size` with the loop under the meter.
    ///
    /// # Errors
    /// `PerfError::Config` for zero round trips, before anything is sent.
    pub fn measure(&mut self, payload_size: u32, round_trips: u64) -> Result<LatencyReport> {
        let meter = LatencyMeter::new(round_trips)?;

        self.begin_exchange(payload_size)?;
        let report = meter.measure(payload_size, || self.run_loop(round_trips))?;
        self.finish()?;

        tracing::info!(
            payload_size,
            round_trips,
            latency_us = report.latency_us,
            "measurement complete"
        );
        Ok(report)
    }

    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    pub fn close(mut self) -> Result<()> {
        self.framer.close()
    }
}
