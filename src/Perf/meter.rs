use std::time::{Duration, Instant};

use crate::error::{PerfError, Result};

/// One outbound echo and one inbound receive per round trip.
pub const TRANSMISSIONS_PER_ROUND_TRIP: u64 = 2;

/// Outcome of one timed ping-pong loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyReport {
    pub payload_size: u32,
    pub round_trips: u64,
    /// Wall-clock time spent in the loop.
    pub elapsed: Duration,
    /// Mean one-way latency in microseconds.
    pub latency_us: f64,
}

/// Wall-clock timing around the leader's round-trip loop.
///
/// Reports only the mean; callers wanting spread run it several times.
#[derive(Debug, Clone, Copy)]
pub struct LatencyMeter {
    round_trips: u64,
}

impl LatencyMeter {
    pub fn new(round_trips: u64) -> Result<Self> {
        if round_trips == 0 {
            return Err(PerfError::Config(
                "round trips must be greater than zero".into(),
            ));
        }
        Ok(Self { round_trips })
    }

    pub fn round_trips(&self) -> u64 {
        self.round_trips
    }

    /// Run `round_trip_loop` between two monotonic timestamps.
    pub fn time<F>(&self, round_trip_loop: F) -> Result<Duration>
    where
        F: FnOnce() -> Result<()>,
    {
        let start = Instant::now();
        round_trip_loop()?;
        Ok(start.elapsed())
    }

    /// Time `round_trip_loop` and turn the duration into a report.
    pub fn measure<F>(&self, payload_size: u32, round_trip_loop: F) -> Result<LatencyReport>
    where
        F: FnOnce() -> Result<()>,
    {
        let elapsed = self.time(round_trip_loop)?;
        Ok(LatencyReport {
            payload_size,
            round_trips: self.round_trips,
            elapsed,
            latency_us: self.one_way_latency_us(elapsed),
        })
    }

    /// Mean one-way latency: whole nanoseconds per transmission, scaled to µs.
    pub fn one_way_latency_us(&self, elapsed: Duration) -> f64 {
        let transmissions = u128::from(self.round_trips) * u128::from(TRANSMISSIONS_PER_ROUND_TRIP);
        let latency_ns = elapsed.as_nanos() / transmissions;
        latency_ns as f64 / 1000.0
    }
}
