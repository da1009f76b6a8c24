//! Round-trip latency benchmark over local datagram sockets.
//!
//! A leader and a follower process exchange synthetic messages through a
//! pair of `AF_UNIX` datagram sockets. The leader times a fixed number of
//! round trips and reports the mean one-way latency.
//!
//! Receives have no timeout: if the peer never starts or dies mid-run, the
//! waiting side blocks forever. The only way to stop a follower is the
//! termination message sent by [`Perf::Leader::terminate`].

#[cfg(not(unix))]
compile_error!("dmxp-udsperf needs Unix domain sockets");

pub mod error;

#[allow(non_snake_case)]
pub mod Core;

#[allow(non_snake_case)]
pub mod Perf;

#[allow(non_snake_case)]
pub mod Debug;

pub use error::{HeaderError, PerfError, Result};
