use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Decoding failures for the fixed-layout message header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("datagram too short for header ({len} < {needed} bytes)")]
    Truncated { len: usize, needed: usize },
}

/// Every way a benchmark run can abort.
///
/// None of these are recovered inside the library. The top-level driver
/// decides to end the process, so a run either completes or reports nothing.
#[derive(Debug, Error)]
pub enum PerfError {
    #[error("socket error: {0}")]
    Socket(#[source] io::Error),

    #[error("bind error on {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("send error to {}: {source}", path.display())]
    Send {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("send error: short datagram ({sent} of {expected} bytes)")]
    ShortSend { sent: usize, expected: usize },

    #[error("receive error: {0}")]
    Receive(#[source] io::Error),

    #[error("close error: {0}")]
    Close(#[source] io::Error),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using PerfError.
pub type Result<T> = std::result::Result<T, PerfError>;
