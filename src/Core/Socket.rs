// Local datagram channel: one unbound socket for sending to the peer,
// one socket bound to our own filesystem name for receiving.

use std::fmt;
use std::fs;
use std::io;
use std::os::fd::IntoRawFd;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use crate::error::{PerfError, Result};

/// Upper bound for a single send or receive call.
/// Larger logical messages are split into fragments by the framer.
pub const MAX_MESSAGE_SIZE: usize = 4096;

/// A pair of `AF_UNIX` / `SOCK_DGRAM` endpoints owned by one process.
///
/// The bound address is removed before binding and again on [`Channel::close`].
/// Both descriptors are released exactly once: either by an explicit `close`,
/// which reports descriptor errors, or best-effort on drop.
pub struct Channel {
    own_address: PathBuf,
    peer_address: PathBuf,
    pub(crate) sender: Option<UnixDatagram>,
    pub(crate) receiver: Option<UnixDatagram>,
}

impl Channel {
    /// Create the send socket and bind the receive socket to `own_address`.
    ///
    /// # Errors
    /// * `PerfError::Socket` if the send socket cannot be created
    /// * `PerfError::Bind` if `own_address` is held by a live socket or binding fails
    pub fn open(own_address: impl Into<PathBuf>, peer_address: impl Into<PathBuf>) -> Result<Self> {
        let own_address = own_address.into();
        let peer_address = peer_address.into();

        tracing::info!(peer = %peer_address.display(), "starting client side");
        let sender = UnixDatagram::unbound().map_err(PerfError::Socket)?;

        tracing::info!(own = %own_address.display(), "starting server side");
        remove_stale_address(&own_address)?;
        let receiver = UnixDatagram::bind(&own_address).map_err(|source| PerfError::Bind {
            path: own_address.clone(),
            source,
        })?;

        tracing::debug!(own = %own_address.display(), "channel open");

        Ok(Self {
            own_address,
            peer_address,
            sender: Some(sender),
            receiver: Some(receiver),
        })
    }

    /// Send `bytes` as one datagram to the peer address.
    pub fn send_raw(&self, bytes: &[u8]) -> Result<()> {
        let sender = self.sender.as_ref().ok_or_else(|| PerfError::Send {
            path: self.peer_address.clone(),
            source: closed_error(),
        })?;

        let sent = sender
            .send_to(bytes, &self.peer_address)
            .map_err(|source| PerfError::Send {
                path: self.peer_address.clone(),
                source,
            })?;

        if sent != bytes.len() {
            return Err(PerfError::ShortSend {
                sent,
                expected: bytes.len(),
            });
        }
        Ok(())
    }

    /// Block until one datagram arrives from any sender.
    /// Returns the number of bytes written into `buffer`.
    pub fn receive_raw(&self, buffer: &mut [u8]) -> Result<usize> {
        let receiver = self
            .receiver
            .as_ref()
            .ok_or_else(|| PerfError::Receive(closed_error()))?;
        receiver.recv(buffer).map_err(PerfError::Receive)
    }

    /// Close both descriptors and unlink the bound address.
    ///
    /// Calling `close` on an already closed channel is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let sender = self.sender.take();
        let receiver = self.receiver.take();
        if sender.is_none() && receiver.is_none() {
            return Ok(());
        }

        tracing::info!(own = %self.own_address.display(), "shutdown");

        let sender_closed = sender.map_or(Ok(()), close_descriptor);
        let receiver_closed = match receiver {
            Some(receiver) => {
                let closed = close_descriptor(receiver);
                match fs::remove_file(&self.own_address) {
                    Err(e) if e.kind() != io::ErrorKind::NotFound => tracing::warn!(
                        own = %self.own_address.display(),
                        "failed to unlink bound address: {}",
                        e
                    ),
                    _ => {}
                }
                closed
            }
            None => Ok(()),
        };

        sender_closed.and(receiver_closed)
    }

    pub fn own_address(&self) -> &Path {
        &self.own_address
    }

    pub fn peer_address(&self) -> &Path {
        &self.peer_address
    }

    pub fn is_open(&self) -> bool {
        self.sender.is_some() || self.receiver.is_some()
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("channel dropped with close failure: {}", e);
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_channel(self, f)
    }
}

/// Clear whatever sits at `path` unless a live socket still holds it.
///
/// Only a refused connect proves the name is stale: nobody is bound there,
/// or the path is not a socket at all. A successful connect, or any other
/// error such as `EPROTOTYPE` from a live stream listener, means another
/// process owns the name, and it is refused instead of being stolen.
fn remove_stale_address(path: &Path) -> Result<()> {
    if fs::symlink_metadata(path).is_err() {
        return Ok(());
    }

    let checker = UnixDatagram::unbound().map_err(PerfError::Socket)?;
    match checker.connect(path) {
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Ok(()) => return Err(address_in_use(path, "address is bound by a live socket".into())),
        Err(e) => {
            return Err(address_in_use(
                path,
                format!("address is held by a live socket ({})", e),
            ))
        }
    }

    tracing::debug!(path = %path.display(), "removing stale socket address");
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PerfError::Bind {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn address_in_use(path: &Path, reason: String) -> PerfError {
    PerfError::Bind {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::AddrInUse, reason),
    }
}

// std swallows errors from close(2) on drop, so hand the fd to libc.
fn close_descriptor(socket: UnixDatagram) -> Result<()> {
    let fd = socket.into_raw_fd();
    if unsafe { libc::close(fd) } != 0 {
        return Err(PerfError::Close(io::Error::last_os_error()));
    }
    Ok(())
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "channel is closed")
}
