use std::fmt;
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixDatagram;

use crate::Core::Channel;
use crate::Perf::Framer;

/// Debug function for Channel
///
/// Shows both addresses and the raw descriptors, or `<closed>` once released.
pub fn debug_channel(channel: &Channel, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Channel")
        .field("own_address", &channel.own_address())
        .field("peer_address", &channel.peer_address())
        .field("sender", &DescriptorDebug(channel.sender.as_ref()))
        .field("receiver", &DescriptorDebug(channel.receiver.as_ref()))
        .finish()
}

/// Debug function for Framer
///
/// Omits the scratch buffers; their contents are meaningless between calls.
pub fn debug_framer(framer: &Framer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Framer")
        .field("channel", &framer.channel)
        .field("max_datagram_size", &framer.max_datagram_size)
        .finish_non_exhaustive()
}

struct DescriptorDebug<'a>(Option<&'a UnixDatagram>);

impl fmt::Debug for DescriptorDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(socket) => write!(f, "fd({})", socket.as_raw_fd()),
            None => f.write_str("<closed>"),
        }
    }
}
