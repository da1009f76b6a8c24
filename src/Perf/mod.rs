pub mod builder;
pub mod follower;
pub mod framer;
pub mod leader;
pub mod meter;

pub use builder::{PerfBuilder, PerfConfig, FOLLOWER_SOCKET_PATH, LEADER_SOCKET_PATH};
pub use follower::{Follower, FollowerState};
pub use framer::{fragment_count, Framer};
pub use leader::Leader;
pub use meter::{LatencyMeter, LatencyReport, TRANSMISSIONS_PER_ROUND_TRIP};

pub mod Structs {
    pub mod Header_Structs;
    pub use Header_Structs::{PerfTopic, HEADER_SIZE}; // re-export for stable path
}
