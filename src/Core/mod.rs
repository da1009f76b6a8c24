pub mod Socket;

pub use Socket::{Channel, MAX_MESSAGE_SIZE};
