pub mod directory;
pub mod error;
pub mod frame;

pub use directory::{NodesData, NodesEnvelope, ProducerEntry};
pub use error::{RelayqError, Result};
pub use frame::{Ack, Command, Frame};
