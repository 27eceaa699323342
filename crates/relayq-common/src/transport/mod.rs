//! Relayq Transport Layer
//!
//! This module provides the broker transport seam and the synchronous TCP
//! implementation used in production.
//!
//! # Architecture
//!
//! The publishing client never talks to a broker directly; it goes through
//! the [`Transport`]/[`Connection`] traits so the failover state machine can
//! be exercised against scripted transports in tests. The shipped
//! implementation is plain blocking TCP:
//!
//! - **Codec**: JSON serialization for wire frames
//! - **Wire Format**: `[4-byte length prefix as u32 big-endian] + [JSON data]`
//!
//! # Components
//!
//! - **[`Transport`]** / **[`Connection`]**: the seam the producer facade is
//!   generic over
//! - **[`ConnectionConfig`]**: per-connection timeouts
//! - **[`TcpTransport`]** / **[`TcpConnection`]**: the synchronous TCP
//!   implementation
//! - **[`JsonCodec`]**: encode/decode wire frames to JSON

pub mod codec;
pub mod tcp;

pub use codec::JsonCodec;
pub use tcp::{TcpConnection, TcpTransport};

use std::time::Duration;

use crate::protocol::error::Result;

/// Per-connection transport configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Factory for broker connections.
///
/// Implementations open a transport-level connection to a single broker
/// endpoint. Establishing the connection implies nothing about broker
/// liveness; callers verify that with [`Connection::ping`].
pub trait Transport {
    type Conn: Connection;

    /// Opens a connection to `address:port` using the given configuration.
    fn connect(&self, address: &str, port: u16, config: &ConnectionConfig) -> Result<Self::Conn>;
}

/// A live connection to one broker.
pub trait Connection {
    /// Performs a liveness round-trip.
    fn ping(&mut self) -> Result<()>;

    /// Publishes a payload to the given topic.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()>;

    /// Closes the underlying transport. Errors during shutdown are ignored;
    /// the connection must not be used afterward.
    fn close(&mut self);
}
