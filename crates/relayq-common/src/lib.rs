//! Relayq Common Types and Transport
//!
//! This crate provides the protocol definitions and TCP transport layer for
//! the relayq publishing client.
//!
//! # Overview
//!
//! Relayq is a resilient publisher for a distributed message queue: broker
//! nodes are discovered through an HTTP directory service and messages are
//! published over a single live TCP connection that is transparently
//! re-established when it fails. This crate contains the pieces shared by
//! anything speaking the relayq wire format:
//!
//! - **Protocol Layer**: typed errors, the directory response envelope, and
//!   the broker wire frames
//! - **Transport Layer**: the `Transport`/`Connection` seam and the
//!   synchronous TCP implementation with JSON serialization
//!
//! # Architecture
//!
//! The broker wire format is intentionally simple:
//! - **Transport**: TCP with blocking I/O and per-operation timeouts
//! - **Serialization**: JSON
//! - **Message Format**: `[4-byte length prefix as u32 big-endian] + [JSON data]`
//! - **Max Frame Size**: 64 MB (prevents memory exhaustion)
//!
//! # Components
//!
//! - [`protocol`] - Error taxonomy, directory envelope, wire frames
//! - [`transport`] - Transport traits, TCP transport, and codec
//!
//! # Example
//!
//! ```no_run
//! use relayq_common::transport::{Connection, ConnectionConfig, TcpTransport, Transport};
//!
//! let transport = TcpTransport::new();
//! let mut conn = transport.connect("127.0.0.1", 4150, &ConnectionConfig::default()).unwrap();
//!
//! conn.ping().unwrap();
//! conn.publish("events", b"hello").unwrap();
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
