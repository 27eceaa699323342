//! Relayq Publishing Client
//!
//! A resilient publisher for a distributed message queue. Broker nodes are
//! discovered through an HTTP directory service; the client keeps a single
//! live connection and transparently rediscovers and reconnects when that
//! connection fails.
//!
//! # Overview
//!
//! The moving parts, leaves first:
//!
//! - [`DirectoryClient`]: queries the directory's `/nodes` endpoint and
//!   parses the response into candidate [`NodeDescriptor`]s
//! - [`probe`](probe::probe): connect-and-ping liveness check against one
//!   candidate
//! - connection cache: at most one live connection, revalidated before reuse
//! - [`Producer`]: the public facade orchestrating selection, bounded
//!   rediscovery, and the one-shot publish retry
//!
//! # Ownership
//!
//! The producer is a single-owner design: every method takes `&mut self`, so
//! the borrow checker enforces serialized access. Wrap it in a lock (or give
//! each worker its own producer) if concurrent publishing is needed.
//!
//! # Example
//!
//! ```no_run
//! use relayq_client::{Producer, ProducerConfig};
//!
//! let mut producer = Producer::new("127.0.0.1:4161", ProducerConfig::default()).unwrap();
//! producer.publish("events", b"hello").unwrap();
//! producer.stop();
//! ```

pub mod directory;
pub mod node;
pub mod probe;
pub mod producer;

mod cache;

pub use directory::{DirectoryClient, Lookup};
pub use node::NodeDescriptor;
pub use producer::{Producer, ProducerConfig};
