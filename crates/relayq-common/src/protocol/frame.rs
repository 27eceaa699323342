//! Broker Wire Frames
//!
//! This module defines the request/reply messages exchanged with a broker
//! over the framed TCP transport. Two commands exist: a liveness ping and a
//! topic publish. The broker answers every frame with an [`Ack`].

use serde::{Deserialize, Serialize};

/// Broker command carried by a [`Frame`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Ping,
    Pub,
}

/// A request frame sent to a broker.
///
/// # Fields
///
/// - `command`: what the broker should do
/// - `topic`: target topic (publish only)
/// - `body`: message payload (publish only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub command: Command,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<u8>>,
}

impl Frame {
    /// Creates a liveness ping frame.
    pub fn ping() -> Self {
        Frame {
            command: Command::Ping,
            topic: None,
            body: None,
        }
    }

    /// Creates a publish frame for the given topic and payload.
    pub fn publish(topic: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Frame {
            command: Command::Pub,
            topic: Some(topic.into()),
            body: Some(body.into()),
        }
    }
}

/// A broker's reply to a [`Frame`].
///
/// # Example
///
/// ```
/// use relayq_common::protocol::frame::Ack;
///
/// let ok = Ack::ok();
/// assert!(ok.ok);
///
/// let rejected = Ack::error("unknown topic");
/// assert_eq!(rejected.error, Some("unknown topic".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    /// Whether the broker accepted the frame
    pub ok: bool,
    /// Error message (present on rejection)
    pub error: Option<String>,
}

impl Ack {
    /// Creates an accepting reply.
    pub fn ok() -> Self {
        Ack {
            ok: true,
            error: None,
        }
    }

    /// Creates a rejecting reply with the given message.
    pub fn error(error: impl Into<String>) -> Self {
        Ack {
            ok: false,
            error: Some(error.into()),
        }
    }
}
