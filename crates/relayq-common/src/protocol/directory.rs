//! Directory Service Response Envelope
//!
//! The directory service reports registered broker nodes at `GET /nodes`.
//! The response is a JSON envelope carrying its own status code alongside
//! the list of producer entries:
//!
//! ```json
//! {
//!   "status_code": 200,
//!   "status_text": "OK",
//!   "data": {
//!     "producers": [
//!       {"broadcast_address": "10.0.0.1", "tcp_port": 4150, "topics": ["events"]}
//!     ]
//!   }
//! }
//! ```
//!
//! An envelope `status_code` other than 200 is a protocol-level error even
//! when the HTTP layer reported success.

use serde::{Deserialize, Serialize};

/// One broker node as reported by the directory service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProducerEntry {
    /// Address the broker is reachable at
    pub broadcast_address: String,
    /// TCP port the broker listens on
    pub tcp_port: u16,
    /// Topics the broker currently serves
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Payload of a `/nodes` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodesData {
    #[serde(default)]
    pub producers: Vec<ProducerEntry>,
}

/// Full `/nodes` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodesEnvelope {
    pub status_code: i32,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub data: NodesData,
}

impl NodesEnvelope {
    /// Creates a 200 envelope wrapping the given producers.
    pub fn ok(producers: Vec<ProducerEntry>) -> Self {
        NodesEnvelope {
            status_code: 200,
            status_text: "OK".to_string(),
            data: NodesData { producers },
        }
    }
}
