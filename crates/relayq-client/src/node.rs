use relayq_common::protocol::ProducerEntry;

/// A candidate broker node from the last directory query.
///
/// The `available`/`in_use` flags are local annotations owned by the
/// producer facade: they track probe outcomes within the lifetime of one
/// candidate list and are never sent anywhere. The whole list is replaced
/// wholesale on the next successful directory query.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub address: String,
    pub port: u16,
    pub topics: Vec<String>,
    pub(crate) available: bool,
    pub(crate) in_use: bool,
}

impl NodeDescriptor {
    /// The node's endpoint as `address:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// False once a probe against this node has failed.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// True while the cached connection originates from this node.
    pub fn is_in_use(&self) -> bool {
        self.in_use
    }
}

impl From<ProducerEntry> for NodeDescriptor {
    fn from(entry: ProducerEntry) -> Self {
        NodeDescriptor {
            address: entry.broadcast_address,
            port: entry.tcp_port,
            topics: entry.topics,
            available: true,
            in_use: false,
        }
    }
}
