use relayq_common::transport::Connection;
use tracing::debug;

use crate::node::NodeDescriptor;

/// Holds at most one live broker connection plus the index of the candidate
/// it came from.
///
/// Exclusively owned by the producer facade. The candidate list lives in the
/// facade and is passed in so evictions can annotate the source descriptor.
pub(crate) struct ConnectionCache<C: Connection> {
    entry: Option<CacheEntry<C>>,
}

struct CacheEntry<C> {
    conn: C,
    node: usize,
}

impl<C: Connection> ConnectionCache<C> {
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the cached connection after revalidating it with a ping.
    ///
    /// On ping failure the entry is evicted: the transport is closed, the
    /// source descriptor is marked unavailable, and `None` is returned.
    pub fn get(&mut self, nodes: &mut [NodeDescriptor]) -> Option<&mut C> {
        let healthy = match self.entry.as_mut() {
            Some(entry) => entry.conn.ping().is_ok(),
            None => return None,
        };

        if healthy {
            self.entry.as_mut().map(|entry| &mut entry.conn)
        } else {
            debug!("cached connection failed revalidation, evicting");
            self.evict(nodes);
            None
        }
    }

    /// Installs `conn` as the current entry, closing any previous one, and
    /// marks the source descriptor in use.
    pub fn set(&mut self, conn: C, node: usize, nodes: &mut [NodeDescriptor]) {
        self.clear();
        if let Some(descriptor) = nodes.get_mut(node) {
            descriptor.in_use = true;
        }
        self.entry = Some(CacheEntry { conn, node });
    }

    /// Closes and removes the current entry, marking its source descriptor
    /// unavailable.
    pub fn evict(&mut self, nodes: &mut [NodeDescriptor]) {
        if let Some(mut entry) = self.entry.take() {
            entry.conn.close();
            if let Some(descriptor) = nodes.get_mut(entry.node) {
                descriptor.available = false;
                descriptor.in_use = false;
            }
        }
    }

    /// Closes the transport if present and resets to empty. Unlike
    /// [`evict`](Self::evict) this leaves candidate annotations untouched;
    /// used on shutdown and when the candidate list is being replaced.
    pub fn clear(&mut self) {
        if let Some(mut entry) = self.entry.take() {
            entry.conn.close();
        }
    }

    /// The cached connection, without revalidation.
    pub fn connection_mut(&mut self) -> Option<&mut C> {
        self.entry.as_mut().map(|entry| &mut entry.conn)
    }
}
