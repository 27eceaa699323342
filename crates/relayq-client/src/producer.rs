use relayq_common::protocol::error::{RelayqError, Result};
use relayq_common::transport::{Connection, ConnectionConfig, TcpTransport, Transport};
use tracing::{debug, info, warn};

use crate::cache::ConnectionCache;
use crate::directory::{DirectoryClient, Lookup};
use crate::node::NodeDescriptor;
use crate::probe::probe;

/// Producer configuration.
///
/// `max_retries` bounds the number of full discovery-and-probe cycles after
/// an initial selection failure. It does not bound per-candidate connection
/// attempts within one cycle.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Maximum number of rediscovery cycles after a failure (default 1)
    pub max_retries: usize,
    /// Transport configuration applied to every broker connection
    pub connection: ConnectionConfig,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            connection: ConnectionConfig::default(),
        }
    }
}

/// Failover publishing client.
///
/// The producer discovers broker nodes through a directory service, keeps a
/// single live connection, and transparently rediscovers and reconnects when
/// that connection fails:
///
/// 1. **Selection**: candidates are tried in directory order; the first
///    reachable node wins and its connection is cached
/// 2. **Revalidation**: the cached connection is pinged before reuse and
///    evicted when the ping fails
/// 3. **Rediscovery**: when selection fails, the candidate list is refreshed
///    from the directory for up to `max_retries` cycles
/// 4. **Publish retry**: a failed publish evicts the connection, runs one
///    more rediscovery cycle, and retries the publish exactly once, covering
///    the window where a connection goes stale between the liveness check
///    and the publish round-trip
///
/// # Ownership
///
/// Not safe for concurrent use: one logical publisher owns the producer, and
/// every method takes `&mut self` so the compiler enforces that. Selection
/// mutates candidate annotations during iteration; callers that need
/// concurrent publishing must serialize access or give each worker its own
/// producer.
///
/// # Example
///
/// ```no_run
/// use relayq_client::{Producer, ProducerConfig};
///
/// let mut producer = Producer::new("127.0.0.1:4161", ProducerConfig::default()).unwrap();
/// producer.publish("events", b"hello").unwrap();
/// producer.stop();
/// ```
pub struct Producer<T: Transport = TcpTransport, D: Lookup = DirectoryClient> {
    lookup: D,
    transport: T,
    config: ProducerConfig,
    candidates: Vec<NodeDescriptor>,
    cache: ConnectionCache<T::Conn>,
    stopped: bool,
}

impl Producer {
    /// Creates a producer against the directory at `directory_addr`.
    ///
    /// Performs the initial directory query and node selection eagerly;
    /// construction fails if the directory cannot be queried or no candidate
    /// is reachable.
    pub fn new(directory_addr: impl Into<String>, config: ProducerConfig) -> Result<Self> {
        Self::with_parts(DirectoryClient::new(directory_addr)?, TcpTransport::new(), config)
    }
}

impl<T: Transport, D: Lookup> Producer<T, D> {
    /// Creates a producer from explicit lookup and transport implementations.
    ///
    /// Same eager behavior as [`Producer::new`]; this is the seam for
    /// plugging in custom lookups or transports.
    pub fn with_parts(lookup: D, transport: T, config: ProducerConfig) -> Result<Self> {
        let candidates = lookup.nodes()?;

        let mut producer = Self {
            lookup,
            transport,
            config,
            candidates,
            cache: ConnectionCache::new(),
            stopped: false,
        };

        producer.select_connection()?;
        info!(candidates = producer.candidates.len(), "producer connected");
        Ok(producer)
    }

    /// Publishes `payload` to `topic` over the active connection.
    ///
    /// Missing or stale connections are re-established first, refreshing the
    /// candidate list from the directory for up to `max_retries` cycles. A
    /// publish failure evicts the connection, runs one more rediscovery
    /// cycle, and retries the publish exactly once.
    ///
    /// # Errors
    ///
    /// - [`RelayqError::NoAvailableNode`]: no candidate was reachable within
    ///   the retry budget, or the producer has been stopped
    /// - [`RelayqError::PublishFailed`]: the publish failed again after the
    ///   one-shot recovery
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        if self.stopped {
            return Err(RelayqError::NoAvailableNode);
        }

        self.select_with_rediscovery()?;
        let conn = self
            .cache
            .connection_mut()
            .ok_or(RelayqError::NoAvailableNode)?;

        match conn.publish(topic, payload) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(topic, error = %e, "publish failed, reconnecting for one retry");
                self.cache.evict(&mut self.candidates);

                self.select_with_rediscovery()?;
                let conn = self
                    .cache
                    .connection_mut()
                    .ok_or(RelayqError::NoAvailableNode)?;

                conn.publish(topic, payload)
                    .map_err(|e| RelayqError::PublishFailed(e.to_string()))
            }
        }
    }

    /// Closes the active connection and clears all candidate state.
    ///
    /// The producer is unusable afterward: every subsequent
    /// [`publish`](Self::publish) fails with
    /// [`RelayqError::NoAvailableNode`]. Reconstruct to resume publishing.
    pub fn stop(&mut self) {
        self.cache.clear();
        self.candidates.clear();
        self.stopped = true;
        info!("producer stopped");
    }

    /// The candidate list from the last directory query, with its local
    /// availability annotations.
    pub fn candidates(&self) -> &[NodeDescriptor] {
        &self.candidates
    }

    /// Ensures the cache holds a validated connection, trying candidates in
    /// directory order.
    ///
    /// Candidates already marked unavailable by an earlier probe are skipped
    /// (they stay in the list). A probe failure marks the candidate
    /// unavailable and the loop advances; the first success is installed.
    fn select_connection(&mut self) -> Result<()> {
        if self.cache.get(&mut self.candidates).is_some() {
            return Ok(());
        }

        if self.candidates.is_empty() {
            return Err(RelayqError::NoAvailableNode);
        }

        for i in 0..self.candidates.len() {
            if !self.candidates[i].available {
                continue;
            }

            match probe(&self.transport, &self.candidates[i], &self.config.connection) {
                Ok(conn) => {
                    debug!(endpoint = %self.candidates[i].endpoint(), "selected broker node");
                    self.cache.set(conn, i, &mut self.candidates);
                    return Ok(());
                }
                Err(e) => {
                    // Recovered locally: mark and advance to the next candidate.
                    debug!(endpoint = %self.candidates[i].endpoint(), error = %e, "probe failed");
                    self.candidates[i].available = false;
                }
            }
        }

        Err(RelayqError::NoAvailableNode)
    }

    /// Selection with bounded rediscovery.
    ///
    /// When selection over the current candidate list fails, the cache and
    /// list are dropped and up to `max_retries` discovery cycles run: query
    /// the directory, then select again. A failed directory query counts
    /// against the budget and the loop continues; a failed selection over a
    /// freshly fetched list ends the loop, since that list is already
    /// exhausted. Budget exhaustion surfaces
    /// [`RelayqError::NoAvailableNode`].
    fn select_with_rediscovery(&mut self) -> Result<()> {
        if self.select_connection().is_ok() {
            return Ok(());
        }

        self.cache.clear();
        self.candidates.clear();

        for attempt in 1..=self.config.max_retries {
            match self.lookup.nodes() {
                Ok(nodes) => self.candidates = nodes,
                Err(e) => {
                    warn!(attempt, error = %e, "directory refresh failed");
                    continue;
                }
            }

            match self.select_connection() {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, error = %e, "no reachable node in refreshed candidate list");
                    break;
                }
            }
        }

        Err(RelayqError::NoAvailableNode)
    }
}
