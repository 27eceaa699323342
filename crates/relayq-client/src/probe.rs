use relayq_common::protocol::error::{RelayqError, Result};
use relayq_common::transport::{Connection, ConnectionConfig, Transport};
use tracing::debug;

use crate::node::NodeDescriptor;

/// Probes one candidate node: open a connection, then verify liveness with a
/// ping round-trip.
///
/// A ping failure is treated identically to a connection failure; in both
/// cases the transport is closed and [`RelayqError::NodeUnreachable`] is
/// returned so the caller can advance to the next candidate.
pub fn probe<T: Transport>(
    transport: &T,
    node: &NodeDescriptor,
    config: &ConnectionConfig,
) -> Result<T::Conn> {
    let endpoint = node.endpoint();

    let mut conn = transport
        .connect(&node.address, node.port, config)
        .map_err(|e| RelayqError::NodeUnreachable(format!("{}: {}", endpoint, e)))?;

    if let Err(e) = conn.ping() {
        conn.close();
        return Err(RelayqError::NodeUnreachable(format!(
            "{}: ping failed: {}",
            endpoint, e
        )));
    }

    debug!(endpoint = %endpoint, "probe succeeded");
    Ok(conn)
}
