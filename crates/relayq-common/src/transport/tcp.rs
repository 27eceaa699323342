use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use tracing::debug;

use crate::protocol::error::{RelayqError, Result};
use crate::protocol::{Ack, Frame};
use crate::transport::codec::JsonCodec;
use crate::transport::{Connection, ConnectionConfig, Transport};

/// Maximum accepted frame size (64 MB)
const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// Synchronous TCP transport for broker connections.
///
/// This is the production [`Transport`] implementation. It provides blocking
/// I/O with per-operation timeouts taken from [`ConnectionConfig`].
///
/// # Wire Protocol
///
/// Frames are sent with a 4-byte length prefix (big-endian u32) followed by
/// the JSON-encoded data:
///
/// ```text
/// [4-byte length] [JSON data]
/// ```
///
/// # Example
///
/// ```no_run
/// use relayq_common::transport::{Connection, ConnectionConfig, TcpTransport, Transport};
///
/// let transport = TcpTransport::new();
/// let mut conn = transport.connect("127.0.0.1", 4150, &ConnectionConfig::default()).unwrap();
/// conn.ping().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    /// Creates a new TCP transport instance.
    pub fn new() -> Self {
        Self
    }

    /// Sends a frame with length prefix.
    ///
    /// Wire format: `[4-byte length as u32 big-endian] + [data]`
    pub fn send_message(stream: &mut TcpStream, data: &[u8], config: &ConnectionConfig) -> Result<()> {
        let len = data.len() as u32;

        stream
            .write_all(&len.to_be_bytes())
            .map_err(|e| map_io_error(e, "writing length prefix", config))?;
        stream
            .write_all(data)
            .map_err(|e| map_io_error(e, "writing data", config))?;
        stream
            .flush()
            .map_err(|e| map_io_error(e, "flushing stream", config))?;

        Ok(())
    }

    /// Receives a frame with length prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Reading the length prefix fails
    /// - The frame exceeds [`MAX_FRAME_SIZE`]
    /// - Reading the data fails
    pub fn receive_message(stream: &mut TcpStream, config: &ConnectionConfig) -> Result<Vec<u8>> {
        let mut len_buf = [0u8; 4];
        stream
            .read_exact(&mut len_buf)
            .map_err(|e| map_io_error(e, "reading length prefix", config))?;

        let len = u32::from_be_bytes(len_buf) as usize;

        // Validate length to prevent allocation of excessively large buffers
        if len > MAX_FRAME_SIZE {
            return Err(RelayqError::InvalidResponse(format!(
                "Frame too large: {} bytes (max {} bytes)",
                len, MAX_FRAME_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        stream
            .read_exact(&mut buf)
            .map_err(|e| map_io_error(e, "reading data", config))?;

        Ok(buf)
    }
}

impl Transport for TcpTransport {
    type Conn = TcpConnection;

    /// Connects to `address:port`.
    ///
    /// The address may resolve to multiple socket addresses; each is tried
    /// until one accepts, with read/write timeouts configured on the
    /// resulting stream.
    fn connect(&self, address: &str, port: u16, config: &ConnectionConfig) -> Result<TcpConnection> {
        let endpoint = format!("{}:{}", address, port);
        let socket_addrs = endpoint
            .to_socket_addrs()
            .map_err(|e| RelayqError::Connection(format!("Invalid address '{}': {}", endpoint, e)))?;

        let mut last_err = None;
        for socket_addr in socket_addrs {
            match TcpStream::connect_timeout(&socket_addr, config.connect_timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(config.read_timeout))
                        .map_err(|e| RelayqError::Connection(format!("Failed to set read timeout: {}", e)))?;
                    stream
                        .set_write_timeout(Some(config.write_timeout))
                        .map_err(|e| RelayqError::Connection(format!("Failed to set write timeout: {}", e)))?;

                    debug!(endpoint = %endpoint, "broker connection established");
                    return Ok(TcpConnection {
                        stream,
                        endpoint,
                        config: config.clone(),
                    });
                }
                Err(e) => {
                    last_err = Some(e);
                }
            }
        }

        Err(RelayqError::Connection(format!(
            "Failed to connect to {}: {}",
            endpoint,
            last_err.map(|e| e.to_string()).unwrap_or_else(|| "Unknown error".to_string())
        )))
    }
}

/// A live TCP connection to one broker.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    endpoint: String,
    config: ConnectionConfig,
}

impl TcpConnection {
    /// Endpoint this connection is to, as `address:port`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a frame and waits for the broker's ack.
    fn round_trip(&mut self, frame: &Frame) -> Result<Ack> {
        let encoded = JsonCodec::encode_frame(frame)?;
        TcpTransport::send_message(&mut self.stream, &encoded, &self.config)?;

        let reply = TcpTransport::receive_message(&mut self.stream, &self.config)?;
        JsonCodec::decode_ack(&reply)
    }
}

impl Connection for TcpConnection {
    fn ping(&mut self) -> Result<()> {
        let ack = self.round_trip(&Frame::ping())?;
        if ack.ok {
            Ok(())
        } else {
            Err(RelayqError::Rejected(
                ack.error.unwrap_or_else(|| "ping refused".to_string()),
            ))
        }
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        let ack = self.round_trip(&Frame::publish(topic, payload.to_vec()))?;
        if ack.ok {
            Ok(())
        } else {
            Err(RelayqError::Rejected(
                ack.error.unwrap_or_else(|| "publish refused".to_string()),
            ))
        }
    }

    fn close(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Map IO errors to appropriate RelayqError variants
///
/// Converts standard IO errors into domain-specific errors:
/// - Timeouts/would block -> `Timeout`
/// - Connection errors -> `Connection`
/// - Other IO errors -> `Io`
fn map_io_error(err: std::io::Error, context: &str, config: &ConnectionConfig) -> RelayqError {
    match err.kind() {
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
            RelayqError::Timeout(config.read_timeout.as_millis() as u64)
        }
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::NotConnected
        | std::io::ErrorKind::UnexpectedEof => {
            RelayqError::Connection(format!("{}: Connection lost", context))
        }
        _ => RelayqError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    /// Spawns a broker that acks every frame, rejecting publishes when
    /// `reject_pub` is set.
    fn spawn_broker(reject_pub: bool) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ConnectionConfig::default();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                while let Ok(data) = TcpTransport::receive_message(&mut stream, &config) {
                    let frame = JsonCodec::decode_frame(&data).unwrap();
                    let ack = match frame.command {
                        crate::protocol::Command::Pub if reject_pub => Ack::error("queue full"),
                        _ => Ack::ok(),
                    };
                    let encoded = JsonCodec::encode_ack(&ack).unwrap();
                    if TcpTransport::send_message(&mut stream, &encoded, &config).is_err() {
                        break;
                    }
                }
            }
        });

        addr
    }

    #[test]
    fn test_connect_refused_maps_to_connection_error() {
        // Bind then drop to get a port nothing is listening on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let transport = TcpTransport::new();
        let result = transport.connect("127.0.0.1", addr.port(), &ConnectionConfig::default());
        assert!(matches!(result, Err(RelayqError::Connection(_))));
    }

    #[test]
    fn test_ping_and_publish_round_trip() {
        let addr = spawn_broker(false);

        let transport = TcpTransport::new();
        let mut conn = transport
            .connect("127.0.0.1", addr.port(), &ConnectionConfig::default())
            .unwrap();

        conn.ping().unwrap();
        conn.publish("events", b"payload").unwrap();
        conn.close();
    }

    #[test]
    fn test_publish_rejection_surfaces_broker_error() {
        let addr = spawn_broker(true);

        let transport = TcpTransport::new();
        let mut conn = transport
            .connect("127.0.0.1", addr.port(), &ConnectionConfig::default())
            .unwrap();

        conn.ping().unwrap();
        let err = conn.publish("events", b"payload").unwrap_err();
        assert!(matches!(err, RelayqError::Rejected(msg) if msg == "queue full"));
    }

    #[test]
    fn test_ping_fails_after_broker_goes_away() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept one connection and drop it immediately.
        thread::spawn(move || {
            let _ = listener.accept();
        });

        let transport = TcpTransport::new();
        let mut conn = transport
            .connect("127.0.0.1", addr.port(), &ConnectionConfig::default())
            .unwrap();

        // The peer is gone, so the round-trip cannot complete.
        assert!(conn.ping().is_err());
    }

    #[test]
    fn test_oversized_frame_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ConnectionConfig::default();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                // Claim a frame far beyond the limit without sending a body.
                let len = (MAX_FRAME_SIZE as u32) + 1;
                let _ = stream.write_all(&len.to_be_bytes());
                let _ = stream.flush();
                thread::sleep(std::time::Duration::from_millis(200));
            }
        });

        let mut stream = TcpStream::connect(addr).unwrap();
        stream.set_read_timeout(Some(config.read_timeout)).unwrap();

        let err = TcpTransport::receive_message(&mut stream, &config).unwrap_err();
        assert!(matches!(err, RelayqError::InvalidResponse(_)));
    }
}
