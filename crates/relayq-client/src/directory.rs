use std::time::Duration;

use relayq_common::protocol::error::{RelayqError, Result};
use relayq_common::protocol::NodesEnvelope;

use crate::node::NodeDescriptor;

/// Timeout for directory HTTP requests (5 seconds)
const DIRECTORY_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of candidate broker nodes.
///
/// The producer facade is generic over this trait so the rediscovery state
/// machine can run against scripted lookups in tests; [`DirectoryClient`] is
/// the production implementation.
pub trait Lookup {
    /// Returns the current set of candidate nodes, in directory order.
    fn nodes(&self) -> Result<Vec<NodeDescriptor>>;
}

/// HTTP client for the directory service.
///
/// Issues `GET http://{directory_addr}/nodes` with no query arguments and
/// maps the JSON envelope into [`NodeDescriptor`]s. There is no retry at
/// this layer; retry policy lives in the producer facade.
///
/// # Errors
///
/// - [`RelayqError::DirectoryUnreachable`]: the request failed at the
///   transport level or the HTTP status was not 200
/// - [`RelayqError::DirectoryProtocol`]: the body was not a well-formed
///   envelope, or the envelope's own `status_code` was not 200
pub struct DirectoryClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl DirectoryClient {
    /// Creates a client for the directory at `directory_addr` (host or
    /// host:port, no scheme).
    pub fn new(directory_addr: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(DIRECTORY_TIMEOUT)
            .build()
            .map_err(|e| RelayqError::DirectoryUnreachable(e.to_string()))?;

        Ok(Self {
            endpoint: format!("http://{}/nodes", directory_addr.into()),
            http,
        })
    }
}

impl Lookup for DirectoryClient {
    fn nodes(&self) -> Result<Vec<NodeDescriptor>> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .map_err(|e| RelayqError::DirectoryUnreachable(format!("GET {}: {}", self.endpoint, e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RelayqError::DirectoryUnreachable(format!(
                "GET {}: HTTP status {}",
                self.endpoint, status
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| RelayqError::DirectoryUnreachable(format!("GET {}: {}", self.endpoint, e)))?;

        parse_nodes(&body)
    }
}

/// Parses a `/nodes` response body into candidate descriptors.
///
/// One descriptor per producer entry, input order preserved.
pub(crate) fn parse_nodes(body: &[u8]) -> Result<Vec<NodeDescriptor>> {
    let envelope: NodesEnvelope = serde_json::from_slice(body)
        .map_err(|e| RelayqError::DirectoryProtocol(format!("malformed nodes response: {}", e)))?;

    if envelope.status_code != 200 {
        return Err(RelayqError::DirectoryProtocol(format!(
            "directory returned status_code {}",
            envelope.status_code
        )));
    }

    Ok(envelope
        .data
        .producers
        .into_iter()
        .map(NodeDescriptor::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one canned HTTP response on a loopback port.
    fn spawn_http_server(status_line: &'static str, body: String) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        addr
    }

    #[test]
    fn test_parse_nodes_preserves_input_order() {
        let body = r#"{
            "status_code": 200,
            "status_text": "OK",
            "data": {
                "producers": [
                    {"broadcast_address": "10.0.0.2", "tcp_port": 4151, "topics": ["b"]},
                    {"broadcast_address": "10.0.0.1", "tcp_port": 4150, "topics": ["a"]}
                ]
            }
        }"#;

        let nodes = parse_nodes(body.as_bytes()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].endpoint(), "10.0.0.2:4151");
        assert_eq!(nodes[1].endpoint(), "10.0.0.1:4150");
        assert!(nodes.iter().all(|n| n.is_available()));
    }

    #[test]
    fn test_parse_nodes_empty_producer_list() {
        let body = r#"{"status_code": 200, "status_text": "OK", "data": {"producers": []}}"#;
        assert!(parse_nodes(body.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_nodes_rejects_error_envelope() {
        let body = r#"{"status_code": 500, "status_text": "INTERNAL_ERROR", "data": {"producers": []}}"#;
        let err = parse_nodes(body.as_bytes()).unwrap_err();
        assert!(matches!(err, RelayqError::DirectoryProtocol(_)));
    }

    #[test]
    fn test_parse_nodes_rejects_malformed_json() {
        let err = parse_nodes(b"<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, RelayqError::DirectoryProtocol(_)));
    }

    #[test]
    fn test_nodes_over_http() {
        let body = r#"{"status_code":200,"status_text":"OK","data":{"producers":[{"broadcast_address":"10.0.0.1","tcp_port":4150,"topics":[]}]}}"#;
        let addr = spawn_http_server("HTTP/1.1 200 OK", body.to_string());

        let client = DirectoryClient::new(addr.to_string()).unwrap();
        let nodes = client.nodes().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].endpoint(), "10.0.0.1:4150");
    }

    #[test]
    fn test_nodes_http_error_status_is_unreachable() {
        let addr = spawn_http_server("HTTP/1.1 404 Not Found", "{}".to_string());

        let client = DirectoryClient::new(addr.to_string()).unwrap();
        let err = client.nodes().unwrap_err();
        assert!(matches!(err, RelayqError::DirectoryUnreachable(_)));
    }

    #[test]
    fn test_nodes_connection_refused_is_unreachable() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let client = DirectoryClient::new(addr.to_string()).unwrap();
        let err = client.nodes().unwrap_err();
        assert!(matches!(err, RelayqError::DirectoryUnreachable(_)));
    }
}
