use crate::protocol::error::Result;
use crate::protocol::{Ack, Frame};

/// JSON codec for encoding/decoding wire frames.
///
/// JSON keeps the shim debuggable with nothing more than `nc`; the framing
/// layer in [`tcp`](super::tcp) is what bounds message sizes.
///
/// # Example
///
/// ```
/// use relayq_common::transport::JsonCodec;
/// use relayq_common::protocol::Frame;
///
/// let frame = Frame::publish("events", b"hello".to_vec());
/// let encoded = JsonCodec::encode_frame(&frame).unwrap();
/// let decoded = JsonCodec::decode_frame(&encoded).unwrap();
/// assert_eq!(frame, decoded);
/// ```
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a frame to bytes.
    pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(frame)?)
    }

    /// Decode a frame from bytes.
    pub fn decode_frame(data: &[u8]) -> Result<Frame> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Encode an ack to bytes.
    pub fn encode_ack(ack: &Ack) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(ack)?)
    }

    /// Decode an ack from bytes.
    pub fn decode_ack(data: &[u8]) -> Result<Ack> {
        Ok(serde_json::from_slice(data)?)
    }
}
