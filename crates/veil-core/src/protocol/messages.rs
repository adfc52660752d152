//! All veil-configs protocol message types.
//!
//! The protocol is a strictly one-shot unary exchange: the client sends one
//! `GetConfigRequest` and receives either a `GetConfigResponse` or an
//! `Error`. There is no request id, pagination, or streaming.

// ── Protocol constants ────────────────────────────────────────────────────────

/// Current protocol version byte.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Total size of the common message header in bytes.
pub const HEADER_SIZE: usize = 8;

// ── Message type codes ────────────────────────────────────────────────────────

/// All message type codes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    GetConfigRequest = 0x01,
    GetConfigResponse = 0x02,
    Error = 0x03,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x01 => Ok(MessageType::GetConfigRequest),
            0x02 => Ok(MessageType::GetConfigResponse),
            0x03 => Ok(MessageType::Error),
            _ => Err(()),
        }
    }
}

// ── Top-level message enum ────────────────────────────────────────────────────

/// All valid veil-configs messages, discriminated by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigMessage {
    /// GET_CONFIG_REQUEST (0x01): sent by the client to request a document.
    GetConfigRequest {
        /// Opaque client identifier selecting which document to serve.
        client_id: String,
    },
    /// GET_CONFIG_RESPONSE (0x02): the full serialized document as one blob.
    GetConfigResponse {
        /// Rendered YAML config document.
        config_content: String,
    },
    /// ERROR (0x03): call-level failure carrying a human-readable message.
    ///
    /// Callers distinguish failure only by the presence of this message,
    /// not by a structured error code.
    Error { message: String },
}

impl ConfigMessage {
    /// Returns the [`MessageType`] discriminant for this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            ConfigMessage::GetConfigRequest { .. } => MessageType::GetConfigRequest,
            ConfigMessage::GetConfigResponse { .. } => MessageType::GetConfigResponse,
            ConfigMessage::Error { .. } => MessageType::Error,
        }
    }
}
