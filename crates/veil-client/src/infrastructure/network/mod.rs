//! TCP implementation of the config channel.
//!
//! Each call opens a fresh connection, writes one framed request, reads
//! one framed response, and closes. The whole call runs under a deadline
//! (1 second unless configured otherwise) so a stalled server cannot hang
//! the caller.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use veil_core::protocol::messages::HEADER_SIZE;
use veil_core::{decode_message, encode_message, ConfigMessage};

use crate::application::fetch_config::{ChannelError, ConfigChannel};

/// Default per-call deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Connection parameters for [`TcpConfigChannel`].
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Address of the veil-configs server.
    pub server_addr: SocketAddr,
    /// Deadline covering connect, send, and receive of one call.
    pub request_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 50051)),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// A [`ConfigChannel`] over a plain TCP connection.
pub struct TcpConfigChannel {
    config: ChannelConfig,
}

impl TcpConfigChannel {
    /// Creates a channel with the given connection parameters.
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }

    /// Performs one call without the deadline; [`ConfigChannel`] wraps it.
    async fn call(&self, client_id: &str) -> Result<String, ChannelError> {
        let addr = self.config.server_addr;
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ChannelError::ConnectFailed { addr, source })?;
        debug!("connected to server at {addr}");

        let request = ConfigMessage::GetConfigRequest {
            client_id: client_id.to_string(),
        };
        let bytes = encode_message(&request)?;
        stream.write_all(&bytes).await?;

        let frame = read_frame(&mut stream).await?.ok_or(ChannelError::Closed)?;
        let (reply, _) = decode_message(&frame)?;

        match reply {
            ConfigMessage::GetConfigResponse { config_content } => Ok(config_content),
            ConfigMessage::Error { message } => Err(ChannelError::Remote(message)),
            other => Err(ChannelError::Remote(format!(
                "unexpected message from server: {:?}",
                other.message_type()
            ))),
        }
    }
}

#[async_trait]
impl ConfigChannel for TcpConfigChannel {
    async fn get_nebula_config(&self, client_id: &str) -> Result<String, ChannelError> {
        let deadline = self.config.request_timeout;
        match tokio::time::timeout(deadline, self.call(client_id)).await {
            Ok(result) => result,
            Err(_) => Err(ChannelError::Timeout(deadline)),
        }
    }
}

/// Reads one framed message (header + payload) from the stream.
///
/// Returns `Ok(None)` on a clean EOF before the header.
async fn read_frame<S>(stream: &mut S) -> std::io::Result<Option<Vec<u8>>>
where
    S: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_SIZE];
    match stream.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let payload_len = u32::from_be_bytes(header[4..8].try_into().unwrap()) as usize;

    let mut frame = header.to_vec();
    frame.resize(HEADER_SIZE + payload_len, 0);
    if payload_len > 0 {
        stream.read_exact(&mut frame[HEADER_SIZE..]).await?;
    }
    Ok(Some(frame))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
