//! Network infrastructure for the server application.
//!
//! Architecture:
//! - `ConfigServer` owns the accept loop on a TCP listener.
//! - Each accepted connection is served by its own Tokio task, so any
//!   number of requests can be in flight at once; the store is read-only
//!   and needs no locking.
//! - A connection carries sequential unary calls: read one framed request,
//!   write one framed response, until the peer closes the stream.
//!
//! The server imposes no timeout of its own; call deadlines are the
//! client's responsibility.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use veil_core::protocol::messages::HEADER_SIZE;
use veil_core::{decode_message, encode_message, ConfigMessage, ConfigStore};

use crate::application::get_config::GetConfigUseCase;

/// Errors that can occur in the server network layer.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound to the requested address.
    #[error("bind failed on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred while accepting connections.
    #[error("accept failed: {0}")]
    Accept(#[from] std::io::Error),
}

/// The config server: accepts connections and answers config requests.
pub struct ConfigServer {
    use_case: Arc<GetConfigUseCase>,
}

impl ConfigServer {
    /// Creates a server over the given store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            use_case: Arc::new(GetConfigUseCase::new(store)),
        }
    }

    /// Binds a TCP listener on `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BindFailed`] with the offending address when
    /// the bind fails.
    pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::BindFailed { addr, source })
    }

    /// Runs the accept loop until the listener fails.
    ///
    /// Each connection is handled on its own task; a failed lookup or a
    /// malformed request fails only that call, never the process.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Accept`] if accepting a connection fails.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        info!("server listening at {}", listener.local_addr()?);
        loop {
            let (stream, peer) = listener.accept().await?;
            debug!("accepted connection from {peer}");
            let use_case = Arc::clone(&self.use_case);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, use_case).await {
                    warn!("connection error from {peer}: {e}");
                }
            });
        }
    }
}

/// Serves sequential unary calls on one connection until EOF.
async fn handle_connection<S>(
    mut stream: S,
    use_case: Arc<GetConfigUseCase>,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let frame = match read_frame(&mut stream).await? {
            Some(frame) => frame,
            None => return Ok(()), // peer closed the connection
        };

        let reply = match decode_message(&frame) {
            Ok((ConfigMessage::GetConfigRequest { client_id }, _)) => use_case.handle(&client_id),
            Ok((other, _)) => {
                warn!("unexpected inbound message: {:?}", other.message_type());
                ConfigMessage::Error {
                    message: format!("unexpected message type: {:?}", other.message_type()),
                }
            }
            Err(e) => {
                warn!("failed to decode inbound message: {e}");
                ConfigMessage::Error {
                    message: format!("protocol error: {e}"),
                }
            }
        };

        let bytes = encode_message(&reply)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        stream.write_all(&bytes).await?;
    }
}

/// Reads one framed message (header + payload) from the stream.
///
/// Returns `Ok(None)` on a clean EOF before the header, which is how the
/// peer signals it is done.
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

    // Payload length is at bytes 4..8 (big-endian u32)
    let payload_len = u32::from_be_bytes(header[4..8].try_into().unwrap()) as usize;

    let mut frame = header.to_vec();
    frame.resize(HEADER_SIZE + payload_len, 0);
    if payload_len > 0 {
        stream.read_exact(&mut frame[HEADER_SIZE..]).await?;
    }
    Ok(Some(frame))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
