//! Fetch-and-save: issue one config request and write the result to disk.
//!
//! The use case talks to the server through the [`ConfigChannel`] trait,
//! so tests can substitute a mock channel and the transport can be swapped
//! without touching this logic. One attempt per call; retry policy, if
//! any, belongs to the caller.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use veil_core::ProtocolError;

/// Errors produced by a [`ConfigChannel`] implementation.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A message could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The server answered the call with an error message, forwarded
    /// verbatim (e.g. the store's not-found text).
    #[error("{0}")]
    Remote(String),
    /// The deadline elapsed before a response arrived.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The connection was closed before a response arrived.
    #[error("connection closed by server")]
    Closed,
}

/// The one RPC method: resolve a client identifier to a rendered document.
///
/// Implementations own the transport and the per-call deadline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigChannel: Send + Sync {
    /// Issues one `GetNebulaConfig` call.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] on transport failure, timeout, or a
    /// call-level error from the server.
    async fn get_nebula_config(&self, client_id: &str) -> Result<String, ChannelError>;
}

/// Errors returned by [`fetch_and_save`].
///
/// The message prefixes are part of the observable contract; callers and
/// tests match on them.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The RPC failed, including a store miss surfaced as an RPC error.
    #[error("could not get nebula config: {0}")]
    Fetch(#[from] ChannelError),
    /// The document could not be written to the output file.
    #[error("failed to save config to file: {0}")]
    Save(#[from] std::io::Error),
}

/// Fetches the Nebula configuration for `client_id` and saves it to
/// `output_path`.
///
/// The document bytes are written verbatim, overwriting any existing
/// file, with mode 0644 on Unix. On fetch failure no file is written.
///
/// # Errors
///
/// Returns [`ClientError::Fetch`] if the call fails and
/// [`ClientError::Save`] if the write fails.
pub async fn fetch_and_save(
    channel: &dyn ConfigChannel,
    client_id: &str,
    output_path: &Path,
) -> Result<(), ClientError> {
    let config_content = channel.get_nebula_config(client_id).await?;
    info!("received nebula config for client {client_id}");

    tokio::fs::write(output_path, &config_content).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(output_path, std::fs::Permissions::from_mode(0o644)).await?;
    }
    info!("nebula configuration saved to {}", output_path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Unique temp path per test so parallel tests don't collide.
    fn temp_output_path() -> PathBuf {
        let n = FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "veil_fetch_test_{}_{n}.yaml",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_fetch_and_save_writes_document_byte_for_byte() {
        // Arrange
        let content = "pki:\n  ca: |-\n    line1\n    line2\ntun:\n  dev: nebula1\n";
        let mut channel = MockConfigChannel::new();
        channel
            .expect_get_nebula_config()
            .withf(|id: &str| id == "test_client")
            .times(1)
            .returning(move |_| Ok(content.to_string()));
        let path = temp_output_path();

        // Act
        fetch_and_save(&channel, "test_client", &path)
            .await
            .expect("fetch and save");

        // Assert
        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, content);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_fetch_and_save_overwrites_existing_file() {
        // Arrange – pre-existing content at the output path
        let path = temp_output_path();
        std::fs::write(&path, "stale content").unwrap();

        let mut channel = MockConfigChannel::new();
        channel
            .expect_get_nebula_config()
            .returning(|_| Ok("fresh content".to_string()));

        // Act
        fetch_and_save(&channel, "client1", &path)
            .await
            .expect("fetch and save");

        // Assert
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh content");
        std::fs::remove_file(&path).ok();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_and_save_sets_conservative_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let mut channel = MockConfigChannel::new();
        channel
            .expect_get_nebula_config()
            .returning(|_| Ok("content".to_string()));
        let path = temp_output_path();

        fetch_and_save(&channel, "client1", &path)
            .await
            .expect("fetch and save");

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_prefixed_error_and_writes_no_file() {
        // Arrange
        let mut channel = MockConfigChannel::new();
        channel.expect_get_nebula_config().returning(|_| {
            Err(ChannelError::Remote(
                "configuration not found for client ID: nonexistent_client".to_string(),
            ))
        });
        let path = temp_output_path();

        // Act
        let err = fetch_and_save(&channel, "nonexistent_client", &path)
            .await
            .expect_err("must fail");

        // Assert – exact prefix plus the server's message verbatim
        let message = err.to_string();
        assert!(message.contains("could not get nebula config"));
        assert_eq!(
            message,
            "could not get nebula config: configuration not found for client ID: nonexistent_client"
        );
        assert!(!path.exists(), "no file may be written on fetch failure");
    }

    #[tokio::test]
    async fn test_timeout_surfaces_through_the_same_fetch_path() {
        // Arrange
        let mut channel = MockConfigChannel::new();
        channel
            .expect_get_nebula_config()
            .returning(|_| Err(ChannelError::Timeout(Duration::from_secs(1))));
        let path = temp_output_path();

        // Act
        let err = fetch_and_save(&channel, "client1", &path)
            .await
            .expect_err("must fail");

        // Assert – timeouts use the generic fetch failure path
        assert!(matches!(err, ClientError::Fetch(ChannelError::Timeout(_))));
        assert!(err.to_string().starts_with("could not get nebula config: "));
    }

    #[tokio::test]
    async fn test_save_failure_returns_prefixed_error() {
        // Arrange – a directory path that cannot be created
        let mut channel = MockConfigChannel::new();
        channel
            .expect_get_nebula_config()
            .returning(|_| Ok("content".to_string()));
        let path = PathBuf::from("/nonexistent_dir_for_veil_tests/output.yaml");

        // Act
        let err = fetch_and_save(&channel, "client1", &path)
            .await
            .expect_err("must fail");

        // Assert
        assert!(matches!(err, ClientError::Save(_)));
        assert!(err.to_string().starts_with("failed to save config to file: "));
    }
}
