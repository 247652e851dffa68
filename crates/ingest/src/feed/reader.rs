//! Reader — owns the feed socket and yields newline-delimited raw lines.
//!
//! This is the only component holding socket state. Reconnect scheduling
//! lives in the ingestion loop together with its [`ReconnectPolicy`].
//!
//! [`ReconnectPolicy`]: crate::feed::ReconnectPolicy

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::net::TcpStream;
use tracing::info;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid feed address `{0}`")]
    InvalidAddress(String),
    #[error("Feed I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connects to the receiver's JSON port and reads raw lines from it.
pub struct FeedReader {
    addr: String,
}

impl FeedReader {
    pub fn new(url: &str) -> Result<Self, FeedError> {
        Ok(Self { addr: parse_feed_addr(url)? })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Open one connection. The returned handle delivers lines strictly in
    /// arrival order; dropping it closes the socket.
    pub async fn connect(&self) -> Result<FeedLines, FeedError> {
        info!("Connecting to feed at {}", self.addr);
        let stream = TcpStream::connect(&self.addr).await?;
        info!("Connected to feed; waiting for messages");
        Ok(FeedLines { lines: BufReader::new(stream).lines() })
    }
}

/// Line iterator over one live feed connection.
pub struct FeedLines {
    lines: Lines<BufReader<TcpStream>>,
}

impl FeedLines {
    /// Next raw line with the newline delimiter stripped.
    /// `Ok(None)` means the peer closed the connection.
    pub async fn next_line(&mut self) -> Result<Option<String>, FeedError> {
        Ok(self.lines.next_line().await?)
    }
}

/// Accept `host:port` as-is, or a `tcp://host:port` URL — the feed address
/// is configured as a URL in the surrounding deployment tooling.
pub fn parse_feed_addr(url: &str) -> Result<String, FeedError> {
    let trimmed = url.trim();
    let addr = trimmed.strip_prefix("tcp://").unwrap_or(trimmed);
    let addr = addr.strip_suffix('/').unwrap_or(addr);
    if addr.is_empty() || !addr.contains(':') {
        return Err(FeedError::InvalidAddress(url.to_string()));
    }
    Ok(addr.to_string())
}
