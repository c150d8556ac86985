//! Minimal client for the Graphite plaintext protocol.
//!
//! One TCP connection, one `<path> <value> <timestamp>\n` line per data
//! point, no acknowledgment. Every metric path sent through a [`Client`] is
//! namespaced under the prefix the client was opened with.

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

/// Default port of the Carbon plaintext receiver.
pub const DEFAULT_PORT: u16 = 2003;

pub struct Client {
    stream: TcpStream,
    prefix: String,
}

impl Client {
    /// Connects to a Carbon receiver. `host` is either `host` or
    /// `host:port`; a bare host gets [`DEFAULT_PORT`].
    pub async fn connect(host: &str, prefix: impl Into<String>) -> Result<Self> {
        let address = if host.contains(':') {
            host.to_string()
        } else {
            format!("{host}:{DEFAULT_PORT}")
        };
        let stream = TcpStream::connect(&address)
            .await
            .with_context(|| format!("connecting to graphite at {address}"))?;
        Ok(Self {
            stream,
            prefix: prefix.into(),
        })
    }

    /// Sends a single data point. Fire-and-forget: the write is flushed but
    /// no response is read.
    pub async fn send(&mut self, path: &str, value: f64, timestamp: i64) -> Result<()> {
        let line = format_point(&self.prefix, path, value, timestamp);
        debug!(metric = %line.trim_end(), "Sending data point");
        self.stream
            .write_all(line.as_bytes())
            .await
            .context("writing data point")?;
        self.stream.flush().await.context("flushing data point")?;
        Ok(())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

fn format_point(prefix: &str, path: &str, value: f64, timestamp: i64) -> String {
    if prefix.is_empty() {
        format!("{path} {value} {timestamp}\n")
    } else {
        format!("{prefix}.{path} {value} {timestamp}\n")
    }
}
