//! Synchronous client for the Kea control channel (a Unix stream socket).
//!
//! Each command opens a fresh connection, writes one JSON request, half-closes
//! the write side and reads the JSON response until the server hangs up.

use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ControlChannelConfig;

/// Kea result code for a successful command.
pub const RESULT_SUCCESS: i64 = 0;

/// Errors talking to the control socket.
#[derive(Debug, Error)]
pub enum ControlChannelError {
    #[error("failed to connect to control socket {path}: {source}")]
    Connect {
        path: String,
        source: std::io::Error,
    },
    #[error("control socket I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration document is not valid JSON: {0}")]
    InvalidDocument(serde_json::Error),
    #[error("unreadable response from control socket ({source}): {raw}")]
    Decode {
        raw: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize)]
struct ControlRequest<'a> {
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    arguments: Option<serde_json::Value>,
}

/// Response to a control command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlResponse {
    pub result: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

impl ControlResponse {
    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }
}

/// Client for one Kea control socket.
#[derive(Debug, Clone)]
pub struct ControlChannel {
    socket_path: PathBuf,
    timeout: Duration,
}

impl ControlChannel {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ControlChannelConfig) -> Self {
        Self::new(config.socket_path.clone(), config.timeout())
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send one command and wait for its response.
    pub fn send_command(
        &self,
        command: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<ControlResponse, ControlChannelError> {
        let request = ControlRequest { command, arguments };
        let payload = serde_json::to_vec(&request).map_err(ControlChannelError::InvalidDocument)?;

        let mut stream =
            UnixStream::connect(&self.socket_path).map_err(|source| ControlChannelError::Connect {
                path: self.socket_path.display().to_string(),
                source,
            })?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        debug!(
            command,
            bytes = payload.len(),
            socket = %self.socket_path.display(),
            "sending control command"
        );
        stream.write_all(&payload)?;
        stream.shutdown(Shutdown::Write)?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw)?;
        debug!(command, bytes = raw.len(), "received control response");

        serde_json::from_slice(&raw).map_err(|source| ControlChannelError::Decode {
            raw: String::from_utf8_lossy(&raw).into_owned(),
            source,
        })
    }

    /// Ask the server which commands it supports.
    pub fn list_commands(&self) -> Result<ControlResponse, ControlChannelError> {
        self.send_command("list-commands", None)
    }

    /// Replace the running configuration with `document`.
    pub fn config_set(&self, document: &str) -> Result<ControlResponse, ControlChannelError> {
        let arguments: serde_json::Value =
            serde_json::from_str(document).map_err(ControlChannelError::InvalidDocument)?;
        self.send_command("config-set", Some(arguments))
    }
}
