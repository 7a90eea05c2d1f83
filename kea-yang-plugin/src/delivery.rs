//! Delivery of rendered documents to the Kea server.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{DeliveryMode, PluginConfig};
use crate::control_channel::{ControlChannel, ControlChannelError};

/// Errors raised while handing a document to the server.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to write temporary config file {path}: {source}")]
    TempFile {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to run control client {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Channel(#[from] ControlChannelError),
    #[error("server rejected configuration (result {result}): {text}")]
    Rejected { result: i64, text: String },
}

/// Destination for rendered configuration documents.
pub trait ConfigSink {
    fn deliver(&mut self, document: &str) -> Result<(), DeliveryError>;
}

impl<K: ConfigSink + ?Sized> ConfigSink for Box<K> {
    fn deliver(&mut self, document: &str) -> Result<(), DeliveryError> {
        (**self).deliver(document)
    }
}

/// Hands the document to an external control-channel client.
///
/// The document is written to `temp_file`, the client is run as
/// `<client_binary> <socket_path> <temp_file>`, and the file is removed
/// afterwards. The client's exit status is logged, not checked.
#[derive(Debug, Clone)]
pub struct ClientProcessSink {
    client_binary: PathBuf,
    socket_path: PathBuf,
    temp_file: PathBuf,
}

impl ClientProcessSink {
    pub fn new(
        client_binary: impl Into<PathBuf>,
        socket_path: impl Into<PathBuf>,
        temp_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client_binary: client_binary.into(),
            socket_path: socket_path.into(),
            temp_file: temp_file.into(),
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(
            config.delivery.client_binary.clone(),
            config.control_channel.socket_path.clone(),
            config.delivery.temp_file.clone(),
        )
    }
}

impl ConfigSink for ClientProcessSink {
    fn deliver(&mut self, document: &str) -> Result<(), DeliveryError> {
        fs::write(&self.temp_file, document).map_err(|source| DeliveryError::TempFile {
            path: self.temp_file.display().to_string(),
            source,
        })?;

        let status = Command::new(&self.client_binary)
            .arg(&self.socket_path)
            .arg(&self.temp_file)
            .status();

        if let Err(err) = fs::remove_file(&self.temp_file) {
            warn!(
                path = %self.temp_file.display(),
                error = %err,
                "failed to remove temporary config file"
            );
        }

        let status = status.map_err(|source| DeliveryError::Spawn {
            binary: self.client_binary.display().to_string(),
            source,
        })?;
        debug!(client = %self.client_binary.display(), %status, "control client finished");
        Ok(())
    }
}

/// Pushes the document with `config-set` over the control socket.
#[derive(Debug, Clone)]
pub struct SocketSink {
    channel: ControlChannel,
}

impl SocketSink {
    pub fn new(channel: ControlChannel) -> Self {
        Self { channel }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(ControlChannel::from_config(&config.control_channel))
    }
}

impl ConfigSink for SocketSink {
    fn deliver(&mut self, document: &str) -> Result<(), DeliveryError> {
        let response = self.channel.config_set(document)?;
        if !response.is_success() {
            return Err(DeliveryError::Rejected {
                result: response.result,
                text: response.text.unwrap_or_default(),
            });
        }
        info!(
            socket = %self.channel.socket_path().display(),
            text = response.text.as_deref().unwrap_or(""),
            "configuration accepted"
        );
        Ok(())
    }
}

/// Build the sink selected by `config.delivery.mode`.
pub fn sink_from_config(config: &PluginConfig) -> Box<dyn ConfigSink> {
    match config.delivery.mode {
        DeliveryMode::Client => Box::new(ClientProcessSink::from_config(config)),
        DeliveryMode::Socket => Box::new(SocketSink::from_config(config)),
    }
}
