use anyhow::{bail, Context, Result};
use kea_yang_plugin::config::PluginConfig;
use kea_yang_plugin::delivery::sink_from_config;
use kea_yang_plugin::plugin::{ApplyOutcome, Plugin};
use kea_yang_plugin::watch::watch_snapshot;

use crate::cli::DeliverArgs;
use crate::{load_plugin_config, open_snapshot};

fn deliver_config(args: &DeliverArgs) -> Result<PluginConfig> {
    let mut config = load_plugin_config(args.config.as_deref(), args.model_root.as_deref())?;
    if let Some(mode) = args.mode {
        config.delivery.mode = mode.into();
    }
    if let Some(socket) = &args.socket {
        config.control_channel.socket_path = socket.clone();
    }
    if let Some(binary) = &args.client_binary {
        config.delivery.client_binary = binary.clone();
    }
    if let Some(temp_file) = &args.temp_file {
        config.delivery.temp_file = temp_file.clone();
    }
    Ok(config)
}

pub fn run_push(args: DeliverArgs) -> Result<()> {
    let config = deliver_config(&args)?;
    let mut store = open_snapshot(&args.snapshot)?;
    let mut plugin = Plugin::from_config(&config, sink_from_config(&config));

    let outcome = plugin
        .init(&mut store)
        .context("failed to deliver configuration")?;
    plugin.cleanup();

    match outcome {
        ApplyOutcome::Delivered { bytes } => {
            println!("delivered {bytes} bytes");
            Ok(())
        }
        ApplyOutcome::Skipped => bail!(
            "no configuration found below {} in {}",
            config.model_root,
            args.snapshot.display()
        ),
    }
}

pub fn run_watch(args: DeliverArgs) -> Result<()> {
    let config = deliver_config(&args)?;
    let mut store = open_snapshot(&args.snapshot)?;
    let mut plugin = Plugin::from_config(&config, sink_from_config(&config));

    // A failed first delivery is retried on the next change.
    if let Err(err) = plugin.init(&mut store) {
        tracing::warn!(error = %err, "initial delivery failed");
    }
    let watched = watch_snapshot(&mut plugin, &mut store);
    plugin.cleanup();
    watched
}
