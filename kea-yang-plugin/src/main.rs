use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use kea_yang_plugin::config::{resolve_config, PluginConfig};
use kea_yang_plugin::control_channel::ControlChannel;
use kea_yang_plugin::report::{render_listing, render_response, render_summary};
use kea_yang_plugin::translator::ConfigTranslator;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yang_tree_core::{format_value, Datastore, PathValue, SnapshotStore, Value};

mod cli;
mod deliver_cmd;

use cli::{Cli, Command, DumpArgs, GetConfigArgs, ListCommandsArgs, SetArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::GetConfig(args) => run_get_config(args),
        Command::Dump(args) => run_dump(args),
        Command::Set(args) => run_set(args),
        Command::Push(args) => deliver_cmd::run_push(args),
        Command::Watch(args) => deliver_cmd::run_watch(args),
        Command::ListCommands(args) => run_list_commands(args),
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("kea_yang_plugin={default_level},yang_tree_core={default_level}").into()
        }))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

pub(crate) fn load_plugin_config(
    path: Option<&Path>,
    model_root: Option<&str>,
) -> Result<PluginConfig> {
    let mut config = resolve_config(path).context("failed to load plugin configuration")?;
    if let Some(root) = model_root {
        config.model_root = root.to_string();
    }
    if let Err(reason) = kea_yang_plugin::config::validate(&config) {
        bail!("invalid configuration: {reason}");
    }
    Ok(config)
}

pub(crate) fn open_snapshot(path: &Path) -> Result<SnapshotStore> {
    SnapshotStore::open(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))
}

fn run_get_config(args: GetConfigArgs) -> Result<()> {
    let config = load_plugin_config(args.config.as_deref(), args.model_root.as_deref())?;
    let mut store = open_snapshot(&args.snapshot)?;

    let translator = ConfigTranslator::new(config.model_root.clone());
    let document = translator.get_config(&mut store);
    if document.is_empty() {
        bail!(
            "no configuration found below {} in {}",
            config.model_root,
            args.snapshot.display()
        );
    }

    if args.pretty {
        let parsed: serde_json::Value = serde_json::from_str(&document)
            .context("translated document is not valid JSON")?;
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        print!("{document}");
    }
    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<()> {
    let store = open_snapshot(&args.snapshot)?;
    let values: Vec<PathValue> = store
        .get_items(&format!("{}//*", args.root))
        .with_context(|| format!("failed to list nodes below {}", args.root))?;
    if values.is_empty() {
        bail!("no data below {}", args.root);
    }

    println!("{}", render_listing(&values, args.types));
    if args.summary {
        println!();
        println!("{}", render_summary(&values));
    }
    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    let value = Value::parse(&args.type_name, &args.value)
        .with_context(|| format!("invalid value for {}", args.path))?;
    let mut store = open_snapshot(&args.snapshot)?;

    store
        .set_item(&args.path, value.clone())
        .with_context(|| format!("failed to set {}", args.path))?;
    store
        .commit()
        .with_context(|| format!("failed to write snapshot {}", args.snapshot.display()))?;

    println!("{}", format_value(&PathValue::new(args.path, value), true, true));
    Ok(())
}

fn run_list_commands(args: ListCommandsArgs) -> Result<()> {
    let mut config = load_plugin_config(args.config.as_deref(), None)?;
    if let Some(socket) = args.socket {
        config.control_channel.socket_path = socket;
    }

    let channel = ControlChannel::from_config(&config.control_channel);
    let response = channel
        .list_commands()
        .context("list-commands request failed")?;
    println!("{}", render_response(&response));
    if !response.is_success() {
        bail!("server returned result {}", response.result);
    }
    Ok(())
}
