use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kea_yang_plugin::config::DeliveryMode;

#[derive(Parser, Debug)]
#[command(name = "kea-yang-plugin")]
#[command(about = "Translate YANG-modeled Kea DHCPv6 configuration and push it to Kea")]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the Kea JSON configuration rendered from a snapshot.
    GetConfig(GetConfigArgs),
    /// List every node below a root with its value.
    Dump(DumpArgs),
    /// Write one value into a snapshot.
    Set(SetArgs),
    /// Translate a snapshot once and deliver it to the server.
    Push(DeliverArgs),
    /// Deliver a snapshot, then re-deliver on every change to it.
    Watch(DeliverArgs),
    /// Ask the Kea control channel which commands it supports.
    ListCommands(ListCommandsArgs),
}

#[derive(Parser, Debug)]
pub struct GetConfigArgs {
    /// XML snapshot of the datastore.
    pub snapshot: PathBuf,
    /// Plugin configuration TOML. Built-in defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured model root.
    #[arg(long)]
    pub model_root: Option<String>,
    /// Re-indent the document.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Debug)]
pub struct DumpArgs {
    pub snapshot: PathBuf,
    /// Show the YANG type of every node.
    #[arg(long)]
    pub types: bool,
    /// Only list nodes below this path.
    #[arg(long, default_value = "/ietf-kea-dhcpv6:server")]
    pub root: String,
    /// Append node counts.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Parser, Debug)]
pub struct SetArgs {
    pub snapshot: PathBuf,
    /// Absolute data path, e.g. `/ietf-kea-dhcpv6:server/serv-attributes/renew-timer`.
    pub path: String,
    pub value: String,
    /// YANG type of the value.
    #[arg(long = "type", default_value = "string")]
    pub type_name: String,
}

#[derive(Parser, Debug)]
pub struct DeliverArgs {
    pub snapshot: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub model_root: Option<String>,
    /// Override the configured delivery mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Override the control socket path.
    #[arg(long)]
    pub socket: Option<PathBuf>,
    /// Override the control client binary (client mode).
    #[arg(long)]
    pub client_binary: Option<PathBuf>,
    /// Override the temporary document path (client mode).
    #[arg(long)]
    pub temp_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ListCommandsArgs {
    #[arg(long)]
    pub socket: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ModeArg {
    Client,
    Socket,
}

impl From<ModeArg> for DeliveryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Client => DeliveryMode::Client,
            ModeArg::Socket => DeliveryMode::Socket,
        }
    }
}
