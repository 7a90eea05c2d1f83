//! Bridge between a YANG-modeled Kea DHCPv6 configuration and the Kea server.
//!
//! The server configuration lives in a YANG data tree under a single model
//! root (by default `/ietf-kea-dhcpv6:server`). Whenever it changes, the
//! tree is translated into the JSON document Kea's `Dhcp6` server reads and
//! handed to the server over its control channel.
//!
//! # Architecture
//!
//! - [`translator`]: [`translator::ConfigTranslator`], the tree-to-document
//!   translation: point and range reads against a
//!   [`yang_tree_core::Datastore`], type-directed value rendering, and
//!   assembly of the `Dhcp6` document with separators only between emitted
//!   fields
//! - [`config`]: TOML plugin configuration (model root, control socket,
//!   delivery mode)
//! - [`delivery`]: [`delivery::ConfigSink`] implementations: an external
//!   control client fed through a temporary file, or `config-set` over the
//!   control socket
//! - [`control_channel`]: synchronous Kea control-socket client
//! - [`plugin`]: init / change / cleanup lifecycle tying a translator to a
//!   sink
//! - [`watch`]: change notifications for file-backed snapshots
//! - [`report`]: terminal rendering for the CLI
//!
//! # Example
//!
//! ```
//! use kea_yang_plugin::translator::ConfigTranslator;
//! use yang_tree_core::{DataTree, Value};
//!
//! let mut tree = DataTree::new();
//! tree.set_item(
//!     "/ietf-kea-dhcpv6:server/serv-attributes/renew-timer",
//!     Value::Uint32(1000),
//! )
//! .unwrap();
//!
//! let translator = ConfigTranslator::new("/ietf-kea-dhcpv6:server");
//! let doc = translator.get_config(&mut tree);
//! assert_eq!(doc, "{\n\"Dhcp6\": {\n    \"renew-timer\": 1000\n}\n}\n");
//! ```

pub mod config;
pub mod control_channel;
pub mod delivery;
pub mod plugin;
pub mod report;
pub mod translator;
pub mod watch;
