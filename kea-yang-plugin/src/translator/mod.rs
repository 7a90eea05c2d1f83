//! Translation of the Kea DHCPv6 YANG subtree into Kea's JSON configuration.
//!
//! The translator walks a fixed set of paths below the model root and
//! renders the document Kea's `Dhcp6` server reads:
//!
//! ```text
//! {
//! "Dhcp6": {
//!     "control-socket": { "socket-type": "unix", "socket-name": "/tmp/kea.sock" },
//!     "interfaces-config": { "interfaces": [ "eth0" ] },
//!     "renew-timer": 1000,
//!     "rebind-timer": 2000,
//!     "preferred-lifetime": 3000,
//!     "valid-lifetime": 4000,
//!     "subnet6": [
//!         {
//!             "subnet": "2001:db8::/32",
//!             "pools": [
//!                 { "pool": "2001:db8::10-2001:db8::20" }
//!             ]
//!         }
//!     ]
//! }
//! }
//! ```
//!
//! Keys are emitted in that fixed order. A value missing from the tree is
//! left out together with its key, and separators are only placed between
//! fields that were actually emitted, so the result always parses. Empty
//! `subnet6` and `pools` lists are left out entirely.
//!
//! Read failures other than "not found" are logged and handled like a
//! missing value. Only an unreachable model root aborts the translation,
//! which then yields an empty string.

use tracing::{debug, error, trace, warn};
use yang_tree_core::{format_value, Datastore, PathValue, StoreError, Value};

mod render;


pub use render::render_value;
use render::{quote, render_string_field, tabs};

const SOCKET_TYPE: &str = "serv-attributes/control-socket/socket-type";
const SOCKET_NAME: &str = "serv-attributes/control-socket/socket-name";
const INTERFACES: &str = "serv-attributes/interfaces-config/interfaces";
const SUBNETS: &str = "network-ranges/subnet6";

/// Timer leaves below `serv-attributes`, in output order.
const TIMERS: [&str; 4] = [
    "renew-timer",
    "rebind-timer",
    "preferred-lifetime",
    "valid-lifetime",
];

/// Renders the Kea `Dhcp6` configuration from a YANG datastore.
///
/// The translator holds no state besides the model root; every call to
/// [`ConfigTranslator::get_config`] reads the store afresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTranslator {
    model_root: String,
}

impl ConfigTranslator {
    pub fn new(model_root: impl Into<String>) -> Self {
        Self {
            model_root: model_root.into(),
        }
    }

    pub fn model_root(&self) -> &str {
        &self.model_root
    }

    fn under_root(&self, relative: &str) -> String {
        format!("{}/{relative}", self.model_root)
    }

    /// Point read of one value; `None` when the path does not resolve.
    pub fn read_scalar<S: Datastore + ?Sized>(&self, store: &S, path: &str) -> Option<Value> {
        match store.get_item(path) {
            Ok(pv) => {
                trace!(value = %format_value(&pv, true, true), "read");
                Some(pv.value)
            }
            Err(StoreError::NotFound { .. }) => {
                debug!(path, "no value");
                None
            }
            Err(err) => {
                warn!(path, error = %err, "read failed, omitting field");
                None
            }
        }
    }

    /// Range read of a pattern in store order; empty when nothing matches
    /// or the read fails.
    pub fn read_list<S: Datastore + ?Sized>(&self, store: &S, pattern: &str) -> Vec<PathValue> {
        match store.get_items(pattern) {
            Ok(values) => {
                debug!(pattern, count = values.len(), "listed");
                values
            }
            Err(err) => {
                warn!(pattern, error = %err, "list read failed, omitting list");
                Vec::new()
            }
        }
    }

    /// `{ "pool": "<prefix>" }`, or `None` without a pool prefix.
    pub fn render_pool<S: Datastore + ?Sized>(
        &self,
        store: &S,
        pool_path: &str,
        indent: usize,
    ) -> Option<String> {
        let prefix = self.read_scalar(store, &format!("{pool_path}/pool-prefix"))?;
        let prefix = render_string_field(&prefix)?;
        Some(format!("{}{{ \"pool\": {prefix} }}", tabs(indent)))
    }

    /// `"pools": [ ... ]` for the pools of one subnet, or `None` when the
    /// subnet has no pool entries.
    pub fn render_pools<S: Datastore + ?Sized>(
        &self,
        store: &S,
        subnet_path: &str,
        indent: usize,
    ) -> Option<String> {
        let pools = self.read_list(store, &format!("{subnet_path}/pools/*"));
        if pools.is_empty() {
            return None;
        }

        let rendered: Vec<String> = pools
            .iter()
            .filter_map(|pool| self.render_pool(store, &pool.path, indent + 1))
            .collect();
        if rendered.is_empty() {
            return Some(format!("{}\"pools\": [ ]", tabs(indent)));
        }

        Some(format!(
            "{t}\"pools\": [\n{}\n{t}]",
            rendered.join(",\n"),
            t = tabs(indent)
        ))
    }

    /// One subnet object. The braces are always emitted, even when neither
    /// the prefix nor any pool is present.
    pub fn render_subnet<S: Datastore + ?Sized>(
        &self,
        store: &S,
        subnet_path: &str,
        indent: usize,
    ) -> String {
        debug!(subnet = subnet_path, "rendering subnet");
        let mut fields = Vec::new();

        if let Some(prefix) = self
            .read_scalar(store, &format!("{subnet_path}/subnet"))
            .and_then(|v| render_string_field(&v))
        {
            fields.push(format!("{}\"subnet\": {prefix}", tabs(indent + 1)));
        }
        fields.extend(self.render_pools(store, subnet_path, indent + 1));

        let t = tabs(indent);
        if fields.is_empty() {
            return format!("{t}{{ }}");
        }
        format!("{t}{{\n{}\n{t}}}", fields.join(",\n"))
    }

    /// `"subnet6": [ ... ]` with one object per list instance matching
    /// `list_path`, or `None` when there are none.
    pub fn render_subnets<S: Datastore + ?Sized>(
        &self,
        store: &S,
        list_path: &str,
        indent: usize,
    ) -> Option<String> {
        let subnets = self.read_list(store, list_path);
        if subnets.is_empty() {
            return None;
        }

        let rendered: Vec<String> = subnets
            .iter()
            .map(|subnet| self.render_subnet(store, &subnet.path, indent + 1))
            .collect();

        Some(format!(
            "{t}\"subnet6\": [\n{}\n{t}]",
            rendered.join(",\n"),
            t = tabs(indent)
        ))
    }

    fn render_control_socket<S: Datastore + ?Sized>(
        &self,
        store: &S,
        indent: usize,
    ) -> Option<String> {
        let members: Vec<String> = [("socket-type", SOCKET_TYPE), ("socket-name", SOCKET_NAME)]
            .into_iter()
            .filter_map(|(key, relative)| {
                let value = self.read_scalar(store, &self.under_root(relative))?;
                Some(format!("{}: {}", quote(key), render_string_field(&value)?))
            })
            .collect();
        if members.is_empty() {
            return None;
        }
        Some(format!(
            "{}\"control-socket\": {{ {} }}",
            tabs(indent),
            members.join(", ")
        ))
    }

    /// Only the first configured interface is carried over.
    fn render_interfaces<S: Datastore + ?Sized>(
        &self,
        store: &S,
        indent: usize,
    ) -> Option<String> {
        let name = self.read_scalar(store, &self.under_root(INTERFACES))?;
        let name = render_string_field(&name)?;
        Some(format!(
            "{}\"interfaces-config\": {{ \"interfaces\": [ {name} ] }}",
            tabs(indent)
        ))
    }

    fn render_timer<S: Datastore + ?Sized>(
        &self,
        store: &S,
        timer: &str,
        indent: usize,
    ) -> Option<String> {
        let path = self.under_root(&format!("serv-attributes/{timer}"));
        let value = self.read_scalar(store, &path)?;
        Some(format!(
            "{}{}: {}",
            tabs(indent),
            quote(timer),
            render_value(&value)?
        ))
    }

    /// Render the whole `Dhcp6` document from the current store state.
    ///
    /// Returns an empty string when the store cannot be refreshed or holds
    /// no data below the model root.
    pub fn get_config<S: Datastore + ?Sized>(&self, store: &mut S) -> String {
        if let Err(err) = store.refresh() {
            error!(root = %self.model_root, error = %err, "failed to refresh datastore");
            return String::new();
        }
        let store: &S = store;

        match store.get_items(&format!("{}//*", self.model_root)) {
            Ok(nodes) if !nodes.is_empty() => {
                debug!(root = %self.model_root, nodes = nodes.len(), "model root present");
            }
            Ok(_) => {
                error!(root = %self.model_root, "model root holds no data");
                return String::new();
            }
            Err(err) => {
                error!(root = %self.model_root, error = %err, "model root unavailable");
                return String::new();
            }
        }

        let mut fields = Vec::new();
        fields.extend(self.render_control_socket(store, 1));
        fields.extend(self.render_interfaces(store, 1));
        for timer in TIMERS {
            fields.extend(self.render_timer(store, timer, 1));
        }
        fields.extend(self.render_subnets(store, &self.under_root(SUBNETS), 1));

        let mut doc = String::from("{\n\"Dhcp6\": {\n");
        if !fields.is_empty() {
            doc.push_str(&fields.join(",\n"));
            doc.push('\n');
        }
        doc.push_str("}\n}\n");
        doc
    }
}
