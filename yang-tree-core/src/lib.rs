//! Typed YANG data trees with path-addressed reads and XML snapshots.

pub mod format;
pub mod parser;
pub mod path;
pub mod store;
pub mod tree;
pub mod value;
pub mod writer;

pub use format::{format_summary, format_value, format_values};
pub use parser::{parse, parse_file, ParseError};
pub use path::PathPattern;
pub use store::{Datastore, SnapshotStore, StoreError};
pub use tree::{DataNode, DataTree};
pub use value::{PathValue, Value, ValueError};
pub use writer::{write, write_file, WriteError};
