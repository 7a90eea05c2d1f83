use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser::{parse_file, ParseError};
use crate::tree::DataTree;
use crate::value::{PathValue, Value};
use crate::writer::{write_file, WriteError};

/// Errors reported by datastore reads and writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No node exists at the requested path.
    #[error("no data at {path}")]
    NotFound { path: String },
    /// The path or pattern could not be parsed.
    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
    /// A write tried to descend through a leaf.
    #[error("cannot write {path}: {node} is a leaf")]
    LeafInPath { path: String, node: String },
    /// A scalar write targeted a container or list instance.
    #[error("cannot write {path}: {node} is not a leaf")]
    NotALeaf { path: String, node: String },
    /// The backing snapshot could not be loaded.
    #[error("failed to load snapshot: {0}")]
    Snapshot(#[from] ParseError),
    /// The backing snapshot could not be written.
    #[error("failed to commit snapshot: {0}")]
    Write(#[from] WriteError),
}

/// Read access to a YANG datastore.
///
/// `get_item` is a point read of one concrete path; `get_items` is a range
/// read of a pattern (`*` steps, trailing `//*`, list names without keys)
/// returning matches in store order. `refresh` brings the handle up to the
/// latest committed state before a batch of reads.
pub trait Datastore {
    fn refresh(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn get_item(&self, path: &str) -> Result<PathValue, StoreError>;

    fn get_items(&self, pattern: &str) -> Result<Vec<PathValue>, StoreError>;
}

impl Datastore for DataTree {
    fn get_item(&self, path: &str) -> Result<PathValue, StoreError> {
        self.find(path)
    }

    fn get_items(&self, pattern: &str) -> Result<Vec<PathValue>, StoreError> {
        self.select(pattern)
    }
}

/// A datastore backed by an XML snapshot file.
///
/// Every `refresh` re-reads the file, so a batch of reads issued after it
/// sees one consistent snapshot even if the file is rewritten meanwhile.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    tree: DataTree,
}

impl SnapshotStore {
    /// Load the snapshot at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let tree = parse_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tree(&self) -> &DataTree {
        &self.tree
    }

    /// Store one value in the in-memory tree; call [`SnapshotStore::commit`]
    /// to persist it.
    pub fn set_item(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        self.tree.set_item(path, value)
    }

    /// Write the in-memory tree back to the snapshot file.
    pub fn commit(&self) -> Result<(), StoreError> {
        write_file(&self.tree, &self.path)?;
        Ok(())
    }
}

impl Datastore for SnapshotStore {
    fn refresh(&mut self) -> Result<(), StoreError> {
        self.tree = parse_file(&self.path)?;
        Ok(())
    }

    fn get_item(&self, path: &str) -> Result<PathValue, StoreError> {
        self.tree.find(path)
    }

    fn get_items(&self, pattern: &str) -> Result<Vec<PathValue>, StoreError> {
        self.tree.select(pattern)
    }
}
