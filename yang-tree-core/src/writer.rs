use std::fs;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::parser::{DATA_WRAPPER, TYPE_ATTR};
use crate::tree::{DataNode, DataTree};
use crate::value::Value;

/// Errors that can occur while writing an XML snapshot from a [`DataTree`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write snapshot file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a [`DataTree`] into snapshot XML bytes.
///
/// A single root is written as the document element; several roots are
/// wrapped in `<data>`.
pub fn write(tree: &DataTree) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    if let [root] = tree.roots.as_slice() {
        write_node(&mut writer, root)?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(DATA_WRAPPER)))?;
        for root in &tree.roots {
            write_node(&mut writer, root)?;
        }
        writer.write_event(Event::End(BytesEnd::new(DATA_WRAPPER)))?;
    }

    Ok(writer.into_inner())
}

/// Serialize a [`DataTree`] and write it to `path`.
pub fn write_file(tree: &DataTree, path: &Path) -> Result<(), WriteError> {
    let bytes = write(tree)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// The `type` attribute a node needs to parse back to the same value.
fn type_attr(node: &DataNode) -> Option<&'static str> {
    match &node.value {
        Value::String(_) => None,
        Value::Container if !node.children.is_empty() => None,
        Value::List if !node.keys.is_empty() => None,
        other => Some(other.type_name()),
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &DataNode) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(node.name.as_str());

    for (key, value) in &node.keys {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if let Some(type_name) = type_attr(node) {
        start.push_attribute((TYPE_ATTR, type_name));
    }

    let text = node.value.is_scalar().then(|| node.value.to_string());
    let text = text.filter(|t| !t.is_empty());

    if node.children.is_empty() && text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(text) = &text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }

    for child in &node.children {
        write_node(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}
