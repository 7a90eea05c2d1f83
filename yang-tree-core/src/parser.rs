use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::{DataNode, DataTree};
use crate::value::{Value, ValueError};

/// Tag of the optional wrapper element holding several module roots.
pub const DATA_WRAPPER: &str = "data";

/// Attribute selecting the YANG type of a node.
pub const TYPE_ATTR: &str = "type";

/// Errors that can occur while parsing an XML snapshot into a [`DataTree`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Input bytes were not valid UTF-8 for tag/attribute/text extraction.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to decode text entity or bytes.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Failed to read input file.
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),
    /// A leaf value did not match its declared type.
    #[error("bad value for <{element}>: {source}")]
    Value {
        element: String,
        source: ValueError,
    },
    /// Structural issue in the snapshot document.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

/// Raw element as read from XML, before YANG typing.
#[derive(Debug)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

/// Parse snapshot XML bytes into a [`DataTree`].
pub fn parse(xml: &[u8]) -> Result<DataTree, ParseError> {
    let root = parse_elements(xml)?;

    if root.tag == DATA_WRAPPER {
        let roots = root
            .children
            .into_iter()
            .map(into_data_node)
            .collect::<Result<Vec<_>, _>>()?;
        check_addressable(DATA_WRAPPER, &roots)?;
        return Ok(DataTree::from_roots(roots));
    }

    Ok(DataTree::from_roots(vec![into_data_node(root)?]))
}

/// Parse an XML snapshot file into a [`DataTree`].
pub fn parse_file(path: &Path) -> Result<DataTree, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

fn parse_elements(xml: &[u8]) -> Result<Element, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let element = build_element_start(&e, &reader)?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = build_element_start(&e, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape()?.into_owned();
                    append_text(current, text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(e.as_ref())?.to_string();
                    append_text(current, text);
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("encountered closing tag without open tag".to_string())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed(
            "unclosed element(s) at end of document".to_string(),
        ));
    }

    root.ok_or_else(|| ParseError::Malformed("no root element found".to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(ParseError::Malformed(
            "multiple top-level elements found".to_string(),
        ));
    }
    Ok(())
}

/// Text is kept verbatim; whitespace between child elements is discarded
/// later, once it is known whether the element is a leaf.
fn append_text(current: &mut Element, text: String) {
    match &mut current.text {
        Some(existing) => existing.push_str(&text),
        None => current.text = Some(text),
    }
}

fn build_element_start(
    e: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<Element, ParseError> {
    let tag = qname_to_string(e.name())?;
    let mut element = Element {
        tag,
        attributes: Vec::new(),
        children: Vec::new(),
        text: None,
    };

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}

/// Apply the snapshot typing rules to one element and its subtree.
fn into_data_node(element: Element) -> Result<DataNode, ParseError> {
    let mut type_name = None;
    let mut keys = Vec::new();
    for (name, value) in element.attributes {
        if name == "xmlns" || name.starts_with("xmlns:") {
            continue;
        }
        if name == TYPE_ATTR {
            type_name = Some(value);
        } else if value.contains('\'') && value.contains('"') {
            return Err(ParseError::Malformed(format!(
                "key {name} of <{}> contains both quote characters",
                element.tag
            )));
        } else {
            keys.push((name, value));
        }
    }

    let declared_interior = matches!(
        type_name.as_deref(),
        Some("container" | "presence" | "list")
    );
    let interior = declared_interior || !element.children.is_empty() || !keys.is_empty();

    if !interior {
        let type_name = type_name.as_deref().unwrap_or("string");
        let text = element.text.as_deref().unwrap_or("");
        let value = Value::parse(type_name, text).map_err(|source| ParseError::Value {
            element: element.tag.clone(),
            source,
        })?;
        return Ok(DataNode::new(element.tag, value));
    }

    let value = match type_name.as_deref() {
        Some("presence") => Value::PresenceContainer,
        Some("list") => Value::List,
        Some("container") => Value::Container,
        Some(other) => {
            return Err(ParseError::Malformed(format!(
                "<{}> has child elements but is typed '{other}'",
                element.tag
            )))
        }
        None if !keys.is_empty() => Value::List,
        None => Value::Container,
    };
    if element.text.as_deref().is_some_and(|text| !text.trim().is_empty()) {
        return Err(ParseError::Malformed(format!(
            "<{}> mixes text with child elements",
            element.tag
        )));
    }

    let children = element
        .children
        .into_iter()
        .map(into_data_node)
        .collect::<Result<Vec<_>, _>>()?;
    check_addressable(&element.tag, &children)?;

    Ok(DataNode {
        name: element.tag,
        keys,
        value,
        children,
    })
}

/// Interior siblings must differ in name or keys, otherwise a path cannot
/// tell them apart. Repeated leaves form a leaf-list and are allowed.
fn check_addressable(parent: &str, children: &[DataNode]) -> Result<(), ParseError> {
    for (i, node) in children.iter().enumerate() {
        if !node.value.is_interior() {
            continue;
        }
        let duplicate = children[..i].iter().any(|prev| {
            prev.value.is_interior() && prev.name == node.name && prev.keys == node.keys
        });
        if duplicate {
            return Err(ParseError::Malformed(format!(
                "<{parent}> holds several <{}> entries with the same keys",
                node.segment()
            )));
        }
    }
    Ok(())
}
