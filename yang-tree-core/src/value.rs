use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// A typed value held by a data tree node.
///
/// Interior nodes (containers, list instances) and `empty` leaves carry no
/// scalar; only their children do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Value {
    Container,
    #[serde(rename = "presence")]
    PresenceContainer,
    List,
    #[serde(rename = "empty")]
    LeafEmpty,
    String(String),
    #[serde(rename = "boolean")]
    Bool(bool),
    #[serde(rename = "enumeration")]
    Enum(String),
    #[serde(rename = "identityref")]
    IdentityRef(String),
    #[serde(rename = "instance-identifier")]
    InstanceId(String),
    Binary(String),
    Bits(String),
    /// Canonical decimal text, so no precision is lost.
    Decimal64(String),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
}

/// Error returned when text cannot be converted into a typed [`Value`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("unknown YANG type '{0}'")]
    UnknownType(String),
    #[error("invalid {type_name} value '{text}'")]
    Invalid { type_name: String, text: String },
}

impl Value {
    /// Build a typed value from a YANG built-in type name and its text form.
    ///
    /// Interior kinds (`container`, `presence`, `list`) and `empty` ignore
    /// the text.
    pub fn parse(type_name: &str, text: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::Invalid {
            type_name: type_name.to_string(),
            text: text.to_string(),
        };
        let trimmed = text.trim();

        let value = match type_name {
            "container" => Value::Container,
            "presence" => Value::PresenceContainer,
            "list" => Value::List,
            "empty" => Value::LeafEmpty,
            "string" => Value::String(text.to_string()),
            "boolean" => match trimmed {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(invalid()),
            },
            "enumeration" => Value::Enum(trimmed.to_string()),
            "identityref" => Value::IdentityRef(trimmed.to_string()),
            "instance-identifier" => Value::InstanceId(trimmed.to_string()),
            "binary" => Value::Binary(trimmed.to_string()),
            "bits" => Value::Bits(trimmed.to_string()),
            "decimal64" => Value::Decimal64(canonical_decimal(trimmed).ok_or_else(invalid)?),
            "int8" => Value::Int8(trimmed.parse().map_err(|_| invalid())?),
            "int16" => Value::Int16(trimmed.parse().map_err(|_| invalid())?),
            "int32" => Value::Int32(trimmed.parse().map_err(|_| invalid())?),
            "int64" => Value::Int64(trimmed.parse().map_err(|_| invalid())?),
            "uint8" => Value::Uint8(trimmed.parse().map_err(|_| invalid())?),
            "uint16" => Value::Uint16(trimmed.parse().map_err(|_| invalid())?),
            "uint32" => Value::Uint32(trimmed.parse().map_err(|_| invalid())?),
            "uint64" => Value::Uint64(trimmed.parse().map_err(|_| invalid())?),
            other => return Err(ValueError::UnknownType(other.to_string())),
        };
        Ok(value)
    }

    /// YANG type name of this value, the inverse of [`Value::parse`].
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Container => "container",
            Value::PresenceContainer => "presence",
            Value::List => "list",
            Value::LeafEmpty => "empty",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Enum(_) => "enumeration",
            Value::IdentityRef(_) => "identityref",
            Value::InstanceId(_) => "instance-identifier",
            Value::Binary(_) => "binary",
            Value::Bits(_) => "bits",
            Value::Decimal64(_) => "decimal64",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Uint8(_) => "uint8",
            Value::Uint16(_) => "uint16",
            Value::Uint32(_) => "uint32",
            Value::Uint64(_) => "uint64",
        }
    }

    /// True for container and list nodes.
    pub fn is_interior(&self) -> bool {
        matches!(
            self,
            Value::Container | Value::PresenceContainer | Value::List
        )
    }

    /// True when the value carries data that can be printed.
    pub fn is_scalar(&self) -> bool {
        !self.is_interior() && !matches!(self, Value::LeafEmpty)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Container | Value::PresenceContainer | Value::List | Value::LeafEmpty => Ok(()),
            Value::String(s)
            | Value::Enum(s)
            | Value::IdentityRef(s)
            | Value::InstanceId(s)
            | Value::Binary(s)
            | Value::Bits(s)
            | Value::Decimal64(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Uint8(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Uint64(v) => write!(f, "{v}"),
        }
    }
}

/// Most fraction digits a decimal64 value can carry.
const DECIMAL64_MAX_FRACTION_DIGITS: usize = 18;

/// Validate decimal64 text (`[-+]digits[.digits]`) and return it in the
/// form JSON accepts: no `+`, no redundant leading zeros. Values outside
/// the signed 64-bit range for their fraction digits are rejected.
fn canonical_decimal(text: &str) -> Option<String> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) {
        return None;
    }
    if let Some(frac) = frac_part {
        if !all_digits(frac) || frac.len() > DECIMAL64_MAX_FRACTION_DIGITS {
            return None;
        }
    }

    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac = frac_part.unwrap_or("");
    // The scaled integer must fit an i64.
    let scaled: u128 = format!("{int_part}{frac}").parse().ok()?;
    let limit = if negative {
        i64::MIN.unsigned_abs() as u128
    } else {
        i64::MAX as u128
    };
    if scaled > limit {
        return None;
    }

    let mut out = String::new();
    if negative && scaled != 0 {
        out.push('-');
    }
    out.push_str(int_part);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    Some(out)
}

/// A node path paired with the value stored at that path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathValue {
    pub path: String,
    pub value: Value,
}

impl PathValue {
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}
