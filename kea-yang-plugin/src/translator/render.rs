use yang_tree_core::Value;

/// One indentation level of the generated document.
const INDENT: &str = "    ";

/// Indentation for `level` nesting levels.
pub(crate) fn tabs(level: usize) -> String {
    INDENT.repeat(level)
}

/// JSON string literal for `text`, with escaping.
pub(crate) fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Type-directed rendering of a scalar.
///
/// Strings and other free-form text are quoted, booleans render as
/// `true`/`false`, every integer width renders as decimal, and enumeration
/// and identityref values render as their bare label. Containers, lists
/// and `empty` leaves have nothing to render and return `None`; the caller
/// walks their children instead.
pub fn render_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::Container | Value::PresenceContainer | Value::List | Value::LeafEmpty => {
            return None
        }
        Value::String(s) | Value::InstanceId(s) | Value::Binary(s) | Value::Bits(s) => quote(s),
        Value::Enum(label) | Value::IdentityRef(label) => label.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Decimal64(v) => v.clone(),
        Value::Int8(v) => v.to_string(),
        Value::Int16(v) => v.to_string(),
        Value::Int32(v) => v.to_string(),
        Value::Int64(v) => v.to_string(),
        Value::Uint8(v) => u16::from(*v).to_string(),
        Value::Uint16(v) => v.to_string(),
        Value::Uint32(v) => v.to_string(),
        Value::Uint64(v) => v.to_string(),
    };
    Some(text)
}

/// Rendering for fields that Kea expects as JSON strings.
///
/// Labels of enumerations and identities are quoted here, so an enumerated
/// `socket-type` still yields a string. Other scalars keep their
/// [`render_value`] form.
pub(crate) fn render_string_field(value: &Value) -> Option<String> {
    match value {
        Value::Enum(label) | Value::IdentityRef(label) => Some(quote(label)),
        other => render_value(other),
    }
}

#[cfg(test)]
mod tests {
    use yang_tree_core::Value;

    use super::{quote, render_string_field, render_value, tabs};

    #[test]
    fn renders_each_scalar_kind() {
        assert_eq!(render_value(&Value::String("unix".into())).as_deref(), Some("\"unix\""));
        assert_eq!(render_value(&Value::Bool(true)).as_deref(), Some("true"));
        assert_eq!(render_value(&Value::Bool(false)).as_deref(), Some("false"));
        assert_eq!(render_value(&Value::Uint16(2000)).as_deref(), Some("2000"));
        assert_eq!(render_value(&Value::Uint32(4000)).as_deref(), Some("4000"));
        assert_eq!(render_value(&Value::Uint64(1 << 40)).as_deref(), Some("1099511627776"));
        assert_eq!(render_value(&Value::Int32(-3)).as_deref(), Some("-3"));
        assert_eq!(render_value(&Value::Enum("unix".into())).as_deref(), Some("unix"));
        assert_eq!(
            render_value(&Value::IdentityRef("ietf-kea:dhcpv6".into())).as_deref(),
            Some("ietf-kea:dhcpv6")
        );
    }

    #[test]
    fn uint8_renders_as_number_not_character() {
        assert_eq!(render_value(&Value::Uint8(65)).as_deref(), Some("65"));
        assert_eq!(render_value(&Value::Uint8(0)).as_deref(), Some("0"));
        assert_eq!(render_value(&Value::Uint8(255)).as_deref(), Some("255"));
    }

    #[test]
    fn interior_nodes_are_not_rendered() {
        assert_eq!(render_value(&Value::Container), None);
        assert_eq!(render_value(&Value::PresenceContainer), None);
        assert_eq!(render_value(&Value::List), None);
        assert_eq!(render_value(&Value::LeafEmpty), None);
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(quote("line\nbreak"), r#""line\nbreak""#);
    }

    #[test]
    fn string_fields_quote_enum_labels() {
        assert_eq!(
            render_string_field(&Value::Enum("unix".into())).as_deref(),
            Some("\"unix\"")
        );
        assert_eq!(render_string_field(&Value::Uint32(7)).as_deref(), Some("7"));
    }

    #[test]
    fn tabs_use_four_spaces() {
        assert_eq!(tabs(0), "");
        assert_eq!(tabs(2), "        ");
    }
}
