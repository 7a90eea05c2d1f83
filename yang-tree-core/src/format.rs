//! Plain-text rendering of path/value pairs for diagnostics.

use crate::value::PathValue;

/// Format one path/value pair on a single line.
///
/// With neither flag set only the value text is returned. Interior nodes
/// have no value and print as their path (and type) alone.
pub fn format_value(pv: &PathValue, with_path: bool, with_type: bool) -> String {
    let mut out = String::new();
    if with_path {
        out.push_str(&pv.path);
    }
    if with_type {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("({})", pv.value.type_name()));
    }
    if pv.value.is_scalar() {
        if out.is_empty() {
            out.push_str(&pv.value.to_string());
        } else {
            out.push_str(&format!(" = {}", pv.value));
        }
    }
    out
}

/// Format a listing, one pair per line.
pub fn format_values(values: &[PathValue], with_path: bool, with_type: bool) -> String {
    values
        .iter()
        .map(|pv| format_value(pv, with_path, with_type))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a count summary of a listing.
pub fn format_summary(values: &[PathValue]) -> String {
    let mut interior = 0;
    let mut leaves = 0;
    let mut empty = 0;

    for pv in values {
        if pv.value.is_interior() {
            interior += 1;
        } else if pv.value.is_scalar() {
            leaves += 1;
        } else {
            empty += 1;
        }
    }

    format!("nodes={} interior={interior} leaves={leaves} empty={empty}", values.len())
}

#[cfg(test)]
mod tests {
    use super::{format_summary, format_value};
    use crate::value::{PathValue, Value};

    #[test]
    fn formats_with_and_without_decorations() {
        let pv = PathValue::new("/m:top/timer", Value::Uint8(7));
        assert_eq!(format_value(&pv, false, false), "7");
        assert_eq!(format_value(&pv, true, false), "/m:top/timer = 7");
        assert_eq!(format_value(&pv, true, true), "/m:top/timer (uint8) = 7");
        assert_eq!(format_value(&pv, false, true), "(uint8) = 7");
    }

    #[test]
    fn interior_nodes_have_no_value() {
        let pv = PathValue::new("/m:top/list[id='1']", Value::List);
        assert_eq!(format_value(&pv, true, true), "/m:top/list[id='1'] (list)");
    }

    #[test]
    fn summary_counts_node_kinds() {
        let values = vec![
            PathValue::new("/a", Value::Container),
            PathValue::new("/a/b", Value::Bool(true)),
            PathValue::new("/a/c", Value::LeafEmpty),
        ];
        assert_eq!(
            format_summary(&values),
            "nodes=3 interior=1 leaves=1 empty=1"
        );
    }
}
