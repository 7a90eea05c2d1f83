use colored::Colorize;
use yang_tree_core::{format_summary, format_value, PathValue};

use crate::control_channel::ControlResponse;

/// Render a node listing for terminal output.
pub fn render_listing(values: &[PathValue], with_types: bool) -> String {
    let mut out = Vec::new();

    for pv in values {
        let line = format_value(pv, true, with_types);
        let colored = if pv.value.is_interior() {
            line.blue().to_string()
        } else if pv.value.is_scalar() {
            line.green().to_string()
        } else {
            line.yellow().to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render listing counts for terminal output.
pub fn render_summary(values: &[PathValue]) -> String {
    format_summary(values).cyan().to_string()
}

/// Render a control-channel response: the status line, then any arguments
/// as indented JSON.
pub fn render_response(response: &ControlResponse) -> String {
    let status = format!(
        "result={} text={}",
        response.result,
        response.text.as_deref().unwrap_or("-")
    );
    let mut out = vec![if response.is_success() {
        status.green().to_string()
    } else {
        status.red().to_string()
    }];

    if let Some(arguments) = &response.arguments {
        let body =
            serde_json::to_string_pretty(arguments).unwrap_or_else(|_| arguments.to_string());
        out.push(body);
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use yang_tree_core::{PathValue, Value};

    use super::{render_listing, render_response, render_summary};
    use crate::control_channel::ControlResponse;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn listing_prints_one_line_per_node() {
        plain();
        let values = vec![
            PathValue::new("/m:server", Value::Container),
            PathValue::new("/m:server/renew-timer", Value::Uint32(1000)),
        ];

        assert_eq!(
            render_listing(&values, true),
            "/m:server (container)\n/m:server/renew-timer (uint32) = 1000"
        );
        assert_eq!(
            render_listing(&values, false),
            "/m:server\n/m:server/renew-timer = 1000"
        );
    }

    #[test]
    fn summary_counts_nodes() {
        plain();
        let values = vec![
            PathValue::new("/m:server", Value::Container),
            PathValue::new("/m:server/enabled", Value::LeafEmpty),
        ];
        assert_eq!(
            render_summary(&values),
            "nodes=2 interior=1 leaves=0 empty=1"
        );
    }

    #[test]
    fn response_includes_arguments() {
        plain();
        let response = ControlResponse {
            result: 0,
            text: None,
            arguments: Some(json!(["config-set"])),
        };
        assert_eq!(
            render_response(&response),
            "result=0 text=-\n[\n  \"config-set\"\n]"
        );
    }

    #[test]
    fn failed_response_has_status_only() {
        plain();
        let response = ControlResponse {
            result: 2,
            text: Some("unknown command".to_string()),
            arguments: None,
        };
        assert_eq!(render_response(&response), "result=2 text=unknown command");
    }
}
