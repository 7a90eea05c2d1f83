//! Parsing of absolute data paths and read patterns.
//!
//! Supported forms:
//!
//! ```text
//! /ietf-kea-dhcpv6:server/serv-attributes/renew-timer      exact path
//! /ietf-kea-dhcpv6:server/network-ranges/subnet6           every list instance
//! /ietf-kea-dhcpv6:server/network-ranges/subnet6[id='1']   one list instance
//! /ietf-kea-dhcpv6:server/serv-attributes/control-socket/* direct children
//! /ietf-kea-dhcpv6:server//*                               all descendants
//! ```

use crate::store::StoreError;
use crate::tree::DataNode;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A named node, optionally narrowed by key predicates.
    Named {
        name: String,
        keys: Vec<(String, String)>,
    },
    /// `*`: any single node.
    Any,
}

impl Step {
    /// Pattern match: a step without predicates matches every instance.
    pub fn matches(&self, node: &DataNode) -> bool {
        match self {
            Step::Any => true,
            Step::Named { name, keys } => {
                *name == node.name
                    && keys
                        .iter()
                        .all(|(k, v)| node.keys.iter().any(|(nk, nv)| nk == k && nv == v))
            }
        }
    }

    /// Exact match: predicates must equal the node keys.
    pub fn matches_exact(&self, node: &DataNode) -> bool {
        match self {
            Step::Any => false,
            Step::Named { name, keys } => {
                *name == node.name
                    && keys.len() == node.keys.len()
                    && keys
                        .iter()
                        .all(|(k, v)| node.keys.iter().any(|(nk, nv)| nk == k && nv == v))
            }
        }
    }
}

/// A parsed path or read pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pub steps: Vec<Step>,
    /// Set by a trailing `//*`.
    pub descendants: bool,
}

impl PathPattern {
    /// Parse a pattern; wildcards are allowed.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        parse_pattern(raw)
    }

    /// Parse a concrete path; wildcards are rejected.
    pub fn parse_exact(raw: &str) -> Result<Self, StoreError> {
        let pattern = parse_pattern(raw)?;
        if pattern.descendants || pattern.steps.iter().any(|s| *s == Step::Any) {
            return Err(invalid(raw, "wildcards are not allowed here"));
        }
        Ok(pattern)
    }

    /// True when the ancestor chain `trail` (root first) matches this pattern.
    pub fn matches(&self, trail: &[&DataNode]) -> bool {
        if self.descendants {
            trail.len() > self.steps.len()
                && self
                    .steps
                    .iter()
                    .zip(trail)
                    .all(|(step, node)| step.matches(node))
        } else {
            trail.len() == self.steps.len()
                && self
                    .steps
                    .iter()
                    .zip(trail)
                    .all(|(step, node)| step.matches(node))
        }
    }

    /// True when `trail` is exactly the node this path names.
    pub fn matches_exact(&self, trail: &[&DataNode]) -> bool {
        !self.descendants
            && trail.len() == self.steps.len()
            && self
                .steps
                .iter()
                .zip(trail)
                .all(|(step, node)| step.matches_exact(node))
    }
}

/// Render the path of a node from its ancestor chain.
pub fn render_path(trail: &[&DataNode]) -> String {
    let mut out = String::new();
    for node in trail {
        out.push('/');
        out.push_str(&node.segment());
    }
    out
}

fn invalid(path: &str, reason: &str) -> StoreError {
    StoreError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_pattern(raw: &str) -> Result<PathPattern, StoreError> {
    let Some(body) = raw.strip_prefix('/') else {
        return Err(invalid(raw, "path must be absolute"));
    };

    let (body, descendants) = match body.strip_suffix("//*") {
        Some(prefix) => (prefix, true),
        None => (body, false),
    };

    let mut steps = Vec::new();
    for segment in split_segments(raw, body)? {
        steps.push(parse_step(raw, segment)?);
    }
    if steps.is_empty() {
        return Err(invalid(raw, "path has no steps"));
    }

    Ok(PathPattern { steps, descendants })
}

/// Split on `/` outside of quoted predicate values.
fn split_segments<'a>(raw: &str, body: &'a str) -> Result<Vec<&'a str>, StoreError> {
    let mut segments = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '/') => {
                segments.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(invalid(raw, "unterminated quoted value"));
    }
    segments.push(&body[start..]);

    if segments.iter().any(|s| s.is_empty()) {
        return Err(invalid(raw, "empty path step"));
    }
    Ok(segments)
}

fn parse_step(raw: &str, segment: &str) -> Result<Step, StoreError> {
    if segment == "*" {
        return Ok(Step::Any);
    }

    let (name, mut rest) = match segment.find('[') {
        Some(pos) => (&segment[..pos], &segment[pos..]),
        None => (segment, ""),
    };
    if name.is_empty() || name.contains('*') {
        return Err(invalid(raw, "invalid node name"));
    }

    let mut keys = Vec::new();
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(invalid(raw, "unexpected text after predicate"));
        };
        let Some(eq) = inner.find('=') else {
            return Err(invalid(raw, "predicate without '='"));
        };
        let key = inner[..eq].trim();
        let after = inner[eq + 1..].trim_start();
        let Some(q) = after.chars().next().filter(|c| *c == '\'' || *c == '"') else {
            return Err(invalid(raw, "predicate value must be quoted"));
        };
        let Some(close) = after[1..].find(q) else {
            return Err(invalid(raw, "unterminated predicate value"));
        };
        let value = &after[1..1 + close];
        let tail = after[1 + close + 1..].trim_start();
        let Some(next) = tail.strip_prefix(']') else {
            return Err(invalid(raw, "unterminated predicate"));
        };
        if key.is_empty() {
            return Err(invalid(raw, "predicate without key"));
        }
        keys.push((key.to_string(), value.to_string()));
        rest = next;
    }

    Ok(Step::Named {
        name: name.to_string(),
        keys,
    })
}
