use std::path::PathBuf;

use yang_tree_core::{parse_file, Value};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_server_snapshot() {
    let tree = parse_file(&fixture("fixtures/kea-server.xml")).expect("parse should succeed");
    assert_eq!(tree.roots.len(), 1);

    let root = &tree.roots[0];
    assert_eq!(root.name, "ietf-kea-dhcpv6:server");

    let attrs = root.get_child("serv-attributes").expect("serv-attributes");
    let socket = attrs.get_child("control-socket").expect("control-socket");
    assert_eq!(
        socket.get_child("socket-type").map(|n| &n.value),
        Some(&Value::String("unix".to_string()))
    );
    assert_eq!(
        attrs.get_child("valid-lifetime").map(|n| &n.value),
        Some(&Value::Uint32(4000))
    );
}

#[test]
fn parses_wrapped_multi_module_snapshot() {
    let tree = parse_file(&fixture("fixtures/kea-multi.xml")).expect("parse should succeed");
    let names: Vec<_> = tree.roots.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["ietf-kea-dhcpv6:server", "ietf-interfaces:interfaces"]
    );

    let ranges = tree.roots[0]
        .get_child("network-ranges")
        .expect("network-ranges");
    assert_eq!(ranges.children.len(), 3);
    assert!(ranges.children.iter().all(|s| s.value == Value::List));
}
