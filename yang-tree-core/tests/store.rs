use std::path::PathBuf;

use pretty_assertions::assert_eq;
use yang_tree_core::{parse_file, Datastore, SnapshotStore, StoreError, Value};

const ROOT: &str = "/ietf-kea-dhcpv6:server";

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn point_read_of_leaf_list_returns_first_entry() {
    let tree = parse_file(&fixture("fixtures/kea-multi.xml")).expect("parse");
    let pv = tree
        .get_item(&format!(
            "{ROOT}/serv-attributes/interfaces-config/interfaces"
        ))
        .expect("interfaces");
    assert_eq!(pv.value, Value::String("eth1".to_string()));
}

#[test]
fn point_read_miss_is_not_found() {
    let tree = parse_file(&fixture("fixtures/kea-no-subnets.xml")).expect("parse");
    let err = tree
        .get_item(&format!("{ROOT}/serv-attributes/interfaces-config/interfaces"))
        .expect_err("no interfaces configured");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn point_read_rejects_patterns() {
    let tree = parse_file(&fixture("fixtures/kea-server.xml")).expect("parse");
    let err = tree
        .get_item(&format!("{ROOT}/serv-attributes/*"))
        .expect_err("wildcard");
    assert!(matches!(err, StoreError::InvalidPath { .. }));
}

#[test]
fn range_reads_return_store_order() {
    let tree = parse_file(&fixture("fixtures/kea-multi.xml")).expect("parse");

    let subnets = tree
        .get_items(&format!("{ROOT}/network-ranges/subnet6"))
        .expect("subnets");
    let paths: Vec<_> = subnets.iter().map(|pv| pv.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            format!("{ROOT}/network-ranges/subnet6[subnet-id='1']"),
            format!("{ROOT}/network-ranges/subnet6[subnet-id='2']"),
            format!("{ROOT}/network-ranges/subnet6[subnet-id='3']"),
        ]
    );

    let pools = tree
        .get_items(&format!("{}/pools/*", subnets[0].path))
        .expect("pools");
    assert_eq!(pools.len(), 2);
    assert_eq!(
        pools[1].path,
        format!("{ROOT}/network-ranges/subnet6[subnet-id='1']/pools/pool[pool-id='2']")
    );

    let none = tree
        .get_items(&format!("{}/pools/*", subnets[1].path))
        .expect("no pools");
    assert!(none.is_empty());
}

#[test]
fn descendant_read_covers_whole_module_only() {
    let tree = parse_file(&fixture("fixtures/kea-multi.xml")).expect("parse");
    let all = tree.get_items(&format!("{ROOT}//*")).expect("all");
    assert!(all.iter().all(|pv| pv.path.starts_with(ROOT)));
    assert!(all.iter().any(|pv| pv.path.ends_with("/pool-prefix")));

    let other = tree
        .get_items("/ietf-kea-dhcpv6:missing//*")
        .expect("missing root");
    assert!(other.is_empty());
}

#[test]
fn snapshot_refresh_sees_rewritten_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("running.xml");
    std::fs::copy(fixture("fixtures/kea-server.xml"), &path).expect("copy");

    let mut store = SnapshotStore::open(&path).expect("open");
    std::fs::copy(fixture("fixtures/kea-no-subnets.xml"), &path).expect("overwrite");

    let before = store
        .get_items(&format!("{ROOT}/network-ranges/subnet6"))
        .expect("subnets");
    assert_eq!(before.len(), 1);

    store.refresh().expect("refresh");
    let after = store
        .get_items(&format!("{ROOT}/network-ranges/subnet6"))
        .expect("subnets");
    assert!(after.is_empty());
}

#[test]
fn refresh_of_broken_snapshot_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("running.xml");
    std::fs::copy(fixture("fixtures/kea-server.xml"), &path).expect("copy");
    let mut store = SnapshotStore::open(&path).expect("open");

    std::fs::write(&path, "<ietf-kea-dhcpv6:server>").expect("truncate");
    let err = store.refresh().expect_err("unclosed element");
    assert!(matches!(err, StoreError::Snapshot(_)));
}
