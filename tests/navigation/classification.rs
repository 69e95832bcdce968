//! Listing: buckets vs entries, ordering, display rule.

use crate::common::*;

#[test]
fn listing_tags_buckets_and_entries() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["parent"]);
    nav.create_container("sub").unwrap();
    nav.put("k", "v").unwrap();

    assert_eq!(
        listing(&nav),
        vec![
            ("k".to_string(), EntryKind::Entry, Some("v".to_string())),
            ("sub".to_string(), EntryKind::Container, None),
        ]
    );
}

#[test]
fn root_lists_only_buckets() {
    let nav = ephemeral_navigator();
    nav.create_container("b").unwrap();
    nav.create_container("a").unwrap();

    let rows = listing(&nav);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|(_, kind, value)| *kind == EntryKind::Container && value.is_none()));
    assert_eq!(rows[0].0, "a");
    assert_eq!(rows[1].0, "b");
}

#[test]
fn listing_is_in_byte_order() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["p"]);
    for key in ["zeta", "Alpha", "beta", "10", "9"] {
        nav.put(key, "x").unwrap();
    }
    let names: Vec<String> = listing(&nav).into_iter().map(|(n, _, _)| n).collect();
    assert_eq!(names, vec!["10", "9", "Alpha", "beta", "zeta"]);
}

#[test]
fn binary_names_and_values_render_structurally() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["p"]);
    nav.put(b"ok", vec![0x1b, b'[', b'2', b'J']).unwrap();
    nav.put([0xdeu8, 0xad], "text").unwrap();

    let rows = listing(&nav);
    assert_eq!(
        rows,
        vec![
            ("ok".to_string(), EntryKind::Entry, Some("[27 91 50 74]".to_string())),
            ("[222 173]".to_string(), EntryKind::Entry, Some("text".to_string())),
        ]
    );
}

#[test]
fn listing_does_not_move() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b"]);
    nav.list().unwrap();
    assert_eq!(nav.pwd(), "/ -> a -> b");
}
