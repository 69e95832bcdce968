//! Writes: put/delete, bucket create/delete, root restrictions.

use crate::common::*;

#[test]
fn root_holds_no_entries() {
    let nav = ephemeral_navigator();
    assert!(matches!(nav.get("k"), Err(Error::NotPositioned)));
    assert!(matches!(
        nav.get_decoded("k", Codec::Timestamp),
        Err(Error::NotPositioned)
    ));
    assert!(matches!(nav.put("k", "v"), Err(Error::NotPositioned)));
    assert!(matches!(nav.put("k", ""), Err(Error::NotPositioned)));
    assert!(matches!(nav.delete_entry("k"), Err(Error::NotPositioned)));
}

#[test]
fn put_then_get_then_delete() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a"]);

    nav.put("k", "v").unwrap();
    assert_eq!(
        nav.get_decoded("k", Codec::Raw).unwrap(),
        DecodedValue::Raw(b"v".to_vec())
    );

    nav.put("k", "").unwrap();
    assert!(matches!(nav.get("k"), Err(Error::KeyNotFound(_))));
    assert!(matches!(nav.put("k", ""), Err(Error::KeyNotFound(_))));
}

#[test]
fn put_overwrites() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a"]);
    nav.put("k", "one").unwrap();
    nav.put("k", "two").unwrap();
    assert_eq!(nav.get("k").unwrap(), b"two");
    assert_eq!(nav.list().unwrap().len(), 1);
}

#[test]
fn create_collision_leaves_bucket_intact() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a"]);
    nav.create_container("b").unwrap();
    assert!(matches!(
        nav.create_container("b"),
        Err(Error::AlreadyExists(_))
    ));

    nav.change_directory("b").unwrap();
    assert!(nav.list().unwrap().is_empty());
}

#[test]
fn top_level_create_collision() {
    let nav = ephemeral_navigator();
    nav.create_container("a").unwrap();
    assert!(matches!(
        nav.create_container("a"),
        Err(Error::AlreadyExists(_))
    ));
    assert_eq!(nav.list().unwrap().len(), 1);
}

#[test]
fn value_and_bucket_names_do_not_mix() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a"]);
    nav.create_container("b").unwrap();
    nav.put("k", "v").unwrap();

    assert!(matches!(nav.put("b", "v"), Err(Error::Incompatible(_))));
    assert!(matches!(nav.create_container("k"), Err(Error::AlreadyExists(_))));
    assert!(matches!(
        nav.delete_container("k"),
        Err(Error::ContainerNotFound(_))
    ));
    assert!(matches!(nav.delete_entry("b"), Err(Error::Incompatible(_))));
}

#[test]
fn delete_bucket_removes_subtree() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b", "c"]);
    nav.put("deep", "value").unwrap();
    nav.change_directory("/").unwrap();

    nav.delete_container("a").unwrap();
    assert!(nav.list().unwrap().is_empty());
    assert!(matches!(
        nav.delete_container("a"),
        Err(Error::ContainerNotFound(_))
    ));

    // Recreated bucket starts empty
    nav.create_container("a").unwrap();
    nav.change_directory("a").unwrap();
    assert!(nav.list().unwrap().is_empty());
}

#[test]
fn empty_names_are_usage_errors() {
    let mut nav = ephemeral_navigator();
    assert!(matches!(nav.create_container(""), Err(Error::Usage(_))));
    assert!(matches!(nav.delete_container(""), Err(Error::Usage(_))));
    make_path(&mut nav, &["a"]);
    assert!(matches!(nav.put("", "v"), Err(Error::Usage(_))));
}

#[test]
fn failed_writes_leave_store_unchanged() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a"]);
    nav.put("k", "v").unwrap();
    let version = nav.database().version();

    let _ = nav.create_container("k");
    let _ = nav.put("missing", "");
    let _ = nav.put_encoded("n", "-1", Codec::Uvarint);
    let _ = nav.put_encoded("t", "yesterday", Codec::Timestamp);

    assert_eq!(nav.database().version(), version);
    assert_eq!(nav.list().unwrap().len(), 1);
}
