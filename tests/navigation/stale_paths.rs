//! The current path going stale underneath the navigator.

use crate::common::*;

#[test]
fn deleted_current_bucket_is_reported_not_found() {
    let mut nav = ephemeral_navigator();
    nav.create_container("x").unwrap();
    nav.change_directory("x").unwrap();

    // Delete through a separate write transaction
    nav.database()
        .update(|tx| tx.delete_bucket(b"x"))
        .unwrap();

    assert!(matches!(nav.list(), Err(Error::ContainerNotFound(_))));
    assert_eq!(nav.pwd(), "/ -> x");
    assert_eq!(nav.path().len(), 1);

    nav.change_directory("..").unwrap();
    assert!(nav.at_root());
    assert!(nav.list().unwrap().is_empty());
}

#[test]
fn deleted_ancestor_invalidates_every_operation() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b", "c"]);
    nav.put("k", "v").unwrap();

    let other = Navigator::new(nav.database().clone());
    other.delete_container("a").unwrap();

    assert!(matches!(nav.list(), Err(Error::ContainerNotFound(_))));
    assert!(matches!(nav.get("k"), Err(Error::ContainerNotFound(_))));
    assert!(matches!(
        nav.get_decoded("k", Codec::Uvarint),
        Err(Error::ContainerNotFound(_))
    ));
    assert!(matches!(nav.put("k", "w"), Err(Error::ContainerNotFound(_))));
    assert!(matches!(nav.put("k", ""), Err(Error::ContainerNotFound(_))));
    assert!(matches!(
        nav.create_container("d"),
        Err(Error::ContainerNotFound(_))
    ));
    assert!(matches!(
        nav.delete_container("d"),
        Err(Error::ContainerNotFound(_))
    ));
    assert!(matches!(
        nav.change_directory("d"),
        Err(Error::ContainerNotFound(_))
    ));
    assert_eq!(nav.pwd(), "/ -> a -> b -> c");
}

#[test]
fn stale_path_does_not_recreate_buckets() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b"]);
    nav.database()
        .update(|tx| tx.delete_bucket(b"a"))
        .unwrap();

    let _ = nav.put("k", "v");
    let _ = nav.create_container("c");

    let root = nav.database().begin_read();
    assert!(root.bucket(b"a").is_none());
}

#[test]
fn recreated_path_resolves_again() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b"]);
    let mut other = Navigator::new(nav.database().clone());
    other.delete_container("a").unwrap();
    assert!(nav.list().is_err());

    make_path(&mut other, &["a", "b"]);
    other.put("fresh", "1").unwrap();

    assert_eq!(
        listing(&nav),
        vec![("fresh".to_string(), EntryKind::Entry, Some("1".to_string()))]
    );
}

#[test]
fn stale_error_names_current_path() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b"]);
    nav.database()
        .update(|tx| tx.delete_bucket(b"a"))
        .unwrap();

    let err = nav.list().unwrap_err();
    assert!(err.to_string().contains("/ -> a -> b"));
}
