//! Path stack movement: cd, pwd, and moving past the root.

use crate::common::*;

#[test]
fn fresh_navigator_is_at_root() {
    let nav = ephemeral_navigator();
    assert!(nav.at_root());
    assert_eq!(nav.pwd(), "/");
}

#[test]
fn navigation_round_trip_returns_to_root() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b", "c"]);
    assert_eq!(nav.pwd(), "/ -> a -> b -> c");

    nav.change_directory("..").unwrap();
    nav.change_directory("..").unwrap();
    nav.change_directory("..").unwrap();
    assert!(nav.path().is_empty());
    assert_eq!(nav.pwd(), "/");
}

#[test]
fn slash_clears_from_any_depth() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a", "b", "c"]);
    assert_eq!(nav.change_directory("/").unwrap(), "/");
    assert!(nav.at_root());
}

#[test]
fn moving_up_from_root_stays_at_root() {
    let mut nav = ephemeral_navigator();
    for _ in 0..3 {
        assert_eq!(nav.change_directory("..").unwrap(), "/");
    }
}

#[test]
fn cd_into_missing_bucket_leaves_path_unchanged() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a"]);
    let err = nav.change_directory("ghost").unwrap_err();
    assert!(matches!(err, Error::ContainerNotFound(_)));
    assert_eq!(nav.pwd(), "/ -> a");
}

#[test]
fn cd_into_entry_is_not_a_bucket() {
    let mut nav = ephemeral_navigator();
    make_path(&mut nav, &["a"]);
    nav.put("k", "v").unwrap();
    assert!(matches!(
        nav.change_directory("k"),
        Err(Error::ContainerNotFound(_))
    ));
    assert_eq!(nav.pwd(), "/ -> a");
}

#[test]
fn names_with_separators_are_single_segments() {
    let mut nav = ephemeral_navigator();
    nav.create_container("a/b").unwrap();
    nav.change_directory("a/b").unwrap();
    assert_eq!(nav.path().len(), 1);
    assert_eq!(nav.pwd(), "/ -> a/b");
}

#[test]
fn navigators_over_one_store_are_independent() {
    let mut first = ephemeral_navigator();
    make_path(&mut first, &["a"]);
    let mut second = Navigator::new(first.database().clone());

    assert!(second.at_root());
    second.change_directory("a").unwrap();
    first.change_directory("/").unwrap();

    assert_eq!(second.pwd(), "/ -> a");
    assert_eq!(first.pwd(), "/");
}
