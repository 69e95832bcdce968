//! Snapshot reads against serialized writers.

use std::sync::{Arc, Barrier};
use std::thread;

use crate::common::*;

#[test]
fn snapshot_ignores_later_commits() {
    let db = Arc::new(Database::ephemeral());
    let mut nav = Navigator::new(db.clone());
    make_path(&mut nav, &["a"]);
    nav.put("k", "before").unwrap();

    let snapshot = db.begin_read();
    nav.put("k", "after").unwrap();
    nav.create_container("new").unwrap();

    let a = snapshot.bucket(b"a").unwrap();
    assert_eq!(a.get(b"k"), Some(&b"before"[..]));
    assert!(a.bucket(b"new").is_none());
    assert_eq!(nav.get("k").unwrap(), b"after");
}

#[test]
fn snapshot_survives_deletion_of_its_buckets() {
    let db = Arc::new(Database::ephemeral());
    let mut nav = Navigator::new(db.clone());
    make_path(&mut nav, &["a", "b"]);
    nav.put("k", "v").unwrap();

    let snapshot = db.begin_read();
    nav.change_directory("/").unwrap();
    nav.delete_container("a").unwrap();

    let b = snapshot.bucket(b"a").and_then(|a| a.bucket(b"b")).unwrap();
    assert_eq!(b.get(b"k"), Some(&b"v"[..]));
    assert!(db.begin_read().bucket(b"a").is_none());
}

#[test]
fn concurrent_navigators_lose_no_writes() {
    let db = Arc::new(Database::ephemeral());
    Navigator::new(db.clone()).create_container("shared").unwrap();

    let threads = 6;
    let per_thread = 20;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let db = db.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let mut nav = Navigator::new(db);
                nav.change_directory("shared").unwrap();
                barrier.wait();
                for i in 0..per_thread {
                    nav.put(format!("t{}-{}", t, i), "x").unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut nav = Navigator::new(db.clone());
    nav.change_directory("shared").unwrap();
    assert_eq!(nav.list().unwrap().len(), threads * per_thread);
    assert_eq!(db.version(), 1 + (threads * per_thread) as u64);
}

#[test]
fn readers_see_consistent_snapshots_during_writes() {
    let db = Arc::new(Database::ephemeral());
    {
        let mut nav = Navigator::new(db.clone());
        make_path(&mut nav, &["pair"]);
        nav.put("left", "0").unwrap();
        nav.put("right", "0").unwrap();
    }

    let writer = {
        let db = db.clone();
        thread::spawn(move || {
            for i in 1..=200u32 {
                db.update(|tx| {
                    let pair = tx
                        .bucket_mut(b"pair")
                        .ok_or_else(|| StoreError::BucketNotFound("pair".into()))?;
                    pair.put(b"left", i.to_string().into_bytes())?;
                    pair.put(b"right", i.to_string().into_bytes())?;
                    Ok::<_, StoreError>(())
                })
                .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let tx = db.begin_read();
                    let pair = tx.bucket(b"pair").unwrap();
                    assert_eq!(pair.get(b"left"), pair.get(b"right"));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
}

#[test]
fn write_in_flight_is_invisible_to_readers() {
    let db = Database::ephemeral();
    let mut tx = db.begin_write().unwrap();
    tx.create_bucket(b"pending").unwrap();

    assert!(db.begin_read().bucket(b"pending").is_none());
    tx.commit().unwrap();
    assert!(db.begin_read().bucket(b"pending").is_some());
}
