use crate::*;
use config::EngineOptions;
use tempfile::tempdir;

fn opts(dir: &std::path::Path, max_inmemory_size: usize) -> EngineOptions {
    EngineOptions::new(dir.join("sst")).with_max_inmemory_size(max_inmemory_size)
}

// --------------------- Read path priority ---------------------

#[test]
fn memtable_shadows_segment_for_same_key() {
    let dir = tempdir().unwrap();
    let mut engine = Engine::open(opts(dir.path(), 1)).unwrap();

    engine.set(b"key".to_vec(), b"old".to_vec()).unwrap();
    engine.set(b"pad".to_vec(), b"x".to_vec()).unwrap(); // flushes "key" to a segment
    assert!(engine.segment_count() >= 1);

    engine.set(b"key".to_vec(), b"new".to_vec()).unwrap();
    assert_eq!(engine.get(b"key").unwrap(), Some(b"new".to_vec()));
}

#[test]
fn newest_of_several_segments_wins() {
    let dir = tempdir().unwrap();
    let options = opts(dir.path(), 1).with_compaction_threshold(1000);
    let mut engine = Engine::open(options).unwrap();

    for v in ["v1", "v2", "v3"] {
        engine.set(b"key".to_vec(), v.as_bytes().to_vec()).unwrap();
    }
    assert!(engine.segment_count() >= 2);
    assert_eq!(engine.get(b"key").unwrap(), Some(b"v3".to_vec()));
}

#[test]
fn tombstone_in_newer_segment_hides_older_value() {
    let dir = tempdir().unwrap();
    let options = opts(dir.path(), 1).with_compaction_threshold(1000);
    let mut engine = Engine::open(options).unwrap();

    engine.set(b"k".to_vec(), b"v".to_vec()).unwrap(); // segment 1
    engine.delete(b"k".to_vec()).unwrap();
    engine.set(b"pad".to_vec(), b"x".to_vec()).unwrap(); // flushes the tombstone to segment 2

    assert!(engine.segment_count() >= 2);
    assert!(engine.get(b"k").unwrap().is_none());
    assert!(!engine.contains(b"k").unwrap());
}

#[test]
fn unrelated_keys_in_older_segments_stay_reachable() {
    let dir = tempdir().unwrap();
    let options = opts(dir.path(), 1).with_compaction_threshold(1000);
    let mut engine = Engine::open(options).unwrap();

    engine.set(b"a".to_vec(), b"1".to_vec()).unwrap();
    engine.set(b"b".to_vec(), b"2".to_vec()).unwrap();
    engine.set(b"c".to_vec(), b"3".to_vec()).unwrap();

    assert_eq!(engine.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(engine.get(b"b").unwrap(), Some(b"2".to_vec()));
    assert_eq!(engine.get(b"c").unwrap(), Some(b"3".to_vec()));
}

#[test]
fn contains_is_false_for_never_written_key() {
    let dir = tempdir().unwrap();
    let engine = Engine::open(opts(dir.path(), 1024)).unwrap();
    assert!(!engine.contains(b"nope").unwrap());
}

#[test]
fn contains_true_after_set_false_after_delete() {
    let dir = tempdir().unwrap();
    let mut engine = Engine::open(opts(dir.path(), 1024)).unwrap();

    engine.set(b"k".to_vec(), b"v".to_vec()).unwrap();
    assert!(engine.contains(b"k").unwrap());

    engine.delete(b"k".to_vec()).unwrap();
    assert!(!engine.contains(b"k").unwrap());
}

// --------------------- Bloom-filter-backed absence ---------------------

#[test]
fn many_absent_keys_resolve_correctly_through_segments() {
    let dir = tempdir().unwrap();
    let options = opts(dir.path(), 32);
    let mut engine = Engine::open(options).unwrap();

    for i in 0..200u32 {
        engine
            .set(format!("present-{i}").into_bytes(), b"v".to_vec())
            .unwrap();
    }
    assert!(engine.segment_count() >= 1);

    for i in 0..500u32 {
        let key = format!("absent-{i}").into_bytes();
        assert!(engine.get(&key).unwrap().is_none(), "absent-{i} must miss");
    }
    for i in 0..200u32 {
        let key = format!("present-{i}").into_bytes();
        assert!(engine.get(&key).unwrap().is_some(), "present-{i} must hit");
    }
}
