use super::*;

// -------------------- Basic CRUD --------------------

#[test]
fn put_and_get_single_key() {
    let mut m = Memtable::new();
    m.put(b"k1".to_vec(), b"v1".to_vec());
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(b"k1"), Some(b"v1".as_slice()));
}

#[test]
fn put_overwrites_earlier_value() {
    let mut m = Memtable::new();
    m.put(b"k1".to_vec(), b"v1".to_vec());
    m.put(b"k1".to_vec(), b"v2".to_vec());
    assert_eq!(m.get(b"k1"), Some(b"v2".as_slice()));
    assert_eq!(m.len(), 1);
}

#[test]
fn get_missing_key_is_none() {
    let m = Memtable::new();
    assert_eq!(m.get(b"missing"), None);
    assert_eq!(m.get_entry(b"missing"), None);
}

#[test]
fn new_memtable_is_empty() {
    let m = Memtable::new();
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
}

// -------------------- Tombstones --------------------

#[test]
fn delete_records_tombstone() {
    let mut m = Memtable::new();
    m.put(b"k".to_vec(), b"v".to_vec());
    m.delete(b"k".to_vec());
    assert_eq!(m.get(b"k"), None);
    assert_eq!(m.get_entry(b"k"), Some(&Entry::Tombstone));
    assert!(m.contains_key(b"k"));
}

#[test]
fn delete_of_absent_key_is_recorded_anyway() {
    let mut m = Memtable::new();
    m.delete(b"never-set".to_vec());
    assert_eq!(m.get(b"never-set"), None);
    assert!(m.contains_key(b"never-set"));
    assert_eq!(m.get_entry(b"never-set"), Some(&Entry::Tombstone));
}

#[test]
fn put_after_delete_resurrects_key() {
    let mut m = Memtable::new();
    m.put(b"k".to_vec(), b"v1".to_vec());
    m.delete(b"k".to_vec());
    m.put(b"k".to_vec(), b"v2".to_vec());
    assert_eq!(m.get(b"k"), Some(b"v2".as_slice()));
}

#[test]
fn entry_as_value_and_is_tombstone() {
    let value = Entry::Value(b"v".to_vec());
    let tombstone = Entry::Tombstone;
    assert_eq!(value.as_value(), Some(b"v".as_slice()));
    assert!(!value.is_tombstone());
    assert_eq!(tombstone.as_value(), None);
    assert!(tombstone.is_tombstone());
}

// -------------------- Ordering --------------------

#[test]
fn iter_yields_ascending_key_order() {
    let mut m = Memtable::new();
    m.put(b"charlie".to_vec(), b"3".to_vec());
    m.put(b"alpha".to_vec(), b"1".to_vec());
    m.put(b"bravo".to_vec(), b"2".to_vec());

    let keys: Vec<&[u8]> = m.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![b"alpha".as_slice(), b"bravo", b"charlie"]);
}

#[test]
fn iter_includes_tombstones() {
    let mut m = Memtable::new();
    m.put(b"a".to_vec(), b"1".to_vec());
    m.delete(b"b".to_vec());

    let entries: Vec<(&[u8], &Entry)> = m.iter().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].1, &Entry::Tombstone);
}

// -------------------- Size tracking --------------------

#[test]
fn len_counts_tombstones() {
    let mut m = Memtable::new();
    m.put(b"a".to_vec(), b"1".to_vec());
    m.delete(b"b".to_vec());
    assert_eq!(m.len(), 2);
}

#[test]
fn len_is_stable_under_overwrite() {
    let mut m = Memtable::new();
    m.put(b"a".to_vec(), b"1".to_vec());
    m.put(b"a".to_vec(), b"2".to_vec());
    m.delete(b"a".to_vec());
    assert_eq!(m.len(), 1);
}

#[test]
fn clear_resets_to_empty() {
    let mut m = Memtable::new();
    m.put(b"a".to_vec(), b"1".to_vec());
    m.put(b"b".to_vec(), b"2".to_vec());
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
    assert_eq!(m.get(b"a"), None);
}

#[test]
fn default_matches_new() {
    let m: Memtable = Default::default();
    assert!(m.is_empty());
}
