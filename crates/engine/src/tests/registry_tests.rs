use super::*;
use memtable::Memtable;
use sstable::{SSTableReader, SegmentWriter};
use tempfile::tempdir;

fn write_segment(path: &std::path::Path, pairs: &[(&str, &str)]) {
    let mut mem = Memtable::new();
    for (k, v) in pairs {
        mem.put(k.as_bytes().to_vec(), v.as_bytes().to_vec());
    }
    SegmentWriter::write_from_memtable(path, &mem, 0.01, 16).unwrap();
}

#[test]
fn open_on_fresh_directory_is_empty() {
    let dir = tempdir().unwrap();
    let sst_dir = dir.path().join("sst");
    let registry = SegmentRegistry::open(&sst_dir, 16, 0.01).unwrap();
    assert!(registry.is_empty());
    assert!(sst_dir.is_dir(), "open() must create segment_dir");
}

#[test]
fn alloc_path_then_register_orders_newest_first() {
    let dir = tempdir().unwrap();
    let sst_dir = dir.path().join("sst");
    let mut registry = SegmentRegistry::open(&sst_dir, 16, 0.01).unwrap();

    let p1 = registry.alloc_path();
    write_segment(&p1, &[("a", "1")]);
    let reader1 = SSTableReader::open(&p1, 16, 0.01).unwrap();
    registry.register_newest(reader1);

    let p2 = registry.alloc_path();
    write_segment(&p2, &[("b", "2")]);
    let reader2 = SSTableReader::open(&p2, 16, 0.01).unwrap();
    registry.register_newest(reader2);

    assert_eq!(registry.len(), 2);
    // Newest (p2) must be first.
    assert_eq!(registry.segments()[0].path(), p2);
    assert_eq!(registry.segments()[1].path(), p1);
}

#[test]
fn recovery_orders_existing_segments_newest_first_by_id() {
    let dir = tempdir().unwrap();
    let sst_dir = dir.path().join("sst");
    std::fs::create_dir_all(&sst_dir).unwrap();

    let low = sst_dir.join("segment-00000000000000000001.sst");
    let high = sst_dir.join("segment-00000000000000000007.sst");
    write_segment(&low, &[("a", "1")]);
    write_segment(&high, &[("b", "2")]);

    let registry = SegmentRegistry::open(&sst_dir, 16, 0.01).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.segments()[0].path(), high);
    assert_eq!(registry.segments()[1].path(), low);
}

#[test]
fn alloc_path_continues_after_recovered_max_id() {
    let dir = tempdir().unwrap();
    let sst_dir = dir.path().join("sst");
    std::fs::create_dir_all(&sst_dir).unwrap();
    write_segment(&sst_dir.join("segment-00000000000000000005.sst"), &[("a", "1")]);

    let mut registry = SegmentRegistry::open(&sst_dir, 16, 0.01).unwrap();
    let next = registry.alloc_path();
    assert!(
        next.file_name().unwrap().to_str().unwrap() > "segment-00000000000000000005.sst",
        "next allocated id must be greater than any recovered id"
    );
}

#[test]
fn recovery_sweeps_tmp_files_and_skips_unparseable_names() {
    let dir = tempdir().unwrap();
    let sst_dir = dir.path().join("sst");
    std::fs::create_dir_all(&sst_dir).unwrap();
    std::fs::write(sst_dir.join("segment-00000000000000000001.sst.tmp"), b"junk").unwrap();
    std::fs::write(sst_dir.join("not-a-segment.txt"), b"ignore me").unwrap();

    let registry = SegmentRegistry::open(&sst_dir, 16, 0.01).unwrap();
    assert!(registry.is_empty());
    assert!(!sst_dir.join("segment-00000000000000000001.sst.tmp").exists());
    assert!(sst_dir.join("not-a-segment.txt").exists());
}

#[test]
fn replace_all_deletes_superseded_files() {
    let dir = tempdir().unwrap();
    let sst_dir = dir.path().join("sst");
    let mut registry = SegmentRegistry::open(&sst_dir, 16, 0.01).unwrap();

    let p1 = registry.alloc_path();
    write_segment(&p1, &[("a", "1")]);
    registry.register_newest(SSTableReader::open(&p1, 16, 0.01).unwrap());

    let p2 = registry.alloc_path();
    write_segment(&p2, &[("b", "2")]);
    registry.register_newest(SSTableReader::open(&p2, 16, 0.01).unwrap());

    let merged_path = registry.alloc_path();
    write_segment(&merged_path, &[("a", "1"), ("b", "2")]);
    let merged = SSTableReader::open(&merged_path, 16, 0.01).unwrap();
    registry.replace_all(merged);

    assert_eq!(registry.len(), 1);
    assert!(!p1.exists());
    assert!(!p2.exists());
    assert!(merged_path.exists());
}

#[test]
fn delete_all_removes_every_segment_file() {
    let dir = tempdir().unwrap();
    let sst_dir = dir.path().join("sst");
    let mut registry = SegmentRegistry::open(&sst_dir, 16, 0.01).unwrap();

    let p1 = registry.alloc_path();
    write_segment(&p1, &[("a", "1")]);
    registry.register_newest(SSTableReader::open(&p1, 16, 0.01).unwrap());

    registry.delete_all();
    assert!(registry.is_empty());
    assert!(!p1.exists());
}
