use pretty_assertions::assert_eq;
use shed_fs::{NormalizedPath, io};
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn path_in(dir: &TempDir, relative: &str) -> NormalizedPath {
    NormalizedPath::new(dir.path()).join(relative)
}

#[test]
fn atomic_write_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let store = path_in(&dir, "records/2024/metadata.json");

    io::write_atomic(&store, br#"{"version":1}"#).unwrap();

    assert_eq!(io::read_text(&store).unwrap(), r#"{"version":1}"#);
}

#[test]
fn atomic_write_replaces_previous_contents() {
    let dir = TempDir::new().unwrap();
    let store = path_in(&dir, "metadata.json");
    io::write_atomic(&store, b"first").unwrap();

    io::write_atomic(&store, b"second").unwrap();

    assert_eq!(io::read_bytes(&store).unwrap(), b"second");
}

#[test]
fn atomic_write_cleans_up_staging_file() {
    let dir = TempDir::new().unwrap();
    io::write_atomic(&path_in(&dir, "metadata.json"), b"[]").unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["metadata.json"]);
}

#[test]
fn concurrent_writers_of_one_file_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let target = path_in(&dir, "tool-data/all_fasta.loc");
    let writers = 8;
    let barrier = Arc::new(Barrier::new(writers));

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let target = target.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let content = format!("hg19\t/data/{i}\n").repeat(4096);
                barrier.wait();
                io::write_atomic(&target, content.as_bytes())
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let written = io::read_text(&target).unwrap();
    let first_line = written.lines().next().unwrap().to_string();
    assert!(written.lines().all(|line| line == first_line));
    assert_eq!(written.lines().count(), 4096);
    let names: Vec<String> = fs::read_dir(dir.path().join("tool-data"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["all_fasta.loc"]);
}

#[test]
fn atomic_write_into_file_parent_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = path_in(&dir, "tool-data");
    io::write_atomic(&blocker, b"not a directory").unwrap();

    let result = io::write_atomic(&blocker.join("all_fasta.loc"), b"hg19");

    assert!(matches!(result, Err(shed_fs::Error::Io { .. })));
}

#[test]
fn reading_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = path_in(&dir, "absent.xml");

    let err = io::read_bytes(&missing).unwrap_err();

    assert!(err.to_string().contains("absent.xml"));
}
