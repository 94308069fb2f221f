//! Archive extraction tests for the fetch workflow.

use std::fs;
use std::io::{Cursor, Write};

use fatex::fetch::extract_archive;
use tempfile::TempDir;
use zip::ZipArchive;
use zip::write::SimpleFileOptions;

fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_extract_strips_shared_distribution_root() {
    let data = make_zip(&[
        (
            "fontawesome-free-6.7.2-desktop/metadata/icons.json",
            b"{}".as_slice(),
        ),
        (
            "fontawesome-free-6.7.2-desktop/otfs/Font Awesome 6 Free-Solid-900.otf",
            b"font".as_slice(),
        ),
        (
            "fontawesome-free-6.7.2-desktop/LICENSE.txt",
            b"license".as_slice(),
        ),
    ]);

    let dest = TempDir::new().unwrap();
    let count = extract_archive(&data, dest.path()).unwrap();
    assert_eq!(count, 3);

    assert_eq!(
        fs::read_to_string(dest.path().join("metadata/icons.json")).unwrap(),
        "{}"
    );
    assert!(dest
        .path()
        .join("otfs/Font Awesome 6 Free-Solid-900.otf")
        .is_file());
    assert!(
        !dest.path().join("fontawesome-free-6.7.2-desktop").exists(),
        "shared root must be stripped"
    );
}

#[test]
fn test_extract_keeps_layout_without_shared_root() {
    let data = make_zip(&[
        ("top.txt", b"top".as_slice()),
        ("nested/inner.txt", b"inner".as_slice()),
    ]);

    let dest = TempDir::new().unwrap();
    let count = extract_archive(&data, dest.path()).unwrap();
    assert_eq!(count, 2);
    assert!(dest.path().join("top.txt").is_file());
    assert!(dest.path().join("nested/inner.txt").is_file());
}

#[test]
fn test_extract_rejects_garbage() {
    let dest = TempDir::new().unwrap();
    assert!(extract_archive(b"not a zip archive", dest.path()).is_err());
}

#[test]
fn test_make_zip_round_trips() {
    // Sanity-check the fixture helper against the reader used in fetch.
    let data = make_zip(&[("a/b.txt", b"hello".as_slice())]);
    let mut archive = ZipArchive::new(Cursor::new(&data)).unwrap();
    assert_eq!(archive.len(), 1);
    let file = archive.by_index(0).unwrap();
    assert_eq!(file.name(), "a/b.txt");
}
