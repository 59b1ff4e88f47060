//! Shared fixture helpers for integration tests: building and inspecting
//! small zip archives on disk.

#![allow(dead_code)] // each test binary uses a subset

use std::fs;
use std::io::{Read as _, Write as _};
use std::path::Path;
use std::time::SystemTime;

use zip::write::SimpleFileOptions;

/// Write a zip archive with the given directory entries and file entries.
pub fn write_zip(path: &Path, dirs: &[&str], files: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for dir in dirs {
        writer
            .add_directory(*dir, SimpleFileOptions::default())
            .unwrap();
    }
    for (name, content) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// All entry names in a zip archive, in archive order.
pub fn entry_names(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_owned())
        .collect()
}

/// Contents of one entry in a zip archive.
pub fn read_entry(path: &Path, name: &str) -> String {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

/// A file's modification time.
pub fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}
