#![allow(dead_code)]

use git_sourcezip::Config;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::ZipArchive;
use zip::write::SimpleFileOptions;

/// In-memory zip with the given entries; names ending in `/` become directories.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(name.to_string(), options).unwrap();
            } else {
                writer.start_file(name.to_string(), options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap();
    }
    buf
}

/// (name, content) pairs of every file entry, sorted by name.
pub fn read_entries(path: &Path) -> Vec<(String, String)> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        entries.push((entry.name().to_string(), content));
    }
    entries.sort();
    entries
}

pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default_config();
    config.remote.base_url = base_url.to_string();
    config.remote.api_base_url = base_url.to_string();
    config.remote.show_progress = false;
    config
}

pub fn widgets_archive() -> Vec<u8> {
    zip_bytes(&[
        ("widgets-main/", ""),
        ("widgets-main/README.md", "# widgets\n"),
        ("widgets-main/src/app.py", "print('widgets')\n"),
    ])
}
