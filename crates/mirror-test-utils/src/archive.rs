//! Inspection helpers for produced archives.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

/// List entry names of a `tar.gz` archive, without trailing slashes.
///
/// # Panics
/// Panics if the archive cannot be opened or decoded.
pub fn entry_names(archive: &Path) -> Vec<String> {
    let file = File::open(archive)
        .unwrap_or_else(|e| panic!("entry_names: cannot open {}: {e}", archive.display()));
    let mut tarball = tar::Archive::new(GzDecoder::new(file));
    tarball
        .entries()
        .unwrap_or_else(|e| panic!("entry_names: cannot read {}: {e}", archive.display()))
        .map(|entry| {
            let entry = entry
                .unwrap_or_else(|e| panic!("entry_names: bad entry in {}: {e}", archive.display()));
            entry
                .path()
                .unwrap_or_else(|e| panic!("entry_names: bad path in {}: {e}", archive.display()))
                .to_string_lossy()
                .trim_end_matches('/')
                .to_string()
        })
        .collect()
}

/// Read the content of one entry of a `tar.gz` archive.
///
/// Returns `None` if no entry has that name.
///
/// # Panics
/// Panics if the archive cannot be opened or decoded.
pub fn entry_content(archive: &Path, name: &str) -> Option<Vec<u8>> {
    let file = File::open(archive)
        .unwrap_or_else(|e| panic!("entry_content: cannot open {}: {e}", archive.display()));
    let mut tarball = tar::Archive::new(GzDecoder::new(file));
    let entries = tarball
        .entries()
        .unwrap_or_else(|e| panic!("entry_content: cannot read {}: {e}", archive.display()));

    for entry in entries {
        let mut entry = entry
            .unwrap_or_else(|e| panic!("entry_content: bad entry in {}: {e}", archive.display()));
        let matches = entry
            .path()
            .map(|p| p.to_string_lossy() == name)
            .unwrap_or(false);
        if matches {
            let mut content = Vec::new();
            entry
                .read_to_end(&mut content)
                .unwrap_or_else(|e| panic!("entry_content: cannot read {name}: {e}"));
            return Some(content);
        }
    }
    None
}
