//! Archive naming constants.

/// Compound suffix of every archive produced by this crate.
///
/// Stored as one string; never split into a primary and secondary extension.
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// Build the archive file name for a base-name, e.g. `Alpha` -> `Alpha.tar.gz`.
pub fn archive_name(base_name: &str) -> String {
    format!("{base_name}.{ARCHIVE_EXTENSION}")
}

/// Wildcard matching every archive file name.
pub fn archive_pattern() -> String {
    format!("*.{ARCHIVE_EXTENSION}")
}

/// Recover the base-name from an archive file name.
///
/// Returns `None` when the name does not carry the full archive suffix or the
/// remaining stem is empty.
pub fn archive_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(ARCHIVE_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}
