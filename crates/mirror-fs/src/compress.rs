//! Single-entry, structure-preserving `tar.gz` compression

use std::fs::{self, File, Metadata};
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, Header};
use walkdir::WalkDir;

use crate::{Error, Result, archive_name};

/// Gzip compression level, constrained to `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 9;
    pub const DEFAULT: u32 = 7;

    /// # Errors
    ///
    /// Returns `InvalidInput` if `level` is outside `1..=9`.
    pub fn new(level: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::invalid_input(format!(
                "compression level must be between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for CompressionLevel {
    type Error = Error;

    fn try_from(level: u32) -> Result<Self> {
        Self::new(level)
    }
}

/// Options for [`compress`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressOptions {
    pub level: CompressionLevel,
}

impl CompressOptions {
    pub fn with_level(level: CompressionLevel) -> Self {
        Self { level }
    }
}

/// Compress `source` into `target_dir/<base-name>.tar.gz`.
///
/// A file source becomes a single entry named after the file. A directory
/// source is stored recursively under `<base-name>/...` with forward-slash
/// entry names. Symbolic links below the source are skipped.
///
/// The archive is written to a hidden temporary file inside `target_dir` and
/// renamed into place only once it is complete, so a failure never leaves a
/// partial archive behind and never clobbers the previous one.
///
/// Entry names keep the raw bytes of the source names. The archive's
/// modification time is never earlier than the source's, even when the
/// source is dated in the future.
///
/// # Errors
///
/// - `InvalidInput` if `source` or `target_dir` is empty, or `source` has no base name
/// - `NotFound` if `source` or `target_dir` does not exist
/// - `NotADirectory` if `target_dir` exists but is not a directory
/// - `Access` if `source` or `target_dir` cannot be probed
/// - `Compression` on any failure while writing, including a short copy
pub fn compress(source: &Path, target_dir: &Path, options: &CompressOptions) -> Result<PathBuf> {
    if source.as_os_str().is_empty() {
        return Err(Error::invalid_input("source path cannot be empty"));
    }
    if target_dir.as_os_str().is_empty() {
        return Err(Error::invalid_input("target directory cannot be empty"));
    }

    let source_meta = match fs::metadata(source) {
        Ok(meta) => meta,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return Err(Error::NotFound {
                path: source.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::access(source, e)),
    };

    let root_name = source.file_name().map(Path::new).ok_or_else(|| {
        Error::invalid_input(format!("source {} has no base name", source.display()))
    })?;
    let base_name = root_name.to_string_lossy();

    check_target_dir(target_dir)?;

    let output = target_dir.join(archive_name(&base_name));
    tracing::debug!(
        source = %source.display(),
        output = %output.display(),
        level = options.level.get(),
        "Compressing"
    );

    let temp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".partial")
        .tempfile_in(target_dir)
        .map_err(|e| Error::compression(&output, e))?;

    write_archive(temp.as_file(), source, &source_meta, root_name, options.level)
        .map_err(|e| Error::compression(&output, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| Error::compression(&output, e))?;
    }

    let archive = temp
        .persist(&output)
        .map_err(|e| Error::compression(&output, e.error))?;
    keep_source_time(&archive, &source_meta).map_err(|e| Error::compression(&output, e))?;

    tracing::info!(output = %output.display(), "Archive written");
    Ok(output)
}

fn check_target_dir(target_dir: &Path) -> Result<()> {
    match fs::metadata(target_dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory {
            path: target_dir.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound {
            path: target_dir.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotADirectory => Err(Error::NotADirectory {
            path: target_dir.to_path_buf(),
        }),
        Err(e) => Err(Error::access(target_dir, e)),
    }
}

/// Raise the archive's mtime to the source's if the source is newer.
fn keep_source_time(archive: &File, source_meta: &Metadata) -> io::Result<()> {
    let source_modified = source_meta.modified()?;
    if source_modified > archive.metadata()?.modified()? {
        archive.set_modified(source_modified)?;
    }
    Ok(())
}

fn write_archive(
    out: &File,
    source: &Path,
    source_meta: &Metadata,
    root_name: &Path,
    level: CompressionLevel,
) -> io::Result<()> {
    let encoder = GzEncoder::new(BufWriter::new(out), Compression::new(level.get()));
    let mut builder = Builder::new(encoder);

    if source_meta.is_dir() {
        append_tree(&mut builder, source, root_name)?;
    } else {
        append_file(&mut builder, source, root_name)?;
    }

    let encoder = builder.into_inner()?;
    let writer = encoder.finish()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn append_tree<W: Write>(
    builder: &mut Builder<W>,
    root: &Path,
    root_name: &Path,
) -> io::Result<()> {
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let file_type = entry.file_type();
        let path = entry.path();

        if file_type.is_symlink() {
            tracing::debug!(path = %path.display(), "Skipping symbolic link");
            continue;
        }

        let relative = path.strip_prefix(root).map_err(io::Error::other)?;
        let name = entry_path(root_name, relative);

        if file_type.is_dir() {
            builder
                .append_dir(&name, path)
                .map_err(|e| with_path(e, path))?;
        } else if file_type.is_file() {
            append_file(builder, path, &name)?;
        } else {
            tracing::debug!(path = %path.display(), "Skipping special file");
        }
    }
    Ok(())
}

fn append_file<W: Write>(builder: &mut Builder<W>, path: &Path, name: &Path) -> io::Result<()> {
    let file = File::open(path).map_err(|e| with_path(e, path))?;
    let meta = file.metadata().map_err(|e| with_path(e, path))?;

    let mut header = Header::new_gnu();
    header.set_metadata(&meta);
    append_counted(builder, &mut header, name, file, meta.len())
        .map_err(|e| with_path(e, path))
}

/// Append `expected` bytes of `data`, failing if fewer could be read.
fn append_counted<W: Write, R: Read>(
    builder: &mut Builder<W>,
    header: &mut Header,
    name: &Path,
    data: R,
    expected: u64,
) -> io::Result<()> {
    header.set_size(expected);
    let mut reader = CountingReader::new(data.take(expected));
    builder.append_data(header, name, &mut reader)?;

    if reader.count != expected {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("copied {} of {} bytes", reader.count, expected),
        ));
    }
    Ok(())
}

/// Archive entry name: the root name followed by the relative components.
///
/// Raw name bytes are kept; `tar` writes `/` separators on every platform.
fn entry_path(root_name: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        root_name.to_path_buf()
    } else {
        root_name.join(relative)
    }
}

fn with_path(e: io::Error, path: &Path) -> io::Error {
    io::Error::new(e.kind(), format!("{}: {e}", path.display()))
}

struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R> CountingReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}
