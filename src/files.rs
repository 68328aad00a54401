//! Reading and writing compressed files.
//!
//! Compressing `notes.txt` produces `notes.bin` (the payload) and `notes.csv`
//! (the codebook) beside it. Decompressing `notes.bin` reads `notes.csv` and
//! writes `notes_decompressed.txt`. Every path can be overridden.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use itertools::Itertools;

use crate::{compress_counted, decompress, huffman::Result, ReverseCodeTable};

pub const PAYLOAD_EXTENSION: &str = "bin";
pub const CODEBOOK_EXTENSION: &str = "csv";
pub const DECOMPRESSED_SUFFIX: &str = "_decompressed";

#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    /// Payload path when compressing, text path when decompressing.
    pub output: Option<PathBuf>,
    /// Codebook to write when compressing or read when decompressing.
    pub codebook: Option<PathBuf>,
    /// Replace existing outputs instead of failing.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressReport {
    pub payload_path: PathBuf,
    pub codebook_path: PathBuf,
    /// Size of the source file.
    pub input_bytes: usize,
    /// Symbols actually encoded, after trailing whitespace was removed.
    pub symbols: usize,
    pub payload_bytes: usize,
    pub codebook_entries: usize,
    /// Shannon entropy of the input in bits per symbol.
    pub entropy: f64,
}

impl CompressReport {
    /// Payload size as a fraction of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.payload_bytes as f64 / self.input_bytes as f64
    }
}

pub fn payload_path_for(source: &Path) -> PathBuf {
    source.with_extension(PAYLOAD_EXTENSION)
}

pub fn codebook_path_for(payload: &Path) -> PathBuf {
    payload.with_extension(CODEBOOK_EXTENSION)
}

pub fn decompressed_path_for(payload: &Path) -> PathBuf {
    let stem = payload
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    payload.with_file_name(format!("{stem}{DECOMPRESSED_SUFFIX}.txt"))
}

pub fn compress_file(source: &Path, options: &FileOptions) -> Result<CompressReport> {
    let text = fs::read_to_string(source)?;
    let (compressed, frequencies) = compress_counted(&text)?;

    let payload_path = options
        .output
        .clone()
        .unwrap_or_else(|| payload_path_for(source));
    let codebook_path = options
        .codebook
        .clone()
        .unwrap_or_else(|| codebook_path_for(&payload_path));

    ensure_distinct(&[
        ("source", source),
        ("payload", &payload_path),
        ("codebook", &codebook_path),
    ])?;
    // check both targets up front so a refused codebook leaves no payload behind
    if !options.force && codebook_path.exists() {
        return Err(already_exists(&codebook_path).into());
    }
    write_output(&payload_path, &compressed.payload, options.force)?;
    if let Err(e) = write_output(
        &codebook_path,
        compressed.codebook.serialize().as_bytes(),
        options.force,
    ) {
        log::debug!("removing {} after failed codebook write", payload_path.display());
        let _ = fs::remove_file(&payload_path);
        return Err(e.into());
    }

    let report = CompressReport {
        payload_path,
        codebook_path,
        input_bytes: text.len(),
        symbols: frequencies.total(),
        entropy: frequencies.entropy(),
        payload_bytes: compressed.payload.len(),
        codebook_entries: compressed.codebook.len(),
    };
    log::info!(
        "{} -> {} ({} -> {} bytes), codebook {}",
        source.display(),
        report.payload_path.display(),
        report.input_bytes,
        report.payload_bytes,
        report.codebook_path.display()
    );
    Ok(report)
}

/// Decodes `payload` and writes the text, returning the path written.
pub fn decompress_file(payload: &Path, options: &FileOptions) -> Result<PathBuf> {
    let codebook_path = options
        .codebook
        .clone()
        .unwrap_or_else(|| codebook_path_for(payload));
    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| decompressed_path_for(payload));
    ensure_distinct(&[
        ("payload", payload),
        ("codebook", &codebook_path),
        ("output", &output_path),
    ])?;

    let data = fs::read(payload)?;
    let codebook = ReverseCodeTable::deserialize(&fs::read_to_string(&codebook_path)?)?;
    let text = decompress(&data, &codebook)?;

    write_output(&output_path, text.as_bytes(), options.force)?;
    log::info!(
        "{} -> {} using {}",
        payload.display(),
        output_path.display(),
        codebook_path.display()
    );
    Ok(output_path)
}

fn already_exists(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} already exists; use force to overwrite", path.display()),
    )
}

/// Best-effort identity of a path that may not exist yet: the canonical path
/// if it exists, otherwise its canonical parent joined with the file name.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}

/// Fails with [`io::ErrorKind::InvalidInput`] if two roles name the same file.
fn ensure_distinct(paths: &[(&str, &Path)]) -> io::Result<()> {
    let resolved: Vec<_> = paths
        .iter()
        .map(|&(role, path)| (role, path, resolve(path)))
        .collect();
    for ((a, path, x), (b, _, y)) in resolved.iter().tuple_combinations() {
        if x == y {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{a} and {b} are both {}", path.display()),
            ));
        }
    }
    Ok(())
}

fn write_output(path: &Path, contents: &[u8], force: bool) -> io::Result<()> {
    let mut file = if force {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?
    } else {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => already_exists(path),
                _ => e,
            })?
    };
    if let Err(e) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(e);
    }
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
