// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs::{self, File},
    io::{self, Write},
    path::Path,
};

use tracing::debug;

/// A byte sink that knows how much it has accepted.
///
/// The running total is what callers budget against, so it counts every
/// byte handed to [`Write::write`] regardless of how the sink stores it.
pub trait CountingWrite: Write {
    /// Total bytes accepted since the sink was created.
    fn written(&self) -> u64;
}

/// Wraps any writer with a running byte count.
///
/// `Counting<Vec<u8>>` doubles as an in-memory recorder where a real
/// [`BlobWriter`] would be overkill.
#[derive(Debug)]
pub struct Counting<W> {
    inner: W,
    written: u64,
}

impl<W> Counting<W> {
    /// Wraps `inner`, starting the count at zero.
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Borrows the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwraps the counted writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> CountingWrite for Counting<W> {
    fn written(&self) -> u64 {
        self.written
    }
}

/// Writes an append-only byte stream across fixed-size `.blob` files.
///
/// Files are named `{prefix}{index}.blob` with the index counting up
/// from zero. The writer moves to the next file once the stream total
/// reaches the end of the current blob, and it only ever does so
/// between writes: a single write lands in a single file even when it
/// overshoots the blob size.
#[derive(Debug)]
pub struct BlobWriter {
    prefix: String,
    blob_bytes: u64,
    total: u64,
    blob_start: u64,
    index: u64,
    file: File,
}

impl BlobWriter {
    /// Opens the sink and creates `{prefix}0.blob` immediately.
    ///
    /// The index-0 file is left on disk even if nothing is ever
    /// written. A directory component in the prefix is created first,
    /// so a prefix like `blocks/` works on a fresh checkout. Existing
    /// files with the same names are truncated.
    ///
    /// A `blob_bytes` of zero would roll forever and is rejected with
    /// [`io::ErrorKind::InvalidInput`].
    pub fn create(prefix: impl Into<String>, blob_bytes: u64) -> io::Result<Self> {
        let prefix = prefix.into();
        if blob_bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "blob size must be at least one byte",
            ));
        }
        let first = blob_path(&prefix, 0);
        if let Some(dir) = Path::new(&first).parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let file = File::create(&first)?;
        debug!(path = %first, blob_bytes, "opened blob stream");
        Ok(Self {
            prefix,
            blob_bytes,
            total: 0,
            blob_start: 0,
            index: 0,
            file,
        })
    }

    /// Index of the blob file currently being written.
    pub fn blob_index(&self) -> u64 {
        self.index
    }

    /// Flushes and closes the stream, surfacing errors the implicit
    /// drop would swallow.
    pub fn finish(self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn roll(&mut self) -> io::Result<()> {
        self.index += 1;
        self.blob_start = self.total;
        let path = blob_path(&self.prefix, self.index);
        // Assigning drops, and thereby closes, the finished file.
        self.file = File::create(&path)?;
        debug!(path = %path, total = self.total, "rolled to next blob");
        Ok(())
    }
}

impl Write for BlobWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.file.write_all(buf)?;
        self.total += buf.len() as u64;
        if self.total - self.blob_start >= self.blob_bytes {
            self.roll()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl CountingWrite for BlobWriter {
    fn written(&self) -> u64 {
        self.total
    }
}

fn blob_path(prefix: &str, index: u64) -> String {
    format!("{prefix}{index}.blob")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_in(dir: &tempfile::TempDir, prefix: &str) -> String {
        dir.path().join(prefix).to_str().unwrap().to_string()
    }

    fn blob_len(prefix: &str, index: u64) -> u64 {
        fs::metadata(blob_path(prefix, index)).unwrap().len()
    }

    #[test]
    fn create_opens_index_zero_eagerly() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = prefix_in(&dir, "chain-");
        let writer = BlobWriter::create(&prefix, 64).unwrap();

        assert_eq!(writer.blob_index(), 0);
        assert_eq!(writer.written(), 0);
        assert_eq!(blob_len(&prefix, 0), 0);

        // The empty file stays behind after the writer is gone.
        writer.finish().unwrap();
        assert_eq!(blob_len(&prefix, 0), 0);
    }

    #[test]
    fn create_rejects_zero_blob_size() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = prefix_in(&dir, "chain-");
        let err = BlobWriter::create(&prefix, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn create_makes_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = prefix_in(&dir, "nested/run/");
        let mut writer = BlobWriter::create(&prefix, 64).unwrap();
        writer.write_all(b"abc").unwrap();
        writer.finish().unwrap();
        assert_eq!(blob_len(&prefix, 0), 3);
    }

    #[test]
    fn rolls_once_blob_size_is_reached() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = prefix_in(&dir, "b-");
        let mut writer = BlobWriter::create(&prefix, 50).unwrap();

        // Five 30-byte records against 50-byte blobs: two full-ish
        // blobs of two records each, then a 30-byte tail.
        for byte in 0u8..5 {
            writer.write_all(&[byte; 30]).unwrap();
        }

        assert_eq!(writer.written(), 150);
        assert_eq!(writer.blob_index(), 2);
        writer.finish().unwrap();

        assert_eq!(blob_len(&prefix, 0), 60);
        assert_eq!(blob_len(&prefix, 1), 60);
        assert_eq!(blob_len(&prefix, 2), 30);
    }

    #[test]
    fn exact_boundary_rolls_eagerly() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = prefix_in(&dir, "b-");
        let mut writer = BlobWriter::create(&prefix, 50).unwrap();

        writer.write_all(&[1; 25]).unwrap();
        writer.write_all(&[2; 25]).unwrap();

        // The second write filled the blob exactly, so the next file
        // already exists, empty until the next write arrives.
        assert_eq!(writer.blob_index(), 1);
        writer.finish().unwrap();
        assert_eq!(blob_len(&prefix, 0), 50);
        assert_eq!(blob_len(&prefix, 1), 0);
    }

    #[test]
    fn oversized_write_stays_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = prefix_in(&dir, "b-");
        let mut writer = BlobWriter::create(&prefix, 50).unwrap();

        writer.write_all(&[7; 120]).unwrap();

        assert_eq!(writer.blob_index(), 1);
        assert_eq!(writer.written(), 120);
        writer.finish().unwrap();
        assert_eq!(blob_len(&prefix, 0), 120);
        assert_eq!(blob_len(&prefix, 1), 0);
    }

    #[test]
    fn empty_writes_never_roll() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = prefix_in(&dir, "b-");
        let mut writer = BlobWriter::create(&prefix, 50).unwrap();

        writer.write_all(&[1; 50]).unwrap();
        assert_eq!(writer.blob_index(), 1);

        writer.write_all(&[]).unwrap();
        writer.write_all(&[]).unwrap();

        assert_eq!(writer.blob_index(), 1);
        assert_eq!(writer.written(), 50);
    }

    #[test]
    fn counting_adapter_tracks_accepted_bytes() {
        let mut sink = Counting::new(Vec::new());
        assert_eq!(sink.written(), 0);

        sink.write_all(b"hello ").unwrap();
        sink.write_all(b"blobs").unwrap();

        assert_eq!(sink.written(), 11);
        assert_eq!(sink.get_ref().len(), 11);
        assert_eq!(sink.into_inner(), b"hello blobs");
    }
}
