//! Rotating file writer with size-based rotation and backup retention.
//!
//! Log lines go to one file in the plugin data directory. When it grows past a
//! size threshold it is shifted to `<name>.1`, older backups move up by one, and
//! anything past the retention limit is deleted. This bounds disk usage for a
//! plugin that may stay loaded for weeks.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (5 MB).
const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating log writer.
///
/// The file is opened lazily on first write. Plugs into `tracing-subscriber`
/// through [`MakeWriter`].
///
/// # Example
///
/// ```rust
/// use clinic_table::observability::RotatingFileWriter;
///
/// let dir = tempfile::tempdir()?;
/// let writer = RotatingFileWriter::new(dir.path().join("clinic-table.log"));
/// writer.write_bytes(b"plugin loaded\n")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RotatingFileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl RotatingFileWriter {
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer with a custom size threshold and backup count.
    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `buf` to the log file, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be rotated, opened or written, or if the lock
    /// was poisoned by a panicking writer.
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut file)?;

        if file.is_none() {
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            );
        }

        let handle = file
            .as_mut()
            .ok_or_else(|| io::Error::other("No file available"))?;
        handle.write_all(buf)?;
        handle.flush()
    }

    fn check_and_rotate(&self, file: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() >= self.max_bytes {
                *file = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Shifts `<name>.N-1` → `<name>.N` down to `<name>` → `<name>.1`,
    /// dropping the oldest.
    fn rotate_files(&self) -> io::Result<()> {
        if self.max_backups == 0 {
            return fs::remove_file(&self.file_path);
        }

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for index in (1..self.max_backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }

        fs::rename(&self.file_path, self.backup_path(1))
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

/// Per-event writer handed out to the fmt layer.
#[derive(Debug)]
pub struct RotatingFileHandle<'a> {
    writer: &'a RotatingFileWriter,
}

impl Write for RotatingFileHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingFileHandle { writer: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_without_rotation_under_threshold() {
        let dir = TempDir::new().unwrap();
        let writer = RotatingFileWriter::new(dir.path().join("table.log"));
        writer.write_bytes(b"one\n").unwrap();
        writer.write_bytes(b"two\n").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "one\ntwo\n");
        assert!(!writer.backup_path(1).exists());
    }

    #[test]
    fn rotates_and_keeps_limited_backups() {
        let dir = TempDir::new().unwrap();
        let writer = RotatingFileWriter::with_limits(dir.path().join("table.log"), 4, 2);

        for line in ["aaaa", "bbbb", "cccc", "dddd"] {
            writer.write_bytes(line.as_bytes()).unwrap();
        }

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "dddd");
        assert_eq!(fs::read_to_string(writer.backup_path(1)).unwrap(), "cccc");
        assert_eq!(fs::read_to_string(writer.backup_path(2)).unwrap(), "bbbb");
        assert!(!writer.backup_path(3).exists());
    }

    #[test]
    fn make_writer_writes_through() {
        let dir = TempDir::new().unwrap();
        let writer = RotatingFileWriter::new(dir.path().join("table.log"));
        writeln!(writer.make_writer(), "event").unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "event\n");
    }
}
