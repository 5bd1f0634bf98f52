//! Storage access for media files.
//!
//! All methods block; callers run them on the blocking thread pool.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Read access to the backing store of attachments.
pub trait FileSystem: Send + Sync {
    /// Size in bytes of the regular file at `path`.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Read exactly `length` bytes starting at `start`.
    fn read_range(&self, path: &Path, start: u64, length: u64) -> io::Result<Vec<u8>>;

    /// Read the whole file.
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Remove the file.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] over the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn size(&self, path: &Path) -> io::Result<u64> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a regular file: {}", path.display()),
            ));
        }
        Ok(metadata.len())
    }

    fn read_range(&self, path: &Path, start: u64, length: u64) -> io::Result<Vec<u8>> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(start))?;

        let capacity = usize::try_from(length).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "range too large for memory")
        })?;
        let mut data = Vec::with_capacity(capacity);
        file.take(length).read_to_end(&mut data)?;

        // The file shrank after it was sized.
        if data.len() != capacity {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "expected {} bytes at offset {} of {}, read {}",
                    length,
                    start,
                    path.display(),
                    data.len()
                ),
            ));
        }

        Ok(data)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
