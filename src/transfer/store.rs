//! Local side of a transfer: where downloads land and uploads come from

use log::debug;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Byte sink/source for transferred file content
pub trait LocalStore {
    type Sink: Write;
    type Source: Read;

    /// Create or truncate the sink for a downloaded file
    fn create(&self, name: &str) -> io::Result<Self::Sink>;

    /// Open an existing file for upload
    fn open(&self, name: &str) -> io::Result<Self::Source>;
}

/// [`LocalStore`] backed by a local directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Downloads only ever use the last component of the remote name, so a
    /// name like `../x` can't write outside the local directory.
    pub fn download_path(&self, name: &str) -> io::Result<PathBuf> {
        let file_name = Path::new(name).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{name}' does not name a file"),
            )
        })?;
        Ok(self.root.join(file_name))
    }

    /// Uploads are chosen by the operator and may use any relative or
    /// absolute path.
    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl LocalStore for FsStore {
    type Sink = File;
    type Source = File;

    fn create(&self, name: &str) -> io::Result<File> {
        let path = self.download_path(name)?;
        debug!("Creating local file {}", path.display());
        File::create(path)
    }

    fn open(&self, name: &str) -> io::Result<File> {
        let path = self.upload_path(name);
        debug!("Opening local file {}", path.display());
        File::open(path)
    }
}
