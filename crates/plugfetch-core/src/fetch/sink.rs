//! Destination file for a 200 body.
//!
//! Nothing touches the filesystem until the first write (or `finish` for an
//! empty body), so non-200 responses leave any existing archive alone. The
//! `touched` flag outlives the sink and records that the archive has been
//! truncated, so later attempts know the cached hash no longer describes it.

use super::error::FetchError;
use std::cell::Cell;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub(super) struct ArchiveSink<'a> {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    written: u64,
    touched: &'a Cell<bool>,
}

impl<'a> ArchiveSink<'a> {
    pub(super) fn new(path: &Path, touched: &'a Cell<bool>) -> Self {
        Self {
            path: path.to_path_buf(),
            file: None,
            written: 0,
            touched,
        }
    }

    pub(super) fn write(&mut self, data: &[u8]) -> Result<(), FetchError> {
        let file = match self.file.take() {
            Some(f) => f,
            None => self.open()?,
        };
        let file = self.file.insert(file);
        file.write_all(data).map_err(|source| FetchError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flushes the file (creating it if the body was empty). Returns bytes written.
    pub(super) fn finish(mut self) -> Result<u64, FetchError> {
        let mut file = match self.file.take() {
            Some(f) => f,
            None => self.open()?,
        };
        file.flush().map_err(|source| FetchError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.written)
    }

    fn open(&self) -> Result<BufWriter<File>, FetchError> {
        // Set before opening: a failed create may still have truncated the file.
        self.touched.set(true);
        open_truncated(&self.path)
    }
}

fn open_truncated(path: &Path) -> Result<BufWriter<File>, FetchError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).map_err(|source| FetchError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| FetchError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// `mkdir -p` with mode 0755 on Unix.
fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}
