use std::fs;
use std::path::Path;

use crate::errors::*;

/// Where saved mazes go and loaded mazes come from.
pub trait FileStore {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<()>;
    fn file_exists(&self, path: &Path) -> bool;
}

/// The local file system.
#[derive(Debug, Default, Copy, Clone)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).chain_err(|| format!("failed to read {}", path.display()))
    }

    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(path, bytes).chain_err(|| format!("failed to write {}", path.display()))
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
