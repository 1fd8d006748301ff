//! File reading collaborator
use std::io;
use std::path::Path;

/// Source of OBJ text for the facade
pub trait FileReader {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
