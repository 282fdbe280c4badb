extern crate alloc;

use alloc::vec::Vec;

use embedded_io::{ErrorType, Read, Seek, Write};

pub enum Mode {
    Read,
    Write,
}

/// Storage backend the application sees: enough to browse directories and
/// read/write the small state files. Files and directories fail with the
/// filesystem's own error type.
pub trait Filesystem: ErrorType {
    type File<'a>: File + ErrorType<Error = Self::Error>
    where
        Self: 'a;
    type Directory<'a>: Directory + ErrorType<Error = Self::Error>
    where
        Self: 'a;

    fn open_file(&self, path: &str, mode: Mode) -> Result<Self::File<'_>, Self::Error>;
    fn open_directory(&self, path: &str) -> Result<Self::Directory<'_>, Self::Error>;
    fn exists(&self, path: &str) -> Result<bool, Self::Error>;
}

pub trait File: Read + Write + Seek {
    fn size(&self) -> usize;
}

pub trait Directory: ErrorType {
    type Entry: DirEntry;

    fn list(&self) -> Result<Vec<Self::Entry>, Self::Error>;
}

pub trait DirEntry {
    fn name(&self) -> &str;
    fn is_directory(&self) -> bool;
    fn size(&self) -> usize;
}
