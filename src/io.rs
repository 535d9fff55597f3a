//! Path-or-stream sources and sinks.
//!
//! Readers and writers accept either a filesystem path or an already-open
//! stream through one tagged union, resolved once at the API boundary.
//! Handles open lazily inside the read/write call and are dropped on every
//! exit path.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A readable source: a path to open, or a wrapped existing stream.
pub enum Input<'a> {
    /// Open this file by path
    Path(PathBuf),
    /// Use an already-open stream
    Reader(Box<dyn BufRead + 'a>),
}

impl<'a> Input<'a> {
    /// Wrap an existing stream.
    pub fn from_reader<R: Read + 'a>(reader: R) -> Self {
        Self::Reader(Box::new(BufReader::new(reader)))
    }

    /// Resolve into a buffered reader.
    pub fn open(self) -> Result<Box<dyn BufRead + 'a>> {
        match self {
            Self::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            Self::Reader(reader) => Ok(reader),
        }
    }

    /// The path, when this input names one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Reader(_) => None,
        }
    }
}

impl From<&str> for Input<'_> {
    fn from(value: &str) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

impl From<String> for Input<'_> {
    fn from(value: String) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

impl From<&Path> for Input<'_> {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for Input<'_> {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&PathBuf> for Input<'_> {
    fn from(value: &PathBuf) -> Self {
        Self::Path(value.clone())
    }
}

/// A writable sink: a path to create, or a wrapped existing stream.
pub enum Output<'a> {
    /// Create this file by path
    Path(PathBuf),
    /// Use an already-open stream
    Writer(Box<dyn Write + 'a>),
}

impl<'a> Output<'a> {
    /// Wrap an existing stream.
    pub fn from_writer<W: Write + 'a>(writer: W) -> Self {
        Self::Writer(Box::new(writer))
    }

    /// Resolve into a buffered writer.
    pub fn create(self) -> Result<Box<dyn Write + 'a>> {
        match self {
            Self::Path(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
            Self::Writer(writer) => Ok(writer),
        }
    }
}

impl From<&str> for Output<'_> {
    fn from(value: &str) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

impl From<String> for Output<'_> {
    fn from(value: String) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

impl From<&Path> for Output<'_> {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for Output<'_> {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&PathBuf> for Output<'_> {
    fn from(value: &PathBuf) -> Self {
        Self::Path(value.clone())
    }
}
