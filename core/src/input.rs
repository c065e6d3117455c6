//! Input sources for reading tables.

use std::{
    fmt,
    fs::File,
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use flate2::bufread::MultiGzDecoder;

/// An input source for reading.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Input {
    /// A path from which to read a file.
    Path(PathBuf),
    /// Stdin.
    Stdin,
}

impl Input {
    /// Path used on the command line to denote stdin.
    pub const STDIN: &'static str = "-";

    /// Creates a new input source, where the path `-` denotes stdin.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        let path = path.into();

        if path.as_os_str() == Self::STDIN {
            Self::Stdin
        } else {
            Self::Path(path)
        }
    }

    /// Open the input for reading.
    ///
    /// Gzip-compressed input is detected and decompressed transparently.
    pub fn open(&self) -> io::Result<Reader> {
        let inner: Box<dyn BufRead> = match self {
            Input::Path(path) => Box::new(io::BufReader::new(File::open(path)?)),
            Input::Stdin => Box::new(io::stdin().lock()),
        };

        Reader::new(inner)
    }

    /// Returns the provided path if provided, otherwise `None`.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Input::Path(path) => Some(path.as_ref()),
            Input::Stdin => None,
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Path(path) => write!(f, "{}", path.display()),
            Input::Stdin => f.write_str("[stdin]"),
        }
    }
}

/// A reader from an input source, decompressing if required.
pub struct Reader {
    inner: Box<dyn io::Read>,
    compression_method: Option<CompressionMethod>,
}

impl Reader {
    /// Creates a new reader, detecting compression from the leading bytes of `inner`.
    pub fn new<R>(mut inner: R) -> io::Result<Self>
    where
        R: 'static + BufRead,
    {
        let compression_method = CompressionMethod::detect(&mut inner)?;

        let inner: Box<dyn io::Read> = match compression_method {
            Some(CompressionMethod::Gzip) => Box::new(MultiGzDecoder::new(inner)),
            None => Box::new(inner),
        };

        Ok(Self {
            inner,
            compression_method,
        })
    }

    /// Returns the detected compression method, if any.
    pub fn compression_method(&self) -> Option<CompressionMethod> {
        self.compression_method
    }
}

impl io::Read for Reader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("compression_method", &self.compression_method)
            .finish_non_exhaustive()
    }
}

/// A compression method for input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionMethod {
    /// Gzip, including BGZF.
    Gzip,
}

impl CompressionMethod {
    fn detect<R>(reader: &mut R) -> io::Result<Option<Self>>
    where
        R: BufRead,
    {
        const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

        let src = reader.fill_buf()?;

        if let Some(buf) = src.get(..GZIP_MAGIC_NUMBER.len()) {
            if buf == GZIP_MAGIC_NUMBER {
                return Ok(Some(CompressionMethod::Gzip));
            }
        }

        Ok(None)
    }
}
