//! Error types for parquet reading

use std::{error, fmt, io};

/// Unified error type for all reader operations.
#[derive(Debug)]
pub enum ReadError {
    /// I/O failure from the underlying byte source (read, seek).
    Io(io::Error),

    /// Malformed or inconsistent file data (bad magic, short footer,
    /// Thrift decode failure, page cursor drift, length mismatch).
    Format(String),

    /// Well-formed data the reader does not implement (codec, encoding,
    /// physical type, missing column).
    Unsupported(String),

    /// Cooperative cancellation observed at a page boundary.
    Cancelled,
}

impl ReadError {
    /// Prefix the error with positional context, keeping the kind.
    pub fn context(self, ctx: impl fmt::Display) -> ReadError {
        match self {
            ReadError::Io(e) => {
                let kind = e.kind();
                ReadError::Io(io::Error::new(kind, format!("{ctx}: {e}")))
            }
            ReadError::Format(msg) => ReadError::Format(format!("{ctx}: {msg}")),
            ReadError::Unsupported(msg) => ReadError::Unsupported(format!("{ctx}: {msg}")),
            ReadError::Cancelled => ReadError::Cancelled,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "I/O error: {}", e),
            ReadError::Format(msg) | ReadError::Unsupported(msg) => f.write_str(msg),
            ReadError::Cancelled => f.write_str("operation cancelled"),
        }
    }
}

impl error::Error for ReadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

// --- Conversions for error handling ---

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        ReadError::Io(e)
    }
}

impl From<thrift::Error> for ReadError {
    fn from(e: thrift::Error) -> Self {
        ReadError::Format(e.to_string())
    }
}
