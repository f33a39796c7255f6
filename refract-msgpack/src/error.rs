use core::fmt;

use alloc::boxed::Box;
use alloc::string::{String, ToString};

use crate::packer::ContainerKind;
use crate::scalar::Kind;

/// Errors that can occur while decoding or reading MessagePack data.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadError {
    /// The value's tag does not match the requested kind.
    TypeMismatch {
        /// The kind the caller asked for
        expected: Kind,
        /// The tag that was actually found
        found: &'static str,
    },
    /// A map key that is not a string was met where a field name was needed
    NonStringKey,
    /// The object has no entry with this name
    FieldNotFound(String),
    /// The requested operation is not supported by this reader
    Unsupported(&'static str),
    /// A string payload is not valid UTF-8
    InvalidUtf8,
    /// The input ended in the middle of a value
    UnexpectedEof,
    /// A reserved or otherwise unusable marker byte
    InvalidMarker(u8),
    /// Containers are nested deeper than the configured limit
    DepthLimitExceeded(usize),
    /// Bytes remain after the root value
    TrailingBytes(usize),
    /// A fixed-size target saw a container of a different length
    LengthMismatch {
        /// Length required by the target type
        expected: usize,
        /// Length found on the wire
        found: usize,
    },
    /// A failure reported by the primitive codec
    Codec(String),
    /// Reading a named field failed
    Field {
        /// The field name
        name: String,
        /// What went wrong inside the field
        source: Box<ReadError>,
    },
    /// Reading an array element failed
    Index {
        /// Position of the element
        index: usize,
        /// What went wrong inside the element
        source: Box<ReadError>,
    },
}

impl ReadError {
    pub(crate) fn codec(err: impl fmt::Display) -> Self {
        ReadError::Codec(err.to_string())
    }

    /// Wraps this error with the name of the field it occurred in.
    pub fn in_field(self, name: &str) -> Self {
        ReadError::Field {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Wraps this error with the array position it occurred at.
    pub fn at_index(self, index: usize) -> Self {
        ReadError::Index {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all driver context stripped.
    pub fn root_cause(&self) -> &ReadError {
        match self {
            ReadError::Field { source, .. } | ReadError::Index { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch, expected {expected}, found {found}")
            }
            ReadError::NonStringKey => write!(f, "Map contains non-string key"),
            ReadError::FieldNotFound(name) => {
                write!(f, "Object contains no field named '{name}'")
            }
            ReadError::Unsupported(what) => write!(f, "Unsupported: {what}"),
            ReadError::InvalidUtf8 => write!(f, "Invalid UTF-8 in string data"),
            ReadError::UnexpectedEof => write!(f, "Unexpected end of input"),
            ReadError::InvalidMarker(byte) => write!(f, "Invalid marker byte 0x{byte:02x}"),
            ReadError::DepthLimitExceeded(max) => {
                write!(f, "Nesting exceeds the maximum depth of {max}")
            }
            ReadError::TrailingBytes(n) => {
                write!(f, "{n} trailing byte(s) after the root value")
            }
            ReadError::LengthMismatch { expected, found } => {
                write!(f, "Expected {expected} element(s), found {found}")
            }
            ReadError::Codec(msg) => write!(f, "MessagePack decode error: {msg}"),
            ReadError::Field { name, source } => {
                write!(f, "Failed to parse field '{name}': {source}")
            }
            ReadError::Index { index, source } => {
                write!(f, "Failed to parse element {index}: {source}")
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Field { source, .. } | ReadError::Index { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

/// Errors that can occur while building a MessagePack document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// A container received more children than it declared
    ContainerOverflow {
        /// Kind of the full container
        kind: ContainerKind,
        /// Its declared size
        declared: usize,
    },
    /// A container was closed before all declared children were written
    ContainerUnderfilled {
        /// Kind of the container being closed
        kind: ContainerKind,
        /// Its declared size
        declared: usize,
        /// Children actually written
        written: usize,
    },
    /// An array operation hit an object frame, or the other way around
    ContainerKindMismatch {
        /// Kind the operation works on
        expected: ContainerKind,
        /// Kind of the innermost open container
        found: ContainerKind,
    },
    /// A child was appended but no container is open
    NoOpenContainer,
    /// The document was extracted with containers still open
    UnclosedContainers(usize),
    /// A declared length does not fit in the wire format
    LengthOverflow(usize),
    /// The value produced no root
    EmptyDocument,
    /// A failure reported by the primitive codec
    Codec(String),
}

impl WriteError {
    pub(crate) fn codec(err: impl fmt::Display) -> Self {
        WriteError::Codec(err.to_string())
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::ContainerOverflow { kind, declared } => {
                write!(f, "{kind} declared {declared} element(s) but more were written")
            }
            WriteError::ContainerUnderfilled {
                kind,
                declared,
                written,
            } => write!(
                f,
                "{kind} declared {declared} element(s) but was closed after {written}"
            ),
            WriteError::ContainerKindMismatch { expected, found } => {
                write!(f, "Expected an open {expected}, but the innermost container is an {found}")
            }
            WriteError::NoOpenContainer => write!(f, "No open container to append to"),
            WriteError::UnclosedContainers(depth) => {
                write!(f, "{depth} container(s) still open")
            }
            WriteError::LengthOverflow(len) => {
                write!(f, "Length {len} does not fit in a MessagePack length prefix")
            }
            WriteError::EmptyDocument => write!(f, "Nothing was written"),
            WriteError::Codec(msg) => write!(f, "MessagePack encode error: {msg}"),
        }
    }
}

impl std::error::Error for WriteError {}
