//! The output builder.

use core::fmt;

use alloc::vec::Vec;

use rmp::encode;

use crate::{Scalar, WriteError};
#[cfg(feature = "tracing")]
use crate::trace;

/// The two container shapes a document is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Declared with `array_len`, followed by N values
    Array,
    /// Declared with `map_len`, followed by N key/value pairs
    Object,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Array => f.write_str("array"),
            ContainerKind::Object => f.write_str("object"),
        }
    }
}

/// An open container: how many children it declared and how many it still
/// expects.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    declared: usize,
    remaining: usize,
}

/// Append-only MessagePack output buffer.
///
/// Container lengths are written up front, so the packer never backtracks.
/// It does keep a stack of open containers to check that every container
/// receives exactly the number of children it declared; any deviation is
/// reported as a [`WriteError`] instead of producing a corrupt document.
///
/// Values are appended through a [`Writer`](crate::Writer); the packer
/// itself only exposes inspection and the terminal [`Packer::finish`].
#[derive(Debug)]
pub struct Packer {
    out: Vec<u8>,
    stack: Vec<Frame>,
}

impl Packer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            stack: Vec::new(),
        }
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Consume the packer and return the encoded document.
    ///
    /// Fails if any container is still open.
    pub fn finish(self) -> Result<Vec<u8>, WriteError> {
        if !self.stack.is_empty() {
            return Err(WriteError::UnclosedContainers(self.stack.len()));
        }
        trace!("finish: {} byte(s)", self.out.len());
        Ok(self.out)
    }

    /// Reserve one child slot in the innermost container, which must be of
    /// kind `kind`.
    pub(crate) fn claim(&mut self, kind: ContainerKind) -> Result<(), WriteError> {
        let Some(frame) = self.stack.last_mut() else {
            return Err(WriteError::NoOpenContainer);
        };
        if frame.kind != kind {
            return Err(WriteError::ContainerKindMismatch {
                expected: kind,
                found: frame.kind,
            });
        }
        if frame.remaining == 0 {
            return Err(WriteError::ContainerOverflow {
                kind,
                declared: frame.declared,
            });
        }
        frame.remaining -= 1;
        Ok(())
    }

    /// Write a container header and make it the innermost container.
    pub(crate) fn open(&mut self, kind: ContainerKind, size: usize) -> Result<(), WriteError> {
        let len = u32::try_from(size).map_err(|_| WriteError::LengthOverflow(size))?;
        match kind {
            ContainerKind::Array => encode::write_array_len(&mut self.out, len),
            ContainerKind::Object => encode::write_map_len(&mut self.out, len),
        }
        .map_err(WriteError::codec)?;
        self.stack.push(Frame {
            kind,
            declared: size,
            remaining: size,
        });
        Ok(())
    }

    /// Pop the innermost container, which must be of kind `kind` and full.
    pub(crate) fn close(&mut self, kind: ContainerKind) -> Result<(), WriteError> {
        let Some(frame) = self.stack.last() else {
            return Err(WriteError::NoOpenContainer);
        };
        if frame.kind != kind {
            return Err(WriteError::ContainerKindMismatch {
                expected: kind,
                found: frame.kind,
            });
        }
        if frame.remaining != 0 {
            return Err(WriteError::ContainerUnderfilled {
                kind,
                declared: frame.declared,
                written: frame.declared - frame.remaining,
            });
        }
        self.stack.pop();
        Ok(())
    }

    pub(crate) fn write_scalar(&mut self, scalar: Scalar<'_>) -> Result<(), WriteError> {
        let out = &mut self.out;
        match scalar {
            Scalar::Bool(b) => encode::write_bool(out, b).map_err(WriteError::codec),
            Scalar::I64(n) => encode::write_sint(out, n)
                .map(drop)
                .map_err(WriteError::codec),
            Scalar::U64(n) => encode::write_uint(out, n)
                .map(drop)
                .map_err(WriteError::codec),
            Scalar::F32(n) => encode::write_f32(out, n).map_err(WriteError::codec),
            Scalar::F64(n) => encode::write_f64(out, n).map_err(WriteError::codec),
            Scalar::Str(s) => encode::write_str(out, s).map_err(WriteError::codec),
        }
    }

    pub(crate) fn write_nil(&mut self) -> Result<(), WriteError> {
        encode::write_nil(&mut self.out).map_err(WriteError::codec)
    }

    /// Object keys are plain strings written right before their value.
    pub(crate) fn write_key(&mut self, name: &str) -> Result<(), WriteError> {
        encode::write_str(&mut self.out, name).map_err(WriteError::codec)
    }
}
