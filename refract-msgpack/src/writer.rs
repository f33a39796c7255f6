//! The write half of the format contract.

use crate::packer::{ContainerKind, Packer};
use crate::{Scalar, WriteError, WriterOptions};

/// Format-specific output, as driven by the serializer.
///
/// The driver issues calls in a fixed order: open a container with its
/// element count, append exactly that many children (scalars, nulls or
/// nested containers), then close it. Nested containers are appended to the
/// same output handle; there is no separate scope object.
pub trait Writer {
    /// The document under construction.
    type Output;

    /// Start a document whose root is a scalar.
    fn value_as_root(&self, value: Scalar<'_>) -> Result<Self::Output, WriteError>;
    /// Start a document whose root is an array of `size` elements.
    fn array_as_root(&self, size: usize) -> Result<Self::Output, WriteError>;
    /// Start a document whose root is an object of `size` entries.
    fn object_as_root(&self, size: usize) -> Result<Self::Output, WriteError>;
    /// Start a document whose root is null.
    fn null_as_root(&self) -> Result<Self::Output, WriteError>;

    /// Append a scalar to the innermost array.
    fn add_value_to_array(&self, value: Scalar<'_>, out: &mut Self::Output)
    -> Result<(), WriteError>;
    /// Append a named scalar to the innermost object.
    fn add_value_to_object(
        &self,
        name: &str,
        value: Scalar<'_>,
        out: &mut Self::Output,
    ) -> Result<(), WriteError>;

    /// Open an array of `size` elements as the next element of the innermost array.
    fn add_array_to_array(&self, size: usize, out: &mut Self::Output) -> Result<(), WriteError>;
    /// Open an object of `size` entries as the next element of the innermost array.
    fn add_object_to_array(&self, size: usize, out: &mut Self::Output) -> Result<(), WriteError>;
    /// Open an array of `size` elements under `name` in the innermost object.
    fn add_array_to_object(
        &self,
        name: &str,
        size: usize,
        out: &mut Self::Output,
    ) -> Result<(), WriteError>;
    /// Open an object of `size` entries under `name` in the innermost object.
    fn add_object_to_object(
        &self,
        name: &str,
        size: usize,
        out: &mut Self::Output,
    ) -> Result<(), WriteError>;

    /// Append null to the innermost array.
    fn add_null_to_array(&self, out: &mut Self::Output) -> Result<(), WriteError>;
    /// Append a named null to the innermost object.
    fn add_null_to_object(&self, name: &str, out: &mut Self::Output) -> Result<(), WriteError>;

    /// Close the innermost array.
    fn end_array(&self, out: &mut Self::Output) -> Result<(), WriteError>;
    /// Close the innermost object.
    fn end_object(&self, out: &mut Self::Output) -> Result<(), WriteError>;
}

/// [`Writer`] producing MessagePack through a [`Packer`].
///
/// Lengths are part of each container header, so `end_array`/`end_object`
/// write nothing; they only close the packer's bookkeeping frame.
#[derive(Debug, Clone, Default)]
pub struct MsgPackWriter {
    options: WriterOptions,
}

impl MsgPackWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with the given options.
    pub const fn with_options(options: WriterOptions) -> Self {
        Self { options }
    }

    fn packer(&self) -> Packer {
        Packer::with_capacity(self.options.initial_capacity)
    }
}

impl Writer for MsgPackWriter {
    type Output = Packer;

    fn value_as_root(&self, value: Scalar<'_>) -> Result<Packer, WriteError> {
        let mut packer = self.packer();
        packer.write_scalar(value)?;
        Ok(packer)
    }

    fn array_as_root(&self, size: usize) -> Result<Packer, WriteError> {
        let mut packer = self.packer();
        packer.open(ContainerKind::Array, size)?;
        Ok(packer)
    }

    fn object_as_root(&self, size: usize) -> Result<Packer, WriteError> {
        let mut packer = self.packer();
        packer.open(ContainerKind::Object, size)?;
        Ok(packer)
    }

    fn null_as_root(&self) -> Result<Packer, WriteError> {
        let mut packer = self.packer();
        packer.write_nil()?;
        Ok(packer)
    }

    fn add_value_to_array(&self, value: Scalar<'_>, out: &mut Packer) -> Result<(), WriteError> {
        out.claim(ContainerKind::Array)?;
        out.write_scalar(value)
    }

    fn add_value_to_object(
        &self,
        name: &str,
        value: Scalar<'_>,
        out: &mut Packer,
    ) -> Result<(), WriteError> {
        out.claim(ContainerKind::Object)?;
        out.write_key(name)?;
        out.write_scalar(value)
    }

    fn add_array_to_array(&self, size: usize, out: &mut Packer) -> Result<(), WriteError> {
        out.claim(ContainerKind::Array)?;
        out.open(ContainerKind::Array, size)
    }

    fn add_object_to_array(&self, size: usize, out: &mut Packer) -> Result<(), WriteError> {
        out.claim(ContainerKind::Array)?;
        out.open(ContainerKind::Object, size)
    }

    fn add_array_to_object(
        &self,
        name: &str,
        size: usize,
        out: &mut Packer,
    ) -> Result<(), WriteError> {
        out.claim(ContainerKind::Object)?;
        out.write_key(name)?;
        out.open(ContainerKind::Array, size)
    }

    fn add_object_to_object(
        &self,
        name: &str,
        size: usize,
        out: &mut Packer,
    ) -> Result<(), WriteError> {
        out.claim(ContainerKind::Object)?;
        out.write_key(name)?;
        out.open(ContainerKind::Object, size)
    }

    fn add_null_to_array(&self, out: &mut Packer) -> Result<(), WriteError> {
        out.claim(ContainerKind::Array)?;
        out.write_nil()
    }

    fn add_null_to_object(&self, name: &str, out: &mut Packer) -> Result<(), WriteError> {
        out.claim(ContainerKind::Object)?;
        out.write_key(name)?;
        out.write_nil()
    }

    fn end_array(&self, out: &mut Packer) -> Result<(), WriteError> {
        out.close(ContainerKind::Array)
    }

    fn end_object(&self, out: &mut Packer) -> Result<(), WriteError> {
        out.close(ContainerKind::Object)
    }
}
