#![warn(missing_docs)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

use alloc::vec::Vec;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

mod decode;
pub use decode::{decode, decode_with_options};

mod driver;
pub use driver::*;

mod error;
pub use error::{ReadError, WriteError};

mod options;
pub use options::{DecodeOptions, WriterOptions};

mod packer;
pub use packer::{ContainerKind, Packer};

mod reader;
pub use reader::{CustomConstructor, FieldSlots, MsgPackReader, Reader};

mod record;

mod scalar;
pub use scalar::{BasicType, Kind, Scalar};

mod value;
pub use value::{ArrayView, ObjectView, Value};

mod writer;
pub use writer::{MsgPackWriter, Writer};

/// Serialize a value to MessagePack bytes with default options.
///
/// # Example
/// ```
/// let bytes = refract_msgpack::write("123").unwrap();
/// assert_eq!(bytes, [0xa3, b'1', b'2', b'3']);
/// ```
pub fn write<T: Pack + ?Sized>(value: &T) -> Result<Vec<u8>, WriteError> {
    write_with_options(value, &WriterOptions::default())
}

/// Serialize a value to MessagePack bytes.
pub fn write_with_options<T: Pack + ?Sized>(
    value: &T,
    options: &WriterOptions,
) -> Result<Vec<u8>, WriteError> {
    let writer = MsgPackWriter::with_options(options.clone());
    let mut root = None;
    value.pack(&writer, Parent::Root(&mut root))?;
    let bytes = root.ok_or(WriteError::EmptyDocument)?.finish()?;
    trace!("write: {} byte(s)", bytes.len());
    Ok(bytes)
}

/// Deserialize an owned value from MessagePack bytes with default options.
///
/// # Example
/// ```
/// let bytes = [0x93, 0x01, 0x02, 0x03];
/// let v: Vec<u8> = refract_msgpack::read(&bytes).unwrap();
/// assert_eq!(v, [1, 2, 3]);
/// ```
pub fn read<T>(bytes: &[u8]) -> Result<T, ReadError>
where
    T: for<'a> Unpack<'a>,
{
    read_with_options(bytes, &DecodeOptions::default())
}

/// Deserialize an owned value from MessagePack bytes.
pub fn read_with_options<T>(bytes: &[u8], options: &DecodeOptions) -> Result<T, ReadError>
where
    T: for<'a> Unpack<'a>,
{
    let value = decode_with_options(bytes, options)?;
    from_value(&value)
}

/// Read a value out of an already decoded tree.
///
/// Unlike [`read`], the result may borrow from the tree, so `&str` fields
/// are supported.
pub fn from_value<'a, T: Unpack<'a>>(value: &'a Value<'a>) -> Result<T, ReadError> {
    T::unpack(&MsgPackReader::new(), value)
}
