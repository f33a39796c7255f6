//! A format-agnostic driver over [`Reader`] and [`Writer`].
//!
//! [`Pack`] walks a value and issues writer calls; [`Unpack`] walks the
//! reader's view of the input. Struct-like types get both through
//! [`impl_record!`](crate::impl_record).

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use std::collections::HashMap;

use crate::{ReadError, Reader, Scalar, WriteError, Writer};

/// Where the next value is written.
pub enum Parent<'p, O> {
    /// Top of a fresh document; the writer's output is stored in the slot.
    Root(&'p mut Option<O>),
    /// Next element of the innermost array.
    Array(&'p mut O),
    /// Value for `name` in the innermost object.
    Object(&'p str, &'p mut O),
}

/// Types that can be written through any [`Writer`].
pub trait Pack {
    /// Write `self` at `parent`.
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError>;
}

/// Types that can be read through any [`Reader`].
pub trait Unpack<'a>: Sized {
    /// Read `Self` from `var`.
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError>;

    /// Value for a struct field whose key is absent from the input.
    fn missing_field(name: &str) -> Result<Self, ReadError> {
        Err(ReadError::FieldNotFound(name.into()))
    }
}

/// Write a scalar at `parent`.
pub fn put_value<W: Writer>(
    writer: &W,
    value: Scalar<'_>,
    parent: Parent<'_, W::Output>,
) -> Result<(), WriteError> {
    match parent {
        Parent::Root(slot) => {
            *slot = Some(writer.value_as_root(value)?);
            Ok(())
        }
        Parent::Array(out) => writer.add_value_to_array(value, out),
        Parent::Object(name, out) => writer.add_value_to_object(name, value, out),
    }
}

/// Write null at `parent`.
pub fn put_null<W: Writer>(writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
    match parent {
        Parent::Root(slot) => {
            *slot = Some(writer.null_as_root()?);
            Ok(())
        }
        Parent::Array(out) => writer.add_null_to_array(out),
        Parent::Object(name, out) => writer.add_null_to_object(name, out),
    }
}

/// Open an array of `size` elements at `parent` and return the output to
/// append the elements to. Close it with [`Writer::end_array`].
pub fn open_array<'p, W: Writer>(
    writer: &W,
    size: usize,
    parent: Parent<'p, W::Output>,
) -> Result<&'p mut W::Output, WriteError> {
    match parent {
        Parent::Root(slot) => Ok(slot.insert(writer.array_as_root(size)?)),
        Parent::Array(out) => {
            writer.add_array_to_array(size, out)?;
            Ok(out)
        }
        Parent::Object(name, out) => {
            writer.add_array_to_object(name, size, out)?;
            Ok(out)
        }
    }
}

/// Open an object of `size` entries at `parent` and return the output to
/// append the entries to. Close it with [`Writer::end_object`].
pub fn open_object<'p, W: Writer>(
    writer: &W,
    size: usize,
    parent: Parent<'p, W::Output>,
) -> Result<&'p mut W::Output, WriteError> {
    match parent {
        Parent::Root(slot) => Ok(slot.insert(writer.object_as_root(size)?)),
        Parent::Array(out) => {
            writer.add_object_to_array(size, out)?;
            Ok(out)
        }
        Parent::Object(name, out) => {
            writer.add_object_to_object(name, size, out)?;
            Ok(out)
        }
    }
}

macro_rules! impl_scalar {
    ($variant:ident as $wide:ty => $($ty:ty),*) => {$(
        impl Pack for $ty {
            fn pack<W: Writer>(
                &self,
                writer: &W,
                parent: Parent<'_, W::Output>,
            ) -> Result<(), WriteError> {
                put_value(writer, Scalar::$variant(*self as $wide), parent)
            }
        }

        impl_scalar!(@unpack $ty);
    )*};
    ($variant:ident => $ty:ty) => {
        impl Pack for $ty {
            fn pack<W: Writer>(
                &self,
                writer: &W,
                parent: Parent<'_, W::Output>,
            ) -> Result<(), WriteError> {
                put_value(writer, Scalar::$variant(*self), parent)
            }
        }

        impl_scalar!(@unpack $ty);
    };
    (@unpack $ty:ty) => {
        impl<'a> Unpack<'a> for $ty {
            fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
                reader.to_basic_type(var)
            }
        }
    };
}

impl_scalar!(I64 as i64 => i8, i16, i32, isize);
impl_scalar!(U64 as u64 => u8, u16, u32, usize);
impl_scalar!(I64 => i64);
impl_scalar!(U64 => u64);
impl_scalar!(F32 => f32);
impl_scalar!(F64 => f64);
impl_scalar!(Bool => bool);

impl Pack for str {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        put_value(writer, Scalar::Str(self), parent)
    }
}

impl Pack for String {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        self.as_str().pack(writer, parent)
    }
}

impl<'a> Unpack<'a> for String {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        reader.to_basic_type(var)
    }
}

impl<'a> Unpack<'a> for &'a str {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        reader.to_basic_type(var)
    }
}

impl Pack for char {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        let mut buf = [0u8; 4];
        put_value(writer, Scalar::Str(self.encode_utf8(&mut buf)), parent)
    }
}

impl<'a> Unpack<'a> for char {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        reader.to_basic_type(var)
    }
}

impl<T: Pack + ?Sized> Pack for &T {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        (**self).pack(writer, parent)
    }
}

impl<T: Pack + ?Sized> Pack for Box<T> {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        (**self).pack(writer, parent)
    }
}

impl<'a, T: Unpack<'a>> Unpack<'a> for Box<T> {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        T::unpack(reader, var).map(Box::new)
    }

    fn missing_field(name: &str) -> Result<Self, ReadError> {
        T::missing_field(name).map(Box::new)
    }
}

impl<T: Pack> Pack for Option<T> {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        match self {
            Some(value) => value.pack(writer, parent),
            None => put_null(writer, parent),
        }
    }
}

impl<'a, T: Unpack<'a>> Unpack<'a> for Option<T> {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        if reader.is_empty(var) {
            return Ok(None);
        }
        T::unpack(reader, var).map(Some)
    }

    fn missing_field(_name: &str) -> Result<Self, ReadError> {
        Ok(None)
    }
}

impl<T: Pack> Pack for [T] {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        let out = open_array(writer, self.len(), parent)?;
        for item in self {
            item.pack(writer, Parent::Array(&mut *out))?;
        }
        writer.end_array(out)
    }
}

impl<T: Pack> Pack for Vec<T> {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        self.as_slice().pack(writer, parent)
    }
}

impl<T: Pack, const N: usize> Pack for [T; N] {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        self.as_slice().pack(writer, parent)
    }
}

/// Unpack every element of an array, tagging failures with their position.
fn unpack_elements<'a, R: Reader<'a>, T: Unpack<'a>>(
    reader: &R,
    var: R::InputVar,
) -> Result<Vec<T>, ReadError> {
    let arr = reader.to_array(var)?;
    reader
        .to_vec(arr)
        .into_iter()
        .enumerate()
        .map(|(index, item)| T::unpack(reader, item).map_err(|e| e.at_index(index)))
        .collect()
}

impl<'a, T: Unpack<'a>> Unpack<'a> for Vec<T> {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        unpack_elements(reader, var)
    }
}

impl<'a, T: Unpack<'a>, const N: usize> Unpack<'a> for [T; N] {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        let items: Vec<T> = unpack_elements(reader, var)?;
        items
            .try_into()
            .map_err(|items: Vec<T>| ReadError::LengthMismatch {
                expected: N,
                found: items.len(),
            })
    }
}

fn pack_entries<'e, W, V, I>(
    writer: &W,
    len: usize,
    entries: I,
    parent: Parent<'_, W::Output>,
) -> Result<(), WriteError>
where
    W: Writer,
    V: Pack + 'e,
    I: Iterator<Item = (&'e String, &'e V)>,
{
    let out = open_object(writer, len, parent)?;
    for (name, value) in entries {
        value.pack(writer, Parent::Object(name, &mut *out))?;
    }
    writer.end_object(out)
}

impl<V: Pack> Pack for BTreeMap<String, V> {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        pack_entries(writer, self.len(), self.iter(), parent)
    }
}

impl<V: Pack, S> Pack for HashMap<String, V, S> {
    fn pack<W: Writer>(&self, writer: &W, parent: Parent<'_, W::Output>) -> Result<(), WriteError> {
        pack_entries(writer, self.len(), self.iter(), parent)
    }
}

/// Unpack every entry of an object, tagging failures with their key.
fn unpack_entries<'a, R, V, C>(reader: &R, var: R::InputVar) -> Result<C, ReadError>
where
    R: Reader<'a>,
    V: Unpack<'a>,
    C: FromIterator<(String, V)>,
{
    let obj = reader.to_object(var)?;
    reader
        .to_map(obj)?
        .into_iter()
        .map(|(name, item)| {
            let value = V::unpack(reader, item).map_err(|e| e.in_field(name))?;
            Ok((String::from(name), value))
        })
        .collect()
}

impl<'a, V: Unpack<'a>> Unpack<'a> for BTreeMap<String, V> {
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        unpack_entries(reader, var)
    }
}

impl<'a, V, S> Unpack<'a> for HashMap<String, V, S>
where
    V: Unpack<'a>,
    S: BuildHasher + Default,
{
    fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        unpack_entries(reader, var)
    }
}

macro_rules! impl_tuple {
    ($len:literal => $($idx:tt $name:ident),+) => {
        impl<$($name: Pack),+> Pack for ($($name,)+) {
            fn pack<W: Writer>(
                &self,
                writer: &W,
                parent: Parent<'_, W::Output>,
            ) -> Result<(), WriteError> {
                let out = open_array(writer, $len, parent)?;
                $(self.$idx.pack(writer, Parent::Array(&mut *out))?;)+
                writer.end_array(out)
            }
        }

        impl<'a, $($name: Unpack<'a>),+> Unpack<'a> for ($($name,)+) {
            fn unpack<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
                let items = reader.to_vec(reader.to_array(var)?);
                if items.len() != $len {
                    return Err(ReadError::LengthMismatch {
                        expected: $len,
                        found: items.len(),
                    });
                }
                Ok(($($name::unpack(reader, items[$idx]).map_err(|e| e.at_index($idx))?,)+))
            }
        }
    };
}

impl_tuple!(1 => 0 A);
impl_tuple!(2 => 0 A, 1 B);
impl_tuple!(3 => 0 A, 1 B, 2 C);
impl_tuple!(4 => 0 A, 1 B, 2 C, 3 D);
