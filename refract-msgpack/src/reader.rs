//! The read half of the format contract.

use alloc::vec::Vec;

use crate::value::{ArrayView, ObjectView, Value};
use crate::{BasicType, Kind, ReadError, Scalar};

/// One slot per statically known field, filled by
/// [`Reader::to_fields_array`].
pub type FieldSlots<V, const N: usize> = [Option<V>; N];

/// A type that rebuilds itself from a whole input value instead of being
/// assembled field by field.
///
/// Readers that support the hook call [`CustomConstructor::construct`] from
/// [`Reader::use_custom_constructor`].
pub trait CustomConstructor<'a>: Sized {
    /// Build `Self` from the raw input value.
    fn construct<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError>;
}

/// Format-specific inspection of decoded input, as used by the driver.
///
/// All operations are pure: a reader never mutates its input, and everything
/// it returns is a view into memory owned by the caller for `'a`.
pub trait Reader<'a> {
    /// Any input value.
    type InputVar: Copy;
    /// A value known to be an array.
    type InputArray: Copy;
    /// A value known to be a map.
    type InputObject: Copy;

    /// Look up a field by name. The first matching entry in wire order wins.
    fn get_field(&self, name: &str, obj: Self::InputObject) -> Result<Self::InputVar, ReadError>;

    /// True if the value is the format's null. Drives `Option` handling.
    fn is_empty(&self, var: Self::InputVar) -> bool;

    /// Extract a scalar after checking the value's tag against `T::KIND`.
    fn to_basic_type<T: BasicType<'a>>(&self, var: Self::InputVar) -> Result<T, ReadError>;

    /// Distribute an object's entries over `N` field slots in a single pass.
    ///
    /// `index_of_name` maps a key to its slot. Entries whose key has no slot
    /// are skipped; a later entry for the same slot replaces an earlier one.
    fn to_fields_array<const N: usize, F>(
        &self,
        index_of_name: F,
        obj: Self::InputObject,
    ) -> FieldSlots<Self::InputVar, N>
    where
        F: Fn(&str) -> Option<usize>;

    /// Check that the value is an array.
    fn to_array(&self, var: Self::InputVar) -> Result<Self::InputArray, ReadError>;

    /// Check that the value is a map.
    fn to_object(&self, var: Self::InputVar) -> Result<Self::InputObject, ReadError>;

    /// All entries of an object as `(name, value)` pairs, in wire order.
    fn to_map(&self, obj: Self::InputObject) -> Result<Vec<(&'a str, Self::InputVar)>, ReadError>;

    /// All elements of an array, in order.
    fn to_vec(&self, arr: Self::InputArray) -> Vec<Self::InputVar>;

    /// Whether [`Reader::use_custom_constructor`] is available.
    fn has_custom_constructor(&self) -> bool {
        false
    }

    /// Build `T` through its custom constructor.
    ///
    /// Readers without support report [`ReadError::Unsupported`]; callers
    /// must not fall back to field-driven decoding.
    fn use_custom_constructor<T: CustomConstructor<'a>>(
        &self,
        _var: Self::InputVar,
    ) -> Result<T, ReadError> {
        Err(ReadError::Unsupported("custom constructors"))
    }
}

/// [`Reader`] over a decoded MessagePack [`Value`] tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackReader;

impl MsgPackReader {
    /// Create a new reader.
    pub const fn new() -> Self {
        MsgPackReader
    }
}

fn mismatch(expected: Kind, found: &Value<'_>) -> ReadError {
    ReadError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, ReadError> {
    core::str::from_utf8(bytes).map_err(|_| ReadError::InvalidUtf8)
}

impl<'a> Reader<'a> for MsgPackReader {
    type InputVar = &'a Value<'a>;
    type InputArray = ArrayView<'a>;
    type InputObject = ObjectView<'a>;

    fn get_field(&self, name: &str, obj: ObjectView<'a>) -> Result<&'a Value<'a>, ReadError> {
        for (key, value) in obj.iter() {
            let Value::Str(key) = key else {
                return Err(ReadError::NonStringKey);
            };
            if *key == name.as_bytes() {
                return Ok(value);
            }
        }
        Err(ReadError::FieldNotFound(name.into()))
    }

    fn is_empty(&self, var: &'a Value<'a>) -> bool {
        var.is_nil()
    }

    fn to_basic_type<T: BasicType<'a>>(&self, var: &'a Value<'a>) -> Result<T, ReadError> {
        let scalar = match (T::KIND, var) {
            (Kind::Boolean, Value::Bool(b)) => Scalar::Bool(*b),
            (Kind::String, Value::Str(bytes)) => Scalar::Str(utf8(bytes)?),
            (Kind::FloatingPoint, Value::Float(f)) => Scalar::F64(*f),
            (Kind::SignedInteger, Value::Int(n)) => Scalar::I64(*n),
            // unsigned payloads are reinterpreted, not range-checked
            (Kind::SignedInteger, Value::UInt(n)) => Scalar::I64(*n as i64),
            (Kind::UnsignedInteger, Value::UInt(n)) => Scalar::U64(*n),
            (expected, found) => return Err(mismatch(expected, found)),
        };
        T::from_scalar(scalar)
    }

    fn to_fields_array<const N: usize, F>(
        &self,
        index_of_name: F,
        obj: ObjectView<'a>,
    ) -> FieldSlots<&'a Value<'a>, N>
    where
        F: Fn(&str) -> Option<usize>,
    {
        let mut slots: FieldSlots<&'a Value<'a>, N> = [None; N];
        for (key, value) in obj.iter() {
            let Some(name) = key.as_str() else {
                continue;
            };
            if let Some(slot) = index_of_name(name).and_then(|idx| slots.get_mut(idx)) {
                *slot = Some(value);
            }
        }
        slots
    }

    fn to_array(&self, var: &'a Value<'a>) -> Result<ArrayView<'a>, ReadError> {
        match var {
            Value::Array(items) => Ok(ArrayView::new(items)),
            other => Err(mismatch(Kind::Array, other)),
        }
    }

    fn to_object(&self, var: &'a Value<'a>) -> Result<ObjectView<'a>, ReadError> {
        match var {
            Value::Map(entries) => Ok(ObjectView::new(entries)),
            other => Err(mismatch(Kind::Map, other)),
        }
    }

    fn to_map(&self, obj: ObjectView<'a>) -> Result<Vec<(&'a str, &'a Value<'a>)>, ReadError> {
        obj.iter()
            .map(|(key, value)| match key {
                Value::Str(bytes) => Ok((utf8(bytes)?, value)),
                _ => Err(ReadError::NonStringKey),
            })
            .collect()
    }

    fn to_vec(&self, arr: ArrayView<'a>) -> Vec<&'a Value<'a>> {
        arr.iter().collect()
    }
}
