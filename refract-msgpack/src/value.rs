//! The tagged value model produced by [`decode`](crate::decode).

use alloc::vec::Vec;

/// A decoded MessagePack value.
///
/// String, binary and extension payloads borrow from the input buffer, so a
/// `Value<'de>` cannot outlive the bytes it was decoded from. Arrays and maps
/// own their children.
///
/// Integers follow the positive/negative split of the wire object model:
/// every non-negative integer, whatever width it was encoded with, decodes
/// to [`Value::UInt`], and [`Value::Int`] only ever holds negative numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'de> {
    /// `nil`
    Nil,
    /// `true` / `false`
    Bool(bool),
    /// A negative integer
    Int(i64),
    /// A non-negative integer
    UInt(u64),
    /// float32 or float64, widened
    Float(f64),
    /// Raw string payload; UTF-8 is checked when the string is extracted
    Str(&'de [u8]),
    /// Binary payload
    Bin(&'de [u8]),
    /// Extension type id and payload
    Ext(i8, &'de [u8]),
    /// Elements in wire order
    Array(Vec<Value<'de>>),
    /// Entries in wire order; keys may be any value
    Map(Vec<(Value<'de>, Value<'de>)>),
}

impl<'de> Value<'de> {
    /// True for `nil`.
    pub const fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Short name of the tag, for error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "negative integer",
            Value::UInt(_) => "positive integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bin(_) => "binary",
            Value::Ext(..) => "extension",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// The string payload if this is a string with valid UTF-8.
    pub fn as_str(&self) -> Option<&'de str> {
        match self {
            Value::Str(bytes) => core::str::from_utf8(*bytes).ok(),
            _ => None,
        }
    }
}

/// A view over the elements of a decoded array.
#[derive(Debug, Clone, Copy)]
pub struct ArrayView<'a> {
    items: &'a [Value<'a>],
}

impl<'a> ArrayView<'a> {
    pub(crate) const fn new(items: &'a [Value<'a>]) -> Self {
        Self { items }
    }

    /// Number of elements.
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the array has no elements.
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The elements as a slice.
    pub const fn as_slice(&self) -> &'a [Value<'a>] {
        self.items
    }

    /// Iterate the elements in wire order.
    pub fn iter(&self) -> core::slice::Iter<'a, Value<'a>> {
        self.items.iter()
    }
}

/// A view over the entries of a decoded map.
#[derive(Debug, Clone, Copy)]
pub struct ObjectView<'a> {
    entries: &'a [(Value<'a>, Value<'a>)],
}

impl<'a> ObjectView<'a> {
    pub(crate) const fn new(entries: &'a [(Value<'a>, Value<'a>)]) -> Self {
        Self { entries }
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` entries in wire order.
    pub fn iter(&self) -> core::slice::Iter<'a, (Value<'a>, Value<'a>)> {
        self.entries.iter()
    }
}
