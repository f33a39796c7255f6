//! Scalars exchanged across the Reader/Writer boundary.

use core::fmt;

use alloc::string::String;

use crate::ReadError;

/// Kind families named in type-mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `bool`
    Boolean,
    /// `String`, `&str`, `char`
    String,
    /// `f32`, `f64`
    FloatingPoint,
    /// Signed integers; accepts both positive and negative wire integers.
    SignedInteger,
    /// Unsigned integers; accepts only non-negative wire integers.
    UnsignedInteger,
    /// Sequences
    Array,
    /// Key/value containers
    Map,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::FloatingPoint => "floating point",
            Kind::SignedInteger => "signed integer",
            Kind::UnsignedInteger => "unsigned integer",
            Kind::Array => "array",
            Kind::Map => "map",
        })
    }
}

/// A format-agnostic scalar.
///
/// Writers receive these from the driver; readers hand them to
/// [`BasicType::from_scalar`] once the tag check has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// Boolean
    Bool(bool),
    /// Signed integer
    I64(i64),
    /// Unsigned integer
    U64(u64),
    /// Single-precision float
    F32(f32),
    /// Double-precision float
    F64(f64),
    /// UTF-8 string
    Str(&'a str),
}

/// Rust types a [`Reader`](crate::Reader) can extract directly.
///
/// The reader checks the wire tag against [`BasicType::KIND`] before calling
/// [`BasicType::from_scalar`], so implementations only ever see the scalar
/// shape that belongs to their kind. Width conversions are plain casts.
pub trait BasicType<'a>: Sized {
    /// The kind family this type belongs to.
    const KIND: Kind;

    /// Convert an already tag-checked scalar.
    fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError>;
}

fn mismatch<T>(expected: Kind, scalar: Scalar<'_>) -> Result<T, ReadError> {
    let found = match scalar {
        Scalar::Bool(_) => "boolean",
        Scalar::I64(n) if n < 0 => "negative integer",
        Scalar::I64(_) | Scalar::U64(_) => "positive integer",
        Scalar::F32(_) | Scalar::F64(_) => "float",
        Scalar::Str(_) => "string",
    };
    Err(ReadError::TypeMismatch { expected, found })
}

impl<'a> BasicType<'a> for bool {
    const KIND: Kind = Kind::Boolean;

    fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError> {
        match scalar {
            Scalar::Bool(b) => Ok(b),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl<'a> BasicType<'a> for &'a str {
    const KIND: Kind = Kind::String;

    fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError> {
        match scalar {
            Scalar::Str(s) => Ok(s),
            other => mismatch(Self::KIND, other),
        }
    }
}

impl<'a> BasicType<'a> for String {
    const KIND: Kind = Kind::String;

    fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError> {
        <&str>::from_scalar(scalar).map(String::from)
    }
}

impl<'a> BasicType<'a> for char {
    const KIND: Kind = Kind::String;

    fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError> {
        let s = <&str>::from_scalar(scalar)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ReadError::LengthMismatch {
                expected: 1,
                found: s.chars().count(),
            }),
        }
    }
}

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl<'a> BasicType<'a> for $ty {
            const KIND: Kind = Kind::FloatingPoint;

            fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError> {
                match scalar {
                    Scalar::F64(v) => Ok(v as $ty),
                    Scalar::F32(v) => Ok(v as $ty),
                    other => mismatch(Self::KIND, other),
                }
            }
        }
    )*};
}

impl_float!(f32, f64);

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl<'a> BasicType<'a> for $ty {
            const KIND: Kind = Kind::SignedInteger;

            fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError> {
                match scalar {
                    Scalar::I64(v) => Ok(v as $ty),
                    other => mismatch(Self::KIND, other),
                }
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl<'a> BasicType<'a> for $ty {
            const KIND: Kind = Kind::UnsignedInteger;

            fn from_scalar(scalar: Scalar<'a>) -> Result<Self, ReadError> {
                match scalar {
                    Scalar::U64(v) => Ok(v as $ty),
                    other => mismatch(Self::KIND, other),
                }
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_integer_sign() {
        assert_eq!(
            u32::from_scalar(Scalar::I64(5)),
            Err(ReadError::TypeMismatch {
                expected: Kind::UnsignedInteger,
                found: "positive integer"
            })
        );
        assert_eq!(
            u32::from_scalar(Scalar::I64(-5)),
            Err(ReadError::TypeMismatch {
                expected: Kind::UnsignedInteger,
                found: "negative integer"
            })
        );
        assert_eq!(
            i64::from_scalar(Scalar::U64(5)),
            Err(ReadError::TypeMismatch {
                expected: Kind::SignedInteger,
                found: "positive integer"
            })
        );
    }
}
