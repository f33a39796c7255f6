//! Struct support for the driver.

/// Implement [`Pack`](crate::Pack) and [`Unpack`](crate::Unpack) for a
/// struct with named fields.
///
/// The struct is written as an object with one entry per listed field, in
/// the order given. Reading decodes the object in a single pass with
/// [`Reader::to_fields_array`](crate::Reader::to_fields_array); unknown keys
/// are ignored and absent keys go through
/// [`Unpack::missing_field`](crate::Unpack::missing_field), so `Option`
/// fields may be left out.
///
/// Prefix the type with `custom` to decode it through its
/// [`CustomConstructor`](crate::CustomConstructor) instead. Readers without
/// that capability then fail with
/// [`ReadError::Unsupported`](crate::ReadError::Unsupported).
///
/// # Example
/// ```
/// use refract_msgpack::{impl_record, read, write};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
///     label: Option<String>,
/// }
///
/// impl_record!(Point { x, y, label });
///
/// let p = Point { x: 1, y: -2, label: None };
/// let bytes = write(&p).unwrap();
/// assert_eq!(read::<Point>(&bytes).unwrap(), p);
/// ```
#[macro_export]
macro_rules! impl_record {
    (custom $ty:ident { $($field:ident),* $(,)? }) => {
        $crate::impl_record!(@pack $ty { $($field),* });

        impl<'a> $crate::Unpack<'a> for $ty {
            fn unpack<R: $crate::Reader<'a>>(
                reader: &R,
                var: R::InputVar,
            ) -> ::core::result::Result<Self, $crate::ReadError> {
                if !reader.has_custom_constructor() {
                    return ::core::result::Result::Err($crate::ReadError::Unsupported(
                        "custom constructors",
                    ));
                }
                reader.use_custom_constructor::<Self>(var)
            }
        }
    };

    (@pack $ty:ident { $($field:ident),* }) => {
        impl $crate::Pack for $ty {
            fn pack<W: $crate::Writer>(
                &self,
                writer: &W,
                parent: $crate::Parent<'_, W::Output>,
            ) -> ::core::result::Result<(), $crate::WriteError> {
                const FIELDS: &[&str] = &[$(stringify!($field)),*];
                let out = $crate::open_object(writer, FIELDS.len(), parent)?;
                $(
                    $crate::Pack::pack(
                        &self.$field,
                        writer,
                        $crate::Parent::Object(stringify!($field), &mut *out),
                    )?;
                )*
                writer.end_object(out)
            }
        }
    };

    ($ty:ident { $($field:ident),* $(,)? }) => {
        $crate::impl_record!(@pack $ty { $($field),* });

        impl<'a> $crate::Unpack<'a> for $ty {
            fn unpack<R: $crate::Reader<'a>>(
                reader: &R,
                var: R::InputVar,
            ) -> ::core::result::Result<Self, $crate::ReadError> {
                const FIELDS: &[&str] = &[$(stringify!($field)),*];
                const N: usize = FIELDS.len();

                let obj = reader.to_object(var)?;
                let slots = reader.to_fields_array::<N, _>(
                    |name| FIELDS.iter().position(|field| *field == name),
                    obj,
                );
                let mut slots = slots.into_iter();

                ::core::result::Result::Ok($ty {
                    $($field: match slots.next().flatten() {
                        ::core::option::Option::Some(item) => $crate::Unpack::unpack(reader, item)
                            .map_err(|e| e.in_field(stringify!($field)))?,
                        ::core::option::Option::None => {
                            $crate::Unpack::missing_field(stringify!($field))?
                        }
                    },)*
                })
            }
        }
    };
}
