//! MessagePack bytes → [`Value`] tree.
//!
//! Marker dispatch and length/number decoding are delegated to `rmp`; this
//! module only assembles the tree and keeps string, binary and extension
//! payloads as slices of the input.

use alloc::vec::Vec;

use rmp::Marker;
use rmp::decode::{self, NumValueReadError, ValueReadError};

use crate::{DecodeOptions, ReadError, Value};
#[cfg(feature = "tracing")]
use crate::{debug, trace};

/// Decode a single MessagePack value with default options.
///
/// # Example
/// ```
/// use refract_msgpack::{Value, decode};
///
/// // fixmap(1) { fixstr "id": 42 }
/// let bytes = [0x81, 0xa2, b'i', b'd', 0x2a];
/// let value = decode(&bytes).unwrap();
/// assert_eq!(value, Value::Map(vec![(Value::Str(b"id"), Value::UInt(42))]));
/// ```
pub fn decode(bytes: &[u8]) -> Result<Value<'_>, ReadError> {
    decode_with_options(bytes, &DecodeOptions::default())
}

/// Decode a single MessagePack value.
pub fn decode_with_options<'de>(
    bytes: &'de [u8],
    options: &DecodeOptions,
) -> Result<Value<'de>, ReadError> {
    trace!("decode: {} input byte(s)", bytes.len());
    let mut decoder = Decoder {
        rd: bytes,
        max_depth: options.max_depth,
    };
    let value = decoder.read_value(0)?;

    if !decoder.rd.is_empty() {
        if options.allow_trailing_bytes {
            debug!("decode: ignoring {} trailing byte(s)", decoder.rd.len());
        } else {
            return Err(ReadError::TrailingBytes(decoder.rd.len()));
        }
    }
    trace!("decode: root is {}", value.type_name());
    Ok(value)
}

struct Decoder<'de> {
    /// Unread input; every read moves it forward.
    rd: &'de [u8],
    max_depth: usize,
}

impl<'de> Decoder<'de> {
    fn read_value(&mut self, depth: usize) -> Result<Value<'de>, ReadError> {
        let Some(&byte) = self.rd.first() else {
            return Err(ReadError::UnexpectedEof);
        };

        let value = match Marker::from_u8(byte) {
            Marker::Null => {
                decode::read_nil(&mut self.rd).map_err(from_value_err)?;
                Value::Nil
            }
            Marker::True | Marker::False => {
                Value::Bool(decode::read_bool(&mut self.rd).map_err(from_value_err)?)
            }
            Marker::FixPos(_) | Marker::U8 | Marker::U16 | Marker::U32 | Marker::U64 => {
                Value::UInt(decode::read_int::<u64, _>(&mut self.rd).map_err(from_num_err)?)
            }
            Marker::FixNeg(_) | Marker::I8 | Marker::I16 | Marker::I32 | Marker::I64 => {
                let n = decode::read_int::<i64, _>(&mut self.rd).map_err(from_num_err)?;
                // intN markers may carry non-negative numbers too
                if n < 0 {
                    Value::Int(n)
                } else {
                    Value::UInt(n as u64)
                }
            }
            Marker::F32 => {
                Value::Float(decode::read_f32(&mut self.rd).map_err(from_value_err)? as f64)
            }
            Marker::F64 => Value::Float(decode::read_f64(&mut self.rd).map_err(from_value_err)?),
            Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => {
                let len = decode::read_str_len(&mut self.rd).map_err(from_value_err)?;
                Value::Str(self.take(len)?)
            }
            Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => {
                let len = decode::read_bin_len(&mut self.rd).map_err(from_value_err)?;
                Value::Bin(self.take(len)?)
            }
            Marker::FixExt1
            | Marker::FixExt2
            | Marker::FixExt4
            | Marker::FixExt8
            | Marker::FixExt16
            | Marker::Ext8
            | Marker::Ext16
            | Marker::Ext32 => {
                let meta = decode::read_ext_meta(&mut self.rd).map_err(from_value_err)?;
                Value::Ext(meta.typeid, self.take(meta.size)?)
            }
            Marker::FixArray(_) | Marker::Array16 | Marker::Array32 => {
                let len = decode::read_array_len(&mut self.rd).map_err(from_value_err)? as usize;
                self.check_depth(depth)?;
                // never trust a declared length further than the input can back it
                let mut items = Vec::with_capacity(len.min(self.rd.len()));
                for _ in 0..len {
                    items.push(self.read_value(depth + 1)?);
                }
                Value::Array(items)
            }
            Marker::FixMap(_) | Marker::Map16 | Marker::Map32 => {
                let len = decode::read_map_len(&mut self.rd).map_err(from_value_err)? as usize;
                self.check_depth(depth)?;
                let mut entries = Vec::with_capacity(len.min(self.rd.len() / 2));
                for _ in 0..len {
                    let key = self.read_value(depth + 1)?;
                    let value = self.read_value(depth + 1)?;
                    entries.push((key, value));
                }
                Value::Map(entries)
            }
            Marker::Reserved => return Err(ReadError::InvalidMarker(byte)),
        };
        Ok(value)
    }

    fn check_depth(&self, depth: usize) -> Result<(), ReadError> {
        if depth >= self.max_depth {
            debug!("decode: container at depth {depth} exceeds limit");
            return Err(ReadError::DepthLimitExceeded(self.max_depth));
        }
        Ok(())
    }

    /// Split `len` payload bytes off the front of the input.
    fn take(&mut self, len: u32) -> Result<&'de [u8], ReadError> {
        let len = len as usize;
        let rd = self.rd;
        if rd.len() < len {
            return Err(ReadError::UnexpectedEof);
        }
        let (head, tail) = rd.split_at(len);
        self.rd = tail;
        Ok(head)
    }
}

fn from_io(err: std::io::Error) -> ReadError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        ReadError::UnexpectedEof
    } else {
        ReadError::codec(err)
    }
}

fn from_value_err(err: ValueReadError<std::io::Error>) -> ReadError {
    match err {
        ValueReadError::InvalidMarkerRead(e) | ValueReadError::InvalidDataRead(e) => from_io(e),
        other => ReadError::codec(other),
    }
}

fn from_num_err(err: NumValueReadError<std::io::Error>) -> ReadError {
    match err {
        NumValueReadError::InvalidMarkerRead(e) | NumValueReadError::InvalidDataRead(e) => {
            from_io(e)
        }
        other => ReadError::codec(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_signed_markers_decode_as_uint() {
        // int8 5, int16 -300
        assert_eq!(decode(&[0xd0, 0x05]).unwrap(), Value::UInt(5));
        assert_eq!(decode(&[0xd1, 0xfe, 0xd4]).unwrap(), Value::Int(-300));
    }

    #[test]
    fn float32_is_widened() {
        let bytes = [0xca, 0x3f, 0xc0, 0x00, 0x00];
        assert_eq!(decode(&bytes).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn strings_borrow_from_input() {
        let bytes = [0xa3, b'1', b'2', b'3'];
        let value = decode(&bytes).unwrap();
        let Value::Str(s) = value else {
            panic!("expected a string, got {value:?}");
        };
        assert_eq!(s.as_ptr(), bytes[1..].as_ptr());
    }

    #[test]
    fn truncated_string_is_eof() {
        assert_eq!(decode(&[0xa3, b'1']), Err(ReadError::UnexpectedEof));
        assert_eq!(decode(&[]), Err(ReadError::UnexpectedEof));
    }

    #[test]
    fn truncated_array_is_eof() {
        // fixarray(2) with one element
        assert_eq!(decode(&[0x92, 0x01]), Err(ReadError::UnexpectedEof));
    }

    #[test]
    fn huge_declared_length_does_not_allocate() {
        // array32 claiming u32::MAX elements, no payload
        let bytes = [0xdd, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(decode(&bytes), Err(ReadError::UnexpectedEof));
    }

    #[test]
    fn reserved_marker() {
        assert_eq!(decode(&[0xc1]), Err(ReadError::InvalidMarker(0xc1)));
    }

    #[test]
    fn ext_and_bin_payloads() {
        // fixext1 type 7 payload 0x2a, bin8 len 2
        assert_eq!(decode(&[0xd4, 0x07, 0x2a]).unwrap(), Value::Ext(7, &[0x2a]));
        assert_eq!(decode(&[0xc4, 0x02, 0xde, 0xad]).unwrap(), Value::Bin(&[0xde, 0xad]));
    }

    #[test]
    fn depth_limit() {
        let options = DecodeOptions::new().max_depth(2);
        // [[1]]
        assert!(decode_with_options(&[0x91, 0x91, 0x01], &options).is_ok());
        // [[[1]]]
        assert_eq!(
            decode_with_options(&[0x91, 0x91, 0x91, 0x01], &options),
            Err(ReadError::DepthLimitExceeded(2))
        );
    }

    #[test]
    fn trailing_bytes() {
        assert_eq!(decode(&[0xc0, 0xc0]), Err(ReadError::TrailingBytes(1)));
        let options = DecodeOptions::new().allow_trailing_bytes();
        assert_eq!(decode_with_options(&[0xc0, 0xc0], &options), Ok(Value::Nil));
    }
}
