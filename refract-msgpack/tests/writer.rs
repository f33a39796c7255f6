//! Tests for document construction through the MessagePack writer

use eyre::Result;
use refract_msgpack::{
    ContainerKind, MsgPackReader, MsgPackWriter, Reader, Scalar, Value, WriteError, Writer,
    WriterOptions, decode, write,
};
use refract_testhelpers::hex;

#[test]
fn short_string_is_length_prefixed() -> Result<()> {
    refract_testhelpers::setup();
    let bytes = write("123")?;
    assert_eq!(hex(&bytes), "a3 31 32 33");
    assert_eq!(decode(&bytes)?, Value::Str(b"123"));
    Ok(())
}

#[test]
fn scalar_roots() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    assert_eq!(hex(&writer.null_as_root()?.finish()?), "c0");
    assert_eq!(
        hex(&writer.value_as_root(Scalar::Bool(true))?.finish()?),
        "c3"
    );
    assert_eq!(hex(&writer.value_as_root(Scalar::I64(-1))?.finish()?), "ff");
    assert_eq!(
        hex(&writer.value_as_root(Scalar::U64(300))?.finish()?),
        "cd 01 2c"
    );
    assert_eq!(
        hex(&writer.value_as_root(Scalar::F32(1.5))?.finish()?),
        "ca 3f c0 00 00"
    );
    Ok(())
}

#[test]
fn object_root_round_trips_through_to_map() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.object_as_root(2)?;
    writer.add_value_to_object("name", Scalar::Str("refract"), &mut out)?;
    writer.add_value_to_object("answer", Scalar::U64(42), &mut out)?;
    writer.end_object(&mut out)?;
    let bytes = out.finish()?;

    let value = decode(&bytes)?;
    let reader = MsgPackReader::new();
    let map = reader.to_map(reader.to_object(&value)?)?;
    assert_eq!(
        map,
        vec![
            ("name", &Value::Str(b"refract")),
            ("answer", &Value::UInt(42)),
        ]
    );
    Ok(())
}

#[test]
fn nested_containers() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.array_as_root(3)?;
    writer.add_null_to_array(&mut out)?;
    writer.add_array_to_array(1, &mut out)?;
    writer.add_value_to_array(Scalar::U64(1), &mut out)?;
    writer.end_array(&mut out)?;
    writer.add_object_to_array(2, &mut out)?;
    writer.add_null_to_object("n", &mut out)?;
    writer.add_array_to_object("xs", 0, &mut out)?;
    writer.end_array(&mut out)?;
    writer.end_object(&mut out)?;
    writer.end_array(&mut out)?;
    assert_eq!(out.depth(), 0);

    let bytes = out.finish()?;
    assert_eq!(hex(&bytes), "93 c0 91 01 82 a1 6e c0 a2 78 73 90");
    Ok(())
}

#[test]
fn object_in_object() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.object_as_root(1)?;
    writer.add_object_to_object("inner", 1, &mut out)?;
    writer.add_value_to_object("ok", Scalar::Bool(false), &mut out)?;
    writer.end_object(&mut out)?;
    writer.end_object(&mut out)?;

    let bytes = out.finish()?;
    let value = decode(&bytes)?;
    let reader = MsgPackReader::new();
    let inner = reader.get_field("inner", reader.to_object(&value)?)?;
    let ok = reader.get_field("ok", reader.to_object(inner)?)?;
    assert!(!reader.to_basic_type::<bool>(ok)?);
    Ok(())
}

#[test]
fn overflow_is_rejected() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.array_as_root(1)?;
    writer.add_value_to_array(Scalar::U64(1), &mut out)?;
    let err = writer
        .add_value_to_array(Scalar::U64(2), &mut out)
        .unwrap_err();
    assert_eq!(
        err,
        WriteError::ContainerOverflow {
            kind: ContainerKind::Array,
            declared: 1
        }
    );
    insta::assert_snapshot!(err, @"array declared 1 element(s) but more were written");
    Ok(())
}

#[test]
fn underfill_is_rejected() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.object_as_root(2)?;
    writer.add_value_to_object("a", Scalar::Bool(true), &mut out)?;
    let err = writer.end_object(&mut out).unwrap_err();
    insta::assert_snapshot!(err, @"object declared 2 element(s) but was closed after 1");
    Ok(())
}

#[test]
fn unclosed_document_is_rejected() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.array_as_root(1)?;
    writer.add_array_to_array(0, &mut out)?;
    assert_eq!(out.depth(), 2);
    assert_eq!(out.finish(), Err(WriteError::UnclosedContainers(2)));
    Ok(())
}

#[test]
fn kind_mismatch_is_rejected() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.object_as_root(1)?;
    let err = writer.add_null_to_array(&mut out).unwrap_err();
    assert_eq!(
        err,
        WriteError::ContainerKindMismatch {
            expected: ContainerKind::Array,
            found: ContainerKind::Object
        }
    );
    Ok(())
}

#[test]
fn complete_document_accepts_no_more_children() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::new();
    let mut out = writer.value_as_root(Scalar::Bool(true))?;
    assert_eq!(
        writer.add_null_to_array(&mut out),
        Err(WriteError::NoOpenContainer)
    );
    Ok(())
}

#[test]
fn options_are_honored() -> Result<()> {
    refract_testhelpers::setup();
    let writer = MsgPackWriter::with_options(WriterOptions::new().initial_capacity(0));
    let out = writer.array_as_root(0)?;
    assert_eq!(out.as_bytes(), [0x90]);
    let bytes = refract_msgpack::write_with_options(&[1u8, 2], &WriterOptions::default())?;
    assert_eq!(hex(&bytes), "92 01 02");
    Ok(())
}
