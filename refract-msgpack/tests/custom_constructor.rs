//! Types that opt into whole-value decoding through `impl_record!(custom ..)`

use eyre::Result;
use refract_msgpack::{
    ArrayView, BasicType, CustomConstructor, FieldSlots, MsgPackReader, ObjectView, ReadError,
    Reader, Unpack, Value, decode, impl_record, read, write,
};

#[derive(Debug, PartialEq)]
struct Temperature {
    celsius: f64,
}

impl_record!(custom Temperature { celsius });

impl<'a> CustomConstructor<'a> for Temperature {
    fn construct<R: Reader<'a>>(reader: &R, var: R::InputVar) -> Result<Self, ReadError> {
        // accept a bare number as well as the object form
        if let Ok(celsius) = reader.to_basic_type::<f64>(var) {
            return Ok(Temperature { celsius });
        }
        let obj = reader.to_object(var)?;
        let celsius = reader.to_basic_type(reader.get_field("celsius", obj)?)?;
        Ok(Temperature { celsius })
    }
}

/// Delegates to [`MsgPackReader`] but supports custom constructors.
struct HookReader(MsgPackReader);

impl<'a> Reader<'a> for HookReader {
    type InputVar = &'a Value<'a>;
    type InputArray = ArrayView<'a>;
    type InputObject = ObjectView<'a>;

    fn get_field(&self, name: &str, obj: ObjectView<'a>) -> Result<&'a Value<'a>, ReadError> {
        self.0.get_field(name, obj)
    }

    fn is_empty(&self, var: &'a Value<'a>) -> bool {
        self.0.is_empty(var)
    }

    fn to_basic_type<T: BasicType<'a>>(&self, var: &'a Value<'a>) -> Result<T, ReadError> {
        self.0.to_basic_type(var)
    }

    fn to_fields_array<const N: usize, F>(
        &self,
        index_of_name: F,
        obj: ObjectView<'a>,
    ) -> FieldSlots<&'a Value<'a>, N>
    where
        F: Fn(&str) -> Option<usize>,
    {
        self.0.to_fields_array(index_of_name, obj)
    }

    fn to_array(&self, var: &'a Value<'a>) -> Result<ArrayView<'a>, ReadError> {
        self.0.to_array(var)
    }

    fn to_object(&self, var: &'a Value<'a>) -> Result<ObjectView<'a>, ReadError> {
        self.0.to_object(var)
    }

    fn to_map(&self, obj: ObjectView<'a>) -> Result<Vec<(&'a str, &'a Value<'a>)>, ReadError> {
        self.0.to_map(obj)
    }

    fn to_vec(&self, arr: ArrayView<'a>) -> Vec<&'a Value<'a>> {
        self.0.to_vec(arr)
    }

    fn has_custom_constructor(&self) -> bool {
        true
    }

    fn use_custom_constructor<T: CustomConstructor<'a>>(
        &self,
        var: &'a Value<'a>,
    ) -> Result<T, ReadError> {
        T::construct(self, var)
    }
}

#[test]
fn msgpack_reader_reports_unsupported() -> Result<()> {
    refract_testhelpers::setup();
    let bytes = write(&Temperature { celsius: 21.5 })?;
    let err = read::<Temperature>(&bytes).unwrap_err();
    assert_eq!(err, ReadError::Unsupported("custom constructors"));
    insta::assert_snapshot!(err, @"Unsupported: custom constructors");

    let value = decode(&bytes)?;
    let reader = MsgPackReader::new();
    assert!(!reader.has_custom_constructor());
    assert!(reader.use_custom_constructor::<Temperature>(&value).is_err());
    Ok(())
}

#[test]
fn capable_reader_uses_the_hook() -> Result<()> {
    refract_testhelpers::setup();
    let reader = HookReader(MsgPackReader::new());

    let bytes = write(&Temperature { celsius: 21.5 })?;
    let value = decode(&bytes)?;
    let t = Temperature::unpack(&reader, &value)?;
    assert_eq!(t, Temperature { celsius: 21.5 });

    let bytes = write(&-4.0f64)?;
    let value = decode(&bytes)?;
    let t = Temperature::unpack(&reader, &value)?;
    assert_eq!(t, Temperature { celsius: -4.0 });
    Ok(())
}

#[test]
fn hook_applies_inside_containers() -> Result<()> {
    refract_testhelpers::setup();
    let reader = HookReader(MsgPackReader::new());
    let bytes = write(&vec![Temperature { celsius: 1.0 }, Temperature { celsius: 2.0 }])?;
    let value = decode(&bytes)?;
    let ts = Vec::<Temperature>::unpack(&reader, &value)?;
    assert_eq!(ts.len(), 2);
    assert_eq!(ts[1].celsius, 2.0);

    let err = Vec::<Temperature>::unpack(&MsgPackReader::new(), &value).unwrap_err();
    insta::assert_snapshot!(err, @"Failed to parse element 0: Unsupported: custom constructors");
    Ok(())
}
