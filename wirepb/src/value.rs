//! The static table of protobuf scalar types.
//!
//! Each scalar schema type is represented by a zero-sized marker
//! implementing [`Value`]: how the raw wire value is emitted, and how it is
//! parsed back given the current field's wire type (including the cross-wire
//! tolerance rules for integers, zigzag integers, and floats). The packable
//! subset additionally implements [`Scalar`], and the protobuf map-key subset
//! implements [`MapKey`]. Generic `put`/`get` operations on
//! [`Encoder`]/[`Decoder`] iterate this table instead of duplicating the
//! eighteen-way method bodies.

use crate::error::Result;
use crate::varint::{varint_len, zigzag_encode};
use crate::wire::WireType;
use crate::{Decoder, Encoder};

/// One row of the scalar table: a schema type's wire framing, its Rust
/// representation, and the raw emit/parse operations.
pub trait Value {
    /// The Rust type carrying decoded values.
    type Native;
    /// How values of this type are framed on the wire.
    const WIRE_TYPE: WireType;

    /// Append the raw wire value (no tag).
    fn emit(pb: &mut Encoder, value: &Self::Native) -> Result<()>;

    /// Parse a value framed as the decoder's current wire type.
    fn parse(pb: &mut Decoder<'_>) -> Result<Self::Native>;
}

/// Types eligible for the packed repeated form.
pub trait Scalar: Value {
    /// Read one raw wire value from inside a packed payload.
    fn read(pb: &mut Decoder<'_>) -> Result<Self::Native>;

    /// Wire size of the raw value, used to size packed payloads.
    fn emitted_len(value: &Self::Native) -> usize;
}

/// Types protobuf allows as map keys: integers, bool, and strings.
pub trait MapKey: Value {}

/// Marker for protobuf `int32`.
pub struct Int32;
/// Marker for protobuf `int64`.
pub struct Int64;
/// Marker for protobuf `uint32`.
pub struct Uint32;
/// Marker for protobuf `uint64`.
pub struct Uint64;
/// Marker for protobuf `sint32` (zigzag).
pub struct Sint32;
/// Marker for protobuf `sint64` (zigzag).
pub struct Sint64;
/// Marker for protobuf `fixed32`.
pub struct Fixed32;
/// Marker for protobuf `fixed64`.
pub struct Fixed64;
/// Marker for protobuf `sfixed32`.
pub struct Sfixed32;
/// Marker for protobuf `sfixed64`.
pub struct Sfixed64;
/// Marker for protobuf `bool`.
pub struct Bool;
/// Marker for protobuf `enum`, carried as `i32`.
pub struct Enum;
/// Marker for protobuf `float`.
pub struct Float;
/// Marker for protobuf `double`.
pub struct Double;
/// Marker for protobuf `string`, carried as an owned `String`.
pub struct PbString;
/// Marker for protobuf `bytes`, carried as an owned `Vec<u8>`.
pub struct PbBytes;

impl Value for Int32 {
    type Native = i32;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &i32) -> Result<()> {
        // Negative values are sign-extended to 64 bits on the wire.
        pb.write_varint(i64::from(*value) as u64);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.parse_integer_value().map(|v| v as i32)
    }
}

impl Scalar for Int32 {
    fn read(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.read_varint().map(|v| v as i32)
    }

    fn emitted_len(value: &i32) -> usize {
        varint_len(i64::from(*value) as u64)
    }
}

impl Value for Int64 {
    type Native = i64;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &i64) -> Result<()> {
        pb.write_varint(*value as u64);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<i64> {
        pb.parse_integer_value().map(|v| v as i64)
    }
}

impl Scalar for Int64 {
    fn read(pb: &mut Decoder<'_>) -> Result<i64> {
        pb.read_varint().map(|v| v as i64)
    }

    fn emitted_len(value: &i64) -> usize {
        varint_len(*value as u64)
    }
}

impl Value for Uint32 {
    type Native = u32;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &u32) -> Result<()> {
        pb.write_varint(u64::from(*value));
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<u32> {
        pb.parse_integer_value().map(|v| v as u32)
    }
}

impl Scalar for Uint32 {
    fn read(pb: &mut Decoder<'_>) -> Result<u32> {
        pb.read_varint().map(|v| v as u32)
    }

    fn emitted_len(value: &u32) -> usize {
        varint_len(u64::from(*value))
    }
}

impl Value for Uint64 {
    type Native = u64;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &u64) -> Result<()> {
        pb.write_varint(*value);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<u64> {
        pb.parse_integer_value()
    }
}

impl Scalar for Uint64 {
    fn read(pb: &mut Decoder<'_>) -> Result<u64> {
        pb.read_varint()
    }

    fn emitted_len(value: &u64) -> usize {
        varint_len(*value)
    }
}

impl Value for Sint32 {
    type Native = i32;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &i32) -> Result<()> {
        pb.write_zigzag(i64::from(*value));
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.parse_zigzag_value().map(|v| v as i32)
    }
}

impl Scalar for Sint32 {
    fn read(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.read_zigzag().map(|v| v as i32)
    }

    fn emitted_len(value: &i32) -> usize {
        varint_len(zigzag_encode(i64::from(*value)))
    }
}

impl Value for Sint64 {
    type Native = i64;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &i64) -> Result<()> {
        pb.write_zigzag(*value);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<i64> {
        pb.parse_zigzag_value()
    }
}

impl Scalar for Sint64 {
    fn read(pb: &mut Decoder<'_>) -> Result<i64> {
        pb.read_zigzag()
    }

    fn emitted_len(value: &i64) -> usize {
        varint_len(zigzag_encode(*value))
    }
}

impl Value for Fixed32 {
    type Native = u32;
    const WIRE_TYPE: WireType = WireType::I32;

    fn emit(pb: &mut Encoder, value: &u32) -> Result<()> {
        pb.write_fixed32(*value);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<u32> {
        pb.parse_integer_value().map(|v| v as u32)
    }
}

impl Scalar for Fixed32 {
    fn read(pb: &mut Decoder<'_>) -> Result<u32> {
        pb.read_fixed32()
    }

    fn emitted_len(_value: &u32) -> usize {
        4
    }
}

impl Value for Fixed64 {
    type Native = u64;
    const WIRE_TYPE: WireType = WireType::I64;

    fn emit(pb: &mut Encoder, value: &u64) -> Result<()> {
        pb.write_fixed64(*value);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<u64> {
        pb.parse_integer_value()
    }
}

impl Scalar for Fixed64 {
    fn read(pb: &mut Decoder<'_>) -> Result<u64> {
        pb.read_fixed64()
    }

    fn emitted_len(_value: &u64) -> usize {
        8
    }
}

impl Value for Sfixed32 {
    type Native = i32;
    const WIRE_TYPE: WireType = WireType::I32;

    fn emit(pb: &mut Encoder, value: &i32) -> Result<()> {
        pb.write_fixed32(*value as u32);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.parse_integer_value().map(|v| v as i32)
    }
}

impl Scalar for Sfixed32 {
    fn read(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.read_fixed32().map(|v| v as i32)
    }

    fn emitted_len(_value: &i32) -> usize {
        4
    }
}

impl Value for Sfixed64 {
    type Native = i64;
    const WIRE_TYPE: WireType = WireType::I64;

    fn emit(pb: &mut Encoder, value: &i64) -> Result<()> {
        pb.write_fixed64(*value as u64);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<i64> {
        pb.parse_integer_value().map(|v| v as i64)
    }
}

impl Scalar for Sfixed64 {
    fn read(pb: &mut Decoder<'_>) -> Result<i64> {
        pb.read_fixed64().map(|v| v as i64)
    }

    fn emitted_len(_value: &i64) -> usize {
        8
    }
}

impl Value for Bool {
    type Native = bool;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &bool) -> Result<()> {
        pb.write_varint(u64::from(*value));
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<bool> {
        pb.parse_integer_value().map(|v| v != 0)
    }
}

impl Scalar for Bool {
    fn read(pb: &mut Decoder<'_>) -> Result<bool> {
        pb.read_varint().map(|v| v != 0)
    }

    fn emitted_len(_value: &bool) -> usize {
        1
    }
}

impl Value for Enum {
    type Native = i32;
    const WIRE_TYPE: WireType = WireType::Varint;

    fn emit(pb: &mut Encoder, value: &i32) -> Result<()> {
        pb.write_varint(i64::from(*value) as u64);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.parse_integer_value().map(|v| v as i32)
    }
}

impl Scalar for Enum {
    fn read(pb: &mut Decoder<'_>) -> Result<i32> {
        pb.read_varint().map(|v| v as i32)
    }

    fn emitted_len(value: &i32) -> usize {
        varint_len(i64::from(*value) as u64)
    }
}

impl Value for Float {
    type Native = f32;
    const WIRE_TYPE: WireType = WireType::I32;

    fn emit(pb: &mut Encoder, value: &f32) -> Result<()> {
        pb.write_float(*value);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<f32> {
        // Narrows when the field arrived as a double.
        pb.parse_fp_value().map(|v| v as f32)
    }
}

impl Scalar for Float {
    fn read(pb: &mut Decoder<'_>) -> Result<f32> {
        pb.read_float()
    }

    fn emitted_len(_value: &f32) -> usize {
        4
    }
}

impl Value for Double {
    type Native = f64;
    const WIRE_TYPE: WireType = WireType::I64;

    fn emit(pb: &mut Encoder, value: &f64) -> Result<()> {
        pb.write_double(*value);
        Ok(())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<f64> {
        pb.parse_fp_value()
    }
}

impl Scalar for Double {
    fn read(pb: &mut Decoder<'_>) -> Result<f64> {
        pb.read_double()
    }

    fn emitted_len(_value: &f64) -> usize {
        8
    }
}

impl Value for PbString {
    type Native = String;
    const WIRE_TYPE: WireType = WireType::Len;

    fn emit(pb: &mut Encoder, value: &String) -> Result<()> {
        pb.write_bytearray(value.as_bytes())
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<String> {
        pb.get_string().map(str::to_owned)
    }
}

impl Value for PbBytes {
    type Native = Vec<u8>;
    const WIRE_TYPE: WireType = WireType::Len;

    fn emit(pb: &mut Encoder, value: &Vec<u8>) -> Result<()> {
        pb.write_bytearray(value)
    }

    fn parse(pb: &mut Decoder<'_>) -> Result<Vec<u8>> {
        pb.get_bytes().map(<[u8]>::to_vec)
    }
}

impl MapKey for Int32 {}
impl MapKey for Int64 {}
impl MapKey for Uint32 {}
impl MapKey for Uint64 {}
impl MapKey for Sint32 {}
impl MapKey for Sint64 {}
impl MapKey for Fixed32 {}
impl MapKey for Fixed64 {}
impl MapKey for Sfixed32 {}
impl MapKey for Sfixed64 {}
impl MapKey for Bool {}
impl MapKey for PbString {}
