//! The streaming decoder: a borrowed view over the input bytes, the framing
//! loop, and the `get_*` method family.

use std::collections::HashMap;
use std::hash::Hash;

use bytes::Buf;

use crate::error::{Error, Result};
use crate::value::{MapKey, Scalar, Value};
use crate::varint::{decode_varint, zigzag_decode};
use crate::wire::{WireType, MAX_LENGTH};
use crate::ProtoDecode;

/// Parses protobuf fields out of a borrowed byte range.
///
/// The input bytes must stay alive and unchanged for the decoder's lifetime;
/// views handed out by [`Decoder::get_string`] and [`Decoder::get_bytes`]
/// share the input's storage and are valid exactly as long as it is.
///
/// `field_num` and `wire_type` describe the current field and are only
/// meaningful between a successful [`Decoder::get_next_field`] and the
/// consumption (or skip) of that field's value.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    /// Field number of the current field.
    pub field_num: u32,
    /// Wire type of the current field.
    pub wire_type: WireType,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Decoder {
            buf,
            field_num: 0,
            wire_type: WireType::Varint,
        }
    }

    /// True once the whole input has been consumed.
    pub fn eof(&self) -> bool {
        self.buf.is_empty()
    }

    /// Split off the next `bytes` bytes of input.
    fn take(&mut self, bytes: usize) -> Result<&'a [u8]> {
        if self.buf.len() < bytes {
            return Err(Error::UnexpectedEof);
        }
        let (head, rest) = self.buf.split_at(bytes);
        self.buf = rest;
        Ok(head)
    }

    pub(crate) fn read_varint(&mut self) -> Result<u64> {
        decode_varint(&mut self.buf)
    }

    pub(crate) fn read_zigzag(&mut self) -> Result<i64> {
        Ok(zigzag_decode(self.read_varint()?))
    }

    pub(crate) fn read_fixed32(&mut self) -> Result<u32> {
        if self.buf.remaining() < 4 {
            return Err(Error::UnexpectedEof);
        }
        Ok(self.buf.get_u32_le())
    }

    pub(crate) fn read_fixed64(&mut self) -> Result<u64> {
        if self.buf.remaining() < 8 {
            return Err(Error::UnexpectedEof);
        }
        Ok(self.buf.get_u64_le())
    }

    pub(crate) fn read_float(&mut self) -> Result<f32> {
        self.read_fixed32().map(f32::from_bits)
    }

    pub(crate) fn read_double(&mut self) -> Result<f64> {
        self.read_fixed64().map(f64::from_bits)
    }

    /// Length prefix of a length-delimited region, bounds-checked.
    fn read_length(&mut self) -> Result<usize> {
        let len = self.read_varint()?;
        if len > MAX_LENGTH {
            return Err(Error::LengthTooLong(len));
        }
        Ok(len as usize)
    }

    /// Read the next field tag, filling in `field_num` and `wire_type`.
    ///
    /// Returns `Ok(false)` at the end of the input.
    pub fn get_next_field(&mut self) -> Result<bool> {
        if self.eof() {
            return Ok(false);
        }

        let tag = self.read_varint()?;
        let field_num = tag >> 3;
        if field_num > u64::from(u32::MAX) {
            return Err(Error::InvalidFieldNum(field_num));
        }
        self.wire_type = WireType::from_tag_bits((tag & 0b111) as u8)?;
        self.field_num = field_num as u32;
        Ok(true)
    }

    /// Discard the current field's value based on its wire type.
    pub fn skip_field(&mut self) -> Result<()> {
        match self.wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::I32 => {
                self.take(4)?;
            }
            WireType::I64 => {
                self.take(8)?;
            }
            WireType::Len => {
                let len = self.read_length()?;
                self.take(len)?;
            }
            WireType::SGroup | WireType::EGroup => {
                return Err(Error::UnsupportedWireType(self.wire_type.into_val()));
            }
        }
        Ok(())
    }

    /// Read an integer value regardless of how it was framed: varints are
    /// taken as-is, fixed widths are zero-extended.
    pub(crate) fn parse_integer_value(&mut self) -> Result<u64> {
        match self.wire_type {
            WireType::Varint => self.read_varint(),
            WireType::I64 => self.read_fixed64(),
            WireType::I32 => self.read_fixed32().map(u64::from),
            other => Err(Error::WireTypeMismatch {
                expected: "integer",
                found: other.into_val(),
            }),
        }
    }

    /// Read a zigzag integer: varints go through zigzag decoding, fixed
    /// widths are interpreted as already-signed values.
    pub(crate) fn parse_zigzag_value(&mut self) -> Result<i64> {
        match self.wire_type {
            WireType::Varint => self.read_zigzag(),
            WireType::I64 => self.read_fixed64().map(|v| v as i64),
            WireType::I32 => self.read_fixed32().map(|v| i64::from(v as i32)),
            other => Err(Error::WireTypeMismatch {
                expected: "zigzag integer",
                found: other.into_val(),
            }),
        }
    }

    /// Read a floating-point value from either fixed width.
    pub(crate) fn parse_fp_value(&mut self) -> Result<f64> {
        match self.wire_type {
            WireType::I64 => self.read_double(),
            WireType::I32 => self.read_float().map(f64::from),
            other => Err(Error::WireTypeMismatch {
                expected: "floating-point",
                found: other.into_val(),
            }),
        }
    }

    /// Read a length-delimited payload as a view into the input.
    pub(crate) fn parse_bytearray(&mut self) -> Result<&'a [u8]> {
        if self.wire_type != WireType::Len {
            return Err(Error::WireTypeMismatch {
                expected: "length-delimited",
                found: self.wire_type.into_val(),
            });
        }
        let len = self.read_length()?;
        self.take(len)
    }

    /// Parse the current field as type `V`.
    pub fn get<V: Value>(&mut self) -> Result<V::Native> {
        V::parse(self)
    }

    /// Parse a repeated scalar field, accepting both wire forms: a
    /// length-delimited payload is read as the packed form (raw values until
    /// sub-buffer EOF), anything else appends a single parsed value.
    pub fn get_repeated<V: Scalar>(&mut self, values: &mut Vec<V::Native>) -> Result<()> {
        if self.wire_type == WireType::Len {
            let mut sub = Decoder::new(self.parse_bytearray()?);
            while !sub.eof() {
                values.push(V::read(&mut sub)?);
            }
        } else {
            values.push(V::parse(self)?);
        }
        Ok(())
    }

    /// Parse a `string` field as a view sharing the input's storage.
    pub fn get_string(&mut self) -> Result<&'a str> {
        let bytes = self.parse_bytearray()?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }

    /// Parse a `bytes` field as a view sharing the input's storage.
    pub fn get_bytes(&mut self) -> Result<&'a [u8]> {
        self.parse_bytearray()
    }

    /// Parse a nested message out of a length-delimited payload.
    pub fn get_message<M: ProtoDecode>(&mut self) -> Result<M> {
        let mut sub = Decoder::new(self.parse_bytearray()?);
        let mut msg = M::default();
        msg.decode(&mut sub)?;
        Ok(msg)
    }

    pub fn get_repeated_message<M: ProtoDecode>(&mut self, values: &mut Vec<M>) -> Result<()> {
        values.push(self.get_message()?);
        Ok(())
    }

    /// Decode one map entry and insert it if both key and value were present.
    ///
    /// Unknown entry fields are skipped; duplicate keys follow last-one-wins.
    pub fn get_map<K, V>(&mut self, map: &mut HashMap<K::Native, V::Native>) -> Result<()>
    where
        K: MapKey,
        K::Native: Eq + Hash,
        V: Value,
    {
        let mut sub = Decoder::new(self.parse_bytearray()?);
        let mut key = None;
        let mut value = None;

        while sub.get_next_field()? {
            match sub.field_num {
                1 => key = Some(K::parse(&mut sub)?),
                2 => value = Some(V::parse(&mut sub)?),
                _ => sub.skip_field()?,
            }
        }

        if let (Some(key), Some(value)) = (key, value) {
            map.insert(key, value);
        }
        Ok(())
    }

    /// Map variant whose values are nested messages.
    pub fn get_map_message<K, M>(&mut self, map: &mut HashMap<K::Native, M>) -> Result<()>
    where
        K: MapKey,
        K::Native: Eq + Hash,
        M: ProtoDecode,
    {
        let mut sub = Decoder::new(self.parse_bytearray()?);
        let mut key = None;
        let mut value = None;

        while sub.get_next_field()? {
            match sub.field_num {
                1 => key = Some(K::parse(&mut sub)?),
                2 => value = Some(sub.get_message()?),
                _ => sub.skip_field()?,
            }
        }

        if let (Some(key), Some(value)) = (key, value) {
            map.insert(key, value);
        }
        Ok(())
    }
}

/// Expand the per-type `get_*` surface from the scalar table.
macro_rules! named_scalar_gets {
    ($($marker:ident => $get:ident, $get_repeated:ident;)+) => {
        impl<'a> Decoder<'a> {$(
            #[doc = concat!("Parse the current field via the [`", stringify!($marker), "`] table entry.")]
            pub fn $get(&mut self) -> Result<<$marker as Value>::Native> {
                $marker::parse(self)
            }

            pub fn $get_repeated(
                &mut self,
                values: &mut Vec<<$marker as Value>::Native>,
            ) -> Result<()> {
                self.get_repeated::<$marker>(values)
            }
        )+}
    };
}

use crate::value::{
    Bool, Double, Enum, Fixed32, Fixed64, Float, Int32, Int64, Sfixed32, Sfixed64, Sint32, Sint64,
    Uint32, Uint64,
};

named_scalar_gets! {
    Int32    => get_int32,    get_repeated_int32;
    Int64    => get_int64,    get_repeated_int64;
    Uint32   => get_uint32,   get_repeated_uint32;
    Uint64   => get_uint64,   get_repeated_uint64;
    Sint32   => get_sint32,   get_repeated_sint32;
    Sint64   => get_sint64,   get_repeated_sint64;
    Fixed32  => get_fixed32,  get_repeated_fixed32;
    Fixed64  => get_fixed64,  get_repeated_fixed64;
    Sfixed32 => get_sfixed32, get_repeated_sfixed32;
    Sfixed64 => get_sfixed64, get_repeated_sfixed64;
    Bool     => get_bool,     get_repeated_bool;
    Enum     => get_enum,     get_repeated_enum;
    Float    => get_float,    get_repeated_float;
    Double   => get_double,   get_repeated_double;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varint::encode_varint;
    use crate::Encoder;

    #[test]
    fn test_single_bool() {
        let mut pb = Decoder::new(&[0x08, 0x01]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.field_num, 1);
        assert_eq!(pb.wire_type, WireType::Varint);
        assert!(pb.get_bool().unwrap());
        assert!(!pb.get_next_field().unwrap());
    }

    #[test]
    fn test_zigzag_sint32() {
        let mut pb = Decoder::new(&[0x08, 0x01]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_sint32().unwrap(), -1);
    }

    #[test]
    fn test_packed_int32() {
        let mut pb = Decoder::new(&[0x1a, 0x04, 0x01, 0x96, 0x01, 0x03]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.field_num, 3);

        let mut values = Vec::new();
        pb.get_repeated_int32(&mut values).unwrap();
        assert_eq!(values, [1, 150, 3]);
    }

    #[test]
    fn test_repeated_accepts_unpacked_form() {
        // Field 3 as three separate varint fields.
        let mut pb = Decoder::new(&[0x18, 0x01, 0x18, 0x96, 0x01, 0x18, 0x03]);
        let mut values = Vec::new();
        while pb.get_next_field().unwrap() {
            pb.get_repeated_int32(&mut values).unwrap();
        }
        assert_eq!(values, [1, 150, 3]);
    }

    #[test]
    fn test_string_view() {
        let input = [0x12, 0x07, 0x74, 0x65, 0x73, 0x74, 0x69, 0x6e, 0x67];
        let mut pb = Decoder::new(&input);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.field_num, 2);
        assert_eq!(pb.get_string().unwrap(), "testing");
    }

    #[test]
    fn test_string_invalid_utf8() {
        let mut pb = Decoder::new(&[0x12, 0x02, 0xff, 0xfe]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_string(), Err(Error::InvalidUtf8));
    }

    #[test]
    fn test_map_entries() {
        let mut map = HashMap::new();
        map.insert(1, 1234);
        map.insert(2, 4321);

        let mut pb = Encoder::new();
        pb.put_map::<crate::value::Int32, crate::value::Int32>(15, &map)
            .unwrap();
        let bytes = pb.result();

        let mut decoded = HashMap::new();
        let mut pb = Decoder::new(&bytes);
        while pb.get_next_field().unwrap() {
            assert_eq!(pb.field_num, 15);
            pb.get_map::<crate::value::Int32, crate::value::Int32>(&mut decoded)
                .unwrap();
        }
        assert_eq!(decoded, map);
    }

    #[test]
    fn test_map_entry_ignores_unknown_fields() {
        // Entry payload: key=7, value=9, plus an unknown field 3.
        let mut entry = Encoder::new();
        entry.put_int32(1, 7).unwrap();
        entry.put_int32(2, 9).unwrap();
        entry.put_string(3, "junk").unwrap();
        let payload = entry.result();

        let mut pb = Encoder::new();
        pb.write_field_tag(15, WireType::Len);
        pb.write_bytearray(&payload).unwrap();
        let bytes = pb.result();

        let mut map = HashMap::new();
        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        pb.get_map::<crate::value::Int32, crate::value::Int32>(&mut map)
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&7], 9);
    }

    #[test]
    fn test_map_entry_missing_value_is_dropped() {
        let mut entry = Encoder::new();
        entry.put_int32(1, 7).unwrap();
        let payload = entry.result();

        let mut pb = Encoder::new();
        pb.write_field_tag(15, WireType::Len);
        pb.write_bytearray(&payload).unwrap();
        let bytes = pb.result();

        let mut map: HashMap<i32, i32> = HashMap::new();
        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        pb.get_map::<crate::value::Int32, crate::value::Int32>(&mut map)
            .unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_skip_unknown_fields() {
        let mut pb = Encoder::new();
        pb.put_uint32(1, 10).unwrap();
        pb.put_fixed32(2, 20).unwrap();
        pb.put_fixed64(3, 30).unwrap();
        pb.put_string(4, "skip me").unwrap();
        pb.put_uint32(5, 50).unwrap();
        let bytes = pb.result();

        let mut pb = Decoder::new(&bytes);
        let mut seen = Vec::new();
        while pb.get_next_field().unwrap() {
            match pb.field_num {
                5 => seen.push(pb.get_uint32().unwrap()),
                _ => pb.skip_field().unwrap(),
            }
        }
        assert_eq!(seen, [50]);
    }

    #[test]
    fn test_skip_group_fails() {
        // Field 1 with wire type 3 (SGroup).
        let mut pb = Decoder::new(&[0x0b]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.skip_field(), Err(Error::UnsupportedWireType(3)));
    }

    #[test]
    fn test_wire_type_out_of_range() {
        // Field 1 with wire type 6.
        let mut pb = Decoder::new(&[0x0e]);
        assert_eq!(pb.get_next_field(), Err(Error::UnsupportedWireType(6)));
    }

    #[test]
    fn test_field_number_overflow() {
        // Tag whose field number is u32::MAX + 1.
        let mut buf = Vec::new();
        encode_varint((u64::from(u32::MAX) + 1) << 3, &mut buf);
        let mut pb = Decoder::new(&buf);
        assert_eq!(
            pb.get_next_field(),
            Err(Error::InvalidFieldNum(u64::from(u32::MAX) + 1))
        );
    }

    #[test]
    fn test_cross_wire_integer_tolerance() {
        // uint32 read from a FIXED64 framed field.
        let mut pb = Encoder::new();
        pb.put_fixed64(1, 99).unwrap();
        let bytes = pb.result();

        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_uint32().unwrap(), 99);

        // int64 read from a FIXED32 framed field, zero-extended.
        let mut pb = Encoder::new();
        pb.put_fixed32(1, u32::MAX).unwrap();
        let bytes = pb.result();

        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_int64().unwrap(), i64::from(u32::MAX));
    }

    #[test]
    fn test_cross_wire_zigzag_fixed_is_already_signed() {
        // sint32 arriving as FIXED32 takes the raw value as signed.
        let mut pb = Encoder::new();
        pb.put_sfixed32(1, -5).unwrap();
        let bytes = pb.result();

        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_sint32().unwrap(), -5);
    }

    #[test]
    fn test_cross_wire_float_widths() {
        // double read from a FIXED32 field widens the f32.
        let mut pb = Encoder::new();
        pb.put_float(1, 1.5).unwrap();
        let bytes = pb.result();

        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_double().unwrap(), 1.5);

        // float read from a FIXED64 field narrows the f64.
        let mut pb = Encoder::new();
        pb.put_double(1, 2.25).unwrap();
        let bytes = pb.result();

        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_float().unwrap(), 2.25);
    }

    #[test]
    fn test_wiretype_mismatch() {
        // A varint field is not a valid string.
        let mut pb = Decoder::new(&[0x08, 0x01]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(
            pb.get_string(),
            Err(Error::WireTypeMismatch {
                expected: "length-delimited",
                found: 0,
            })
        );

        // A length-delimited field is not a valid float.
        let mut pb = Decoder::new(&[0x12, 0x00]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(
            pb.get_float(),
            Err(Error::WireTypeMismatch {
                expected: "floating-point",
                found: 2,
            })
        );
    }

    #[test]
    fn test_length_too_long() {
        let mut buf = vec![0x12];
        encode_varint(1 << 31, &mut buf);
        let mut pb = Decoder::new(&buf);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_string(), Err(Error::LengthTooLong(1 << 31)));
    }

    #[test]
    fn test_truncated_payload() {
        // Length says 5, only 2 bytes follow.
        let mut pb = Decoder::new(&[0x12, 0x05, 0x61, 0x62]);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_string(), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_five_byte_length_code_accepted() {
        // A field framed with the encoder's back-patched length decodes the
        // same as a minimally framed one.
        let mut pb = Encoder::new();
        pb.write_field_tag(1, WireType::Len);
        let start = pb.start_length_delimited();
        pb.write_varint(42);
        pb.commit_length_delimited(start).unwrap();
        let bytes = pb.result();

        let mut pb = Decoder::new(&bytes);
        assert!(pb.get_next_field().unwrap());
        assert_eq!(pb.get_bytes().unwrap(), [42]);
        assert!(pb.eof());
    }
}
