//! The streaming encoder: an owned, growing output buffer plus the `put_*`
//! method family that generated message code calls.

use std::collections::HashMap;
use std::hash::Hash;

use bytes::BufMut;

use crate::error::{Error, Result};
use crate::value::{MapKey, Scalar, Value};
use crate::varint::{encode_varint, zigzag_encode};
use crate::wire::{WireType, MAX_LENGTH, MAX_LENGTH_CODE_SIZE};
use crate::ProtoEncode;

/// Serializes protobuf fields into an owned byte buffer.
///
/// The write cursor is the buffer's length and the buffer end is its
/// capacity; growth doubles the allocation and adds the requested increment.
/// [`Encoder::result`] hands the accumulated bytes to the caller and resets
/// the encoder for reuse.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Encoder {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the collected buffer and start from scratch.
    pub fn result(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    pub(crate) fn write_varint(&mut self, value: u64) {
        encode_varint(value, &mut self.buf);
    }

    pub(crate) fn write_zigzag(&mut self, value: i64) {
        self.write_varint(zigzag_encode(value));
    }

    pub(crate) fn write_fixed32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    pub(crate) fn write_fixed64(&mut self, value: u64) {
        self.buf.put_u64_le(value);
    }

    pub(crate) fn write_float(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    pub(crate) fn write_double(&mut self, value: f64) {
        self.buf.put_f64_le(value);
    }

    /// Write a length-prefixed byte run.
    pub(crate) fn write_bytearray(&mut self, value: &[u8]) -> Result<()> {
        if value.len() as u64 > MAX_LENGTH {
            return Err(Error::LengthTooLong(value.len() as u64));
        }
        self.write_varint(value.len() as u64);
        self.buf.extend_from_slice(value);
        Ok(())
    }

    /// Write the field tag: `(field_num << 3) | wire_type`, varint-encoded.
    pub(crate) fn write_field_tag(&mut self, field_num: u32, wire_type: WireType) {
        self.write_varint(u64::from(field_num) << 3 | u64::from(wire_type.into_val()));
    }

    /// Open a length-delimited region whose size is not yet known.
    ///
    /// Reserves [`MAX_LENGTH_CODE_SIZE`] bytes for the length code and
    /// returns the payload start position to pass to
    /// [`Encoder::commit_length_delimited`].
    pub fn start_length_delimited(&mut self) -> usize {
        self.buf.resize(self.buf.len() + MAX_LENGTH_CODE_SIZE, 0);
        self.buf.len()
    }

    /// Close a length-delimited region by back-patching its length.
    ///
    /// The length is always serialized as a fixed five-byte varint so the
    /// reserved space never shrinks.
    pub fn commit_length_delimited(&mut self, start_pos: usize) -> Result<()> {
        let field_len = (self.buf.len() - start_pos) as u64;
        if field_len > MAX_LENGTH {
            return Err(Error::LengthTooLong(field_len));
        }
        self.write_varint_at(start_pos - MAX_LENGTH_CODE_SIZE, MAX_LENGTH_CODE_SIZE, field_len);
        Ok(())
    }

    /// Overwrite `size` bytes at `pos` with a fixed-width varint: the
    /// continuation bit stays set on all but the last byte, even for small
    /// values.
    fn write_varint_at(&mut self, pos: usize, size: usize, mut value: u64) {
        for byte in &mut self.buf[pos..pos + size - 1] {
            *byte = (value & 0x7f) as u8 | 0x80;
            value >>= 7;
        }
        self.buf[pos + size - 1] = value as u8;
    }

    /// Emit one tagged field of type `V`.
    pub fn put<V: Value>(&mut self, field_num: u32, value: &V::Native) -> Result<()> {
        self.write_field_tag(field_num, V::WIRE_TYPE);
        V::emit(self, value)
    }

    /// Emit one tagged field per element (the unpacked repeated form).
    pub fn put_repeated<V: Value>(&mut self, field_num: u32, values: &[V::Native]) -> Result<()> {
        for value in values {
            self.put::<V>(field_num, value)?;
        }
        Ok(())
    }

    /// Emit a packed repeated field: a single length-delimited payload
    /// holding the concatenated raw wire values.
    pub fn put_packed<V: Scalar>(&mut self, field_num: u32, values: &[V::Native]) -> Result<()> {
        let payload_len: usize = values.iter().map(V::emitted_len).sum();
        if payload_len as u64 > MAX_LENGTH {
            return Err(Error::LengthTooLong(payload_len as u64));
        }
        self.write_field_tag(field_num, WireType::Len);
        self.write_varint(payload_len as u64);
        for value in values {
            V::emit(self, value)?;
        }
        Ok(())
    }

    /// Emit a nested message as a length-delimited field.
    pub fn put_message<M: ProtoEncode>(&mut self, field_num: u32, msg: &M) -> Result<()> {
        self.write_field_tag(field_num, WireType::Len);
        let start_pos = self.start_length_delimited();
        msg.encode(self)?;
        self.commit_length_delimited(start_pos)
    }

    /// Repeated messages are always unpacked.
    pub fn put_repeated_message<M: ProtoEncode>(
        &mut self,
        field_num: u32,
        msgs: &[M],
    ) -> Result<()> {
        for msg in msgs {
            self.put_message(field_num, msg)?;
        }
        Ok(())
    }

    /// Emit one length-delimited entry per pair: field 1 carries the key,
    /// field 2 the value.
    pub fn put_map<K, V>(
        &mut self,
        field_num: u32,
        map: &HashMap<K::Native, V::Native>,
    ) -> Result<()>
    where
        K: MapKey,
        K::Native: Eq + Hash,
        V: Value,
    {
        for (key, value) in map {
            self.write_field_tag(field_num, WireType::Len);
            let start_pos = self.start_length_delimited();
            self.put::<K>(1, key)?;
            self.put::<V>(2, value)?;
            self.commit_length_delimited(start_pos)?;
        }
        Ok(())
    }

    /// Map variant whose values are nested messages.
    pub fn put_map_message<K, M>(
        &mut self,
        field_num: u32,
        map: &HashMap<K::Native, M>,
    ) -> Result<()>
    where
        K: MapKey,
        K::Native: Eq + Hash,
        M: ProtoEncode,
    {
        for (key, msg) in map {
            self.write_field_tag(field_num, WireType::Len);
            let start_pos = self.start_length_delimited();
            self.put::<K>(1, key)?;
            self.put_message(2, msg)?;
            self.commit_length_delimited(start_pos)?;
        }
        Ok(())
    }

    /// Emit a tagged `string` field.
    pub fn put_string(&mut self, field_num: u32, value: &str) -> Result<()> {
        self.write_field_tag(field_num, WireType::Len);
        self.write_bytearray(value.as_bytes())
    }

    /// Emit a tagged `bytes` field.
    pub fn put_bytes(&mut self, field_num: u32, value: &[u8]) -> Result<()> {
        self.write_field_tag(field_num, WireType::Len);
        self.write_bytearray(value)
    }

    pub fn put_repeated_string<S: AsRef<str>>(
        &mut self,
        field_num: u32,
        values: &[S],
    ) -> Result<()> {
        for value in values {
            self.put_string(field_num, value.as_ref())?;
        }
        Ok(())
    }

    pub fn put_repeated_bytes<B: AsRef<[u8]>>(
        &mut self,
        field_num: u32,
        values: &[B],
    ) -> Result<()> {
        for value in values {
            self.put_bytes(field_num, value.as_ref())?;
        }
        Ok(())
    }
}

/// Expand the per-type `put_*` surface from the scalar table.
macro_rules! named_scalar_puts {
    ($($marker:ident => $put:ident, $put_repeated:ident, $put_packed:ident;)+) => {
        impl Encoder {$(
            #[doc = concat!("Emit one tagged field via the [`", stringify!($marker), "`] table entry.")]
            pub fn $put(
                &mut self,
                field_num: u32,
                value: <$marker as Value>::Native,
            ) -> Result<()> {
                self.put::<$marker>(field_num, &value)
            }

            pub fn $put_repeated(
                &mut self,
                field_num: u32,
                values: &[<$marker as Value>::Native],
            ) -> Result<()> {
                self.put_repeated::<$marker>(field_num, values)
            }

            pub fn $put_packed(
                &mut self,
                field_num: u32,
                values: &[<$marker as Value>::Native],
            ) -> Result<()> {
                self.put_packed::<$marker>(field_num, values)
            }
        )+}
    };
}

use crate::value::{
    Bool, Double, Enum, Fixed32, Fixed64, Float, Int32, Int64, Sfixed32, Sfixed64, Sint32, Sint64,
    Uint32, Uint64,
};

named_scalar_puts! {
    Int32    => put_int32,    put_repeated_int32,    put_packed_int32;
    Int64    => put_int64,    put_repeated_int64,    put_packed_int64;
    Uint32   => put_uint32,   put_repeated_uint32,   put_packed_uint32;
    Uint64   => put_uint64,   put_repeated_uint64,   put_packed_uint64;
    Sint32   => put_sint32,   put_repeated_sint32,   put_packed_sint32;
    Sint64   => put_sint64,   put_repeated_sint64,   put_packed_sint64;
    Fixed32  => put_fixed32,  put_repeated_fixed32,  put_packed_fixed32;
    Fixed64  => put_fixed64,  put_repeated_fixed64,  put_packed_fixed64;
    Sfixed32 => put_sfixed32, put_repeated_sfixed32, put_packed_sfixed32;
    Sfixed64 => put_sfixed64, put_repeated_sfixed64, put_packed_sfixed64;
    Bool     => put_bool,     put_repeated_bool,     put_packed_bool;
    Enum     => put_enum,     put_repeated_enum,     put_packed_enum;
    Float    => put_float,    put_repeated_float,    put_packed_float;
    Double   => put_double,   put_repeated_double,   put_packed_double;
}
