//! Framing-level constants and the wire-type tag.

use crate::error::Error;

/// Maximum encoded size of a 64-bit varint.
pub const MAX_VARINT_SIZE: usize = 10;

/// Size of the fixed-width length code reserved for back-patched
/// length-delimited fields. Five bytes hold any 31-bit length.
pub const MAX_LENGTH_CODE_SIZE: usize = 5;

/// Largest permitted length of a length-delimited payload, on both the
/// encode and the decode path.
pub const MAX_LENGTH: u64 = (1 << 31) - 1;

/// How a field's value is framed on the wire.
///
/// Each field starts with a varint tag whose low three bits carry one of
/// these values and whose upper bits carry the field number.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    /// Variable-length integer: `int32`, `int64`, `uint32`, `uint64`,
    /// `sint32`, `sint64`, `bool`, `enum`.
    Varint = 0,
    /// Eight little-endian bytes: `fixed64`, `sfixed64`, `double`.
    I64 = 1,
    /// Varint length followed by that many bytes: `string`, `bytes`,
    /// nested messages, packed repeated fields, map entries.
    Len = 2,
    /// Group start (proto2, recognized but unsupported).
    SGroup = 3,
    /// Group end (proto2, recognized but unsupported).
    EGroup = 4,
    /// Four little-endian bytes: `fixed32`, `sfixed32`, `float`.
    I32 = 5,
}

static_assertions::assert_eq_size!(WireType, u8);

impl WireType {
    /// Decode the low three bits of a field tag.
    pub(crate) fn from_tag_bits(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::I64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::SGroup),
            4 => Ok(WireType::EGroup),
            5 => Ok(WireType::I32),
            other => Err(Error::UnsupportedWireType(other)),
        }
    }

    /// The raw three-bit value stored in a field tag.
    pub const fn into_val(self) -> u8 {
        self as u8
    }
}
