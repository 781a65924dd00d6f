//! Failure kinds surfaced by the encoder, the decoder, and generated code.

/// Alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while encoding or decoding.
///
/// Errors are fatal to the current top-level `encode`/`decode` call; callers
/// are expected to discard any partial output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input buffer ended in the middle of a value.
    #[error("unexpected end of buffer")]
    UnexpectedEof,

    /// A varint kept its continuation bit set past the 10th byte.
    #[error("more than 10 bytes in varint")]
    VarintTooLong,

    /// A length-delimited payload does not fit in 31 bits.
    #[error("length-delimited payload of {0} bytes exceeds 2^31-1")]
    LengthTooLong(u64),

    /// A decoded field tag yields a field number above `u32::MAX`.
    #[error("field number {0} does not fit in 32 bits")]
    InvalidFieldNum(u64),

    /// A typed read was attempted against an incompatible wire type.
    #[error("can't parse {expected} value from wire type {found}")]
    WireTypeMismatch {
        expected: &'static str,
        found: u8,
    },

    /// Wire type 3 or 4 (deprecated groups) or a value above 5.
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),

    /// A `required` field was absent from a decoded message.
    #[error("decoded message has no required field {0}")]
    MissingRequiredField(&'static str),

    /// A `string` field's payload is not valid UTF-8.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedWireType(7);
        assert_eq!(format!("{err}"), "unsupported wire type 7");

        let err = Error::WireTypeMismatch {
            expected: "integer",
            found: 2,
        };
        assert_eq!(format!("{err}"), "can't parse integer value from wire type 2");

        let err = Error::MissingRequiredField("MainMessage.req_msg");
        assert_eq!(
            format!("{err}"),
            "decoded message has no required field MainMessage.req_msg"
        );

        let err = Error::LengthTooLong(1 << 32);
        assert_eq!(
            format!("{err}"),
            "length-delimited payload of 4294967296 bytes exceeds 2^31-1"
        );
    }
}
