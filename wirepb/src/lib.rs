//! Streaming encoder and decoder for the [protobuf](https://protobuf.dev)
//! wire format.
//!
//! The two entry points are [`Encoder`] and [`Decoder`]. An [`Encoder`] owns a
//! growing byte buffer and exposes a `put_*` method per protobuf scalar type;
//! a [`Decoder`] borrows an input byte range and exposes the matching `get_*`
//! methods plus the framing loop ([`Decoder::get_next_field`] /
//! [`Decoder::skip_field`]) that generated message code is built from.
//!
//! Message types implement [`ProtoEncode`] and [`ProtoDecode`]; the
//! free functions [`encode`] and [`decode`] wrap a whole top-level message.
//!
//! ```
//! use wirepb::{Decoder, Encoder};
//!
//! let mut pb = Encoder::new();
//! pb.put_bool(1, true).unwrap();
//! pb.put_string(2, "testing").unwrap();
//! let bytes = pb.result();
//!
//! let mut pb = Decoder::new(&bytes);
//! while pb.get_next_field().unwrap() {
//!     match pb.field_num {
//!         1 => assert!(pb.get_bool().unwrap()),
//!         2 => assert_eq!(pb.get_string().unwrap(), "testing"),
//!         _ => pb.skip_field().unwrap(),
//!     }
//! }
//! ```

mod decoder;
mod encoder;
pub mod error;
pub mod value;
mod varint;
pub mod wire;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::Error;

use error::Result;

/// A message that can be serialized through an [`Encoder`].
pub trait ProtoEncode {
    /// Append every field of this message to the encoder, in schema order.
    fn encode(&self, pb: &mut Encoder) -> Result<()>;
}

/// A message that can be parsed out of a [`Decoder`].
pub trait ProtoDecode: Default {
    /// Merge the fields found in `pb` into `self`, following protobuf
    /// last-one-wins semantics for singular fields.
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()>;
}

/// Serialize a whole message and return the wire bytes.
pub fn encode<M: ProtoEncode>(msg: &M) -> Result<Vec<u8>> {
    let mut pb = Encoder::new();
    msg.encode(&mut pb)?;
    Ok(pb.result())
}

/// Parse a whole message from `buffer`.
///
/// The returned message owns its data; `buffer` only has to outlive the call.
pub fn decode<M: ProtoDecode>(buffer: &[u8]) -> Result<M> {
    let mut pb = Decoder::new(buffer);
    let mut msg = M::default();
    msg.decode(&mut pb)?;
    Ok(msg)
}
