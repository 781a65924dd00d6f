//! `wirepb-gen` turns a compiled protobuf schema (a serialized
//! `FileDescriptorSet`, as produced by `protoc --descriptor_set_out`) into
//! Rust message types with encode/decode routines built on [`wirepb`].
//!
//! The descriptor set itself is decoded with `wirepb`, so the crate is also
//! the reference consumer of the codec it generates calls to.
//!
//! ```no_run
//! use wirepb_gen::{generate, Options};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("schema.pbs")?;
//! let fds: wirepb_gen::descriptor::FileDescriptorSet = wirepb::decode(&bytes)?;
//! let generated = generate(&Options::default(), &fds, "schema.pbs")?;
//! print!("{}", generated.code);
//! # Ok(())
//! # }
//! ```

mod codegen;
mod config;
pub mod descriptor;
mod error;
pub mod tmpl;

pub use codegen::{generate, Generated};
pub use config::Options;
pub use error::Error;
