//! Error type for descriptor handling and code generation.

/// Errors that can occur while decoding a descriptor set or generating code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The descriptor set failed to decode.
    #[error("failed to decode descriptor set: {0}")]
    Decode(#[from] wirepb::Error),

    /// The descriptor set holds no file descriptors.
    #[error("descriptor set contains no files")]
    EmptyDescriptorSet,

    /// A message or field descriptor is missing its name.
    #[error("missing name in descriptor")]
    MissingName,

    /// A field descriptor is missing its field number.
    #[error("field {0} has no number")]
    MissingFieldNumber(String),

    /// A field descriptor carries an out-of-range type value.
    #[error("field {0} has invalid type {1} (expected 1-18)")]
    InvalidFieldType(String, i32),

    /// A message or enum field is missing its type name.
    #[error("field {0} has no type name")]
    MissingTypeName(String),

    /// A template referenced more arguments than were supplied.
    #[error("template referenced argument {index} but only {count} were supplied")]
    TemplateArgument { index: usize, count: usize },
}
