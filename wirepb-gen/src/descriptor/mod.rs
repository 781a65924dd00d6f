//! In-memory model of `google/protobuf/descriptor.proto`, restricted to the
//! subset the generator consumes.
//!
//! The records are decoded from a serialized `FileDescriptorSet` by the
//! `wirepb` codec itself (see `decode.rs`); unknown descriptor fields are
//! skipped. Presence of non-repeated fields is folded into `Option`
//! containers.

mod decode;

/// A collection of file descriptors. `google.protobuf.FileDescriptorSet`.
#[derive(Debug, Clone, Default)]
pub struct FileDescriptorSet {
    /// The file descriptors. Field 1.
    pub file: Vec<FileDescriptorProto>,
}

/// Describes a complete `.proto` file. `google.protobuf.FileDescriptorProto`.
#[derive(Debug, Clone, Default)]
pub struct FileDescriptorProto {
    /// File name, relative to the root of the source tree. Field 1.
    pub name: Option<String>,
    /// Package name. Field 2.
    pub package: Option<String>,
    /// Top-level message definitions. Field 4.
    pub message_type: Vec<DescriptorProto>,
    /// Top-level enum definitions. Field 5.
    pub enum_type: Vec<EnumDescriptorProto>,
}

/// Describes a message type. `google.protobuf.DescriptorProto`.
#[derive(Debug, Clone, Default)]
pub struct DescriptorProto {
    /// Message name. Field 1. Required.
    pub name: Option<String>,
    /// Fields of the message. Field 2.
    pub field: Vec<FieldDescriptorProto>,
    /// Nested message types (including synthetic map entries). Field 3.
    pub nested_type: Vec<DescriptorProto>,
    /// Nested enum types. Field 4.
    pub enum_type: Vec<EnumDescriptorProto>,
    /// Message options. Field 7.
    pub options: Option<MessageOptions>,
    /// Oneof declarations. Field 8.
    pub oneof_decl: Vec<OneofDescriptorProto>,
}

/// Describes a field within a message. `google.protobuf.FieldDescriptorProto`.
#[derive(Debug, Clone, Default)]
pub struct FieldDescriptorProto {
    /// Field name. Field 1. Required.
    pub name: Option<String>,
    /// Field number (tag). Field 3.
    pub number: Option<i32>,
    /// Field label. Field 4.
    pub label: Option<i32>,
    /// Field type. Field 5.
    pub r#type: Option<i32>,
    /// Fully-qualified type name for message and enum fields, starting with
    /// a dot. Field 6.
    pub type_name: Option<String>,
    /// Default value literal. Field 7.
    pub default_value: Option<String>,
    /// Field options. Field 8.
    pub options: Option<FieldOptions>,
}

impl FieldDescriptorProto {
    /// The field label, defaulting to optional.
    pub fn label(&self) -> Label {
        self.label.and_then(Label::from_i32).unwrap_or(Label::Optional)
    }

    /// The field type, if it carries a known value.
    pub fn field_type(&self) -> Option<Type> {
        self.r#type.and_then(Type::from_i32)
    }

    /// Whether the field's own options select the packed wire form.
    pub fn packed(&self) -> bool {
        self.options.as_ref().and_then(|o| o.packed).unwrap_or(false)
    }
}

/// Describes an enum type. `google.protobuf.EnumDescriptorProto`.
#[derive(Debug, Clone, Default)]
pub struct EnumDescriptorProto {
    /// Enum name. Field 1.
    pub name: Option<String>,
    /// Enum values. Field 2.
    pub value: Vec<EnumValueDescriptorProto>,
}

/// Describes an enum value. `google.protobuf.EnumValueDescriptorProto`.
#[derive(Debug, Clone, Default)]
pub struct EnumValueDescriptorProto {
    /// Value name. Field 1.
    pub name: Option<String>,
    /// Value number. Field 2.
    pub number: Option<i32>,
}

/// Describes a oneof. `google.protobuf.OneofDescriptorProto`.
///
/// Oneof members are generated as independent fields; only the declaration
/// name is kept.
#[derive(Debug, Clone, Default)]
pub struct OneofDescriptorProto {
    /// Oneof name. Field 1.
    pub name: Option<String>,
}

/// Options for a message type. `google.protobuf.MessageOptions`.
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    /// True for the synthetic entry message backing a map field. Field 7.
    pub map_entry: Option<bool>,
}

/// Options for a field. `google.protobuf.FieldOptions`.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    /// Explicit packed selection for a repeated field. Field 2.
    pub packed: Option<bool>,
}

/// Field type enumeration. `google.protobuf.FieldDescriptorProto.Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Type {
    Double = 1,
    Float = 2,
    Int64 = 3,
    Uint64 = 4,
    Int32 = 5,
    Fixed64 = 6,
    Fixed32 = 7,
    Bool = 8,
    String = 9,
    Group = 10,
    Message = 11,
    Bytes = 12,
    Uint32 = 13,
    Enum = 14,
    Sfixed32 = 15,
    Sfixed64 = 16,
    Sint32 = 17,
    Sint64 = 18,
}

impl Type {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Double),
            2 => Some(Self::Float),
            3 => Some(Self::Int64),
            4 => Some(Self::Uint64),
            5 => Some(Self::Int32),
            6 => Some(Self::Fixed64),
            7 => Some(Self::Fixed32),
            8 => Some(Self::Bool),
            9 => Some(Self::String),
            10 => Some(Self::Group),
            11 => Some(Self::Message),
            12 => Some(Self::Bytes),
            13 => Some(Self::Uint32),
            14 => Some(Self::Enum),
            15 => Some(Self::Sfixed32),
            16 => Some(Self::Sfixed64),
            17 => Some(Self::Sint32),
            18 => Some(Self::Sint64),
            _ => None,
        }
    }
}

/// Field label enumeration. `google.protobuf.FieldDescriptorProto.Label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Label {
    Optional = 1,
    Required = 2,
    Repeated = 3,
}

impl Label {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Optional),
            2 => Some(Self::Required),
            3 => Some(Self::Repeated),
            _ => None,
        }
    }
}
