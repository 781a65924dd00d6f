//! Mapping from schema field types to Rust record types, codec method names,
//! and scalar-table markers.

use crate::config::Options;
use crate::descriptor::{FieldDescriptorProto, Label, Type};
use crate::Error;

/// Delimiter between components of a qualified protobuf type name.
const PB_TYPE_DELIMITER: &str = ".";
/// Delimiter between components of a Rust path.
const RUST_TYPE_DELIMITER: &str = "::";

/// The type's name as written in `.proto` source; also the suffix of the
/// codec's `put_*`/`get_*` methods.
pub(crate) fn proto_type_name(ty: Type) -> &'static str {
    match ty {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}

/// The `wirepb::value` marker for a scalar type, used in map turbofish.
pub(crate) fn marker_name(ty: Type) -> Option<&'static str> {
    Some(match ty {
        Type::Double => "Double",
        Type::Float => "Float",
        Type::Int64 => "Int64",
        Type::Uint64 => "Uint64",
        Type::Int32 => "Int32",
        Type::Fixed64 => "Fixed64",
        Type::Fixed32 => "Fixed32",
        Type::Bool => "Bool",
        Type::String => "PbString",
        Type::Bytes => "PbBytes",
        Type::Uint32 => "Uint32",
        Type::Enum => "Enum",
        Type::Sfixed32 => "Sfixed32",
        Type::Sfixed64 => "Sfixed64",
        Type::Sint32 => "Sint32",
        Type::Sint64 => "Sint64",
        Type::Group | Type::Message => return None,
    })
}

/// Shortest qualified Rust type for a fully qualified protobuf type name.
///
/// Strips the leading dot plus the current package prefix when it matches,
/// then the enclosing message's own name prefix, and finally swaps the
/// protobuf name delimiter for the Rust one:
/// `(".demo.", "Outer.", ".demo.Outer.Inner")` becomes `Inner`.
pub(crate) fn rust_qualified_type(
    package_prefix: &str,
    message_prefix: &str,
    type_name: &str,
) -> String {
    let mut name = type_name;
    if let Some(stripped) = name.strip_prefix(package_prefix) {
        name = stripped;
        if let Some(stripped) = name.strip_prefix(message_prefix) {
            name = stripped;
        }
    }
    name.replace(PB_TYPE_DELIMITER, RUST_TYPE_DELIMITER)
}

/// Rust type for the field without any repeated wrapper.
pub(crate) fn base_rust_type(
    options: &Options,
    package_prefix: &str,
    message_prefix: &str,
    field: &FieldDescriptorProto,
) -> Result<String, Error> {
    let ty = field_type(field)?;
    let name = match ty {
        Type::Int32 | Type::Sint32 | Type::Sfixed32 => "i32".to_string(),
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => "i64".to_string(),
        Type::Uint32 | Type::Fixed32 => "u32".to_string(),
        Type::Uint64 | Type::Fixed64 => "u64".to_string(),
        Type::Double => "f64".to_string(),
        Type::Float => "f32".to_string(),
        Type::Bool => "bool".to_string(),
        Type::Enum => "i32".to_string(),
        Type::String => options.string_field_type().to_string(),
        Type::Bytes => options.bytes_field_type().to_string(),
        Type::Message => {
            let type_name = field
                .type_name
                .as_deref()
                .ok_or_else(|| Error::MissingTypeName(field_name(field)))?;
            rust_qualified_type(package_prefix, message_prefix, type_name)
        }
        // Unsupported; the caller emits a placeholder and a warning.
        Type::Group => "()".to_string(),
    };
    Ok(name)
}

/// Rust type for a map entry's key or value component.
///
/// Map components always use the codec's native containers (`String`,
/// `Vec<u8>`) so the generated `HashMap` lines up with the generic
/// `put_map`/`get_map` operations.
pub(crate) fn map_component_rust_type(
    package_prefix: &str,
    message_prefix: &str,
    field: &FieldDescriptorProto,
) -> Result<String, Error> {
    let ty = field_type(field)?;
    let name = match ty {
        Type::String => "String".to_string(),
        Type::Bytes => "Vec<u8>".to_string(),
        Type::Message => {
            let type_name = field
                .type_name
                .as_deref()
                .ok_or_else(|| Error::MissingTypeName(field_name(field)))?;
            rust_qualified_type(package_prefix, message_prefix, type_name)
        }
        _ => base_rust_type(&Options::default(), package_prefix, message_prefix, field)?,
    };
    Ok(name)
}

/// Whether the field is eligible for the packed wire form: repeated scalars
/// only, never strings, bytes, messages, or groups.
pub(crate) fn can_be_packed(field: &FieldDescriptorProto) -> bool {
    field.label() == Label::Repeated
        && !matches!(
            field.field_type(),
            Some(Type::String) | Some(Type::Bytes) | Some(Type::Message) | Some(Type::Group) | None
        )
}

pub(crate) fn field_type(field: &FieldDescriptorProto) -> Result<Type, Error> {
    field
        .field_type()
        .ok_or_else(|| Error::InvalidFieldType(field_name(field), field.r#type.unwrap_or(0)))
}

pub(crate) fn field_name(field: &FieldDescriptorProto) -> String {
    field.name.clone().unwrap_or_default()
}

/// Escape Rust keywords in identifiers taken from the schema.
pub(crate) fn rust_ident(name: &str) -> String {
    if is_rust_keyword(name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Convert a schema name to snake_case for module names.
pub(crate) fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev_lower || (i > 0 && chars[i - 1].is_uppercase() && next_lower) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "async" | "await" | "box" | "break" | "const" | "continue" | "crate" | "dyn"
            | "else" | "enum" | "extern" | "false" | "fn" | "for" | "if" | "impl" | "in" | "let"
            | "loop" | "match" | "mod" | "move" | "mut" | "pub" | "ref" | "return" | "self"
            | "static" | "struct" | "super" | "trait" | "true" | "try" | "type" | "unsafe"
            | "use" | "where" | "while" | "yield"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_type_resolution() {
        // Package prefix and enclosing message prefix are both stripped.
        assert_eq!(
            rust_qualified_type(".google.protobuf.", "DescriptorProto.", ".google.protobuf.DescriptorProto.ExtensionRange"),
            "ExtensionRange"
        );
        // Only the package prefix matches.
        assert_eq!(
            rust_qualified_type(".google.protobuf.", "FieldDescriptorProto.", ".google.protobuf.DescriptorProto.ExtensionRange"),
            "DescriptorProto::ExtensionRange"
        );
        // No package.
        assert_eq!(rust_qualified_type(".", "Outer.", ".Inner"), "Inner");
        assert_eq!(rust_qualified_type(".", "Outer.", ".Outer.Inner"), "Inner");
    }

    #[test]
    fn test_can_be_packed() {
        let mut field = FieldDescriptorProto {
            name: Some("xs".into()),
            label: Some(Label::Repeated as i32),
            r#type: Some(Type::Sint64 as i32),
            ..Default::default()
        };
        assert!(can_be_packed(&field));

        field.r#type = Some(Type::String as i32);
        assert!(!can_be_packed(&field));

        field.r#type = Some(Type::Message as i32);
        assert!(!can_be_packed(&field));

        field.r#type = Some(Type::Fixed32 as i32);
        field.label = Some(Label::Optional as i32);
        assert!(!can_be_packed(&field));
    }

    #[test]
    fn test_rust_ident() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("value"), "value");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("PhoneType"), "phone_type");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }
}
