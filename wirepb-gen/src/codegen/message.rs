//! Per-message emission: record declaration, `Default` impl, encode routine,
//! decode routine.

use std::collections::HashMap;

use crate::config::Options;
use crate::descriptor::{DescriptorProto, FieldDescriptorProto, Label, Type};
use crate::tmpl;
use crate::Error;

use super::types::{
    base_rust_type, can_be_packed, field_name, field_type, map_component_rust_type, marker_name,
    proto_type_name, rust_ident,
};

/// Key and value field descriptors of a synthetic map entry message, keyed
/// by the entry's fully qualified type name.
pub(crate) struct MapEntry {
    pub key: FieldDescriptorProto,
    pub value: FieldDescriptorProto,
}

pub(crate) type MapEntries = HashMap<String, MapEntry>;

// {0}=name, {1}=field defs, {2}=has_* defs, {3}=default inits
const CLASS_TEMPLATE: &str = r#"
#[derive(Debug, Clone, PartialEq)]
pub struct {0} {
{1}{2}}

impl Default for {0} {
    fn default() -> Self {
        {0} {
{3}        }
    }
}
"#;

// {0}=name, {1}=put calls
const ENCODER_TEMPLATE: &str = r#"
impl wirepb::ProtoEncode for {0} {
    fn encode(&self, pb: &mut wirepb::Encoder) -> Result<(), wirepb::Error> {
{1}        Ok(())
    }
}
"#;

// {0}=name, {1}=decode cases, {2}=required-field guards
const DECODER_TEMPLATE: &str = r#"
impl wirepb::ProtoDecode for {0} {
    fn decode(&mut self, pb: &mut wirepb::Decoder<'_>) -> Result<(), wirepb::Error> {
        while pb.get_next_field()? {
            match pb.field_num {
{1}                _ => pb.skip_field()?,
            }
        }
{2}        Ok(())
    }
}
"#;

// {0}=message name, {1}=field name
const CHECK_REQUIRED_FIELD_TEMPLATE: &str = r#"        if !self.has_{1} {
            return Err(wirepb::Error::MissingRequiredField("{0}.{1}"));
        }
"#;

/// Emit everything the options ask for about one top-level message.
pub(crate) fn generate_message(
    options: &Options,
    package_prefix: &str,
    map_entries: &MapEntries,
    message: &DescriptorProto,
    warnings: &mut Vec<String>,
) -> Result<String, Error> {
    let msg_name = message.name.as_deref().ok_or(Error::MissingName)?;
    let msg_prefix = format!("{msg_name}.");

    let mut fields_defs = String::new();
    let mut has_fields_defs = String::new();
    let mut default_inits = String::new();
    let mut encoder = String::new();
    let mut decode_cases = String::new();
    let mut check_required_fields = String::new();

    for field in &message.field {
        let name = field.name.as_deref().ok_or(Error::MissingName)?;
        let ident = rust_ident(name);
        let number = field
            .number
            .ok_or_else(|| Error::MissingFieldNumber(name.to_string()))?;
        let ty = field_type(field)?;
        let repeated = field.label() == Label::Repeated;
        let has_flag = !repeated && !options.no_has_fields && ty != Type::Group;

        if ty == Type::Group {
            warnings.push(format!("group field {msg_name}.{name} is not supported"));
        }

        let map_entry = map_entry_for(map_entries, field);

        // Record declaration.
        let record_type = match map_entry {
            Some(entry) => {
                let key = map_component_rust_type(package_prefix, &msg_prefix, &entry.key)?;
                let value = map_component_rust_type(package_prefix, &msg_prefix, &entry.value)?;
                format!("std::collections::HashMap<{key}, {value}>")
            }
            None => {
                let base = base_rust_type(options, package_prefix, &msg_prefix, field)?;
                if repeated {
                    format!("{}<{base}>", options.repeated_container())
                } else {
                    base
                }
            }
        };
        fields_defs.push_str(&format!("    pub {ident}: {record_type},\n"));
        if has_flag {
            has_fields_defs.push_str(&format!("    pub has_{name}: bool,\n"));
        }

        // Default impl line.
        let init = default_expr(options, field, ty, repeated, map_entry.is_some());
        default_inits.push_str(&format!("            {ident}: {init},\n"));
        if has_flag {
            default_inits.push_str(&format!("            has_{name}: false,\n"));
        }

        // Encode call.
        if let Some(line) = encode_call(options, field, ty, number, &ident, map_entry)? {
            encoder.push_str(&line);
        }

        // Decode arm.
        decode_cases.push_str(&decode_arm(field, ty, number, &ident, has_flag, map_entry)?);

        if field.label() == Label::Required && !options.effective_no_required() && has_flag {
            check_required_fields.push_str(&tmpl::format(
                CHECK_REQUIRED_FIELD_TEMPLATE,
                &[msg_name, name],
            )?);
        }
    }

    let mut out = String::new();
    if !options.no_class {
        out.push_str(&tmpl::format(
            CLASS_TEMPLATE,
            &[msg_name, &fields_defs, &has_fields_defs, &default_inits],
        )?);
    }
    if !options.no_encoder {
        out.push_str(&tmpl::format(ENCODER_TEMPLATE, &[msg_name, &encoder])?);
    }
    if !options.no_decoder {
        out.push_str(&tmpl::format(
            DECODER_TEMPLATE,
            &[msg_name, &decode_cases, &check_required_fields],
        )?);
    }
    Ok(out)
}

/// The map entry backing `field`, when `field` is a map.
fn map_entry_for<'a>(
    map_entries: &'a MapEntries,
    field: &FieldDescriptorProto,
) -> Option<&'a MapEntry> {
    if field.label() != Label::Repeated || field.field_type() != Some(Type::Message) {
        return None;
    }
    map_entries.get(field.type_name.as_deref()?)
}

/// Initializer expression for the `Default` impl, honoring schema default
/// literals unless disabled.
fn default_expr(
    options: &Options,
    field: &FieldDescriptorProto,
    ty: Type,
    repeated: bool,
    is_map: bool,
) -> String {
    if is_map {
        return "std::collections::HashMap::new()".to_string();
    }
    if repeated || options.no_default_values {
        return "Default::default()".to_string();
    }
    let Some(literal) = field.default_value.as_deref() else {
        return "Default::default()".to_string();
    };

    match ty {
        Type::String => format!("{literal:?}.into()"),
        Type::Bytes => format!("{literal:?}.as_bytes().to_vec()"),
        Type::Bool if literal == "true" || literal == "false" => literal.to_string(),
        Type::Float | Type::Double if literal.parse::<f64>().is_ok() => {
            let suffix = if ty == Type::Float { "f32" } else { "f64" };
            format!("{literal}_{suffix}")
        }
        Type::Int32 | Type::Int64 | Type::Sint32 | Type::Sint64 | Type::Sfixed32
        | Type::Sfixed64 | Type::Enum
            if literal.parse::<i64>().is_ok() =>
        {
            literal.to_string()
        }
        Type::Uint32 | Type::Uint64 | Type::Fixed32 | Type::Fixed64
            if literal.parse::<u64>().is_ok() =>
        {
            literal.to_string()
        }
        // Unrepresentable literals (named enum values, inf/nan) fall back to
        // the type default.
        _ => "Default::default()".to_string(),
    }
}

/// The `pb.put_*` statement for one field, or `None` for group fields.
fn encode_call(
    options: &Options,
    field: &FieldDescriptorProto,
    ty: Type,
    number: i32,
    ident: &str,
    map_entry: Option<&MapEntry>,
) -> Result<Option<String>, Error> {
    if ty == Type::Group {
        return Ok(None);
    }

    if let Some(entry) = map_entry {
        let key_ty = field_type(&entry.key)?;
        let key_marker = marker_name(key_ty)
            .ok_or_else(|| Error::InvalidFieldType(field_name(&entry.key), key_ty as i32))?;
        let line = match field_type(&entry.value)? {
            Type::Message => format!(
                "        pb.put_map_message::<wirepb::value::{key_marker}, _>({number}, &self.{ident})?;\n"
            ),
            value_ty => {
                let value_marker = marker_name(value_ty).ok_or_else(|| {
                    Error::InvalidFieldType(field_name(&entry.value), value_ty as i32)
                })?;
                format!(
                    "        pb.put_map::<wirepb::value::{key_marker}, wirepb::value::{value_marker}>({number}, &self.{ident})?;\n"
                )
            }
        };
        return Ok(Some(line));
    }

    let type_str = proto_type_name(ty);
    let line = match (field.label(), ty) {
        (Label::Repeated, Type::Message) => {
            format!("        pb.put_repeated_message({number}, &self.{ident})?;\n")
        }
        (Label::Repeated, _) => {
            let packed = if options.packed {
                true
            } else if options.no_packed {
                false
            } else {
                field.packed()
            };
            let prefix = if packed && can_be_packed(field) {
                "packed"
            } else {
                "repeated"
            };
            format!("        pb.put_{prefix}_{type_str}({number}, &self.{ident})?;\n")
        }
        (_, Type::Message) => format!("        pb.put_message({number}, &self.{ident})?;\n"),
        (_, Type::String | Type::Bytes) => {
            format!("        pb.put_{type_str}({number}, &self.{ident})?;\n")
        }
        (_, _) => format!("        pb.put_{type_str}({number}, self.{ident})?;\n"),
    };
    Ok(Some(line))
}

/// The `match` arm of the decode loop for one field.
fn decode_arm(
    field: &FieldDescriptorProto,
    ty: Type,
    number: i32,
    ident: &str,
    has_flag: bool,
    map_entry: Option<&MapEntry>,
) -> Result<String, Error> {
    if ty == Type::Group {
        return Ok(format!("                {number} => pb.skip_field()?,\n"));
    }

    if let Some(entry) = map_entry {
        let key_ty = field_type(&entry.key)?;
        let key_marker = marker_name(key_ty)
            .ok_or_else(|| Error::InvalidFieldType(field_name(&entry.key), key_ty as i32))?;
        let arm = match field_type(&entry.value)? {
            Type::Message => format!(
                "                {number} => pb.get_map_message::<wirepb::value::{key_marker}, _>(&mut self.{ident})?,\n"
            ),
            value_ty => {
                let value_marker = marker_name(value_ty).ok_or_else(|| {
                    Error::InvalidFieldType(field_name(&entry.value), value_ty as i32)
                })?;
                format!(
                    "                {number} => pb.get_map::<wirepb::value::{key_marker}, wirepb::value::{value_marker}>(&mut self.{ident})?,\n"
                )
            }
        };
        return Ok(arm);
    }

    let type_str = proto_type_name(ty);
    let get_expr = match ty {
        Type::Message => "pb.get_message()?".to_string(),
        Type::String => "pb.get_string()?.into()".to_string(),
        Type::Bytes => "pb.get_bytes()?.into()".to_string(),
        _ => format!("pb.get_{type_str}()?"),
    };

    let arm = match (field.label(), ty) {
        (Label::Repeated, Type::Message) => {
            format!("                {number} => pb.get_repeated_message(&mut self.{ident})?,\n")
        }
        (Label::Repeated, Type::String | Type::Bytes) => {
            format!("                {number} => self.{ident}.push({get_expr}),\n")
        }
        (Label::Repeated, _) => format!(
            "                {number} => pb.get_repeated_{type_str}(&mut self.{ident})?,\n"
        ),
        _ if has_flag => format!(
            "                {number} => {{ self.{ident} = {get_expr}; self.has_{name} = true; }}\n",
            name = field.name.as_deref().unwrap_or_default()
        ),
        _ => format!("                {number} => self.{ident} = {get_expr},\n"),
    };
    Ok(arm)
}
