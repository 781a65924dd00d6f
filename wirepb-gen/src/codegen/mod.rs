//! Code generation from a decoded descriptor set.

mod message;
mod types;

use crate::config::Options;
use crate::descriptor::{DescriptorProto, EnumDescriptorProto, FileDescriptorSet};
use crate::tmpl;
use crate::Error;

use message::{MapEntries, MapEntry};
use types::to_snake_case;

/// Output of one generator run.
#[derive(Debug)]
pub struct Generated {
    /// The emitted Rust source.
    pub code: String,
    /// Human-readable notes about constructs the generator cannot express
    /// (currently proto2 group fields).
    pub warnings: Vec<String>,
}

// {0}=source file name
const FILE_TEMPLATE: &str = r#"// Generated by the wirepb schema compiler. DO NOT EDIT!
// Source: {0}
"#;

// {0}=enum name, {1}=module name, {2}=value consts
const ENUM_TEMPLATE: &str = r#"
/// Values of the `{0}` protobuf enum.
pub mod {1} {
{2}}
"#;

/// Generate Rust source for the first file of `fds`.
///
/// `source` names the descriptor input and only appears in the preamble
/// comment. The generator performs no I/O.
pub fn generate(options: &Options, fds: &FileDescriptorSet, source: &str) -> Result<Generated, Error> {
    let file = fds.file.first().ok_or(Error::EmptyDescriptorSet)?;
    let package_prefix = match file.package.as_deref() {
        Some(package) if !package.is_empty() => format!(".{package}."),
        _ => ".".to_string(),
    };

    let mut map_entries = MapEntries::new();
    collect_map_entries(&package_prefix, &file.message_type, &mut map_entries);

    let mut code = tmpl::format(FILE_TEMPLATE, &[source])?;
    let mut warnings = Vec::new();

    if !options.no_class {
        for enum_type in &file.enum_type {
            code.push_str(&generate_enum(enum_type)?);
        }
    }

    for msg in &file.message_type {
        code.push_str(&message::generate_message(
            options,
            &package_prefix,
            &map_entries,
            msg,
            &mut warnings,
        )?);
    }

    Ok(Generated { code, warnings })
}

/// Emit a module of `i32` constants for a top-level enum.
fn generate_enum(enum_type: &EnumDescriptorProto) -> Result<String, Error> {
    let name = enum_type.name.as_deref().ok_or(Error::MissingName)?;
    let mut consts = String::new();
    for value in &enum_type.value {
        let value_name = value.name.as_deref().ok_or(Error::MissingName)?;
        let number = value.number.unwrap_or(0);
        consts.push_str(&format!("    pub const {value_name}: i32 = {number};\n"));
    }
    tmpl::format(ENUM_TEMPLATE, &[name, &to_snake_case(name), &consts])
}

/// Register every synthetic map entry message, keyed by fully qualified name.
fn collect_map_entries(prefix: &str, messages: &[DescriptorProto], entries: &mut MapEntries) {
    for msg in messages {
        let Some(name) = msg.name.as_deref() else {
            continue;
        };
        let full_name = format!("{prefix}{name}");

        let is_map_entry = msg
            .options
            .as_ref()
            .and_then(|o| o.map_entry)
            .unwrap_or(false);
        if is_map_entry {
            let key = msg.field.iter().find(|f| f.number == Some(1));
            let value = msg.field.iter().find(|f| f.number == Some(2));
            if let (Some(key), Some(value)) = (key, value) {
                entries.insert(
                    full_name.clone(),
                    MapEntry {
                        key: key.clone(),
                        value: value.clone(),
                    },
                );
            }
        }

        let nested_prefix = format!("{full_name}.");
        collect_map_entries(&nested_prefix, &msg.nested_type, entries);
    }
}
