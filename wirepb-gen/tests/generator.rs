//! End-to-end generator tests: descriptor sets built in memory, pushed
//! through the wire codec, and turned into source text.

use wirepb_gen::descriptor::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, FileDescriptorSet, Label, MessageOptions, Type,
};
use wirepb_gen::{generate, Error, Options};

fn field(name: &str, number: i32, label: Label, r#type: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(r#type as i32),
        ..Default::default()
    }
}

fn file_set(file: FileDescriptorProto) -> FileDescriptorSet {
    FileDescriptorSet { file: vec![file] }
}

/// A small two-field message: optional uint32 x = 1, required string y = 2.
fn example_schema() -> FileDescriptorSet {
    file_set(FileDescriptorProto {
        name: Some("example.proto".into()),
        package: None,
        message_type: vec![DescriptorProto {
            name: Some("Example".into()),
            field: vec![
                field("x", 1, Label::Optional, Type::Uint32),
                field("y", 2, Label::Required, Type::String),
            ],
            ..Default::default()
        }],
        enum_type: Vec::new(),
    })
}

#[test]
fn test_basic_message() {
    let generated = generate(&Options::default(), &example_schema(), "example.pbs").unwrap();
    let code = &generated.code;

    assert!(code.starts_with("// Generated by the wirepb schema compiler. DO NOT EDIT!\n"));
    assert!(code.contains("// Source: example.pbs"));

    // Record declaration with presence flags.
    assert!(code.contains("pub struct Example {"));
    assert!(code.contains("    pub x: u32,\n"));
    assert!(code.contains("    pub y: String,\n"));
    assert!(code.contains("    pub has_x: bool,\n"));
    assert!(code.contains("    pub has_y: bool,\n"));

    // Encoder calls in schema order.
    assert!(code.contains("pb.put_uint32(1, self.x)?;"));
    assert!(code.contains("pb.put_string(2, &self.y)?;"));
    let put_x = code.find("pb.put_uint32(1,").unwrap();
    let put_y = code.find("pb.put_string(2,").unwrap();
    assert!(put_x < put_y);

    // Decoder loop with one arm per field and a skip default.
    assert!(code.contains("while pb.get_next_field()? {"));
    assert!(code.contains("match pb.field_num {"));
    assert!(code.contains("1 => { self.x = pb.get_uint32()?; self.has_x = true; }"));
    assert!(code.contains("2 => { self.y = pb.get_string()?.into(); self.has_y = true; }"));
    assert!(code.contains("_ => pb.skip_field()?,"));

    // Only the required field gets a guard.
    assert!(code.contains("if !self.has_y {"));
    assert!(code.contains("MissingRequiredField(\"Example.y\")"));
    assert!(!code.contains("if !self.has_x {"));

    assert!(generated.warnings.is_empty());
}

#[test]
fn test_generated_through_wire_roundtrip() {
    // The descriptor set survives its own wire format.
    let bytes = wirepb::encode(&example_schema()).unwrap();
    let decoded: FileDescriptorSet = wirepb::decode(&bytes).unwrap();

    let direct = generate(&Options::default(), &example_schema(), "example.pbs").unwrap();
    let via_wire = generate(&Options::default(), &decoded, "example.pbs").unwrap();
    assert_eq!(direct.code, via_wire.code);
}

#[test]
fn test_no_class_suppresses_record() {
    let options = Options {
        no_class: true,
        ..Default::default()
    };
    let code = generate(&options, &example_schema(), "example.pbs").unwrap().code;
    assert!(!code.contains("pub struct Example"));
    assert!(!code.contains("impl Default for Example"));
    assert!(code.contains("impl wirepb::ProtoEncode for Example"));
    assert!(code.contains("impl wirepb::ProtoDecode for Example"));
}

#[test]
fn test_no_encoder_no_decoder() {
    let options = Options {
        no_encoder: true,
        ..Default::default()
    };
    let code = generate(&options, &example_schema(), "example.pbs").unwrap().code;
    assert!(!code.contains("ProtoEncode"));
    assert!(code.contains("ProtoDecode"));

    let options = Options {
        no_decoder: true,
        ..Default::default()
    };
    let code = generate(&options, &example_schema(), "example.pbs").unwrap().code;
    assert!(code.contains("ProtoEncode"));
    assert!(!code.contains("ProtoDecode"));
}

#[test]
fn test_no_has_fields_implies_no_required() {
    let options = Options {
        no_has_fields: true,
        ..Default::default()
    };
    let code = generate(&options, &example_schema(), "example.pbs").unwrap().code;
    assert!(!code.contains("has_x"));
    assert!(!code.contains("has_y"));
    assert!(code.contains("1 => self.x = pb.get_uint32()?,"));
    assert!(code.contains("2 => self.y = pb.get_string()?.into(),"));
    assert!(!code.contains("MissingRequiredField"));
}

#[test]
fn test_no_required_keeps_flags() {
    let options = Options {
        no_required: true,
        ..Default::default()
    };
    let code = generate(&options, &example_schema(), "example.pbs").unwrap().code;
    assert!(code.contains("pub has_y: bool,"));
    assert!(!code.contains("MissingRequiredField"));
}

fn repeated_schema(packed_option: Option<bool>) -> FileDescriptorSet {
    let mut values = field("values", 3, Label::Repeated, Type::Int32);
    values.options = packed_option.map(|packed| FieldOptions {
        packed: Some(packed),
    });
    let names = field("names", 4, Label::Repeated, Type::String);

    file_set(FileDescriptorProto {
        name: Some("lists.proto".into()),
        message_type: vec![DescriptorProto {
            name: Some("Lists".into()),
            field: vec![values, names],
            ..Default::default()
        }],
        ..Default::default()
    })
}

#[test]
fn test_packing_selection() {
    // Default: the field's own option decides.
    let code = generate(&Options::default(), &repeated_schema(None), "x").unwrap().code;
    assert!(code.contains("pb.put_repeated_int32(3, &self.values)?;"));

    let code = generate(&Options::default(), &repeated_schema(Some(true)), "x").unwrap().code;
    assert!(code.contains("pb.put_packed_int32(3, &self.values)?;"));

    // --packed forces packing for packable fields only.
    let options = Options {
        packed: true,
        ..Default::default()
    };
    let code = generate(&options, &repeated_schema(None), "x").unwrap().code;
    assert!(code.contains("pb.put_packed_int32(3, &self.values)?;"));
    assert!(code.contains("pb.put_repeated_string(4, &self.names)?;"));

    // --no-packed wins over the field option.
    let options = Options {
        no_packed: true,
        ..Default::default()
    };
    let code = generate(&options, &repeated_schema(Some(true)), "x").unwrap().code;
    assert!(code.contains("pb.put_repeated_int32(3, &self.values)?;"));
}

#[test]
fn test_repeated_decode_arms() {
    let code = generate(&Options::default(), &repeated_schema(None), "x").unwrap().code;
    assert!(code.contains("pub values: Vec<i32>,"));
    assert!(code.contains("pub names: Vec<String>,"));
    assert!(code.contains("3 => pb.get_repeated_int32(&mut self.values)?,"));
    assert!(code.contains("4 => self.names.push(pb.get_string()?.into()),"));
    // Repeated fields carry no presence flags.
    assert!(!code.contains("has_values"));
}

#[test]
fn test_default_values() {
    let mut x = field("x", 1, Label::Optional, Type::Uint32);
    x.default_value = Some("41".into());
    let mut y = field("y", 2, Label::Optional, Type::String);
    y.default_value = Some("hi".into());
    let mut z = field("z", 3, Label::Optional, Type::Float);
    z.default_value = Some("1.5".into());
    let fds = file_set(FileDescriptorProto {
        name: Some("defaults.proto".into()),
        message_type: vec![DescriptorProto {
            name: Some("Defaults".into()),
            field: vec![x, y, z],
            ..Default::default()
        }],
        ..Default::default()
    });

    let code = generate(&Options::default(), &fds, "x").unwrap().code;
    assert!(code.contains("x: 41,"));
    assert!(code.contains("y: \"hi\".into(),"));
    assert!(code.contains("z: 1.5_f32,"));

    let options = Options {
        no_default_values: true,
        ..Default::default()
    };
    let code = generate(&options, &fds, "x").unwrap().code;
    assert!(code.contains("x: Default::default(),"));
    assert!(!code.contains("x: 41,"));
}

#[test]
fn test_string_and_repeated_type_options() {
    let options = Options {
        string_type: Some("MyStr".into()),
        repeated_type: Some("MyVec".into()),
        ..Default::default()
    };
    let code = generate(&options, &repeated_schema(None), "x").unwrap().code;
    assert!(code.contains("pub values: MyVec<i32>,"));
    assert!(code.contains("pub names: MyVec<MyStr>,"));
}

#[test]
fn test_map_field() {
    // map<int32, int32> values = 15, expressed as the synthetic entry
    // message the schema compiler produces.
    let entry = DescriptorProto {
        name: Some("ValuesEntry".into()),
        field: vec![
            field("key", 1, Label::Optional, Type::Int32),
            field("value", 2, Label::Optional, Type::Int32),
        ],
        options: Some(MessageOptions {
            map_entry: Some(true),
        }),
        ..Default::default()
    };
    let mut values = field("values", 15, Label::Repeated, Type::Message);
    values.type_name = Some(".demo.Holder.ValuesEntry".into());

    let fds = file_set(FileDescriptorProto {
        name: Some("maps.proto".into()),
        package: Some("demo".into()),
        message_type: vec![DescriptorProto {
            name: Some("Holder".into()),
            field: vec![values],
            nested_type: vec![entry],
            ..Default::default()
        }],
        ..Default::default()
    });

    let code = generate(&Options::default(), &fds, "x").unwrap().code;
    assert!(code.contains("pub values: std::collections::HashMap<i32, i32>,"));
    assert!(code.contains(
        "pb.put_map::<wirepb::value::Int32, wirepb::value::Int32>(15, &self.values)?;"
    ));
    assert!(code.contains(
        "15 => pb.get_map::<wirepb::value::Int32, wirepb::value::Int32>(&mut self.values)?,"
    ));
    // The synthetic entry message itself is not generated.
    assert!(!code.contains("struct ValuesEntry"));
}

#[test]
fn test_qualified_type_names() {
    let mut child = field("child", 1, Label::Optional, Type::Message);
    child.type_name = Some(".demo.Outer.Inner".into());
    let mut other = field("other", 2, Label::Optional, Type::Message);
    other.type_name = Some(".demo.Outer.Inner".into());

    let fds = file_set(FileDescriptorProto {
        name: Some("nested.proto".into()),
        package: Some("demo".into()),
        message_type: vec![
            DescriptorProto {
                name: Some("Outer".into()),
                field: vec![child],
                ..Default::default()
            },
            DescriptorProto {
                name: Some("Unrelated".into()),
                field: vec![other],
                ..Default::default()
            },
        ],
        ..Default::default()
    });

    let code = generate(&Options::default(), &fds, "x").unwrap().code;
    // Inside Outer the message's own prefix is stripped too.
    assert!(code.contains("pub child: Inner,"));
    // Elsewhere only the package prefix is stripped.
    assert!(code.contains("pub other: Outer::Inner,"));
}

#[test]
fn test_enum_constants() {
    let fds = file_set(FileDescriptorProto {
        name: Some("enums.proto".into()),
        enum_type: vec![EnumDescriptorProto {
            name: Some("PhoneType".into()),
            value: vec![
                EnumValueDescriptorProto {
                    name: Some("MOBILE".into()),
                    number: Some(0),
                },
                EnumValueDescriptorProto {
                    name: Some("WORK".into()),
                    number: Some(2),
                },
            ],
        }],
        ..Default::default()
    });

    let code = generate(&Options::default(), &fds, "x").unwrap().code;
    assert!(code.contains("pub mod phone_type {"));
    assert!(code.contains("pub const MOBILE: i32 = 0;"));
    assert!(code.contains("pub const WORK: i32 = 2;"));

    // Enum fields themselves are plain i32.
    let mut kind = field("kind", 1, Label::Optional, Type::Enum);
    kind.type_name = Some(".PhoneType".into());
    let fds = file_set(FileDescriptorProto {
        name: Some("enums.proto".into()),
        message_type: vec![DescriptorProto {
            name: Some("WithEnum".into()),
            field: vec![kind],
            ..Default::default()
        }],
        ..Default::default()
    });
    let code = generate(&Options::default(), &fds, "x").unwrap().code;
    assert!(code.contains("pub kind: i32,"));
    assert!(code.contains("pb.put_enum(1, self.kind)?;"));
}

#[test]
fn test_group_field_warns() {
    let fds = file_set(FileDescriptorProto {
        name: Some("legacy.proto".into()),
        message_type: vec![DescriptorProto {
            name: Some("Legacy".into()),
            field: vec![field("old", 1, Label::Optional, Type::Group)],
            ..Default::default()
        }],
        ..Default::default()
    });

    let generated = generate(&Options::default(), &fds, "x").unwrap();
    assert_eq!(generated.warnings.len(), 1);
    assert!(generated.warnings[0].contains("Legacy.old"));
    // Placeholder field, skipped on decode, absent from encode.
    assert!(generated.code.contains("pub old: (),"));
    assert!(generated.code.contains("1 => pb.skip_field()?,"));
    assert!(!generated.code.contains("pb.put_group"));
}

#[test]
fn test_keyword_field_names_are_escaped() {
    let fds = file_set(FileDescriptorProto {
        name: Some("kw.proto".into()),
        message_type: vec![DescriptorProto {
            name: Some("Keywords".into()),
            field: vec![field("type", 1, Label::Optional, Type::Int32)],
            ..Default::default()
        }],
        ..Default::default()
    });

    let code = generate(&Options::default(), &fds, "x").unwrap().code;
    assert!(code.contains("pub r#type: i32,"));
    assert!(code.contains("pub has_type: bool,"));
    assert!(code.contains("self.r#type = pb.get_int32()?; self.has_type = true;"));
}

#[test]
fn test_empty_descriptor_set() {
    let err = generate(&Options::default(), &FileDescriptorSet::default(), "x").unwrap_err();
    assert!(matches!(err, Error::EmptyDescriptorSet));
}
