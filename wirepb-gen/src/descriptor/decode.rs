//! Wire codec impls for the descriptor records.
//!
//! Each decode body is the same tag-dispatch loop the generator emits for
//! user schemas; the encode bodies exist so tests can assemble descriptor
//! sets without shelling out to `protoc`.

use wirepb::error::Result;
use wirepb::{Decoder, Encoder, Error, ProtoDecode, ProtoEncode};

use super::*;

impl ProtoDecode for FileDescriptorSet {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                1 => pb.get_repeated_message(&mut self.file)?,
                _ => pb.skip_field()?,
            }
        }
        Ok(())
    }
}

impl ProtoEncode for FileDescriptorSet {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        pb.put_repeated_message(1, &self.file)
    }
}

impl ProtoDecode for FileDescriptorProto {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                1 => self.name = Some(pb.get_string()?.into()),
                2 => self.package = Some(pb.get_string()?.into()),
                4 => pb.get_repeated_message(&mut self.message_type)?,
                5 => pb.get_repeated_message(&mut self.enum_type)?,
                _ => pb.skip_field()?,
            }
        }
        Ok(())
    }
}

impl ProtoEncode for FileDescriptorProto {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(name) = &self.name {
            pb.put_string(1, name)?;
        }
        if let Some(package) = &self.package {
            pb.put_string(2, package)?;
        }
        pb.put_repeated_message(4, &self.message_type)?;
        pb.put_repeated_message(5, &self.enum_type)?;
        Ok(())
    }
}

impl ProtoDecode for DescriptorProto {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                1 => self.name = Some(pb.get_string()?.into()),
                2 => pb.get_repeated_message(&mut self.field)?,
                3 => pb.get_repeated_message(&mut self.nested_type)?,
                4 => pb.get_repeated_message(&mut self.enum_type)?,
                7 => self.options = Some(pb.get_message()?),
                8 => pb.get_repeated_message(&mut self.oneof_decl)?,
                _ => pb.skip_field()?,
            }
        }
        if self.name.is_none() {
            return Err(Error::MissingRequiredField("DescriptorProto.name"));
        }
        Ok(())
    }
}

impl ProtoEncode for DescriptorProto {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(name) = &self.name {
            pb.put_string(1, name)?;
        }
        pb.put_repeated_message(2, &self.field)?;
        pb.put_repeated_message(3, &self.nested_type)?;
        pb.put_repeated_message(4, &self.enum_type)?;
        if let Some(options) = &self.options {
            pb.put_message(7, options)?;
        }
        pb.put_repeated_message(8, &self.oneof_decl)?;
        Ok(())
    }
}

impl ProtoDecode for FieldDescriptorProto {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                1 => self.name = Some(pb.get_string()?.into()),
                3 => self.number = Some(pb.get_int32()?),
                4 => self.label = Some(pb.get_int32()?),
                5 => self.r#type = Some(pb.get_int32()?),
                6 => self.type_name = Some(pb.get_string()?.into()),
                7 => self.default_value = Some(pb.get_string()?.into()),
                8 => self.options = Some(pb.get_message()?),
                _ => pb.skip_field()?,
            }
        }
        if self.name.is_none() {
            return Err(Error::MissingRequiredField("FieldDescriptorProto.name"));
        }
        Ok(())
    }
}

impl ProtoEncode for FieldDescriptorProto {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(name) = &self.name {
            pb.put_string(1, name)?;
        }
        if let Some(number) = self.number {
            pb.put_int32(3, number)?;
        }
        if let Some(label) = self.label {
            pb.put_int32(4, label)?;
        }
        if let Some(r#type) = self.r#type {
            pb.put_int32(5, r#type)?;
        }
        if let Some(type_name) = &self.type_name {
            pb.put_string(6, type_name)?;
        }
        if let Some(default_value) = &self.default_value {
            pb.put_string(7, default_value)?;
        }
        if let Some(options) = &self.options {
            pb.put_message(8, options)?;
        }
        Ok(())
    }
}

impl ProtoDecode for EnumDescriptorProto {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                1 => self.name = Some(pb.get_string()?.into()),
                2 => pb.get_repeated_message(&mut self.value)?,
                _ => pb.skip_field()?,
            }
        }
        Ok(())
    }
}

impl ProtoEncode for EnumDescriptorProto {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(name) = &self.name {
            pb.put_string(1, name)?;
        }
        pb.put_repeated_message(2, &self.value)?;
        Ok(())
    }
}

impl ProtoDecode for EnumValueDescriptorProto {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                1 => self.name = Some(pb.get_string()?.into()),
                2 => self.number = Some(pb.get_int32()?),
                _ => pb.skip_field()?,
            }
        }
        Ok(())
    }
}

impl ProtoEncode for EnumValueDescriptorProto {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(name) = &self.name {
            pb.put_string(1, name)?;
        }
        if let Some(number) = self.number {
            pb.put_int32(2, number)?;
        }
        Ok(())
    }
}

impl ProtoDecode for OneofDescriptorProto {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                1 => self.name = Some(pb.get_string()?.into()),
                _ => pb.skip_field()?,
            }
        }
        Ok(())
    }
}

impl ProtoEncode for OneofDescriptorProto {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(name) = &self.name {
            pb.put_string(1, name)?;
        }
        Ok(())
    }
}

impl ProtoDecode for MessageOptions {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                7 => self.map_entry = Some(pb.get_bool()?),
                _ => pb.skip_field()?,
            }
        }
        Ok(())
    }
}

impl ProtoEncode for MessageOptions {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(map_entry) = self.map_entry {
            pb.put_bool(7, map_entry)?;
        }
        Ok(())
    }
}

impl ProtoDecode for FieldOptions {
    fn decode(&mut self, pb: &mut Decoder<'_>) -> Result<()> {
        while pb.get_next_field()? {
            match pb.field_num {
                2 => self.packed = Some(pb.get_bool()?),
                _ => pb.skip_field()?,
            }
        }
        Ok(())
    }
}

impl ProtoEncode for FieldOptions {
    fn encode(&self, pb: &mut Encoder) -> Result<()> {
        if let Some(packed) = self.packed {
            pb.put_bool(2, packed)?;
        }
        Ok(())
    }
}
