//! Named binary tag (NBT) values as they appear in block-entity metadata.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::GzDecoder;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};

/// Nesting limit for lists and compounds. Deeper input is rejected rather than
/// recursing without bound on untrusted data.
pub const MAX_DEPTH: usize = 512;

const PREALLOC_LIMIT: usize = 4096;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub type Compound = HashMap<String, Tag>;

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

fn invalid_data<E>(err: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn read_len<R: Read>(reader: &mut R) -> io::Result<usize> {
    let length = reader.read_i32::<BigEndian>()?;
    usize::try_from(length).map_err(|_| invalid_data(format!("negative length: {}", length)))
}

// Lengths come from the input, so never trust them for a full up-front allocation.
fn read_array<R, T, F>(reader: &mut R, mut read_one: F) -> io::Result<Vec<T>>
where
    R: Read,
    F: FnMut(&mut R) -> io::Result<T>,
{
    let length = read_len(reader)?;
    let mut values = Vec::with_capacity(length.min(PREALLOC_LIMIT));
    for _ in 0..length {
        values.push(read_one(reader)?);
    }
    Ok(values)
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let length = reader.read_u16::<BigEndian>()? as usize;
    let mut bytes = vec![0u8; length];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(invalid_data)
}

impl Tag {
    pub fn type_id(&self) -> u8 {
        match self {
            Tag::End => 0,
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::ByteArray(_) => 7,
            Tag::String(_) => 8,
            Tag::List(_) => 9,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
            Tag::LongArray(_) => 12,
        }
    }

    /// Decodes a root tag from `bytes`, inflating it first when it starts with
    /// the gzip magic number.
    pub fn from_bytes(bytes: &[u8]) -> io::Result<(String, Tag)> {
        if bytes.starts_with(&GZIP_MAGIC) {
            let mut inflated = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut inflated)?;
            Tag::read(&mut Cursor::new(inflated))
        } else {
            Tag::read(&mut Cursor::new(bytes))
        }
    }

    /// Reads one named tag.
    pub fn read<R: Read>(reader: &mut R) -> io::Result<(String, Tag)> {
        Tag::read_named(reader, 0)
    }

    fn read_named<R: Read>(reader: &mut R, depth: usize) -> io::Result<(String, Tag)> {
        let type_id = reader.read_u8()?;
        if type_id == 0 {
            return Ok((String::new(), Tag::End));
        }
        let name = read_string(reader)?;
        let tag = Tag::read_payload(reader, type_id, depth)?;
        Ok((name, tag))
    }

    fn read_payload<R: Read>(reader: &mut R, type_id: u8, depth: usize) -> io::Result<Tag> {
        if depth > MAX_DEPTH {
            return Err(invalid_data(format!("nesting deeper than {}", MAX_DEPTH)));
        }

        let tag = match type_id {
            0 => Tag::End,
            1 => Tag::Byte(reader.read_i8()?),
            2 => Tag::Short(reader.read_i16::<BigEndian>()?),
            3 => Tag::Int(reader.read_i32::<BigEndian>()?),
            4 => Tag::Long(reader.read_i64::<BigEndian>()?),
            5 => Tag::Float(reader.read_f32::<BigEndian>()?),
            6 => Tag::Double(reader.read_f64::<BigEndian>()?),
            7 => Tag::ByteArray(read_array(reader, |r| r.read_i8())?),
            8 => Tag::String(read_string(reader)?),
            9 => {
                let element_type = reader.read_u8()?;
                let length = read_len(reader)?;
                let mut items = Vec::with_capacity(length.min(PREALLOC_LIMIT));
                for _ in 0..length {
                    items.push(Tag::read_payload(reader, element_type, depth + 1)?);
                }
                Tag::List(items)
            }
            10 => {
                let mut compound = Compound::new();
                loop {
                    match Tag::read_named(reader, depth + 1)? {
                        (_, Tag::End) => break,
                        (name, tag) => {
                            compound.insert(name, tag);
                        }
                    }
                }
                Tag::Compound(compound)
            }
            11 => Tag::IntArray(read_array(reader, |r| r.read_i32::<BigEndian>())?),
            12 => Tag::LongArray(read_array(reader, |r| r.read_i64::<BigEndian>())?),
            other => return Err(invalid_data(format!("Invalid tag type: {}", other))),
        };
        Ok(tag)
    }

    pub fn write<W: Write>(&self, writer: &mut W, name: &str) -> io::Result<()> {
        writer.write_u8(self.type_id())?;
        if !matches!(self, Tag::End) {
            writer.write_u16::<BigEndian>(name.len() as u16)?;
            writer.write_all(name.as_bytes())?;
        }
        self.write_payload(writer)
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Tag::End => Ok(()),
            Tag::Byte(v) => writer.write_i8(*v),
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v),
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v),
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v),
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v),
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v),
            Tag::ByteArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                v.iter().try_for_each(|b| writer.write_i8(*b))
            }
            Tag::String(v) => {
                writer.write_u16::<BigEndian>(v.len() as u16)?;
                writer.write_all(v.as_bytes())
            }
            Tag::List(items) => {
                writer.write_u8(items.first().map_or(0, Tag::type_id))?;
                writer.write_i32::<BigEndian>(items.len() as i32)?;
                items.iter().try_for_each(|tag| tag.write_payload(writer))
            }
            Tag::Compound(compound) => {
                for (name, tag) in compound {
                    tag.write(writer, name)?;
                }
                Tag::End.write(writer, "")
            }
            Tag::IntArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                v.iter().try_for_each(|i| writer.write_i32::<BigEndian>(*i))
            }
            Tag::LongArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                v.iter().try_for_each(|l| writer.write_i64::<BigEndian>(*l))
            }
        }
    }

    /// Strips type information, leaving a plain value: numbers, strings,
    /// arrays and objects.
    pub fn simplify(&self) -> Value {
        fn float(v: f64) -> Value {
            Number::from_f64(v).map_or(Value::Null, Value::Number)
        }

        match self {
            Tag::End => Value::Null,
            Tag::Byte(v) => Value::from(*v),
            Tag::Short(v) => Value::from(*v),
            Tag::Int(v) => Value::from(*v),
            Tag::Long(v) => Value::from(*v),
            Tag::Float(v) => float(*v as f64),
            Tag::Double(v) => float(*v),
            Tag::ByteArray(v) => Value::from(v.clone()),
            Tag::String(v) => Value::String(v.clone()),
            Tag::List(items) => Value::Array(items.iter().map(Tag::simplify).collect()),
            Tag::Compound(compound) => Value::Object(
                compound
                    .iter()
                    .map(|(name, tag)| (name.clone(), tag.simplify()))
                    .collect::<Map<String, Value>>(),
            ),
            Tag::IntArray(v) => Value::from(v.clone()),
            Tag::LongArray(v) => Value::from(v.clone()),
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn sign_compound() -> Tag {
        let mut compound = Compound::new();
        compound.insert("id".to_string(), Tag::String("Sign".to_string()));
        compound.insert("x".to_string(), Tag::Int(-4));
        compound.insert("y".to_string(), Tag::Int(70));
        compound.insert("z".to_string(), Tag::Int(12));
        compound.insert(
            "Text1".to_string(),
            Tag::String("{\"text\":\"hi\"}".to_string()),
        );
        Tag::Compound(compound)
    }

    #[test]
    fn test_compound_read_write() {
        let tag = sign_compound();
        let mut buffer = Vec::new();
        tag.write(&mut buffer, "").unwrap();

        let (name, read_tag) = Tag::from_bytes(&buffer).unwrap();
        assert_eq!(name, "");
        assert_eq!(read_tag, tag);
    }

    #[test]
    fn test_gzip_is_sniffed() {
        let tag = sign_compound();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        tag.write(&mut encoder, "root").unwrap();
        let compressed = encoder.finish().unwrap();
        assert!(compressed.starts_with(&GZIP_MAGIC));

        let (name, read_tag) = Tag::from_bytes(&compressed).unwrap();
        assert_eq!(name, "root");
        assert_eq!(read_tag, tag);
    }

    #[test]
    fn test_simplify() {
        let mut compound = Compound::new();
        compound.insert("count".to_string(), Tag::Byte(3));
        compound.insert(
            "items".to_string(),
            Tag::List(vec![Tag::Short(1), Tag::Short(2)]),
        );
        compound.insert("ratio".to_string(), Tag::Double(0.5));
        compound.insert("name".to_string(), Tag::String("chest".to_string()));

        let value = Tag::Compound(compound).simplify();
        assert_eq!(
            value,
            serde_json::json!({ "count": 3, "items": [1, 2], "ratio": 0.5, "name": "chest" })
        );
        assert_eq!(Tag::Float(f32::NAN).simplify(), Value::Null);
    }

    #[test]
    fn test_accessors() {
        let tag = sign_compound();
        let compound = tag.as_compound().unwrap();
        assert_eq!(compound.get("x").and_then(Tag::as_i32), Some(-4));
        assert_eq!(compound.get("id").and_then(Tag::as_string), Some("Sign"));
        assert!(Tag::Int(1).as_compound().is_none());
        assert!(Tag::Int(1).as_string().is_none());
    }

    #[test]
    fn test_invalid_tag_type() {
        let result = Tag::from_bytes(&[0xFF, 0x00, 0x00]);
        assert_matches!(result, Err(e) if e.kind() == io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_input() {
        let mut buffer = Vec::new();
        sign_compound().write(&mut buffer, "").unwrap();
        buffer.truncate(buffer.len() - 4);
        assert!(Tag::from_bytes(&buffer).is_err());
    }

    #[test]
    fn test_negative_length_rejected() {
        // TAG_Int_Array named "" with length -1
        let bytes = [11, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        assert_matches!(Tag::from_bytes(&bytes), Err(e) if e.kind() == io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_nesting_limit() {
        let mut tag = Tag::Int(0);
        for _ in 0..(MAX_DEPTH + 2) {
            tag = Tag::List(vec![tag]);
        }
        let mut buffer = Vec::new();
        tag.write(&mut buffer, "deep").unwrap();
        assert!(Tag::from_bytes(&buffer).is_err());
    }
}
