//! # ULog Protocol Constants and Types
//!
//! Core definitions for the PX4 ULog binary format: file header, message
//! types, primitive field types and message formats.

use crate::error::{Result, UlgCheckError};

/// File magic: "ULog" followed by 0x01 0x12 0x35
pub const ULOG_MAGIC: [u8; 7] = [0x55, 0x4C, 0x6F, 0x67, 0x01, 0x12, 0x35];

/// File header size: magic(7) + version(1) + timestamp(8)
pub const ULOG_HEADER_SIZE: usize = 16;

/// Message header size: size(2) + type(1)
pub const ULOG_MSG_HEADER_SIZE: usize = 3;

/// Flag bits message
pub const MSG_TYPE_FLAG_BITS: u8 = b'B';
/// Format definition message
pub const MSG_TYPE_FORMAT: u8 = b'F';
/// Information message
pub const MSG_TYPE_INFO: u8 = b'I';
/// Multi-part information message
pub const MSG_TYPE_INFO_MULTIPLE: u8 = b'M';
/// Parameter message
pub const MSG_TYPE_PARAMETER: u8 = b'P';
/// Default parameter message
pub const MSG_TYPE_PARAMETER_DEFAULT: u8 = b'Q';
/// Subscription message
pub const MSG_TYPE_ADD_LOGGED_MSG: u8 = b'A';
/// Unsubscription message
pub const MSG_TYPE_REMOVE_LOGGED_MSG: u8 = b'R';
/// Logged data message
pub const MSG_TYPE_DATA: u8 = b'D';
/// Logged string message
pub const MSG_TYPE_LOGGING: u8 = b'L';
/// Tagged logged string message
pub const MSG_TYPE_LOGGING_TAGGED: u8 = b'C';
/// Synchronization message
pub const MSG_TYPE_SYNC: u8 = b'S';
/// Dropout marker
pub const MSG_TYPE_DROPOUT: u8 = b'O';

/// Flag bits payload: compat(8) + incompat(8) + appended offsets(3 × 8)
pub const FLAG_BITS_PAYLOAD_SIZE: usize = 40;

/// Incompatible flag bit 0 of byte 0: the file carries appended data
pub const INCOMPAT_FLAG0_DATA_APPENDED: u8 = 0x01;

/// Maximum nesting depth when flattening message formats
pub const MAX_FORMAT_NESTING: usize = 16;

/// Primitive ULog field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    Bool,
    Char,
}

impl FieldType {
    /// Parse a primitive type name, `None` for nested message types
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name {
            "int8_t" => FieldType::Int8,
            "uint8_t" => FieldType::UInt8,
            "int16_t" => FieldType::Int16,
            "uint16_t" => FieldType::UInt16,
            "int32_t" => FieldType::Int32,
            "uint32_t" => FieldType::UInt32,
            "int64_t" => FieldType::Int64,
            "uint64_t" => FieldType::UInt64,
            "float" => FieldType::Float,
            "double" => FieldType::Double,
            "bool" => FieldType::Bool,
            "char" => FieldType::Char,
            _ => return None,
        };
        Some(ty)
    }

    /// Size in bytes
    pub fn size(self) -> usize {
        match self {
            FieldType::Int8 | FieldType::UInt8 | FieldType::Bool | FieldType::Char => 1,
            FieldType::Int16 | FieldType::UInt16 => 2,
            FieldType::Int32 | FieldType::UInt32 | FieldType::Float => 4,
            FieldType::Int64 | FieldType::UInt64 | FieldType::Double => 8,
        }
    }

    /// Read one little-endian value as `f64`
    ///
    /// `bytes` must hold at least [`FieldType::size`] bytes.
    pub fn read_f64(self, bytes: &[u8]) -> f64 {
        match self {
            FieldType::Int8 => bytes[0] as i8 as f64,
            FieldType::UInt8 | FieldType::Bool | FieldType::Char => bytes[0] as f64,
            FieldType::Int16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            FieldType::UInt16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            FieldType::Int32 => i32::from_le_bytes(le4(bytes)) as f64,
            FieldType::UInt32 => u32::from_le_bytes(le4(bytes)) as f64,
            FieldType::Float => f32::from_le_bytes(le4(bytes)) as f64,
            FieldType::Int64 => i64::from_le_bytes(le8(bytes)) as f64,
            FieldType::UInt64 => u64::from_le_bytes(le8(bytes)) as f64,
            FieldType::Double => f64::from_le_bytes(le8(bytes)),
        }
    }
}

pub(crate) fn le4(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

pub(crate) fn le8(bytes: &[u8]) -> [u8; 8] {
    [
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]
}

/// One field of a format definition, e.g. `float[4] q_d`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatField {
    /// Primitive or nested message type name
    pub type_name: String,

    /// Array length, `None` for scalars
    pub array_len: Option<usize>,

    /// Field name
    pub name: String,
}

impl FormatField {
    /// Padding fields only reserve space
    pub fn is_padding(&self) -> bool {
        self.name.starts_with("_padding")
    }
}

/// A message format definition (`F` message)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
    /// Message (topic) name
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<FormatField>,
}

impl MessageFormat {
    /// Parse a format string: `name:type field;type[N] field;`
    ///
    /// # Errors
    ///
    /// Returns error if the name separator is missing, a field lacks a type
    /// or name, or an array length is not a number.
    pub fn parse(definition: &str) -> Result<Self> {
        let (name, body) = definition.split_once(':').ok_or_else(|| {
            UlgCheckError::Decode(format!("Format without ':' separator: {}", definition))
        })?;

        let mut fields = Vec::new();
        for item in body.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (type_part, field_name) = item.split_once(' ').ok_or_else(|| {
                UlgCheckError::Decode(format!("Malformed field '{}' in format {}", item, name))
            })?;

            let (type_name, array_len) = match type_part.split_once('[') {
                Some((base, rest)) => {
                    let len = rest
                        .trim_end_matches(']')
                        .parse::<usize>()
                        .map_err(|_| {
                            UlgCheckError::Decode(format!(
                                "Invalid array length in '{}' of format {}",
                                type_part, name
                            ))
                        })?;
                    (base.to_string(), Some(len))
                }
                None => (type_part.to_string(), None),
            };

            fields.push(FormatField {
                type_name,
                array_len,
                name: field_name.trim().to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            fields,
        })
    }
}

/// A numeric leaf field of a flattened format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatField {
    /// Flattened name, e.g. `current.yaw` or `q_d[0]`
    pub name: String,

    /// Byte offset inside the data payload (after msg_id)
    pub offset: usize,

    /// Primitive type
    pub field_type: FieldType,
}

/// Parameter value as stored in `P` messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Int32(i32),
    Float(f32),
}

impl ParamValue {
    pub fn as_f64(self) -> f64 {
        match self {
            ParamValue::Int32(v) => v as f64,
            ParamValue::Float(v) => v as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_constants() {
        assert_eq!(&ULOG_MAGIC[..4], b"ULog");
        assert_eq!(ULOG_HEADER_SIZE, 16);
        assert_eq!(MSG_TYPE_DATA, 0x44);
        assert_eq!(MSG_TYPE_ADD_LOGGED_MSG, 0x41);
    }

    #[test]
    fn test_field_type_sizes() {
        assert_eq!(FieldType::parse("uint64_t"), Some(FieldType::UInt64));
        assert_eq!(FieldType::parse("float").map(FieldType::size), Some(4));
        assert_eq!(FieldType::parse("bool").map(FieldType::size), Some(1));
        assert_eq!(FieldType::parse("position_setpoint"), None);
    }

    #[test]
    fn test_read_values() {
        assert_eq!(FieldType::Float.read_f64(&1.5f32.to_le_bytes()), 1.5);
        assert_eq!(FieldType::Int16.read_f64(&(-300i16).to_le_bytes()), -300.0);
        assert_eq!(FieldType::Int8.read_f64(&[0xFF]), -1.0);
        assert_eq!(FieldType::UInt64.read_f64(&1_000_000u64.to_le_bytes()), 1_000_000.0);
    }

    #[test]
    fn test_parse_format() {
        let format = MessageFormat::parse(
            "vehicle_attitude_setpoint:uint64_t timestamp;float[4] q_d;uint8_t[4] _padding0;",
        )
        .unwrap();

        assert_eq!(format.name, "vehicle_attitude_setpoint");
        assert_eq!(format.fields.len(), 3);
        assert_eq!(format.fields[1].type_name, "float");
        assert_eq!(format.fields[1].array_len, Some(4));
        assert_eq!(format.fields[1].name, "q_d");
        assert!(format.fields[2].is_padding());
    }

    #[test]
    fn test_parse_format_missing_separator() {
        assert!(MessageFormat::parse("vehicle_status uint64_t timestamp;").is_err());
    }

    #[test]
    fn test_parse_format_bad_array_length() {
        assert!(MessageFormat::parse("t:uint64_t timestamp;float[x] q;").is_err());
    }

    #[test]
    fn test_param_value() {
        assert_eq!(ParamValue::Int32(3).as_f64(), 3.0);
        assert_eq!(ParamValue::Float(35.0).as_f64(), 35.0);
    }
}
