//! # ULog Decoder
//!
//! Decodes a ULog byte stream into per-subscription datasets, the initial
//! parameter table and the string info messages.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::protocol::*;
use crate::error::{Result, UlgCheckError};

/// All samples logged for one subscription (topic + multi instance)
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Topic name
    pub name: String,

    /// Multi-instance index
    pub multi_id: u8,

    /// Numeric leaf fields, without `timestamp`
    pub fields: Vec<FlatField>,

    /// Sample timestamps in microseconds
    pub timestamps: Vec<u64>,

    /// One column per entry of `fields`
    columns: Vec<Vec<f64>>,
}

impl Dataset {
    /// Samples of one field, by flattened name
    pub fn column(&self, field: &str) -> Option<&[f64]> {
        self.fields
            .iter()
            .position(|f| f.name == field)
            .map(|i| self.columns[i].as_slice())
    }

    /// Flattened field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// `(field name, samples)` pairs in declaration order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.fields
            .iter()
            .zip(&self.columns)
            .map(|(f, c)| (f.name.as_str(), c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Stable-sort samples by timestamp; returns whether any were out of order
    fn sort_by_timestamp(&mut self) -> bool {
        if self.timestamps.windows(2).all(|w| w[0] <= w[1]) {
            return false;
        }

        let mut order: Vec<usize> = (0..self.timestamps.len()).collect();
        order.sort_by_key(|&i| self.timestamps[i]);

        self.timestamps = order.iter().map(|&i| self.timestamps[i]).collect();
        for column in &mut self.columns {
            *column = order.iter().map(|&i| column[i]).collect();
        }
        true
    }
}

/// A decoded ULog file
#[derive(Debug, Clone, Default)]
pub struct ULog {
    /// File format version from the header
    pub version: u8,

    /// Logging start time in microseconds
    pub start_timestamp: u64,

    /// Parameter values logged before the first subscription
    pub initial_params: BTreeMap<String, ParamValue>,

    /// String-valued info messages (`sys_name`, `ver_sw`, ...)
    pub info: BTreeMap<String, String>,

    /// Datasets of the requested topics
    pub datasets: Vec<Dataset>,

    /// Number of dropout markers
    pub dropout_count: usize,

    /// Sum of all dropout durations in milliseconds
    pub dropout_total_ms: u64,

    /// The stream ended in the middle of a message
    pub truncated: bool,
}

impl ULog {
    /// All instances of a topic, ordered by multi-instance index
    pub fn datasets_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Dataset> + 'a {
        self.datasets.iter().filter(move |d| d.name == name)
    }

    /// Initial value of a parameter
    pub fn param(&self, name: &str) -> Option<ParamValue> {
        self.initial_params.get(name).copied()
    }
}

/// Read and decode a ULog file
///
/// # Arguments
///
/// * `path` - Path to the `.ulg` file
/// * `topics` - Topics to materialise; an empty slice keeps every topic
///
/// # Errors
///
/// Returns error if the file cannot be read or is not a valid ULog stream
pub fn read_file<P: AsRef<Path>>(path: P, topics: &[String]) -> Result<ULog> {
    let bytes = fs::read(path.as_ref())?;
    debug!("Read {} bytes from {}", bytes.len(), path.as_ref().display());
    decode(&bytes, topics)
}

/// Decode a ULog byte stream
///
/// # Errors
///
/// Returns error if:
/// - Header magic is wrong or the stream is shorter than the header
/// - Unknown incompatible flag bits are set
/// - A format, subscription, parameter or info message is malformed
pub fn decode(bytes: &[u8], topics: &[String]) -> Result<ULog> {
    if bytes.len() < ULOG_HEADER_SIZE {
        return Err(UlgCheckError::Decode(format!(
            "File too short for ULog header: {} bytes",
            bytes.len()
        )));
    }

    if bytes[..ULOG_MAGIC.len()] != ULOG_MAGIC {
        return Err(UlgCheckError::Decode("Invalid ULog magic".to_string()));
    }

    let mut ulog = ULog {
        version: bytes[7],
        start_timestamp: u64::from_le_bytes(le8(&bytes[8..16])),
        ..ULog::default()
    };

    let mut formats: HashMap<String, MessageFormat> = HashMap::new();
    // msg_id -> (dataset index, payload size, timestamp offset)
    let mut subscriptions: HashMap<u16, (usize, usize, usize)> = HashMap::new();
    let mut in_data_section = false;
    let mut short_samples = 0usize;

    let mut pos = ULOG_HEADER_SIZE;
    while pos < bytes.len() {
        if pos + ULOG_MSG_HEADER_SIZE > bytes.len() {
            ulog.truncated = true;
            break;
        }

        let size = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]) as usize;
        let msg_type = bytes[pos + 2];
        let start = pos + ULOG_MSG_HEADER_SIZE;
        let end = start + size;

        if end > bytes.len() {
            ulog.truncated = true;
            break;
        }

        let payload = &bytes[start..end];

        match msg_type {
            MSG_TYPE_FLAG_BITS => check_flag_bits(payload)?,
            MSG_TYPE_FORMAT => {
                let format = MessageFormat::parse(&utf8(payload)?)?;
                formats.insert(format.name.clone(), format);
            }
            MSG_TYPE_INFO => {
                let (key, value) = split_key_value(payload)?;
                if let Some((type_name, name)) = key.split_once(' ') {
                    if type_name.starts_with("char[") {
                        let text = String::from_utf8_lossy(value)
                            .trim_end_matches('\0')
                            .to_string();
                        ulog.info.insert(name.to_string(), text);
                    }
                }
            }
            MSG_TYPE_PARAMETER => {
                let (key, value) = split_key_value(payload)?;
                let (name, param) = decode_param(&key, value)?;
                if in_data_section {
                    debug!("Parameter {} changed to {:?}", name, param);
                } else {
                    ulog.initial_params.insert(name, param);
                }
            }
            MSG_TYPE_ADD_LOGGED_MSG => {
                in_data_section = true;
                if payload.len() < 3 {
                    return Err(UlgCheckError::Decode(
                        "Subscription message too short".to_string(),
                    ));
                }

                let multi_id = payload[0];
                let msg_id = u16::from_le_bytes([payload[1], payload[2]]);
                let name = utf8(&payload[3..])?;

                if !topics.is_empty() && !topics.iter().any(|t| *t == name) {
                    pos = end;
                    continue;
                }

                let format = formats.get(&name).ok_or_else(|| {
                    UlgCheckError::Decode(format!("Subscription to undefined format {}", name))
                })?;

                let (fields, payload_size) = flatten(&formats, format)?;
                let (timestamp, fields): (Vec<FlatField>, Vec<FlatField>) =
                    fields.into_iter().partition(|f| f.name == "timestamp");
                let timestamp_offset = match timestamp.first() {
                    Some(f) if f.field_type == FieldType::UInt64 => f.offset,
                    _ => {
                        return Err(UlgCheckError::Decode(format!(
                            "Format {} has no uint64_t timestamp field",
                            name
                        )))
                    }
                };

                debug!(
                    "Subscribed {} instance {} as msg_id {} ({} fields)",
                    name,
                    multi_id,
                    msg_id,
                    fields.len()
                );

                let existing = ulog
                    .datasets
                    .iter()
                    .position(|d| d.name == name && d.multi_id == multi_id);
                let index = match existing {
                    // Re-subscription after a removal continues the same series
                    Some(index) => index,
                    None => {
                        let columns = vec![Vec::new(); fields.len()];
                        ulog.datasets.push(Dataset {
                            name,
                            multi_id,
                            fields,
                            timestamps: Vec::new(),
                            columns,
                        });
                        ulog.datasets.len() - 1
                    }
                };
                subscriptions.insert(msg_id, (index, payload_size, timestamp_offset));
            }
            MSG_TYPE_REMOVE_LOGGED_MSG => {
                if payload.len() >= 2 {
                    subscriptions.remove(&u16::from_le_bytes([payload[0], payload[1]]));
                }
            }
            MSG_TYPE_DATA => {
                if payload.len() < 2 {
                    pos = end;
                    continue;
                }

                let msg_id = u16::from_le_bytes([payload[0], payload[1]]);
                if let Some(&(index, payload_size, ts_offset)) = subscriptions.get(&msg_id) {
                    let data = &payload[2..];
                    if data.len() < payload_size {
                        short_samples += 1;
                    } else {
                        let dataset = &mut ulog.datasets[index];
                        dataset
                            .timestamps
                            .push(u64::from_le_bytes(le8(&data[ts_offset..])));
                        for (field, column) in
                            dataset.fields.iter().zip(dataset.columns.iter_mut())
                        {
                            column.push(field.field_type.read_f64(&data[field.offset..]));
                        }
                    }
                }
            }
            MSG_TYPE_DROPOUT => {
                ulog.dropout_count += 1;
                if payload.len() >= 2 {
                    ulog.dropout_total_ms += u16::from_le_bytes([payload[0], payload[1]]) as u64;
                }
            }
            MSG_TYPE_INFO_MULTIPLE
            | MSG_TYPE_PARAMETER_DEFAULT
            | MSG_TYPE_LOGGING
            | MSG_TYPE_LOGGING_TAGGED
            | MSG_TYPE_SYNC => {}
            other => debug!("Skipping unknown message type 0x{:02X}", other),
        }

        pos = end;
    }

    if ulog.truncated {
        warn!("ULog stream truncated at byte {} of {}", pos, bytes.len());
    }
    if short_samples > 0 {
        warn!("Skipped {} data messages shorter than their format", short_samples);
    }
    for dataset in &mut ulog.datasets {
        if dataset.sort_by_timestamp() {
            warn!(
                "Samples of {} instance {} were out of order, sorted by timestamp",
                dataset.name, dataset.multi_id
            );
        }
    }

    Ok(ulog)
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.trim_end_matches('\0').to_string())
        .map_err(|e| UlgCheckError::Decode(format!("Invalid UTF-8: {}", e)))
}

/// Split an info/parameter payload: key_len(1) + key + value
fn split_key_value(payload: &[u8]) -> Result<(String, &[u8])> {
    let key_len = *payload
        .first()
        .ok_or_else(|| UlgCheckError::Decode("Empty key/value message".to_string()))?
        as usize;

    if payload.len() < 1 + key_len {
        return Err(UlgCheckError::Decode(format!(
            "Key length {} exceeds message size {}",
            key_len,
            payload.len()
        )));
    }

    Ok((utf8(&payload[1..1 + key_len])?, &payload[1 + key_len..]))
}

fn decode_param(key: &str, value: &[u8]) -> Result<(String, ParamValue)> {
    let (type_name, name) = key
        .split_once(' ')
        .ok_or_else(|| UlgCheckError::Decode(format!("Malformed parameter key '{}'", key)))?;

    if value.len() < 4 {
        return Err(UlgCheckError::Decode(format!(
            "Parameter {} value too short: {} bytes",
            name,
            value.len()
        )));
    }

    let param = match type_name {
        "int32_t" => ParamValue::Int32(i32::from_le_bytes(le4(value))),
        "float" => ParamValue::Float(f32::from_le_bytes(le4(value))),
        other => {
            return Err(UlgCheckError::Decode(format!(
                "Unsupported parameter type {} for {}",
                other, name
            )))
        }
    };

    Ok((name.to_string(), param))
}

fn check_flag_bits(payload: &[u8]) -> Result<()> {
    if payload.len() < FLAG_BITS_PAYLOAD_SIZE {
        return Err(UlgCheckError::Decode(format!(
            "Flag bits message too short: {} bytes",
            payload.len()
        )));
    }

    let incompat = &payload[8..16];
    if incompat[0] & !INCOMPAT_FLAG0_DATA_APPENDED != 0 || incompat[1..].iter().any(|&b| b != 0) {
        return Err(UlgCheckError::Decode(
            "Unknown incompatible flag bits set".to_string(),
        ));
    }

    Ok(())
}

/// Flatten a format into numeric leaf fields, returning them with the
/// minimum size of a data message for it
///
/// PX4 does not write trailing top-level padding, so the minimum size is the
/// format size less that padding. Padding inside nested types still counts.
pub fn flatten(
    formats: &HashMap<String, MessageFormat>,
    format: &MessageFormat,
) -> Result<(Vec<FlatField>, usize)> {
    let mut out = Vec::new();
    let size = flatten_into(formats, format, "", 0, 0, &mut out)?;

    let trailing_padding: usize = format
        .fields
        .iter()
        .rev()
        .take_while(|f| f.is_padding())
        .map(|f| {
            FieldType::parse(&f.type_name).map_or(0, FieldType::size) * f.array_len.unwrap_or(1)
        })
        .sum();

    Ok((out, size - trailing_padding))
}

fn flatten_into(
    formats: &HashMap<String, MessageFormat>,
    format: &MessageFormat,
    prefix: &str,
    base: usize,
    depth: usize,
    out: &mut Vec<FlatField>,
) -> Result<usize> {
    if depth > MAX_FORMAT_NESTING {
        return Err(UlgCheckError::Decode(format!(
            "Format {} nested deeper than {} levels",
            format.name, MAX_FORMAT_NESTING
        )));
    }

    let mut offset = base;
    for field in &format.fields {
        let count = field.array_len.unwrap_or(1);

        match FieldType::parse(&field.type_name) {
            Some(field_type) => {
                if field.is_padding() || field_type == FieldType::Char {
                    offset += field_type.size() * count;
                    continue;
                }

                for i in 0..count {
                    let name = match field.array_len {
                        Some(_) => format!("{}{}[{}]", prefix, field.name, i),
                        None => format!("{}{}", prefix, field.name),
                    };
                    out.push(FlatField {
                        name,
                        offset,
                        field_type,
                    });
                    offset += field_type.size();
                }
            }
            None => {
                let nested = formats.get(&field.type_name).ok_or_else(|| {
                    UlgCheckError::Decode(format!(
                        "Format {} uses undefined type {}",
                        format.name, field.type_name
                    ))
                })?;

                for i in 0..count {
                    let nested_prefix = match field.array_len {
                        Some(_) => format!("{}{}[{}].", prefix, field.name, i),
                        None => format!("{}{}.", prefix, field.name),
                    };
                    // Nested timestamps stay ordinary fields (`current.timestamp`)
                    offset += flatten_into(formats, nested, &nested_prefix, offset, depth + 1, out)?;
                }
            }
        }
    }

    Ok(offset - base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ulog::test_support::UlogBuilder;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_too_short() {
        assert!(decode(&[0x55, 0x4C], &[]).is_err());
    }

    #[test]
    fn test_decode_invalid_magic() {
        let mut bytes = UlogBuilder::new().build();
        bytes[0] = 0x00;
        assert!(decode(&bytes, &[]).is_err());
    }

    #[test]
    fn test_decode_header() {
        let bytes = UlogBuilder::new().build();
        let ulog = decode(&bytes, &[]).unwrap();
        assert_eq!(ulog.version, 1);
        assert_eq!(ulog.start_timestamp, 1_000);
        assert!(ulog.datasets.is_empty());
        assert!(!ulog.truncated);
    }

    #[test]
    fn test_decode_scalar_topic() {
        let bytes = UlogBuilder::new()
            .format("vehicle_status:uint64_t timestamp;uint8_t nav_state;uint8_t[7] _padding0;")
            .subscribe(0, 1, "vehicle_status")
            .data(1, &UlogBuilder::sample(100, &[2, 0, 0, 0, 0, 0, 0, 0]))
            .data(1, &UlogBuilder::sample(200, &[14, 0, 0, 0, 0, 0, 0, 0]))
            .build();

        let ulog = decode(&bytes, &topics(&["vehicle_status"])).unwrap();
        let status = ulog.datasets_for("vehicle_status").next().unwrap();

        assert_eq!(status.timestamps, vec![100, 200]);
        assert_eq!(status.column("nav_state"), Some(&[2.0, 14.0][..]));
        assert_eq!(status.field_names().collect::<Vec<_>>(), vec!["nav_state"]);
    }

    #[test]
    fn test_decode_array_field() {
        let q: Vec<u8> = [1.0f32, 0.0, 0.0, 0.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let bytes = UlogBuilder::new()
            .format("vehicle_attitude_setpoint:uint64_t timestamp;float[4] q_d;")
            .subscribe(0, 3, "vehicle_attitude_setpoint")
            .data(3, &UlogBuilder::sample(50, &q))
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        let sp = &ulog.datasets[0];
        assert_eq!(sp.column("q_d[0]"), Some(&[1.0][..]));
        assert_eq!(sp.column("q_d[3]"), Some(&[0.0][..]));
        assert_eq!(sp.column("q_d"), None);
    }

    #[test]
    fn test_decode_nested_field() {
        let mut current = Vec::new();
        current.extend_from_slice(&7u64.to_le_bytes());
        current.extend_from_slice(&1.25f32.to_le_bytes());
        current.push(1u8);
        current.extend_from_slice(&[0u8; 3]);

        let bytes = UlogBuilder::new()
            .format("position_setpoint:uint64_t timestamp;float yaw;bool yaw_valid;uint8_t[3] _padding0;")
            .format("position_setpoint_triplet:uint64_t timestamp;position_setpoint current;")
            .subscribe(0, 4, "position_setpoint_triplet")
            .data(4, &UlogBuilder::sample(10, &current))
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        let triplet = &ulog.datasets[0];
        assert_eq!(triplet.timestamps, vec![10]);
        assert_eq!(triplet.column("current.yaw"), Some(&[1.25][..]));
        assert_eq!(triplet.column("current.yaw_valid"), Some(&[1.0][..]));
        assert_eq!(triplet.column("current.timestamp"), Some(&[7.0][..]));
    }

    #[test]
    fn test_decode_filters_topics() {
        let bytes = UlogBuilder::new()
            .format("a:uint64_t timestamp;float x;")
            .format("b:uint64_t timestamp;float y;")
            .subscribe(0, 1, "a")
            .subscribe(0, 2, "b")
            .data(1, &UlogBuilder::sample(1, &1.0f32.to_le_bytes()))
            .data(2, &UlogBuilder::sample(1, &2.0f32.to_le_bytes()))
            .build();

        let ulog = decode(&bytes, &topics(&["b"])).unwrap();
        assert_eq!(ulog.datasets.len(), 1);
        assert_eq!(ulog.datasets[0].name, "b");
    }

    #[test]
    fn test_decode_multi_instance() {
        let bytes = UlogBuilder::new()
            .format("sensor:uint64_t timestamp;float x;")
            .subscribe(0, 1, "sensor")
            .subscribe(1, 2, "sensor")
            .data(2, &UlogBuilder::sample(5, &3.0f32.to_le_bytes()))
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        let instances: Vec<_> = ulog.datasets_for("sensor").collect();
        assert_eq!(instances.len(), 2);
        assert!(instances[0].is_empty());
        assert_eq!(instances[1].multi_id, 1);
        assert_eq!(instances[1].len(), 1);
    }

    #[test]
    fn test_decode_parameters() {
        let bytes = UlogBuilder::new()
            .param_float("MPC_MAN_TILT_MAX", 35.0)
            .param_int("COM_RC_IN_MODE", 1)
            .format("a:uint64_t timestamp;float x;")
            .subscribe(0, 1, "a")
            .param_float("MPC_MAN_TILT_MAX", 50.0)
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        assert_eq!(ulog.param("MPC_MAN_TILT_MAX"), Some(ParamValue::Float(35.0)));
        assert_eq!(ulog.param("COM_RC_IN_MODE"), Some(ParamValue::Int32(1)));
        assert_eq!(ulog.param("MISSING"), None);
    }

    #[test]
    fn test_decode_info_strings() {
        let bytes = UlogBuilder::new().info_str("sys_name", "PX4").build();
        let ulog = decode(&bytes, &[]).unwrap();
        assert_eq!(ulog.info.get("sys_name").map(String::as_str), Some("PX4"));
    }

    #[test]
    fn test_decode_truncated_tail() {
        let mut bytes = UlogBuilder::new()
            .format("a:uint64_t timestamp;float x;")
            .subscribe(0, 1, "a")
            .data(1, &UlogBuilder::sample(1, &1.0f32.to_le_bytes()))
            .data(1, &UlogBuilder::sample(2, &2.0f32.to_le_bytes()))
            .build();
        bytes.truncate(bytes.len() - 3);

        let ulog = decode(&bytes, &[]).unwrap();
        assert!(ulog.truncated);
        assert_eq!(ulog.datasets[0].timestamps, vec![1]);
    }

    #[test]
    fn test_decode_dropouts() {
        let bytes = UlogBuilder::new().dropout(120).dropout(30).build();
        let ulog = decode(&bytes, &[]).unwrap();
        assert_eq!(ulog.dropout_count, 2);
        assert_eq!(ulog.dropout_total_ms, 150);
    }

    #[test]
    fn test_decode_unknown_incompat_flags() {
        let mut flags = [0u8; FLAG_BITS_PAYLOAD_SIZE];
        flags[8] = 0x02;
        let bytes = UlogBuilder::new().raw(MSG_TYPE_FLAG_BITS, &flags).build();
        assert!(decode(&bytes, &[]).is_err());

        flags[8] = INCOMPAT_FLAG0_DATA_APPENDED;
        let bytes = UlogBuilder::new().raw(MSG_TYPE_FLAG_BITS, &flags).build();
        assert!(decode(&bytes, &[]).is_ok());
    }

    #[test]
    fn test_decode_subscription_without_format() {
        let bytes = UlogBuilder::new().subscribe(0, 1, "ghost").build();
        assert!(decode(&bytes, &[]).is_err());
    }

    #[test]
    fn test_decode_omitted_trailing_padding() {
        // As PX4 writes it: no bytes for the trailing `_padding0`
        let bytes = UlogBuilder::new()
            .format("vehicle_status:uint64_t timestamp;uint8_t nav_state;uint8_t[7] _padding0;")
            .subscribe(0, 1, "vehicle_status")
            .data(1, &UlogBuilder::sample(100, &[1]))
            .data(1, &UlogBuilder::sample(200, &[2]))
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        let status = &ulog.datasets[0];
        assert_eq!(status.len(), 2);
        assert_eq!(status.column("nav_state"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_flatten_minimum_size() {
        let mut formats = HashMap::new();
        for definition in [
            "vehicle_status:uint64_t timestamp;uint8_t nav_state;uint8_t[7] _padding0;",
            "position_setpoint:uint64_t timestamp;float yaw;bool yaw_valid;uint8_t[3] _padding0;",
            "position_setpoint_triplet:uint64_t timestamp;position_setpoint current;",
        ] {
            let format = MessageFormat::parse(definition).unwrap();
            formats.insert(format.name.clone(), format);
        }

        let (_, status_size) = flatten(&formats, &formats["vehicle_status"]).unwrap();
        assert_eq!(status_size, 9);

        // Padding of the nested type is not trailing at the top level
        let (fields, triplet_size) =
            flatten(&formats, &formats["position_setpoint_triplet"]).unwrap();
        assert_eq!(triplet_size, 24);
        assert_eq!(fields.last().map(|f| f.name.as_str()), Some("current.yaw_valid"));
    }

    #[test]
    fn test_decode_sorts_out_of_order_samples() {
        let bytes = UlogBuilder::new()
            .format("a:uint64_t timestamp;float x;")
            .subscribe(0, 1, "a")
            .data(1, &UlogBuilder::sample(30, &3.0f32.to_le_bytes()))
            .data(1, &UlogBuilder::sample(10, &1.0f32.to_le_bytes()))
            .data(1, &UlogBuilder::sample(20, &2.0f32.to_le_bytes()))
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        assert_eq!(ulog.datasets[0].timestamps, vec![10, 20, 30]);
        assert_eq!(ulog.datasets[0].column("x"), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn test_decode_resubscription_keeps_samples() {
        let bytes = UlogBuilder::new()
            .format("a:uint64_t timestamp;float x;")
            .subscribe(0, 1, "a")
            .data(1, &UlogBuilder::sample(10, &1.0f32.to_le_bytes()))
            .raw(MSG_TYPE_REMOVE_LOGGED_MSG, &1u16.to_le_bytes())
            .subscribe(0, 2, "a")
            .data(2, &UlogBuilder::sample(20, &2.0f32.to_le_bytes()))
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        assert_eq!(ulog.datasets.len(), 1);
        assert_eq!(ulog.datasets[0].timestamps, vec![10, 20]);
        assert_eq!(
            ulog.datasets[0].columns().collect::<Vec<_>>(),
            vec![("x", &[1.0, 2.0][..])]
        );
    }

    #[test]
    fn test_decode_short_data_skipped() {
        let bytes = UlogBuilder::new()
            .format("a:uint64_t timestamp;float x;")
            .subscribe(0, 1, "a")
            .data(1, &5u64.to_le_bytes())
            .build();

        let ulog = decode(&bytes, &[]).unwrap();
        assert!(ulog.datasets[0].is_empty());
    }

    #[test]
    fn test_read_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let bytes = UlogBuilder::new()
            .format("a:uint64_t timestamp;double x;")
            .subscribe(0, 1, "a")
            .data(1, &UlogBuilder::sample(9, &0.5f64.to_le_bytes()))
            .build();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let ulog = read_file(file.path(), &topics(&["a"])).unwrap();
        assert_eq!(ulog.datasets[0].column("x"), Some(&[0.5][..]));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_file("/nonexistent/flight.ulg", &[]);
        assert!(matches!(result, Err(UlgCheckError::Io(_))));
    }
}
