//! Produce, v0-2 (§4.B, §4.F): the one API whose payload (the message set)
//! is opaque here — compression and record-batch encoding belong to the
//! out-of-scope message-set codec (§1). This module only frames the
//! per-partition opaque bytes and parses the per-partition ack.

use std::time::{Duration, Instant};

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};
use crate::request::RequestFlags;

use super::{read_array, write_array, RequestBody, ResponseBody};

/// Sentinel stamped on a message before a successful response assigns it a
/// real offset/timestamp (§4.F, §8.6).
pub const OFFSET_INVALID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducePartitionData {
    pub partition_index: i32,
    /// Opaque, pre-encoded record batch bytes from the message-set codec.
    pub message_set: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceTopicData {
    pub name: String,
    pub partitions: Vec<ProducePartitionData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceRequest {
    pub acks: i16,
    pub timeout_ms: i32,
    pub topics: Vec<ProduceTopicData>,
}

impl ProduceRequest {
    /// Flags and deadline for the request record built from this body
    /// (§4.B): acks=0 suppresses the broker response entirely, and the
    /// deadline is at least 100ms regardless of how small `timeout_ms` is.
    pub fn flags_and_deadline(&self) -> (RequestFlags, Instant) {
        let flags = if self.acks == 0 {
            RequestFlags::NO_RESPONSE
        } else {
            RequestFlags::empty()
        };
        let millis = (self.timeout_ms.max(0) as u64).max(100);
        (flags, Instant::now() + Duration::from_millis(millis))
    }
}

impl RequestBody for ProduceRequest {
    type Response = ProduceResponse;

    const API_KEY: ApiKey = ApiKey::Produce;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 2);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        buf.write_i16(self.acks)?;
        buf.write_i32(self.timeout_ms)?;
        write_array(buf, version, &self.topics, |buf, version, topic| {
            buf.write_str(Some(&topic.name))?;
            write_array(buf, version, &topic.partitions, |buf, _, p| {
                buf.write_i32(p.partition_index)?;
                // the message set is itself length-prefixed bytes, but
                // already contains its own internal framing from the codec.
                buf.write_bytes(Some(&p.message_set))
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceResponsePartition {
    pub partition_index: i32,
    pub error_code: i16,
    pub base_offset: i64,
    /// v2+ only; `None` on v0/v1.
    pub log_append_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceResponseTopic {
    pub name: String,
    pub partitions: Vec<ProduceResponsePartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceResponse {
    pub topics: Vec<ProduceResponseTopic>,
    /// v1+ only; 0 on v0.
    pub throttle_time_ms: i32,
}

impl ResponseBody for ProduceResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let topics = read_array(buf, version, |buf, version| {
            let name = buf.read_str()?;
            let partitions = read_array(buf, version, |buf, version| {
                let partition_index = buf.read_i32()?;
                let error_code = buf.read_i16()?;
                let base_offset = buf.read_i64()?;
                let log_append_time = if version.0 >= 2 { Some(buf.read_i64()?) } else { None };
                Ok(ProduceResponsePartition {
                    partition_index,
                    error_code,
                    base_offset,
                    log_append_time,
                })
            })?;
            Ok(ProduceResponseTopic { name, partitions })
        })?;
        let throttle_time_ms = if version.0 >= 1 { buf.read_i32()? } else { 0 };
        Ok(Self {
            topics,
            throttle_time_ms,
        })
    }
}

/// One message's offset/timestamp bookkeeping as stamped by the dispatcher
/// (§4.F, §8.6): outside this layer's wire model, but owned by it because
/// the stamping rule depends on wire-version-specific response fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStamp {
    pub offset: i64,
    pub timestamp: Option<i64>,
}

/// Stamps `messages` in place from a successful partition ack (§4.F):
/// when `produce_offset_report` is set, every message gets its own
/// sequential offset (and the shared log-append timestamp, if v2+); when
/// it's not set, only the last message in the batch is stamped, matching
/// what the broker actually guarantees without per-message acking.
pub fn stamp_batch(
    messages: &mut [MessageStamp],
    base_offset: i64,
    log_append_time: Option<i64>,
    produce_offset_report: bool,
) {
    if messages.is_empty() {
        return;
    }
    if produce_offset_report {
        for (i, m) in messages.iter_mut().enumerate() {
            m.offset = base_offset + i as i64;
            m.timestamp = log_append_time;
        }
    } else {
        let last = messages.len() - 1;
        messages[last].offset = base_offset + last as i64;
        messages[last].timestamp = log_append_time;
    }
}
