//! ListOffsets (wire API key 2, historically "Offset"), v0-1 (§4.B, §4.C).
//!
//! v0 asks for up to `max_num_offsets` offsets at or before `timestamp`; v1
//! drops `max_num_offsets` entirely and returns exactly one (timestamp,
//! offset) pair. `FeatureFlags::OFFSET_TIME` (§4.H) gates which shape a
//! negotiated version uses.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOffsetsRequestPartition {
    pub partition_index: i32,
    pub timestamp: i64,
    /// v0 only; always written as 1 when absent, since this layer never
    /// needs more than the single offset closest to `timestamp`.
    pub max_num_offsets: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOffsetsRequestTopic {
    pub name: String,
    pub partitions: Vec<ListOffsetsRequestPartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOffsetsRequest {
    pub replica_id: i32,
    pub topics: Vec<ListOffsetsRequestTopic>,
}

impl ListOffsetsRequest {
    pub fn new(topics: Vec<ListOffsetsRequestTopic>) -> Self {
        Self {
            replica_id: -1,
            topics,
        }
    }
}

impl RequestBody for ListOffsetsRequest {
    type Response = ListOffsetsResponse;

    const API_KEY: ApiKey = ApiKey::ListOffsets;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 1);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        buf.write_i32(self.replica_id)?;
        write_array(buf, version, &self.topics, |buf, version, topic| {
            buf.write_str(Some(&topic.name))?;
            write_array(buf, version, &topic.partitions, |buf, version, p| {
                buf.write_i32(p.partition_index)?;
                buf.write_i64(p.timestamp)?;
                if version.0 == 0 {
                    buf.write_i32(p.max_num_offsets)?;
                }
                Ok(())
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOffsetsResponsePartition {
    pub partition_index: i32,
    pub error_code: i16,
    /// v0: zero or more offsets, newest first. v1: exactly the single offset,
    /// mirrored here so callers don't need to branch on version.
    pub offsets: Vec<i64>,
    /// v1 only; -1 on v0.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOffsetsResponseTopic {
    pub name: String,
    pub partitions: Vec<ListOffsetsResponsePartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOffsetsResponse {
    pub topics: Vec<ListOffsetsResponseTopic>,
}

impl ResponseBody for ListOffsetsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let topics = read_array(buf, version, |buf, version| {
            let name = buf.read_str()?;
            let partitions = read_array(buf, version, |buf, version| {
                let partition_index = buf.read_i32()?;
                let error_code = buf.read_i16()?;
                if version.0 == 0 {
                    let n = buf.read_array_count()?;
                    let mut offsets = Vec::with_capacity(n.min(4096));
                    for _ in 0..n {
                        offsets.push(buf.read_i64()?);
                    }
                    Ok(ListOffsetsResponsePartition {
                        partition_index,
                        error_code,
                        offsets,
                        timestamp: -1,
                    })
                } else {
                    let timestamp = buf.read_i64()?;
                    let offset = buf.read_i64()?;
                    Ok(ListOffsetsResponsePartition {
                        partition_index,
                        error_code,
                        offsets: vec![offset],
                        timestamp,
                    })
                }
            })?;
            Ok(ListOffsetsResponseTopic { name, partitions })
        })?;
        Ok(Self { topics })
    }
}
