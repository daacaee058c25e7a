//! OffsetFetch, v0-1 (§4.B, §4.C, §9 "Empty-request short-circuit").
//!
//! Building this request is stateful: partitions whose toppar already holds
//! a valid committed offset are skipped (§4.B), and if every partition is
//! skipped the request is never sent at all — [`build`] returns `None` and
//! the caller synthesizes a success reply locally instead.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};
use crate::toppar::Toppar;

use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchRequestTopic {
    pub name: String,
    pub partition_indexes: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchRequest {
    pub group_id: String,
    pub topics: Vec<OffsetFetchRequestTopic>,
}

impl OffsetFetchRequest {
    /// Groups `toppars` by topic, dropping any whose committed offset is
    /// already valid (§4.B skip rule). Returns `None` when nothing remains
    /// to ask for, mirroring the "no bytes sent" scenario in §8.
    pub fn build(group_id: impl Into<String>, toppars: &[&Toppar]) -> Option<Self> {
        let mut by_topic: Vec<OffsetFetchRequestTopic> = Vec::new();
        for tp in toppars {
            if tp.has_valid_offset() {
                continue;
            }
            match by_topic.iter_mut().find(|t| t.name == tp.topic) {
                Some(t) => t.partition_indexes.push(tp.partition),
                None => by_topic.push(OffsetFetchRequestTopic {
                    name: tp.topic.clone(),
                    partition_indexes: vec![tp.partition],
                }),
            }
        }
        if by_topic.is_empty() {
            return None;
        }
        Some(Self {
            group_id: group_id.into(),
            topics: by_topic,
        })
    }
}

impl RequestBody for OffsetFetchRequest {
    type Response = OffsetFetchResponse;

    const API_KEY: ApiKey = ApiKey::OffsetFetch;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 1);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.group_id))?;
        write_array(buf, version, &self.topics, |buf, version, topic| {
            buf.write_str(Some(&topic.name))?;
            write_array(buf, version, &topic.partition_indexes, |buf, _, p| buf.write_i32(*p))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchResponsePartition {
    pub partition_index: i32,
    pub committed_offset: i64,
    pub metadata: Option<String>,
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchResponseTopic {
    pub name: String,
    pub partitions: Vec<OffsetFetchResponsePartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchResponse {
    pub topics: Vec<OffsetFetchResponseTopic>,
}

impl OffsetFetchResponse {
    /// The locally synthesized reply for the all-valid-skip scenario (§8.1):
    /// echoes each toppar's already-known offset back as a success.
    pub fn synthetic_for(toppars: &[&Toppar]) -> Self {
        let mut by_topic: Vec<OffsetFetchResponseTopic> = Vec::new();
        for tp in toppars {
            let partition = OffsetFetchResponsePartition {
                partition_index: tp.partition,
                committed_offset: tp.committed_offset(),
                metadata: None,
                error_code: 0,
            };
            match by_topic.iter_mut().find(|t| t.name == tp.topic) {
                Some(t) => t.partitions.push(partition),
                None => by_topic.push(OffsetFetchResponseTopic {
                    name: tp.topic.clone(),
                    partitions: vec![partition],
                }),
            }
        }
        Self { topics: by_topic }
    }
}

impl ResponseBody for OffsetFetchResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let topics = read_array(buf, version, |buf, version| {
            let name = buf.read_str()?;
            let partitions = read_array(buf, version, |buf, _| {
                Ok(OffsetFetchResponsePartition {
                    partition_index: buf.read_i32()?,
                    committed_offset: buf.read_i64()?,
                    metadata: buf.read_nullable_str()?,
                    error_code: buf.read_i16()?,
                })
            })?;
            Ok(OffsetFetchResponseTopic { name, partitions })
        })?;
        Ok(Self { topics })
    }
}
