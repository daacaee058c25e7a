//! OffsetCommit, v0-2 (§4.B, §9).
//!
//! v1 adds `generation_id`/`member_id`; v2 adds a group-level retention
//! field. The retention field is always written as -1: the reference source
//! carries an unresolved FIXME here (`generation >= 2` retention handling),
//! and this layer preserves that conservative default rather than guessing
//! a real retention policy (§9 "Ambiguity / open question", DESIGN.md).
//!
//! Partitions with a negative offset are dropped before encoding; if none
//! remain, [`OffsetCommitRequest::build`] returns `None` and the call must
//! be reported "not sent" without invoking a response handler.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCommitRequestPartition {
    pub partition_index: i32,
    pub committed_offset: i64,
    pub committed_metadata: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCommitRequestTopic {
    pub name: String,
    pub partitions: Vec<OffsetCommitRequestPartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCommitRequest {
    pub group_id: String,
    pub generation_id: i32,
    pub member_id: String,
    pub topics: Vec<OffsetCommitRequestTopic>,
}

impl OffsetCommitRequest {
    /// Drops partitions with a negative offset; returns `None` if that
    /// leaves nothing to commit (§9 empty-request short-circuit).
    pub fn build(
        group_id: impl Into<String>,
        generation_id: i32,
        member_id: impl Into<String>,
        topics: Vec<(String, Vec<OffsetCommitRequestPartition>)>,
    ) -> Option<Self> {
        let topics: Vec<OffsetCommitRequestTopic> = topics
            .into_iter()
            .filter_map(|(name, partitions)| {
                let partitions: Vec<_> = partitions
                    .into_iter()
                    .filter(|p| p.committed_offset >= 0)
                    .collect();
                (!partitions.is_empty()).then_some(OffsetCommitRequestTopic { name, partitions })
            })
            .collect();
        if topics.is_empty() {
            return None;
        }
        Some(Self {
            group_id: group_id.into(),
            generation_id,
            member_id: member_id.into(),
            topics,
        })
    }
}

impl RequestBody for OffsetCommitRequest {
    type Response = OffsetCommitResponse;

    const API_KEY: ApiKey = ApiKey::OffsetCommit;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 2);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.group_id))?;
        if version.0 >= 1 {
            buf.write_i32(self.generation_id)?;
            buf.write_str(Some(&self.member_id))?;
        }
        if version.0 >= 2 {
            // See module docs: preserved as an unconditional -1.
            buf.write_i64(-1)?;
        }
        write_array(buf, version, &self.topics, |buf, version, topic| {
            buf.write_str(Some(&topic.name))?;
            write_array(buf, version, &topic.partitions, |buf, version, p| {
                buf.write_i32(p.partition_index)?;
                buf.write_i64(p.committed_offset)?;
                if version.0 == 1 {
                    buf.write_i64(-1)?;
                }
                // metadata is never null on the wire: substitute an empty
                // string so older brokers/clients don't choke on -1 (§4.B).
                buf.write_str(Some(p.committed_metadata.as_deref().unwrap_or("")))
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCommitResponsePartition {
    pub partition_index: i32,
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCommitResponseTopic {
    pub name: String,
    pub partitions: Vec<OffsetCommitResponsePartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCommitResponse {
    pub topics: Vec<OffsetCommitResponseTopic>,
}

impl ResponseBody for OffsetCommitResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let topics = read_array(buf, version, |buf, version| {
            let name = buf.read_str()?;
            let partitions = read_array(buf, version, |buf, _| {
                Ok(OffsetCommitResponsePartition {
                    partition_index: buf.read_i32()?,
                    error_code: buf.read_i16()?,
                })
            })?;
            Ok(OffsetCommitResponseTopic { name, partitions })
        })?;
        Ok(Self { topics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(offset: i64) -> OffsetCommitRequestPartition {
        OffsetCommitRequestPartition {
            partition_index: 0,
            committed_offset: offset,
            committed_metadata: None,
        }
    }

    #[test]
    fn build_drops_negative_offsets_and_discards_if_empty() {
        assert!(OffsetCommitRequest::build("g", -1, "", vec![("t".into(), vec![partition(-1)])]).is_none());
    }

    #[test]
    fn build_keeps_valid_partitions() {
        let req = OffsetCommitRequest::build(
            "g",
            -1,
            "",
            vec![("t".into(), vec![partition(-1), partition(5)])],
        )
        .unwrap();
        assert_eq!(req.topics[0].partitions.len(), 1);
        assert_eq!(req.topics[0].partitions[0].committed_offset, 5);
    }

    #[test]
    fn v2_always_writes_retention_as_minus_one() {
        let req = OffsetCommitRequest::build("g", 3, "m", vec![("t".into(), vec![partition(5)])]).unwrap();
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(2)).unwrap();
        let bytes = buf.into_bytes();
        // group_id(2+1) + generation(4) + member_id(2+1) + retention(8)
        let retention_offset = 2 + 1 + 4 + 2 + 1;
        let retention = i64::from_be_bytes(bytes[retention_offset..retention_offset + 8].try_into().unwrap());
        assert_eq!(retention, -1);
    }

    #[test]
    fn null_metadata_is_written_as_empty_string() {
        let req = OffsetCommitRequest::build("g", -1, "", vec![("t".into(), vec![partition(5)])]).unwrap();
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(0)).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(bytes[bytes.len() - 2..], [0x00, 0x00]);
    }
}
