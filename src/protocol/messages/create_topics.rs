//! CreateTopics, v0-2 (§4.B): `validate_only` requires v≥1 — building a
//! request that asks for it on v0 is a precondition failure, not a wire
//! encoding that silently drops the field (§4.B "precondition checks").

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicReplicaAssignment {
    pub partition_index: i32,
    pub broker_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicConfig {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatableTopic {
    pub name: String,
    pub num_partitions: i32,
    pub replication_factor: i16,
    pub assignments: Vec<CreateTopicReplicaAssignment>,
    pub configs: Vec<CreateTopicConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicsRequest {
    pub topics: Vec<CreatableTopic>,
    pub timeout_ms: i32,
    pub validate_only: bool,
}

/// Precondition errors a builder rejects before ever touching the wire
/// buffer (§4.B): distinct from a decode/broker error because nothing was
/// sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("CreateTopics request must name at least one topic")]
    EmptyTopicList,
    #[error("validate_only requires CreateTopics v1 or later (got v{0})")]
    ValidateOnlyUnsupported(i16),
}

impl CreateTopicsRequest {
    pub fn build(
        topics: Vec<CreatableTopic>,
        timeout_ms: i32,
        validate_only: bool,
        version: ApiVersion,
    ) -> Result<Self, BuildError> {
        if topics.is_empty() {
            return Err(BuildError::EmptyTopicList);
        }
        if validate_only && version.0 < 1 {
            return Err(BuildError::ValidateOnlyUnsupported(version.0));
        }
        Ok(Self {
            topics,
            timeout_ms,
            validate_only,
        })
    }
}

impl RequestBody for CreateTopicsRequest {
    type Response = CreateTopicsResponse;

    const API_KEY: ApiKey = ApiKey::CreateTopics;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 2);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        write_array(buf, version, &self.topics, |buf, version, t| {
            buf.write_str(Some(&t.name))?;
            buf.write_i32(t.num_partitions)?;
            buf.write_i16(t.replication_factor)?;
            write_array(buf, version, &t.assignments, |buf, version, a| {
                buf.write_i32(a.partition_index)?;
                write_array(buf, version, &a.broker_ids, |buf, _, id| buf.write_i32(*id))
            })?;
            write_array(buf, version, &t.configs, |buf, _, c| {
                buf.write_str(Some(&c.name))?;
                buf.write_str(c.value.as_deref())
            })
        })?;
        buf.write_i32(self.timeout_ms)?;
        if version.0 >= 1 {
            buf.write_bool(self.validate_only)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatableTopicResult {
    pub name: String,
    pub error_code: i16,
    /// v1+ only.
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicsResponse {
    pub topics: Vec<CreatableTopicResult>,
}

impl ResponseBody for CreateTopicsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let topics = read_array(buf, version, |buf, version| {
            let name = buf.read_str()?;
            let error_code = buf.read_i16()?;
            let error_message = if version.0 >= 1 { buf.read_nullable_str()? } else { None };
            Ok(CreatableTopicResult {
                name,
                error_code,
                error_message,
            })
        })?;
        Ok(Self { topics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> CreatableTopic {
        CreatableTopic {
            name: "t".into(),
            num_partitions: 1,
            replication_factor: 1,
            assignments: Vec::new(),
            configs: Vec::new(),
        }
    }

    #[test]
    fn empty_topic_list_is_rejected() {
        assert_eq!(
            CreateTopicsRequest::build(Vec::new(), 1000, false, ApiVersion(0)),
            Err(BuildError::EmptyTopicList)
        );
    }

    #[test]
    fn validate_only_requires_v1() {
        assert_eq!(
            CreateTopicsRequest::build(vec![topic()], 1000, true, ApiVersion(0)),
            Err(BuildError::ValidateOnlyUnsupported(0))
        );
        assert!(CreateTopicsRequest::build(vec![topic()], 1000, true, ApiVersion(1)).is_ok());
    }

    #[test]
    fn v0_omits_validate_only_byte() {
        let req = CreateTopicsRequest::build(vec![topic()], 1000, false, ApiVersion(0)).unwrap();
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(0)).unwrap();
        let with_v0 = buf.len();

        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(1)).unwrap();
        assert_eq!(buf.len(), with_v0 + 1);
    }
}
