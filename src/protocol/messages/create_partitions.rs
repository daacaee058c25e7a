//! CreatePartitions, v0 only (§4.B, §6): an admin operation with no
//! in-scope predecessor in the reference source's version table, added here
//! because the wire layer covers it (§10.E is silent on it, but it isn't
//! excluded by any Non-goal either).

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::create_topics::BuildError;
use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartitionsAssignment {
    pub broker_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsTopic {
    pub name: String,
    pub count: i32,
    pub assignments: Vec<NewPartitionsAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsRequest {
    pub topics: Vec<CreatePartitionsTopic>,
    pub timeout_ms: i32,
    pub validate_only: bool,
}

impl CreatePartitionsRequest {
    pub fn build(
        topics: Vec<CreatePartitionsTopic>,
        timeout_ms: i32,
        validate_only: bool,
    ) -> Result<Self, BuildError> {
        if topics.is_empty() {
            return Err(BuildError::EmptyTopicList);
        }
        Ok(Self {
            topics,
            timeout_ms,
            validate_only,
        })
    }
}

impl RequestBody for CreatePartitionsRequest {
    type Response = CreatePartitionsResponse;

    const API_KEY: ApiKey = ApiKey::CreatePartitions;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        write_array(buf, version, &self.topics, |buf, version, t| {
            buf.write_str(Some(&t.name))?;
            buf.write_i32(t.count)?;
            write_array(buf, version, &t.assignments, |buf, _, a| {
                write_array(buf, ApiVersion(0), &a.broker_ids, |buf, _, id| buf.write_i32(*id))
            })
        })?;
        buf.write_i32(self.timeout_ms)?;
        buf.write_bool(self.validate_only)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsTopicResult {
    pub name: String,
    pub error_code: i16,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsResponse {
    pub topics: Vec<CreatePartitionsTopicResult>,
}

impl ResponseBody for CreatePartitionsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let topics = read_array(buf, version, |buf, _| {
            Ok(CreatePartitionsTopicResult {
                name: buf.read_str()?,
                error_code: buf.read_i16()?,
                error_message: buf.read_nullable_str()?,
            })
        })?;
        Ok(Self { topics })
    }
}
