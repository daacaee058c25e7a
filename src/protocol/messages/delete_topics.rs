//! DeleteTopics, v0-1 (§4.B): straightforward aside from the shared
//! non-empty-list precondition check every admin builder performs.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::create_topics::BuildError;
use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicsRequest {
    pub topic_names: Vec<String>,
    pub timeout_ms: i32,
}

impl DeleteTopicsRequest {
    pub fn build(topic_names: Vec<String>, timeout_ms: i32) -> Result<Self, BuildError> {
        if topic_names.is_empty() {
            return Err(BuildError::EmptyTopicList);
        }
        Ok(Self {
            topic_names,
            timeout_ms,
        })
    }
}

impl RequestBody for DeleteTopicsRequest {
    type Response = DeleteTopicsResponse;

    const API_KEY: ApiKey = ApiKey::DeleteTopics;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 1);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        write_array(buf, version, &self.topic_names, |buf, _, t| buf.write_str(Some(t)))?;
        buf.write_i32(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletableTopicResult {
    pub name: String,
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicsResponse {
    pub topics: Vec<DeletableTopicResult>,
}

impl ResponseBody for DeleteTopicsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let topics = read_array(buf, version, |buf, _| {
            Ok(DeletableTopicResult {
                name: buf.read_str()?,
                error_code: buf.read_i16()?,
            })
        })?;
        Ok(Self { topics })
    }
}
