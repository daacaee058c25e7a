//! Metadata, v0-2 (§4.B, §4.G): the three topic-list encodings share one
//! wire shape but mean different things — `None` asks for brokers only
//! (v≥1), `Some(&[])` asks for every topic, and a non-empty list asks for
//! exactly those topics. Every full request (the first two cases) must go
//! through the coalescing guard before it's built.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSelector {
    /// brokers-only; only valid from v1 onward.
    BrokersOnly,
    AllTopics,
    Specific(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    pub topics: TopicSelector,
}

impl MetadataRequest {
    /// Whether this request needs a coalescing-guard token before it's sent
    /// (§4.G): only the two "full" shapes do.
    pub fn is_full_request(&self) -> bool {
        matches!(self.topics, TopicSelector::BrokersOnly | TopicSelector::AllTopics)
    }
}

impl RequestBody for MetadataRequest {
    type Response = MetadataResponse;

    const API_KEY: ApiKey = ApiKey::Metadata;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 2);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        match &self.topics {
            TopicSelector::BrokersOnly => {
                if version.0 < 1 {
                    return Err(BufferError::UnsupportedVersion {
                        field: "Metadata brokers-only request",
                        min: 1,
                        negotiated: version.0,
                    });
                }
                buf.write_i32(-1)
            }
            TopicSelector::AllTopics => {
                let empty: Vec<String> = Vec::new();
                write_array(buf, version, &empty, |buf, _, t| buf.write_str(Some(t)))
            }
            TopicSelector::Specific(topics) => {
                write_array(buf, version, topics, |buf, _, t| buf.write_str(Some(t)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataResponseBroker {
    pub node_id: i32,
    pub host: String,
    pub port: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataResponsePartition {
    pub error_code: i16,
    pub partition_index: i32,
    pub leader_id: i32,
    pub replica_nodes: Vec<i32>,
    pub isr_nodes: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataResponseTopic {
    pub error_code: i16,
    pub name: String,
    pub partitions: Vec<MetadataResponsePartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataResponse {
    pub brokers: Vec<MetadataResponseBroker>,
    /// v1+: the broker id that is the controller; -1 on v0.
    pub controller_id: i32,
    pub topics: Vec<MetadataResponseTopic>,
}

impl ResponseBody for MetadataResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let brokers = read_array(buf, version, |buf, _| {
            Ok(MetadataResponseBroker {
                node_id: buf.read_i32()?,
                host: buf.read_str()?,
                port: buf.read_i32()?,
            })
        })?;
        let controller_id = if version.0 >= 1 { buf.read_i32()? } else { -1 };
        let topics = read_array(buf, version, |buf, version| {
            let error_code = buf.read_i16()?;
            let name = buf.read_str()?;
            let partitions = read_array(buf, version, |buf, version| {
                let error_code = buf.read_i16()?;
                let partition_index = buf.read_i32()?;
                let leader_id = buf.read_i32()?;
                let replica_nodes = read_array(buf, version, |buf, _| buf.read_i32())?;
                let isr_nodes = read_array(buf, version, |buf, _| buf.read_i32())?;
                Ok(MetadataResponsePartition {
                    error_code,
                    partition_index,
                    leader_id,
                    replica_nodes,
                    isr_nodes,
                })
            })?;
            Ok(MetadataResponseTopic {
                error_code,
                name,
                partitions,
            })
        })?;
        Ok(Self {
            brokers,
            controller_id,
            topics,
        })
    }
}
