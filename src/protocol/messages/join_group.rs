//! JoinGroup, v0 only (§4.B): the request a member sends to enter or rejoin
//! a consumer group. Blocking, with a session-timeout-derived deadline.

use std::time::{Duration, Instant};

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};
use crate::request::RequestFlags;

use super::group_protocol::ConsumerGroupMemberMetadata;
use super::{read_array, write_array, RequestBody, ResponseBody};

/// Extra grace period added on top of the session timeout for JoinGroup and
/// SyncGroup deadlines (§4.B): the coordinator itself may legitimately take
/// up to the session timeout to respond, so the client waits a little longer.
pub const JOIN_SYNC_DEADLINE_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGroupProtocol {
    pub name: String,
    pub metadata: ConsumerGroupMemberMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGroupRequest {
    pub group_id: String,
    pub session_timeout_ms: i32,
    pub member_id: String,
    pub protocol_type: String,
    pub protocols: Vec<JoinGroupProtocol>,
}

impl JoinGroupRequest {
    /// Flags and absolute deadline every caller must attach to the request
    /// record built from this body (§4.B: blocking, deadline = session
    /// timeout + grace).
    pub fn flags_and_deadline(&self) -> (RequestFlags, Instant) {
        let deadline = Instant::now()
            + Duration::from_millis(self.session_timeout_ms.max(0) as u64)
            + JOIN_SYNC_DEADLINE_GRACE;
        (RequestFlags::BLOCKING, deadline)
    }
}

impl RequestBody for JoinGroupRequest {
    type Response = JoinGroupResponse;

    const API_KEY: ApiKey = ApiKey::JoinGroup;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.group_id))?;
        buf.write_i32(self.session_timeout_ms)?;
        buf.write_str(Some(&self.member_id))?;
        buf.write_str(Some(&self.protocol_type))?;
        write_array(buf, version, &self.protocols, |buf, _, protocol| {
            buf.write_str(Some(&protocol.name))?;
            let mut meta_buf = WireBuffer::default();
            protocol.metadata.encode(&mut meta_buf)?;
            buf.write_bytes(Some(meta_buf.as_slice()))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGroupResponseMember {
    pub member_id: String,
    pub metadata: ConsumerGroupMemberMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGroupResponse {
    pub error_code: i16,
    pub generation_id: i32,
    pub protocol_name: String,
    pub leader: String,
    pub member_id: String,
    pub members: Vec<JoinGroupResponseMember>,
}

impl ResponseBody for JoinGroupResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let error_code = buf.read_i16()?;
        let generation_id = buf.read_i32()?;
        let protocol_name = buf.read_str()?;
        let leader = buf.read_str()?;
        let member_id = buf.read_str()?;
        let members = read_array(buf, version, |buf, _| {
            let member_id = buf.read_str()?;
            let metadata_bytes = buf.read_bytes()?;
            let mut meta_rd = ReadBuffer::new(&metadata_bytes);
            let metadata = ConsumerGroupMemberMetadata::decode(&mut meta_rd)?;
            Ok(JoinGroupResponseMember { member_id, metadata })
        })?;
        Ok(Self {
            error_code,
            generation_id,
            protocol_name,
            leader,
            member_id,
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> ConsumerGroupMemberMetadata {
        ConsumerGroupMemberMetadata {
            version: 0,
            topics: vec!["t".into()],
            user_data: None,
            owned_partitions: Vec::new(),
            generation_id: -1,
            rack_id: None,
        }
    }

    #[test]
    fn encode_then_decode_roundtrips_embedded_metadata() {
        let req = JoinGroupRequest {
            group_id: "g".into(),
            session_timeout_ms: 10_000,
            member_id: String::new(),
            protocol_type: "consumer".into(),
            protocols: vec![JoinGroupProtocol {
                name: "range".into(),
                metadata: sample_metadata(),
            }],
        };
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(0)).unwrap();
        // Not a full response round-trip (request has no decode side), but
        // confirms the nested metadata buffer was spliced as length-prefixed bytes.
        assert!(!buf.is_empty());
    }

    #[test]
    fn deadline_includes_grace_period() {
        let req = JoinGroupRequest {
            group_id: "g".into(),
            session_timeout_ms: 10_000,
            member_id: String::new(),
            protocol_type: "consumer".into(),
            protocols: Vec::new(),
        };
        let (flags, deadline) = req.flags_and_deadline();
        assert!(flags.contains(RequestFlags::BLOCKING));
        assert!(deadline > Instant::now() + Duration::from_millis(9_000));
    }

    #[test]
    fn decode_response_roundtrips_member_metadata() {
        let mut resp_buf = Vec::new();
        resp_buf.extend_from_slice(&0i16.to_be_bytes());
        resp_buf.extend_from_slice(&1i32.to_be_bytes());
        resp_buf.extend_from_slice(&5i16.to_be_bytes());
        resp_buf.extend_from_slice(b"range");
        resp_buf.extend_from_slice(&1i16.to_be_bytes());
        resp_buf.extend_from_slice(b"m");
        resp_buf.extend_from_slice(&1i16.to_be_bytes());
        resp_buf.extend_from_slice(b"m");
        resp_buf.extend_from_slice(&1i32.to_be_bytes()); // members array count

        let mut member_buf = Vec::new();
        member_buf.extend_from_slice(&1i16.to_be_bytes());
        member_buf.extend_from_slice(b"m");
        let mut meta_wire = WireBuffer::default();
        sample_metadata().encode(&mut meta_wire).unwrap();
        let meta_bytes = meta_wire.into_bytes();
        member_buf.extend_from_slice(&(meta_bytes.len() as i32).to_be_bytes());
        member_buf.extend_from_slice(&meta_bytes);

        resp_buf.extend_from_slice(&member_buf);

        let mut rd = ReadBuffer::new(&resp_buf);
        let resp = JoinGroupResponse::decode(&mut rd, ApiVersion(0)).unwrap();
        assert_eq!(resp.members[0].metadata, sample_metadata());
    }
}
