//! LeaveGroup, v0 only (§4.B): a voluntary departure from a consumer group.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveGroupRequest {
    pub group_id: String,
    pub member_id: String,
}

impl RequestBody for LeaveGroupRequest {
    type Response = LeaveGroupResponse;

    const API_KEY: ApiKey = ApiKey::LeaveGroup;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, _version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.group_id))?;
        buf.write_str(Some(&self.member_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveGroupResponse {
    pub error_code: i16,
}

impl ResponseBody for LeaveGroupResponse {
    fn decode(buf: &mut ReadBuffer<'_>, _version: ApiVersion) -> Result<Self, BufferError> {
        Ok(Self {
            error_code: buf.read_i16()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_group_and_member_ids() {
        let req = LeaveGroupRequest {
            group_id: "g".into(),
            member_id: "m".into(),
        };
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(0)).unwrap();
        assert_eq!(buf.as_slice(), b"\x00\x01g\x00\x01m");
    }

    #[test]
    fn decode_error_code() {
        let bytes = 0i16.to_be_bytes();
        let mut rd = ReadBuffer::new(&bytes);
        let resp = LeaveGroupResponse::decode(&mut rd, ApiVersion(0)).unwrap();
        assert_eq!(resp.error_code, 0);
    }
}
