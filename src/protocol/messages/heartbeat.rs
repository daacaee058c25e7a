//! Heartbeat, v0 only (§4.B): keeps a member's group membership alive
//! between rebalances. Deadline equals the group session timeout exactly,
//! no grace period (unlike JoinGroup/SyncGroup).

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatRequest {
    pub group_id: String,
    pub generation_id: i32,
    pub member_id: String,
}

impl RequestBody for HeartbeatRequest {
    type Response = HeartbeatResponse;

    const API_KEY: ApiKey = ApiKey::Heartbeat;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, _version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.group_id))?;
        buf.write_i32(self.generation_id)?;
        buf.write_str(Some(&self.member_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatResponse {
    pub error_code: i16,
}

impl ResponseBody for HeartbeatResponse {
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
    fn encode_roundtrip_fields() {
        let req = HeartbeatRequest {
            group_id: "g".into(),
            generation_id: 7,
            member_id: "m".into(),
        };
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(0)).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(&bytes[0..2], &1i16.to_be_bytes());
        assert_eq!(&bytes[3..7], &7i32.to_be_bytes());
    }

    #[test]
    fn decode_error_code() {
        let bytes = 25i16.to_be_bytes();
        let mut rd = ReadBuffer::new(&bytes);
        let resp = HeartbeatResponse::decode(&mut rd, ApiVersion(0)).unwrap();
        assert_eq!(resp.error_code, 25);
    }
}
