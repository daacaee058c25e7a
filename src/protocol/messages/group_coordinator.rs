//! GroupCoordinator (wire API key 10, historically "FindCoordinator"), v0
//! only (§4.B, §6): asks a broker which broker hosts the group coordinator
//! for a given consumer group.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct GroupCoordinatorRequest {
    pub group_id: String,
}

impl RequestBody for GroupCoordinatorRequest {
    type Response = GroupCoordinatorResponse;

    const API_KEY: ApiKey = ApiKey::GroupCoordinator;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, _version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.group_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCoordinatorResponse {
    pub error_code: i16,
    pub node_id: i32,
    pub host: String,
    pub port: i32,
}

impl ResponseBody for GroupCoordinatorResponse {
    fn decode(buf: &mut ReadBuffer<'_>, _version: ApiVersion) -> Result<Self, BufferError> {
        Ok(Self {
            error_code: buf.read_i16()?,
            node_id: buf.read_i32()?,
            host: buf.read_str()?,
            port: buf.read_i32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::test_utils::{assert_decodes_to, assert_encodes_to};

    #[test]
    fn encode_is_just_the_group_id() {
        let req = GroupCoordinatorRequest {
            group_id: "my-group".into(),
        };
        assert_encodes_to!(req, ApiVersion(0), b"\x00\x08my-group");
    }

    #[test]
    fn decode_response_fixture() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i16.to_be_bytes());
        bytes.extend_from_slice(&7i32.to_be_bytes());
        bytes.extend_from_slice(&3i16.to_be_bytes());
        bytes.extend_from_slice(b"foo");
        bytes.extend_from_slice(&9092i32.to_be_bytes());

        assert_decodes_to!(
            GroupCoordinatorResponse,
            bytes,
            ApiVersion(0),
            GroupCoordinatorResponse {
                error_code: 0,
                node_id: 7,
                host: "foo".into(),
                port: 9092,
            }
        );
    }
}
