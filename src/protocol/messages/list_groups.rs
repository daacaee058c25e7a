//! ListGroups, v0 only (§4.B): enumerates every group known to a broker.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListGroupsRequest;

impl RequestBody for ListGroupsRequest {
    type Response = ListGroupsResponse;

    const API_KEY: ApiKey = ApiKey::ListGroups;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, _buf: &mut WireBuffer, _version: ApiVersion) -> Result<(), BufferError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroupsResponseGroup {
    pub group_id: String,
    pub protocol_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroupsResponse {
    pub error_code: i16,
    pub groups: Vec<ListGroupsResponseGroup>,
}

impl ResponseBody for ListGroupsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let error_code = buf.read_i16()?;
        let groups = read_array(buf, version, |buf, _| {
            Ok(ListGroupsResponseGroup {
                group_id: buf.read_str()?,
                protocol_type: buf.read_str()?,
            })
        })?;
        Ok(Self { error_code, groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_empty_body() {
        let mut buf = WireBuffer::default();
        ListGroupsRequest.encode(&mut buf, ApiVersion(0)).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_response_fixture() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i16.to_be_bytes());
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&1i16.to_be_bytes());
        bytes.push(b'g');
        bytes.extend_from_slice(&8i16.to_be_bytes());
        bytes.extend_from_slice(b"consumer");

        let mut rd = ReadBuffer::new(&bytes);
        let resp = ListGroupsResponse::decode(&mut rd, ApiVersion(0)).unwrap();
        assert_eq!(resp.groups[0].group_id, "g");
        assert_eq!(resp.groups[0].protocol_type, "consumer");
    }
}
