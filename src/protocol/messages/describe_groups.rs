//! DescribeGroups, v0 only (§4.B): detailed per-group/per-member state for
//! diagnostics. Member metadata/assignment are kept opaque here — decoding
//! them into [`super::group_protocol`] types is left to the caller, since
//! not every group uses the "consumer" protocol this client understands.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGroupsRequest {
    pub groups: Vec<String>,
}

impl RequestBody for DescribeGroupsRequest {
    type Response = DescribeGroupsResponse;

    const API_KEY: ApiKey = ApiKey::DescribeGroups;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        write_array(buf, version, &self.groups, |buf, _, g| buf.write_str(Some(g)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGroupsResponseMember {
    pub member_id: String,
    pub client_id: String,
    pub client_host: String,
    pub member_metadata: Vec<u8>,
    pub member_assignment: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGroupsResponseGroup {
    pub error_code: i16,
    pub group_id: String,
    pub group_state: String,
    pub protocol_type: String,
    pub protocol_data: String,
    pub members: Vec<DescribeGroupsResponseMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGroupsResponse {
    pub groups: Vec<DescribeGroupsResponseGroup>,
}

impl ResponseBody for DescribeGroupsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let groups = read_array(buf, version, |buf, version| {
            let error_code = buf.read_i16()?;
            let group_id = buf.read_str()?;
            let group_state = buf.read_str()?;
            let protocol_type = buf.read_str()?;
            let protocol_data = buf.read_str()?;
            let members = read_array(buf, version, |buf, _| {
                Ok(DescribeGroupsResponseMember {
                    member_id: buf.read_str()?,
                    client_id: buf.read_str()?,
                    client_host: buf.read_str()?,
                    member_metadata: buf.read_bytes()?,
                    member_assignment: buf.read_bytes()?,
                })
            })?;
            Ok(DescribeGroupsResponseGroup {
                error_code,
                group_id,
                group_state,
                protocol_type,
                protocol_data,
                members,
            })
        })?;
        Ok(Self { groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_writes_group_array() {
        let req = DescribeGroupsRequest {
            groups: vec!["g1".into(), "g2".into()],
        };
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(0)).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(&bytes[0..4], &2i32.to_be_bytes());
    }

    #[test]
    fn decode_response_with_no_members() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&0i16.to_be_bytes());
        bytes.extend_from_slice(&1i16.to_be_bytes());
        bytes.push(b'g');
        bytes.extend_from_slice(&6i16.to_be_bytes());
        bytes.extend_from_slice(b"Stable");
        bytes.extend_from_slice(&8i16.to_be_bytes());
        bytes.extend_from_slice(b"consumer");
        bytes.extend_from_slice(&5i16.to_be_bytes());
        bytes.extend_from_slice(b"range");
        bytes.extend_from_slice(&0i32.to_be_bytes());

        let mut rd = ReadBuffer::new(&bytes);
        let resp = DescribeGroupsResponse::decode(&mut rd, ApiVersion(0)).unwrap();
        assert_eq!(resp.groups[0].group_state, "Stable");
        assert!(resp.groups[0].members.is_empty());
    }
}
