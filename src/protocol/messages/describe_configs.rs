//! DescribeConfigs, v0-1 (§4.B, new in §10.E's sense: present in the
//! original version table but not individually called out by the
//! distillation beyond naming it in §6).

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::create_topics::BuildError;
use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsResource {
    pub resource_type: i8,
    pub resource_name: String,
    /// `None` asks for every config key on this resource.
    pub config_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsRequest {
    pub resources: Vec<DescribeConfigsResource>,
    /// v1+ only.
    pub include_synonyms: bool,
}

impl DescribeConfigsRequest {
    pub fn build(resources: Vec<DescribeConfigsResource>, include_synonyms: bool) -> Result<Self, BuildError> {
        if resources.is_empty() {
            return Err(BuildError::EmptyTopicList);
        }
        Ok(Self {
            resources,
            include_synonyms,
        })
    }
}

impl RequestBody for DescribeConfigsRequest {
    type Response = DescribeConfigsResponse;

    const API_KEY: ApiKey = ApiKey::DescribeConfigs;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 1);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        write_array(buf, version, &self.resources, |buf, version, r| {
            buf.write_i8(r.resource_type)?;
            buf.write_str(Some(&r.resource_name))?;
            match &r.config_names {
                Some(names) => write_array(buf, version, names, |buf, _, n| buf.write_str(Some(n))),
                None => buf.write_i32(-1),
            }
        })?;
        if version.0 >= 1 {
            buf.write_bool(self.include_synonyms)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsEntry {
    pub name: String,
    pub value: Option<String>,
    pub read_only: bool,
    pub is_default: bool,
    pub is_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsResourceResult {
    pub error_code: i16,
    pub error_message: Option<String>,
    pub resource_type: i8,
    pub resource_name: String,
    pub configs: Vec<DescribeConfigsEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsResponse {
    pub throttle_time_ms: i32,
    pub resources: Vec<DescribeConfigsResourceResult>,
}

impl ResponseBody for DescribeConfigsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let throttle_time_ms = buf.read_i32()?;
        let resources = read_array(buf, version, |buf, version| {
            let error_code = buf.read_i16()?;
            let error_message = buf.read_nullable_str()?;
            let resource_type = buf.read_i8()?;
            let resource_name = buf.read_str()?;
            let configs = read_array(buf, version, |buf, _| {
                Ok(DescribeConfigsEntry {
                    name: buf.read_str()?,
                    value: buf.read_nullable_str()?,
                    read_only: buf.read_bool()?,
                    is_default: buf.read_bool()?,
                    is_sensitive: buf.read_bool()?,
                })
            })?;
            Ok(DescribeConfigsResourceResult {
                error_code,
                error_message,
                resource_type,
                resource_name,
                configs,
            })
        })?;
        Ok(Self {
            throttle_time_ms,
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_rejected() {
        assert!(DescribeConfigsRequest::build(Vec::new(), false).is_err());
    }

    #[test]
    fn v0_omits_include_synonyms_byte() {
        let req = DescribeConfigsRequest::build(
            vec![DescribeConfigsResource {
                resource_type: 2,
                resource_name: "t".into(),
                config_names: None,
            }],
            true,
        )
        .unwrap();
        let mut v0 = WireBuffer::default();
        req.encode(&mut v0, ApiVersion(0)).unwrap();
        let mut v1 = WireBuffer::default();
        req.encode(&mut v1, ApiVersion(1)).unwrap();
        assert_eq!(v1.len(), v0.len() + 1);
    }

    #[test]
    fn null_config_names_writes_minus_one() {
        let req = DescribeConfigsRequest::build(
            vec![DescribeConfigsResource {
                resource_type: 2,
                resource_name: "t".into(),
                config_names: None,
            }],
            false,
        )
        .unwrap();
        let mut buf = WireBuffer::default();
        req.encode(&mut buf, ApiVersion(0)).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(&bytes[bytes.len() - 4..], &(-1i32).to_be_bytes());
    }
}
