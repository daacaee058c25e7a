//! AlterConfigs, v0 only (§4.B, §9).
//!
//! The reference source carries an unresolved FIXME around incremental
//! (per-entry add/set/delete/append) config alteration gated by version;
//! this layer preserves the conservative choice documented in §9 and
//! DESIGN.md: incremental alteration is rejected outright on every version
//! currently supported, rather than guessing which version it became safe.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::create_topics::BuildError;
use super::{read_array, write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterableConfig {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigsResource {
    pub resource_type: i8,
    pub resource_name: String,
    pub configs: Vec<AlterableConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigsRequest {
    pub resources: Vec<AlterConfigsResource>,
    pub validate_only: bool,
}

impl AlterConfigsRequest {
    /// `incremental` mirrors the reference source's per-entry op field;
    /// always rejected per the module docs.
    pub fn build(
        resources: Vec<AlterConfigsResource>,
        validate_only: bool,
        incremental: bool,
    ) -> Result<Self, BuildError> {
        if resources.is_empty() {
            return Err(BuildError::EmptyTopicList);
        }
        if incremental {
            return Err(BuildError::ValidateOnlyUnsupported(0));
        }
        Ok(Self {
            resources,
            validate_only,
        })
    }
}

impl RequestBody for AlterConfigsRequest {
    type Response = AlterConfigsResponse;

    const API_KEY: ApiKey = ApiKey::AlterConfigs;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        write_array(buf, version, &self.resources, |buf, version, r| {
            buf.write_i8(r.resource_type)?;
            buf.write_str(Some(&r.resource_name))?;
            write_array(buf, version, &r.configs, |buf, _, c| {
                buf.write_str(Some(&c.name))?;
                buf.write_str(c.value.as_deref())
            })
        })?;
        buf.write_bool(self.validate_only)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigsResourceResponse {
    pub error_code: i16,
    pub error_message: Option<String>,
    pub resource_type: i8,
    pub resource_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigsResponse {
    pub resources: Vec<AlterConfigsResourceResponse>,
}

impl ResponseBody for AlterConfigsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let resources = read_array(buf, version, |buf, _| {
            Ok(AlterConfigsResourceResponse {
                error_code: buf.read_i16()?,
                error_message: buf.read_nullable_str()?,
                resource_type: buf.read_i8()?,
                resource_name: buf.read_str()?,
            })
        })?;
        Ok(Self { resources })
    }
}
