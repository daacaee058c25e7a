//! ApiVersions, v0 only (§4.B, §6): the handshake request a connection sends
//! once at setup to learn which versions the broker supports per API key.
//! Retries disabled; a short fixed timeout rather than the socket timeout.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiVersionsRequest;

impl RequestBody for ApiVersionsRequest {
    type Response = ApiVersionsResponse;

    const API_KEY: ApiKey = ApiKey::ApiVersions;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, _buf: &mut WireBuffer, _version: ApiVersion) -> Result<(), BufferError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionsResponseKey {
    pub api_key: i16,
    pub min_version: i16,
    pub max_version: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionsResponse {
    pub error_code: i16,
    pub api_versions: Vec<ApiVersionsResponseKey>,
}

impl ApiVersionsResponse {
    /// The broker-advertised range for one API key, or `None` if the broker
    /// didn't list it at all (§4.H: the negotiator then has nothing to
    /// intersect against and falls back to the client minimum).
    pub fn range_for(&self, api_key: ApiKey) -> Option<ApiVersionRange> {
        let code: i16 = api_key.into();
        self.api_versions
            .iter()
            .find(|k| k.api_key == code)
            .map(|k| ApiVersionRange::new(k.min_version, k.max_version))
    }
}

impl ResponseBody for ApiVersionsResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let error_code = buf.read_i16()?;
        let api_versions = read_array(buf, version, |buf, _| {
            Ok(ApiVersionsResponseKey {
                api_key: buf.read_i16()?,
                min_version: buf.read_i16()?,
                max_version: buf.read_i16()?,
            })
        })?;
        Ok(Self {
            error_code,
            api_versions,
        })
    }
}
