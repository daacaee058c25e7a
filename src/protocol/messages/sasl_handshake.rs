//! SaslHandshake, v0 only (§4.B, §6): negotiates a SASL mechanism before the
//! actual SASL exchange (out of scope — a transport concern) begins.
//! Retries disabled; a 10s deadline is used instead of the configured
//! socket timeout when ApiVersion negotiation is disabled and the socket
//! timeout exceeds 10s (regression mitigation for 0.9.0.x brokers, §6).

use std::time::Duration;

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::{read_array, RequestBody, ResponseBody};

/// Deadline floor applied in place of `socket_timeout` under the condition
/// described in the module docs.
pub const LEGACY_BROKER_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaslHandshakeRequest {
    pub mechanism: String,
}

impl RequestBody for SaslHandshakeRequest {
    type Response = SaslHandshakeResponse;

    const API_KEY: ApiKey = ApiKey::SaslHandshake;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, _version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.mechanism))
    }
}

/// Picks the deadline for a SaslHandshake request per §6: the 10s floor only
/// kicks in when ApiVersion negotiation is off and the configured socket
/// timeout would otherwise exceed it.
pub fn handshake_deadline(api_version_request_enabled: bool, socket_timeout: Duration) -> Duration {
    if !api_version_request_enabled && socket_timeout > LEGACY_BROKER_DEADLINE {
        LEGACY_BROKER_DEADLINE
    } else {
        socket_timeout
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaslHandshakeResponse {
    pub error_code: i16,
    pub mechanisms: Vec<String>,
}

impl ResponseBody for SaslHandshakeResponse {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError> {
        let error_code = buf.read_i16()?;
        let mechanisms = read_array(buf, version, |buf, _| buf.read_str())?;
        Ok(Self {
            error_code,
            mechanisms,
        })
    }
}
