//! One request/response pair per API key in scope (§6). Each type's
//! `encode`/`decode` is version-gated exactly the way the design calls for:
//! fields present in later versions are guarded on `version.0 >= N`, never on
//! a separate "which version am I" enum.
//!
//! Request/response correlation and header framing belong to the broker
//! transport (§1 Out of scope) — these types only cover request and response
//! *bodies*.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

pub mod alter_configs;
pub mod api_versions;
pub mod create_partitions;
pub mod create_topics;
pub mod delete_topics;
pub mod describe_configs;
pub mod describe_groups;
pub mod group_coordinator;
pub mod group_protocol;
pub mod heartbeat;
pub mod join_group;
pub mod leave_group;
pub mod list_groups;
pub mod list_offsets;
pub mod metadata;
pub mod offset_commit;
pub mod offset_fetch;
pub mod produce;
pub mod sasl_handshake;
pub mod sync_group;

#[cfg(test)]
pub(crate) mod test_utils;

/// A request body: knows its API key, the version range this crate
/// supports, and how to encode itself for a given negotiated version.
pub trait RequestBody: Sized {
    type Response: ResponseBody;

    const API_KEY: ApiKey;
    const API_VERSION_RANGE: ApiVersionRange;

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError>;
}

/// A response body: knows how to decode itself for a given negotiated version.
pub trait ResponseBody: Sized {
    fn decode(buf: &mut ReadBuffer<'_>, version: ApiVersion) -> Result<Self, BufferError>;
}

/// Writes a length-prefixed array, back-patching the count once every
/// element has been written (§4.A).
pub(crate) fn write_array<T>(
    buf: &mut WireBuffer,
    version: ApiVersion,
    items: &[T],
    write_item: impl Fn(&mut WireBuffer, ApiVersion, &T) -> Result<(), BufferError>,
) -> Result<(), BufferError> {
    let token = buf.write_array_count()?;
    for item in items {
        write_item(buf, version, item)?;
    }
    buf.patch_count(token, items.len() as i32);
    Ok(())
}

/// Reads a length-prefixed array. Tolerates a broker writing elements this
/// client doesn't know about by letting `read_item` ignore unknown fields
/// itself (§4.C); it never ignores unknown *partitions*, only unknown wire
/// sub-fields.
pub(crate) fn read_array<T>(
    buf: &mut ReadBuffer<'_>,
    version: ApiVersion,
    read_item: impl Fn(&mut ReadBuffer<'_>, ApiVersion) -> Result<T, BufferError>,
) -> Result<Vec<T>, BufferError> {
    let n = buf.read_array_count()?;
    let mut out = Vec::with_capacity(n.min(4096));
    for _ in 0..n {
        out.push(read_item(buf, version)?);
    }
    Ok(out)
}
