//! SyncGroup, v0 only (§4.B, §4.F, §3 invariant "stale SyncGroup discard").
//!
//! The leader fans its computed assignment back out as a per-member
//! `MemberState` buffer (version, topic-grouped partitions, user data),
//! spliced into the request as length-prefixed bytes rather than inlined —
//! followers send an empty assignment array and only read their own.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::{ApiVersion, ApiVersionRange};

use super::group_protocol::ConsumerGroupMemberAssignment;
use super::join_group::JOIN_SYNC_DEADLINE_GRACE;
use super::{write_array, RequestBody, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncGroupRequestAssignment {
    pub member_id: String,
    pub assignment: ConsumerGroupMemberAssignment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncGroupRequest {
    pub group_id: String,
    pub generation_id: i32,
    pub member_id: String,
    pub assignments: Vec<SyncGroupRequestAssignment>,
}

impl SyncGroupRequest {
    pub fn deadline_from_session_timeout(session_timeout_ms: i32) -> std::time::Instant {
        std::time::Instant::now()
            + std::time::Duration::from_millis(session_timeout_ms.max(0) as u64)
            + JOIN_SYNC_DEADLINE_GRACE
    }
}

impl RequestBody for SyncGroupRequest {
    type Response = SyncGroupResponse;

    const API_KEY: ApiKey = ApiKey::SyncGroup;
    const API_VERSION_RANGE: ApiVersionRange = ApiVersionRange::new(0, 0);

    fn encode(&self, buf: &mut WireBuffer, version: ApiVersion) -> Result<(), BufferError> {
        buf.write_str(Some(&self.group_id))?;
        buf.write_i32(self.generation_id)?;
        buf.write_str(Some(&self.member_id))?;
        write_array(buf, version, &self.assignments, |buf, _, a| {
            buf.write_str(Some(&a.member_id))?;
            let mut member_buf = WireBuffer::default();
            a.assignment.encode(&mut member_buf)?;
            buf.splice_sub_buffer(member_buf)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncGroupResponse {
    pub error_code: i16,
    pub assignment: ConsumerGroupMemberAssignment,
}

impl ResponseBody for SyncGroupResponse {
    fn decode(buf: &mut ReadBuffer<'_>, _version: ApiVersion) -> Result<Self, BufferError> {
        let error_code = buf.read_i16()?;
        let assignment_bytes = buf.read_bytes()?;
        let mut member_rd = ReadBuffer::new(&assignment_bytes);
        let assignment = ConsumerGroupMemberAssignment::decode(&mut member_rd)?;
        Ok(Self {
            error_code,
            assignment,
        })
    }
}

/// Join-group states this layer needs to know about purely to decide
/// whether a SyncGroup reply is still wanted (§3, §4.F, §8.5): the full
/// rebalance state machine lives in the out-of-scope group coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinState {
    WaitJoin,
    WaitSync,
    WaitAssign,
    Steady,
}

/// True when a SyncGroup response arriving now is still meaningful — i.e.
/// the caller hasn't moved past `WaitSync` since sending the request (§3:
/// "the response is discarded without touching group state").
pub fn is_still_awaited(state: JoinState) -> bool {
    matches!(state, JoinState::WaitSync)
}
