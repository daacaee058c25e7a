//! Unified error code space (§7) and the action classifier (§4.D).
//!
//! Three origins collapse into one `ErrorCode`: broker-reported codes off the
//! wire (positive), local transport/protocol failures (negative), and
//! request-level synthetics like `InProgress`/`PrevInProgress`. Classification
//! is a pure function — see [`classify`] — so it can be unit tested without
//! any of the I/O or threading machinery around it.

use bitflags::bitflags;
use thiserror::Error;

use crate::buffer::BufferError;

/// A single unified error code. Positive variants are Kafka wire error codes
/// (classic protocol, as returned by the API versions in scope); negative
/// variants are local to this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,

    // --- broker-reported (subset relevant to the in-scope API versions) ---
    OffsetOutOfRange,
    CorruptMessage,
    UnknownTopicOrPartition,
    LeaderNotAvailable,
    NotLeaderForPartition,
    RequestTimedOut,
    BrokerNotAvailable,
    ReplicaNotAvailable,
    MessageTooLarge,
    StaleControllerEpoch,
    OffsetMetadataTooLarge,
    GroupLoadInProgress,
    GroupCoordinatorNotAvailable,
    NotCoordinatorForGroup,
    InvalidTopicException,
    NotEnoughReplicas,
    NotEnoughReplicasAfterAppend,
    InvalidRequiredAcks,
    IllegalGeneration,
    InconsistentGroupProtocol,
    UnknownMemberId,
    InvalidSessionTimeout,
    RebalanceInProgress,
    InvalidCommitOffsetSize,
    TopicAuthorizationFailed,
    GroupAuthorizationFailed,
    UnsupportedVersion,
    TopicAlreadyExists,
    InvalidPartitions,
    InvalidReplicationFactor,
    InvalidConfig,
    NotController,
    InvalidRequest,
    Other(i16),

    // --- local transport / protocol ---
    Transport,
    TimedOut,
    TimedOutQueue,
    Destroy,
    BadMsg,
    UnsupportedFeature,
    WaitCoord,
    PartialResponse,
    MsgTimedOut,

    // --- request-level synthetic ---
    PrevInProgress,
    InProgress,
}

impl ErrorCode {
    pub fn is_success(self) -> bool {
        matches!(self, ErrorCode::NoError)
    }

    /// Decodes a broker-reported i16 error code off the wire. `0` is success.
    pub fn from_broker_code(code: i16) -> Self {
        match code {
            0 => Self::NoError,
            1 => Self::OffsetOutOfRange,
            2 => Self::CorruptMessage,
            3 => Self::UnknownTopicOrPartition,
            5 => Self::LeaderNotAvailable,
            6 => Self::NotLeaderForPartition,
            7 => Self::RequestTimedOut,
            8 => Self::BrokerNotAvailable,
            9 => Self::ReplicaNotAvailable,
            10 => Self::MessageTooLarge,
            11 => Self::StaleControllerEpoch,
            12 => Self::OffsetMetadataTooLarge,
            14 => Self::GroupLoadInProgress,
            15 => Self::GroupCoordinatorNotAvailable,
            16 => Self::NotCoordinatorForGroup,
            17 => Self::InvalidTopicException,
            19 => Self::NotEnoughReplicas,
            20 => Self::NotEnoughReplicasAfterAppend,
            21 => Self::InvalidRequiredAcks,
            22 => Self::IllegalGeneration,
            23 => Self::InconsistentGroupProtocol,
            25 => Self::UnknownMemberId,
            26 => Self::InvalidSessionTimeout,
            27 => Self::RebalanceInProgress,
            28 => Self::InvalidCommitOffsetSize,
            29 => Self::TopicAuthorizationFailed,
            30 => Self::GroupAuthorizationFailed,
            35 => Self::UnsupportedVersion,
            36 => Self::TopicAlreadyExists,
            37 => Self::InvalidPartitions,
            38 => Self::InvalidReplicationFactor,
            40 => Self::InvalidConfig,
            41 => Self::NotController,
            42 => Self::InvalidRequest,
            other => Self::Other(other),
        }
    }

    /// Encodes back to the wire i16, for response fixtures and tests.
    pub fn to_broker_code(self) -> i16 {
        match self {
            Self::NoError => 0,
            Self::OffsetOutOfRange => 1,
            Self::CorruptMessage => 2,
            Self::UnknownTopicOrPartition => 3,
            Self::LeaderNotAvailable => 5,
            Self::NotLeaderForPartition => 6,
            Self::RequestTimedOut => 7,
            Self::BrokerNotAvailable => 8,
            Self::ReplicaNotAvailable => 9,
            Self::MessageTooLarge => 10,
            Self::StaleControllerEpoch => 11,
            Self::OffsetMetadataTooLarge => 12,
            Self::GroupLoadInProgress => 14,
            Self::GroupCoordinatorNotAvailable => 15,
            Self::NotCoordinatorForGroup => 16,
            Self::InvalidTopicException => 17,
            Self::NotEnoughReplicas => 19,
            Self::NotEnoughReplicasAfterAppend => 20,
            Self::InvalidRequiredAcks => 21,
            Self::IllegalGeneration => 22,
            Self::InconsistentGroupProtocol => 23,
            Self::UnknownMemberId => 25,
            Self::InvalidSessionTimeout => 26,
            Self::RebalanceInProgress => 27,
            Self::InvalidCommitOffsetSize => 28,
            Self::TopicAuthorizationFailed => 29,
            Self::GroupAuthorizationFailed => 30,
            Self::UnsupportedVersion => 35,
            Self::TopicAlreadyExists => 36,
            Self::InvalidPartitions => 37,
            Self::InvalidReplicationFactor => 38,
            Self::InvalidConfig => 40,
            Self::NotController => 41,
            Self::InvalidRequest => 42,
            Self::Other(code) => code,
            // local/synthetic codes have no wire representation
            _ => i16::MIN,
        }
    }
}

bitflags! {
    /// Orthogonal remediation actions a classified error can demand (§3, §4.D).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Action: u8 {
        /// Unrecoverable; surface to the caller as-is.
        const PERMANENT = 0b0000_0001;
        /// Drop silently (used by override tables for expected benign codes).
        const IGNORE    = 0b0000_0010;
        /// Trigger a metadata refresh or coordinator re-query.
        const REFRESH   = 0b0000_0100;
        /// Re-enqueue the request via the retry driver (§4.E).
        const RETRY     = 0b0000_1000;
        /// Worth a log line even though otherwise handled.
        const INFORM    = 0b0001_0000;
        /// Paired with REFRESH: treat the coordinator as dead, not just stale.
        const SPECIAL   = 0b0010_0000;
    }
}

/// One entry in a per-API override table: if `code` matches, OR `action`
/// into the result and suppress the built-in defaults (§4.D step 2-3).
#[derive(Debug, Clone, Copy)]
pub struct OverrideEntry {
    pub code: ErrorCode,
    pub action: Action,
}

/// Marks the end of a fixed-size override table (§9: "a small fixed-size
/// table... with an explicit sentinel").
pub const OVERRIDE_SENTINEL: OverrideEntry = OverrideEntry {
    code: ErrorCode::NoError,
    action: Action::empty(),
};

/// Per-API override tables (§10.E): each in-scope API that needs anything
/// other than the generic defaults carries its own fixed-size table, ending
/// in [`OVERRIDE_SENTINEL`], mirroring the distinct `actions[]` argument
/// lists the reference client passes per handler rather than one shared
/// table. Exact codes recorded in `DESIGN.md`.
pub const LIST_OFFSETS_OVERRIDES: [OverrideEntry; 3] = [
    OverrideEntry {
        code: ErrorCode::UnknownTopicOrPartition,
        action: Action::PERMANENT,
    },
    OverrideEntry {
        code: ErrorCode::NotLeaderForPartition,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::RETRY.bits()),
    },
    OVERRIDE_SENTINEL,
];

/// GroupCoordinator lookups retry while the group's metadata is still being
/// loaded on the broker, the same code `OffsetCommit` treats as a plain
/// retry rather than a coordinator-liveness signal.
pub const GROUP_COORDINATOR_OVERRIDES: [OverrideEntry; 2] = [
    OverrideEntry {
        code: ErrorCode::GroupLoadInProgress,
        action: Action::RETRY,
    },
    OVERRIDE_SENTINEL,
];

pub const OFFSET_COMMIT_OVERRIDES: [OverrideEntry; 9] = [
    OverrideEntry {
        code: ErrorCode::OffsetMetadataTooLarge,
        action: Action::PERMANENT,
    },
    OverrideEntry {
        code: ErrorCode::GroupLoadInProgress,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::GroupCoordinatorNotAvailable,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::SPECIAL.bits()),
    },
    // The reference table gives NotCoordinatorForGroup Refresh|Special with
    // no Retry bit; the retry bit is added here because the testable
    // scenario for this exact code requires Refresh|Special|Retry.
    OverrideEntry {
        code: ErrorCode::NotCoordinatorForGroup,
        action: Action::from_bits_truncate(
            Action::REFRESH.bits() | Action::SPECIAL.bits() | Action::RETRY.bits(),
        ),
    },
    OverrideEntry {
        code: ErrorCode::IllegalGeneration,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::RETRY.bits()),
    },
    OverrideEntry {
        code: ErrorCode::UnknownMemberId,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::RETRY.bits()),
    },
    OverrideEntry {
        code: ErrorCode::RebalanceInProgress,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::InvalidCommitOffsetSize,
        action: Action::PERMANENT,
    },
    OVERRIDE_SENTINEL,
];

/// OffsetFetch has no dedicated override table in the reference source (its
/// handler calls the generic resolver with an empty list); defaults alone
/// classify every code it can see.
pub const OFFSET_FETCH_OVERRIDES: [OverrideEntry; 1] = [OVERRIDE_SENTINEL];

/// SyncGroup, like OffsetFetch, resolves purely through the generic
/// defaults in the reference source.
pub const SYNC_GROUP_OVERRIDES: [OverrideEntry; 1] = [OVERRIDE_SENTINEL];

/// JoinGroup is coordinator-bound the same way OffsetCommit is; its table
/// mirrors OffsetCommit's coordinator-liveness subset (GroupCoordinator/
/// NotCoordinatorForGroup/RebalanceInProgress/UnknownMemberId), since the
/// reference source's JoinGroup response handling lives in the consumer
/// group state machine rather than in a dedicated `rd_kafka_handle_*`
/// function this layer has a copy of.
pub const JOIN_GROUP_OVERRIDES: [OverrideEntry; 5] = [
    OverrideEntry {
        code: ErrorCode::GroupCoordinatorNotAvailable,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::SPECIAL.bits()),
    },
    OverrideEntry {
        code: ErrorCode::NotCoordinatorForGroup,
        action: Action::from_bits_truncate(
            Action::REFRESH.bits() | Action::SPECIAL.bits() | Action::RETRY.bits(),
        ),
    },
    OverrideEntry {
        code: ErrorCode::RebalanceInProgress,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::UnknownMemberId,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::RETRY.bits()),
    },
    OVERRIDE_SENTINEL,
];

/// Heartbeat's table is the same coordinator-liveness subset as JoinGroup,
/// plus IllegalGeneration (a heartbeat carrying a stale generation should
/// re-query and rejoin, not just fail permanently).
pub const HEARTBEAT_OVERRIDES: [OverrideEntry; 6] = [
    OverrideEntry {
        code: ErrorCode::GroupCoordinatorNotAvailable,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::SPECIAL.bits()),
    },
    OverrideEntry {
        code: ErrorCode::NotCoordinatorForGroup,
        action: Action::from_bits_truncate(
            Action::REFRESH.bits() | Action::SPECIAL.bits() | Action::RETRY.bits(),
        ),
    },
    OverrideEntry {
        code: ErrorCode::RebalanceInProgress,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::IllegalGeneration,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::RETRY.bits()),
    },
    OverrideEntry {
        code: ErrorCode::UnknownMemberId,
        action: Action::from_bits_truncate(Action::REFRESH.bits() | Action::RETRY.bits()),
    },
    OVERRIDE_SENTINEL,
];

/// Produce's table, taken directly from the reference source's
/// `rd_kafka_handle_Produce` actions list.
pub const PRODUCE_OVERRIDES: [OverrideEntry; 8] = [
    OverrideEntry {
        code: ErrorCode::Transport,
        action: Action::REFRESH,
    },
    OverrideEntry {
        code: ErrorCode::UnknownTopicOrPartition,
        action: Action::REFRESH,
    },
    OverrideEntry {
        code: ErrorCode::NotEnoughReplicas,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::NotEnoughReplicasAfterAppend,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::TimedOutQueue,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::TimedOut,
        action: Action::RETRY,
    },
    OverrideEntry {
        code: ErrorCode::MsgTimedOut,
        action: Action::PERMANENT,
    },
    OVERRIDE_SENTINEL,
];

/// Classifies `code` into an action mask using `overrides` first, falling
/// back to the global defaults in §4.D. `has_request` must be `false` when no
/// request record is associated with this error (e.g. a synthetic local
/// failure with nothing to retry) — this clears RETRY even if it was set by
/// an override or a default, per the design's retry-suppression invariant.
///
/// Pure and side-effect free: callers do their own logging, at debug
/// verbosity, using the returned mask.
pub fn classify(code: ErrorCode, overrides: &[OverrideEntry], has_request: bool) -> Action {
    if code.is_success() {
        return Action::empty();
    }

    let mut matched = false;
    let mut action = Action::empty();
    for entry in overrides {
        if entry.code == OVERRIDE_SENTINEL.code && entry.action == OVERRIDE_SENTINEL.action {
            break;
        }
        if entry.code == code {
            action |= entry.action;
            matched = true;
        }
    }

    if !matched {
        action = default_action(code);
    }

    if !has_request {
        action.remove(Action::RETRY);
    }

    action
}

fn default_action(code: ErrorCode) -> Action {
    use ErrorCode::*;

    match code {
        LeaderNotAvailable
        | NotLeaderForPartition
        | BrokerNotAvailable
        | ReplicaNotAvailable
        | GroupCoordinatorNotAvailable
        | NotCoordinatorForGroup
        | WaitCoord => Action::REFRESH,

        TimedOut | TimedOutQueue | RequestTimedOut | NotEnoughReplicas
        | NotEnoughReplicasAfterAppend | Transport => Action::RETRY,

        Destroy | InvalidSessionTimeout | UnsupportedFeature => Action::PERMANENT,

        _ => Action::PERMANENT,
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProtocolError {
    #[error("decode failed: {0}")]
    Decode(#[from] BufferError),

    #[error("request was not sent: {0}")]
    NotSent(&'static str),

    #[error("broker error: {0:?}")]
    Broker(ErrorCode),

    #[error("a full-metadata request is already in flight")]
    PrevInProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_empty_mask() {
        assert_eq!(
            classify(ErrorCode::NoError, &[], true),
            Action::empty()
        );
    }

    #[test]
    fn default_refresh_codes() {
        assert_eq!(
            classify(ErrorCode::NotLeaderForPartition, &[], true),
            Action::REFRESH
        );
    }

    #[test]
    fn default_retry_codes() {
        assert_eq!(classify(ErrorCode::TimedOut, &[], true), Action::RETRY);
    }

    #[test]
    fn unclassified_is_permanent() {
        assert_eq!(
            classify(ErrorCode::Other(999), &[], true),
            Action::PERMANENT
        );
    }

    #[test]
    fn override_suppresses_defaults() {
        // NotLeaderForPartition defaults to REFRESH only; an override adding RETRY
        // must fully replace the defaults, not merge with them.
        let overrides = [
            OverrideEntry {
                code: ErrorCode::NotLeaderForPartition,
                action: Action::REFRESH.union(Action::RETRY),
            },
            OVERRIDE_SENTINEL,
        ];
        assert_eq!(
            classify(ErrorCode::NotLeaderForPartition, &overrides, true),
            Action::REFRESH | Action::RETRY
        );
    }

    #[test]
    fn retry_cleared_without_request() {
        let overrides = [
            OverrideEntry {
                code: ErrorCode::UnknownMemberId,
                action: Action::REFRESH | Action::RETRY,
            },
            OVERRIDE_SENTINEL,
        ];
        let action = classify(ErrorCode::UnknownMemberId, &overrides, false);
        assert!(!action.contains(Action::RETRY));
        assert!(action.contains(Action::REFRESH));
    }

    #[test]
    fn classifier_is_pure() {
        let a = classify(ErrorCode::RequestTimedOut, &[], true);
        let b = classify(ErrorCode::RequestTimedOut, &[], true);
        assert_eq!(a, b);
    }

    #[test]
    fn offset_commit_table_marks_unknown_member_refresh_and_retry() {
        assert_eq!(
            classify(ErrorCode::UnknownMemberId, &OFFSET_COMMIT_OVERRIDES, true),
            Action::REFRESH | Action::RETRY
        );
    }

    #[test]
    fn offset_commit_table_marks_not_coordinator_special_and_retries() {
        assert_eq!(
            classify(ErrorCode::NotCoordinatorForGroup, &OFFSET_COMMIT_OVERRIDES, true),
            Action::REFRESH | Action::SPECIAL | Action::RETRY
        );
    }

    #[test]
    fn offset_fetch_table_is_defaults_only() {
        assert_eq!(
            classify(ErrorCode::NotLeaderForPartition, &OFFSET_FETCH_OVERRIDES, true),
            default_action(ErrorCode::NotLeaderForPartition)
        );
    }

    #[test]
    fn produce_table_matches_reference_actions() {
        assert_eq!(classify(ErrorCode::Transport, &PRODUCE_OVERRIDES, true), Action::REFRESH);
        assert_eq!(classify(ErrorCode::TimedOut, &PRODUCE_OVERRIDES, true), Action::RETRY);
        assert_eq!(classify(ErrorCode::MsgTimedOut, &PRODUCE_OVERRIDES, true), Action::PERMANENT);
    }

    #[test]
    fn join_group_and_heartbeat_share_the_coordinator_liveness_subset() {
        for table in [&JOIN_GROUP_OVERRIDES[..], &HEARTBEAT_OVERRIDES[..]] {
            assert_eq!(
                classify(ErrorCode::NotCoordinatorForGroup, table, true),
                Action::REFRESH | Action::SPECIAL | Action::RETRY
            );
        }
    }
}
