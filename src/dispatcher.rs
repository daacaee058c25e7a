//! Retry driver (§4.E) and response dispatcher (§4.F): the control flow that
//! runs on a broker's I/O worker thread once a response (or a local failure)
//! is ready to be turned into either another attempt or a delivered reply.
//!
//! The worker loop itself, the socket, and the metadata cache are out of
//! scope (§1) — this module only needs to know about them through the
//! collaborator traits below, so the control flow can be exercised without a
//! real broker connection.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{
    classify, Action, ErrorCode, OverrideEntry, GROUP_COORDINATOR_OVERRIDES, HEARTBEAT_OVERRIDES,
    JOIN_GROUP_OVERRIDES, LIST_OFFSETS_OVERRIDES, OFFSET_COMMIT_OVERRIDES, OFFSET_FETCH_OVERRIDES,
    PRODUCE_OVERRIDES, SYNC_GROUP_OVERRIDES,
};
use crate::protocol::messages::offset_fetch::OffsetFetchResponsePartition;
use crate::protocol::messages::produce::{stamp_batch, MessageStamp};
use crate::protocol::messages::sync_group::{is_still_awaited, JoinState};
use crate::reply_queue::ReplyQueueHandle;
use crate::request::RequestRecord;
use crate::toppar::Toppar;

/// What the retry driver decides for one classified failure (§4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Retries are exhausted or disabled; fall through to error propagation.
    GiveUp,
    /// Re-enqueued on the same broker; the caller returns an InProgress
    /// sentinel and touches nothing else.
    Scheduled,
}

/// Broker-side re-enqueue primitive the retry driver delegates to. A real
/// implementation owns the per-broker request pipeline (§5); this trait is
/// the seam a test double stands in for.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Attempts to re-enqueue `request` on the same broker, honoring its
    /// `retries_remaining` counter, a configured backoff, and a hard ceiling.
    /// Returns `true` if scheduled.
    async fn requeue(&self, request: &mut RequestRecord, backoff: Duration) -> bool;
}

/// Spreads a configured backoff over `[0.5x, 1.5x)` so a burst of requests
/// hitting the same retryable error don't all come back on the same tick.
fn jittered_backoff(base: Duration) -> Duration {
    let factor = rand::thread_rng().gen_range(0.5..1.5);
    Duration::from_secs_f64(base.as_secs_f64() * factor)
}

/// Runs the retry driver (§4.E) for one classified action. Decrements
/// `request.retries_remaining` and asks `transport` to requeue only when
/// `Action::RETRY` is set and at least one retry remains.
pub async fn drive_retry(
    request: &mut RequestRecord,
    action: Action,
    backoff: Duration,
    transport: &dyn Transport,
) -> RetryOutcome {
    if !action.contains(Action::RETRY) || request.retries_remaining == 0 {
        return RetryOutcome::GiveUp;
    }
    request.retries_remaining -= 1;
    if transport.requeue(request, jittered_backoff(backoff)).await {
        RetryOutcome::Scheduled
    } else {
        RetryOutcome::GiveUp
    }
}

/// Upstream metadata/coordinator collaborators a Refresh action notifies
/// (§4.F step 5). Kept as two narrow traits rather than one grab-bag so a
/// test double only has to implement the half it cares about.
pub trait MetadataRefresh {
    /// A leadership error observed for `topic`/`partition`; schedule (or
    /// coalesce into) a metadata refresh.
    fn refresh_topic(&self, topic: &str, partition: i32);
}

pub trait CoordinatorControl {
    /// A coordinator error for `group_id`. `dead` is set when the action
    /// mask carries `Action::SPECIAL` — the coordinator is presumed dead and
    /// must be rediscovered, not just re-queried.
    fn refresh_coordinator(&self, group_id: &str, dead: bool);
}

/// Outcome of running the generic dispatch shape (§4.F steps 1-7) for an API
/// whose reply is just "deliver the parsed body or an error". Specialized
/// handlers (OffsetFetch, SyncGroup, Produce) layer their own step 2/5/7
/// behavior on top of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Request record is freed, no reply delivered (Destroy path, step 1).
    Terminated,
    /// The response was stale and is discarded without side effects (step 2).
    Discarded,
    /// A refresh was triggered; delivery still proceeds per the remaining
    /// steps (Refresh alone never suppresses the reply, only Retry does).
    Refreshed,
    /// Retry was scheduled; caller should return InProgress and stop.
    RetryScheduled,
    /// Reply was posted to the caller's queue.
    Delivered,
    /// Reply queue epoch had moved on; the op was silently dropped.
    DroppedStaleEpoch,
}

/// Runs the generic dispatch shape (§4.F) for a single-shot API: classify,
/// optionally refresh, optionally retry, otherwise deliver `payload` (or
/// `Err(code)` if the decode/broker result was an error) to `reply`.
///
/// `code` is `ErrorCode::Destroy` for the termination path (step 1).
pub async fn dispatch<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    overrides: &[OverrideEntry],
    retry_backoff: Duration,
    transport: &dyn Transport,
    refresh: Option<&dyn MetadataRefresh>,
    refresh_target: Option<(&str, i32)>,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    if code == ErrorCode::Destroy {
        return DispatchOutcome::Terminated;
    }

    let action = classify(code, overrides, true);

    if action.contains(Action::INFORM) {
        debug!(?code, ?action, api = request.api_key.as_str(), "classified broker error");
    }

    if action.contains(Action::REFRESH) {
        if let (Some(refresh), Some((topic, partition))) = (refresh, refresh_target) {
            refresh.refresh_topic(topic, partition);
        }
    }

    if action.contains(Action::RETRY) {
        if drive_retry(request, action, retry_backoff, transport).await == RetryOutcome::Scheduled {
            return if action.contains(Action::REFRESH) {
                DispatchOutcome::Refreshed
            } else {
                DispatchOutcome::RetryScheduled
            };
        }
    }

    let delivered = reply.post(request.cookie, payload);
    if !delivered {
        trace!(cookie = request.cookie, "reply dropped, epoch advanced past requester");
        return DispatchOutcome::DroppedStaleEpoch;
    }
    if action.contains(Action::REFRESH) {
        DispatchOutcome::Refreshed
    } else {
        DispatchOutcome::Delivered
    }
}

/// GroupCoordinator-style dispatch: same shape as [`dispatch`] but the
/// refresh collaborator is the coordinator, not the metadata cache, and
/// `Action::SPECIAL` decides whether the coordinator is presumed dead.
pub async fn dispatch_coordinator<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    overrides: &[OverrideEntry],
    retry_backoff: Duration,
    transport: &dyn Transport,
    coordinator: &dyn CoordinatorControl,
    group_id: &str,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    if code == ErrorCode::Destroy {
        return DispatchOutcome::Terminated;
    }

    let action = classify(code, overrides, true);

    if action.contains(Action::REFRESH) {
        coordinator.refresh_coordinator(group_id, action.contains(Action::SPECIAL));
    }

    if action.contains(Action::RETRY)
        && drive_retry(request, action, retry_backoff, transport).await == RetryOutcome::Scheduled
    {
        return if action.contains(Action::REFRESH) {
            DispatchOutcome::Refreshed
        } else {
            DispatchOutcome::RetryScheduled
        };
    }

    if !reply.post(request.cookie, payload) {
        return DispatchOutcome::DroppedStaleEpoch;
    }
    if action.contains(Action::REFRESH) {
        DispatchOutcome::Refreshed
    } else {
        DispatchOutcome::Delivered
    }
}

/// Per-API dispatch entry points (§10.E): each wraps [`dispatch`] or
/// [`dispatch_coordinator`] with its own fixed override table, so a caller
/// never has to hand-build (or forget to hand-build) the table itself.
pub async fn dispatch_list_offsets<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    refresh: Option<&dyn MetadataRefresh>,
    refresh_target: Option<(&str, i32)>,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch(
        request,
        code,
        payload,
        &LIST_OFFSETS_OVERRIDES,
        retry_backoff,
        transport,
        refresh,
        refresh_target,
        reply,
    )
    .await
}

pub async fn dispatch_produce<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    refresh: Option<&dyn MetadataRefresh>,
    refresh_target: Option<(&str, i32)>,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch(
        request,
        code,
        payload,
        &PRODUCE_OVERRIDES,
        retry_backoff,
        transport,
        refresh,
        refresh_target,
        reply,
    )
    .await
}

pub async fn dispatch_group_coordinator<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch(
        request,
        code,
        payload,
        &GROUP_COORDINATOR_OVERRIDES,
        retry_backoff,
        transport,
        None,
        None,
        reply,
    )
    .await
}

pub async fn dispatch_offset_commit<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    coordinator: &dyn CoordinatorControl,
    group_id: &str,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch_coordinator(
        request,
        code,
        payload,
        &OFFSET_COMMIT_OVERRIDES,
        retry_backoff,
        transport,
        coordinator,
        group_id,
        reply,
    )
    .await
}

pub async fn dispatch_offset_fetch<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    coordinator: &dyn CoordinatorControl,
    group_id: &str,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch_coordinator(
        request,
        code,
        payload,
        &OFFSET_FETCH_OVERRIDES,
        retry_backoff,
        transport,
        coordinator,
        group_id,
        reply,
    )
    .await
}

pub async fn dispatch_join_group<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    coordinator: &dyn CoordinatorControl,
    group_id: &str,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch_coordinator(
        request,
        code,
        payload,
        &JOIN_GROUP_OVERRIDES,
        retry_backoff,
        transport,
        coordinator,
        group_id,
        reply,
    )
    .await
}

pub async fn dispatch_sync_group<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    coordinator: &dyn CoordinatorControl,
    group_id: &str,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch_coordinator(
        request,
        code,
        payload,
        &SYNC_GROUP_OVERRIDES,
        retry_backoff,
        transport,
        coordinator,
        group_id,
        reply,
    )
    .await
}

pub async fn dispatch_heartbeat<T: Send + 'static>(
    request: &mut RequestRecord,
    code: ErrorCode,
    payload: Result<T, ErrorCode>,
    retry_backoff: Duration,
    transport: &dyn Transport,
    coordinator: &dyn CoordinatorControl,
    group_id: &str,
    reply: &ReplyQueueHandle<Result<T, ErrorCode>>,
) -> DispatchOutcome {
    dispatch_coordinator(
        request,
        code,
        payload,
        &HEARTBEAT_OVERRIDES,
        retry_backoff,
        transport,
        coordinator,
        group_id,
        reply,
    )
    .await
}

/// SyncGroup's obsolescence check (§4.F step 2, §8.5): the caller's
/// high-level join state may have moved past `WaitSync` while the response
/// was in flight, in which case it's discarded unconditionally.
pub fn sync_group_is_obsolete(state: JoinState) -> bool {
    !is_still_awaited(state)
}

/// OffsetFetch's extra step: writes each parsed partition offset into its
/// toppar's committed-offset slot before delivery, when `update_toppar` is
/// set (§4.F "OffsetFetch handler additionally").
pub fn apply_offset_fetch_results(toppars: &[&Toppar], partitions: &[OffsetFetchResponsePartition], update_toppar: bool) {
    if !update_toppar {
        return;
    }
    for partition in partitions {
        if partition.error_code != 0 {
            continue;
        }
        if let Some(tp) = toppars
            .iter()
            .find(|tp| tp.partition == partition.partition_index)
        {
            tp.update_committed_offset(partition.committed_offset);
        }
    }
}

/// Renders a LogAppendTime (epoch milliseconds, as carried on the wire by
/// Produce v2+) as an RFC 3339 timestamp for trace logging, falling back to
/// the raw integer if it's out of `chrono`'s representable range.
fn format_log_append_time(millis: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

/// Produce's specialized success path (§4.F "Produce handler is
/// specialized... On success"): delegates entirely to [`stamp_batch`], kept
/// here only as the named entry point the dispatcher calls so the handler
/// doesn't need to know the stamping rule's internals.
pub fn stamp_produce_success(
    messages: &mut [MessageStamp],
    base_offset: i64,
    log_append_time: Option<i64>,
    produce_offset_report: bool,
) {
    if let Some(millis) = log_append_time {
        trace!(base_offset, append_time = %format_log_append_time(millis), "stamping produce batch");
    }
    stamp_batch(messages, base_offset, log_append_time, produce_offset_report);
}

/// Produce's specialized failure path: translates the local timeout codes
/// into the produce-specific `MsgTimedOut` the caller expects, leaving every
/// other code unchanged (§4.F "On permanent failure, TimedOut/TimedOutQueue
/// are translated to MsgTimedOut").
pub fn translate_produce_error(code: ErrorCode) -> ErrorCode {
    match code {
        ErrorCode::TimedOut | ErrorCode::TimedOutQueue => ErrorCode::MsgTimedOut,
        other => other,
    }
}

/// Whether a failed produce attempt's retry counter should be bumped before
/// the message is prepended back onto the partition queue: only for
/// `Transport` errors, since the message may already have reached the wire
/// (§4.F "Transport errors increment the counter because the message may
/// have been sent; Refresh-only and queue-timeout errors do not").
pub fn produce_retry_increments_attempt_counter(code: ErrorCode) -> bool {
    matches!(code, ErrorCode::Transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiator::FeatureFlags;
    use crate::protocol::api_key::ApiKey;
    use crate::protocol::api_version::ApiVersion;
    use crate::reply_queue::channel;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Instant;

    fn sample_request(retries: u32) -> RequestRecord {
        RequestRecord::new(
            ApiKey::ListOffsets,
            ApiVersion(1),
            FeatureFlags::empty(),
            crate::buffer::WireBuffer::default(),
        )
        .with_retries(retries)
        .with_cookie(7)
    }

    struct CountingTransport {
        requeued: AtomicU32,
        accept: bool,
    }

    #[async_trait::async_trait]
    impl Transport for CountingTransport {
        async fn requeue(&self, _request: &mut RequestRecord, _backoff: Duration) -> bool {
            self.requeued.fetch_add(1, Ordering::SeqCst);
            self.accept
        }
    }

    #[tokio::test]
    async fn retry_driver_gives_up_when_retries_exhausted() {
        let mut req = sample_request(0);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: true,
        };
        let outcome = drive_retry(&mut req, Action::RETRY, Duration::from_millis(1), &transport).await;
        assert_eq!(outcome, RetryOutcome::GiveUp);
        assert_eq!(transport.requeued.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn retry_driver_schedules_and_decrements_counter() {
        let mut req = sample_request(2);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: true,
        };
        let outcome = drive_retry(&mut req, Action::RETRY, Duration::from_millis(1), &transport).await;
        assert_eq!(outcome, RetryOutcome::Scheduled);
        assert_eq!(req.retries_remaining, 1);
    }

    struct RefreshProbe {
        called: AtomicBool,
    }

    impl MetadataRefresh for RefreshProbe {
        fn refresh_topic(&self, _topic: &str, _partition: i32) {
            self.called.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn not_leader_triggers_refresh_and_still_delivers() {
        let mut req = sample_request(0);
        req.deadline = Instant::now() + Duration::from_secs(1);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: false,
        };
        let refresh = RefreshProbe {
            called: AtomicBool::new(false),
        };
        let (handle, mut queue) = channel::<Result<u32, ErrorCode>>();
        let bound = handle.rebind();

        let outcome = dispatch(
            &mut req,
            ErrorCode::NotLeaderForPartition,
            Err(ErrorCode::NotLeaderForPartition),
            &[],
            Duration::from_millis(1),
            &transport,
            Some(&refresh),
            Some(("t", 0)),
            &bound,
        )
        .await;

        assert_eq!(outcome, DispatchOutcome::Refreshed);
        assert!(refresh.called.load(Ordering::SeqCst));
        assert!(queue.try_recv().is_some());
    }

    #[tokio::test]
    async fn retryable_error_suppresses_delivery_until_retries_exhausted() {
        let mut req = sample_request(1);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: true,
        };
        let (handle, mut queue) = channel::<Result<u32, ErrorCode>>();
        let bound = handle.rebind();

        let outcome = dispatch(
            &mut req,
            ErrorCode::RequestTimedOut,
            Err(ErrorCode::RequestTimedOut),
            &[],
            Duration::from_millis(1),
            &transport,
            None,
            None,
            &bound,
        )
        .await;

        assert_eq!(outcome, DispatchOutcome::RetryScheduled);
        assert!(queue.try_recv().is_none());
    }

    #[tokio::test]
    async fn destroy_terminates_before_classification() {
        let mut req = sample_request(3);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: true,
        };
        let (handle, _queue) = channel::<Result<u32, ErrorCode>>();
        let bound = handle.rebind();

        let outcome = dispatch(
            &mut req,
            ErrorCode::Destroy,
            Err(ErrorCode::Destroy),
            &[],
            Duration::from_millis(1),
            &transport,
            None,
            None,
            &bound,
        )
        .await;
        assert_eq!(outcome, DispatchOutcome::Terminated);
        assert_eq!(transport.requeued.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_epoch_drops_reply() {
        let mut req = sample_request(0);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: true,
        };
        let (handle, queue) = channel::<Result<u32, ErrorCode>>();
        let bound = handle.rebind();
        queue.advance_epoch();

        let outcome = dispatch(
            &mut req,
            ErrorCode::UnknownTopicOrPartition,
            Err(ErrorCode::UnknownTopicOrPartition),
            &[],
            Duration::from_millis(1),
            &transport,
            None,
            None,
            &bound,
        )
        .await;
        assert_eq!(outcome, DispatchOutcome::DroppedStaleEpoch);
    }

    #[test]
    fn jittered_backoff_stays_within_half_to_one_and_a_half_times_base() {
        let base = Duration::from_millis(100);
        for _ in 0..50 {
            let jittered = jittered_backoff(base);
            assert!(jittered >= Duration::from_millis(50));
            assert!(jittered < Duration::from_millis(150));
        }
    }

    #[test]
    fn sync_group_obsolete_once_past_wait_sync() {
        assert!(!sync_group_is_obsolete(JoinState::WaitSync));
        assert!(sync_group_is_obsolete(JoinState::WaitAssign));
        assert!(sync_group_is_obsolete(JoinState::Steady));
    }

    #[test]
    fn offset_fetch_updates_toppar_on_success_only() {
        let tp = Toppar::new("t", 0);
        let partitions = vec![
            OffsetFetchResponsePartition {
                partition_index: 0,
                committed_offset: 55,
                metadata: None,
                error_code: 0,
            },
        ];
        apply_offset_fetch_results(&[&tp], &partitions, true);
        assert_eq!(tp.committed_offset(), 55);
    }

    #[test]
    fn offset_fetch_skips_update_when_disabled() {
        let tp = Toppar::new("t", 0);
        let partitions = vec![
            OffsetFetchResponsePartition {
                partition_index: 0,
                committed_offset: 55,
                metadata: None,
                error_code: 0,
            },
        ];
        apply_offset_fetch_results(&[&tp], &partitions, false);
        assert!(!tp.has_valid_offset());
    }

    #[test]
    fn log_append_time_formats_as_rfc3339() {
        let formatted = format_log_append_time(1_700_000_000_000);
        assert!(formatted.starts_with("2023-11-14"), "got {formatted}");
    }

    #[test]
    fn produce_error_translation() {
        assert_eq!(translate_produce_error(ErrorCode::TimedOut), ErrorCode::MsgTimedOut);
        assert_eq!(translate_produce_error(ErrorCode::TimedOutQueue), ErrorCode::MsgTimedOut);
        assert_eq!(translate_produce_error(ErrorCode::NotLeaderForPartition), ErrorCode::NotLeaderForPartition);
    }

    #[test]
    fn only_transport_errors_bump_attempt_counter() {
        assert!(produce_retry_increments_attempt_counter(ErrorCode::Transport));
        assert!(!produce_retry_increments_attempt_counter(ErrorCode::TimedOutQueue));
    }

    struct RecordingCoordinator {
        marked_dead: AtomicBool,
    }

    impl CoordinatorControl for RecordingCoordinator {
        fn refresh_coordinator(&self, _group_id: &str, dead: bool) {
            if dead {
                self.marked_dead.store(true, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn dispatch_offset_commit_uses_the_library_owned_table() {
        let mut req = sample_request(1);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: true,
        };
        let coordinator = RecordingCoordinator {
            marked_dead: AtomicBool::new(false),
        };
        let (handle, _queue) = channel::<Result<(), ErrorCode>>();
        let bound = handle.rebind();

        // UnknownMemberId isn't in the library's default table (it would
        // classify as PERMANENT there); dispatch_offset_commit must still
        // produce Refresh|Retry without the caller supplying an override.
        let outcome = dispatch_offset_commit(
            &mut req,
            ErrorCode::UnknownMemberId,
            Err(ErrorCode::UnknownMemberId),
            Duration::from_millis(1),
            &transport,
            &coordinator,
            "my-group",
            &bound,
        )
        .await;

        assert_eq!(outcome, DispatchOutcome::RetryScheduled);
        assert!(!coordinator.marked_dead.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dispatch_offset_commit_marks_coordinator_dead_on_not_coordinator() {
        let mut req = sample_request(1);
        let transport = CountingTransport {
            requeued: AtomicU32::new(0),
            accept: true,
        };
        let coordinator = RecordingCoordinator {
            marked_dead: AtomicBool::new(false),
        };
        let (handle, _queue) = channel::<Result<(), ErrorCode>>();
        let bound = handle.rebind();

        let outcome = dispatch_offset_commit(
            &mut req,
            ErrorCode::NotCoordinatorForGroup,
            Err(ErrorCode::NotCoordinatorForGroup),
            Duration::from_millis(1),
            &transport,
            &coordinator,
            "my-group",
            &bound,
        )
        .await;

        assert_eq!(outcome, DispatchOutcome::RetryScheduled);
        assert!(coordinator.marked_dead.load(Ordering::SeqCst));
    }
}
