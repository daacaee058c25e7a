//! Client configuration (§10.C): the knobs this layer reads from, assembled
//! through the same chained-builder shape used for [`crate::request::RequestRecord`].
//! Durations are typed at the public surface; wire encoding still downcasts
//! to `i32` milliseconds at the point each message is built.

use std::time::Duration;

use crate::protocol::api_key::ApiKey;

/// Which partition assignor(s) contribute metadata to JoinGroup (§4.B,
/// §6 `enabled_assignors`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignor {
    Range,
    RoundRobin,
    CooperativeSticky,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) group_session_timeout: Duration,
    pub(crate) socket_timeout: Duration,
    pub(crate) api_version_request: bool,
    pub(crate) api_version_request_timeout: Duration,
    pub(crate) enabled_assignors: Vec<Assignor>,
    pub(crate) produce_offset_report: bool,
    pub(crate) required_acks: i16,
    pub(crate) retry_backoff: Duration,
    pub(crate) retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            group_session_timeout: Duration::from_secs(10),
            socket_timeout: Duration::from_secs(60),
            api_version_request: true,
            api_version_request_timeout: Duration::from_secs(10),
            enabled_assignors: vec![Assignor::Range],
            produce_offset_report: false,
            required_acks: -1,
            retry_backoff: Duration::from_millis(100),
            retries: 2_147_483_647,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_session_timeout(mut self, timeout: Duration) -> Self {
        self.group_session_timeout = timeout;
        self
    }

    pub fn socket_timeout(mut self, timeout: Duration) -> Self {
        self.socket_timeout = timeout;
        self
    }

    pub fn api_version_request(mut self, enabled: bool) -> Self {
        self.api_version_request = enabled;
        self
    }

    pub fn api_version_request_timeout(mut self, timeout: Duration) -> Self {
        self.api_version_request_timeout = timeout;
        self
    }

    pub fn enabled_assignors(mut self, assignors: Vec<Assignor>) -> Self {
        self.enabled_assignors = assignors;
        self
    }

    pub fn produce_offset_report(mut self, enabled: bool) -> Self {
        self.produce_offset_report = enabled;
        self
    }

    pub fn required_acks(mut self, acks: i16) -> Self {
        self.required_acks = acks;
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// True when `acks=0` suppresses the Produce response entirely (§6).
    pub fn expects_produce_response(&self) -> bool {
        self.required_acks != 0
    }

    /// Admin request deadline rule from §6: `operation_timeout + 1s` when it
    /// exceeds the configured socket timeout, else the socket timeout.
    pub fn admin_deadline(&self, operation_timeout: Duration) -> Duration {
        if operation_timeout > self.socket_timeout {
            operation_timeout + Duration::from_secs(1)
        } else {
            self.socket_timeout
        }
    }

    /// Per-API-key deadline for requests that don't specify their own
    /// (e.g. ApiVersions' short handshake timeout, §6).
    pub fn timeout_for(&self, key: ApiKey) -> Duration {
        match key {
            ApiKey::ApiVersions => self.api_version_request_timeout,
            _ => self.socket_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acks_zero_suppresses_response() {
        let cfg = ClientConfig::new().required_acks(0);
        assert!(!cfg.expects_produce_response());
    }

    #[test]
    fn admin_deadline_adds_grace_when_operation_timeout_dominates() {
        let cfg = ClientConfig::new().socket_timeout(Duration::from_secs(5));
        let deadline = cfg.admin_deadline(Duration::from_secs(30));
        assert_eq!(deadline, Duration::from_secs(31));
    }

    #[test]
    fn admin_deadline_falls_back_to_socket_timeout() {
        let cfg = ClientConfig::new().socket_timeout(Duration::from_secs(60));
        let deadline = cfg.admin_deadline(Duration::from_secs(5));
        assert_eq!(deadline, Duration::from_secs(60));
    }
}
