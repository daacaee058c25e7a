//! The request record (§3): everything the broker thread needs to own a
//! request from build time through response (or retry) while it's in flight.

use std::time::Instant;

use crate::buffer::WireBuffer;
use crate::negotiator::FeatureFlags;
use crate::protocol::api_key::ApiKey;
use crate::protocol::api_version::ApiVersion;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RequestFlags: u8 {
        /// JoinGroup/SyncGroup: the caller thread blocks on this response.
        const BLOCKING    = 0b0000_0001;
        /// acks=0 Produce: broker sends no response, don't expect one.
        const NO_RESPONSE = 0b0000_0010;
        /// Metadata/handshake: jump ahead of produce/fetch traffic (glossary: Flash request).
        const FLASH       = 0b0000_0100;
    }
}

/// Named debug categories a dispatcher can log under (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugFacility {
    Broker,
    Topic,
    Metadata,
    Feature,
    Cgrp,
    Consumer,
    Msg,
}

impl DebugFacility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Broker => "BROKER",
            Self::Topic => "TOPIC",
            Self::Metadata => "METADATA",
            Self::Feature => "FEATURE",
            Self::Cgrp => "CGRP",
            Self::Consumer => "CONSUMER",
            Self::Msg => "MSG",
        }
    }
}

/// Exclusively owned by the broker thread while in flight (§3); ownership
/// returns to the dispatcher on response, and the dispatcher is the only
/// place that mutates `retries_remaining`.
#[derive(Debug)]
pub struct RequestRecord {
    pub api_key: ApiKey,
    pub version: ApiVersion,
    pub features: FeatureFlags,
    pub buffer: WireBuffer,
    pub cookie: u64,
    pub retries_remaining: u32,
    pub flags: RequestFlags,
    pub deadline: Instant,
}

impl RequestRecord {
    pub fn new(api_key: ApiKey, version: ApiVersion, features: FeatureFlags, buffer: WireBuffer) -> Self {
        Self {
            api_key,
            version,
            features,
            buffer,
            cookie: 0,
            retries_remaining: 0,
            flags: RequestFlags::empty(),
            deadline: Instant::now(),
        }
    }

    pub fn with_cookie(mut self, cookie: u64) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries_remaining = retries;
        self
    }

    pub fn with_flags(mut self, flags: RequestFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.flags.contains(RequestFlags::BLOCKING)
    }

    pub fn expects_response(&self) -> bool {
        !self.flags.contains(RequestFlags::NO_RESPONSE)
    }
}
