//! Wire encoding, error classification, and the retry/refresh/coordinator
//! control flow for a Kafka client's request/response layer.
//!
//! This crate speaks the classic (pre-KIP-482) binary protocol for the API
//! keys listed in [`protocol::api_key::ApiKey`] and turns broker responses
//! into one of: a delivered reply, a scheduled retry, or an upstream
//! refresh/rediscovery signal. It does not open sockets, run an I/O loop, or
//! implement consumer-group rebalancing — those are collaborators this layer
//! is built to sit underneath (see [`dispatcher::Transport`],
//! [`dispatcher::MetadataRefresh`], [`dispatcher::CoordinatorControl`]).

pub mod buffer;
pub mod coalescing;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod negotiator;
pub mod protocol;
pub mod reply_queue;
pub mod request;
pub mod toppar;

pub use config::ClientConfig;
pub use error::{Action, ErrorCode};
pub use protocol::api_key::ApiKey;
pub use protocol::api_version::{ApiVersion, ApiVersionRange};
pub use request::{RequestFlags, RequestRecord};
