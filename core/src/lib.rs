//! Client-side synchronizer for a remote todo collection.
//!
//! # Overview
//! Keeps a local todo list in step with a REST collection: load, create with
//! an optimistic placeholder, delete with per-item busy flags, clear
//! completed, filter, and a self-clearing error banner.
//!
//! # Design
//! - Host-does-IO: `TodoClient` builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network; `TodoSync` wraps it
//!   with `begin_*` / `finish_*` pairs so the host can run several requests
//!   at once and report completions in any order.
//! - Time is passed in as `Instant`, so banner expiry is deterministic.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod banner;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod sync;
pub mod types;

pub use banner::{ErrorBanner, ErrorKind};
pub use client::TodoClient;
pub use config::SyncConfig;
pub use error::{ApiError, ConfigError, SyncError};
pub use filter::Filter;
pub use http::{Exchange, HttpMethod, HttpRequest, HttpResponse};
pub use sync::TodoSync;
pub use types::{NewTodo, Todo, TodoId, PLACEHOLDER_ID};
