//! Error types for the todo client and synchronizer.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging. `Transport` is never produced by the
//! core itself; hosts use it to report a round-trip that got no response.

use thiserror::Error;

/// Errors produced while talking to the remote collection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// A user action the synchronizer refused before any request was built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("title should not be empty")]
    EmptyTitle,

    /// Another create is still waiting for its response.
    #[error("a todo is already being created")]
    CreatePending,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Invalid or missing configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("owner id is not set; set TODO_OWNER_ID to a positive integer")]
    MissingOwner,

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("base url cannot be empty")]
    EmptyBaseUrl,
}
