//! Error types for the fire-and-forget edges and the one strategy used to
//! drop them.
//!
//! None of these errors is fatal or user visible. Each call site names the
//! [`ErrorClass`] it belongs to and hands the result to [`swallow`], which
//! logs at `warn` and returns `None`. Nothing here retries.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Message recipient not ready or torn down.
    Channel,
    /// Store unavailable or write rejected; memory stays authoritative.
    Persistence,
    /// External switch request could not be initiated.
    Handoff,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Channel => "channel",
            ErrorClass::Persistence => "persistence",
            ErrorClass::Handoff => "handoff",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store contents are not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store is read-only")]
    ReadOnly,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("receiving end is disconnected")]
    Disconnected,
    #[error("request needs a sender tab but none was attached")]
    NoSenderScope,
    #[error("no page is listening in tab {0}")]
    NoListener(u32),
}

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("could not write trigger artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Logs a failed best-effort operation and drops the error.
pub fn swallow<T, E: fmt::Display>(class: ErrorClass, op: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(class = %class, op, error = %e, "best-effort operation failed");
            None
        }
    }
}
