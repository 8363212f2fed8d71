// ABOUTME: The crate-level error type spanning codec, text, session and storage faults
// ABOUTME: Every session failure is delivered to a waiter, the hook, or the run loop

use std::io;
use thiserror::Error;

use crate::codec::CodecError;
use crate::datatypes::CommandStatus;
use crate::text::EncodeError;

/// Errors surfaced by the ESME core.
///
/// Transport and timeout variants drive the reconnect machinery;
/// `BindRejected` is fatal to the session (credentials or configuration
/// are wrong and retrying cannot help); the rest are delivered to request
/// waiters or to the hook.
#[derive(Debug, Error)]
pub enum EsmeError {
    /// A frame could not be decoded or encoded at the PDU layer
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Message text could not be represented in the selected encoding
    #[error("text encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// The in-flight request window is saturated
    #[error("request window is full")]
    WindowFull,

    /// No response arrived within the per-request timeout
    #[error("request timed out")]
    RequestTimeout,

    /// The SMSC did not answer the bind within the bind timeout
    #[error("bind timed out")]
    BindTimeout,

    /// The SMSC refused the bind; not retried automatically
    #[error("bind rejected by SMSC: {status}")]
    BindRejected { status: CommandStatus },

    /// The SMSC answered a request with a non-OK, non-throttling status
    #[error("request rejected by SMSC: {status}")]
    RequestFailed { status: CommandStatus },

    /// The SMSC asked the ESME to slow down
    #[error("throttled by SMSC: {status}")]
    Throttled { status: CommandStatus },

    /// The session shut down or reconnected while the request was in flight
    #[error("session closed")]
    SessionClosed,

    /// Socket-level failure
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// The correlator's delivery storage failed; the session keeps running
    /// but the affected receipt correlation is lost
    #[error("correlator storage error: {0}")]
    Storage(String),

    /// A message failed validation before it reached the wire
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl EsmeError {
    /// Whether the session should tear down the connection and let the
    /// run loop reconnect
    pub fn is_fatal_to_connection(&self) -> bool {
        matches!(
            self,
            EsmeError::Transport(_) | EsmeError::RequestTimeout | EsmeError::BindTimeout
        )
    }
}
