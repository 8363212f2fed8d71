// ABOUTME: The observation capability: user callbacks around every frame and error
// ABOUTME: Hooks run inline in the session; a slow hook backpressures the whole session

use std::future::Future;

use crate::codec::Frame;
use crate::error::EsmeError;
use crate::text::DeliveryReceipt;

/// User callbacks invoked by the session.
///
/// All methods run inline in the session's execution context and are
/// called in strict wire order: `sending` before every write, `received`
/// after every successful decode (including unmatched responses, with
/// `None` for input that framed but did not decode). None of them can
/// fail; a hook that must not stall the session should hand the event to
/// its own queue and return.
pub trait Hook: Send {
    /// About to write `bytes` (the encoded form of `pdu`) to the socket
    fn sending(
        &mut self,
        pdu: &Frame,
        bytes: &[u8],
        client_id: &str,
    ) -> impl Future<Output = ()> + Send;

    /// A frame arrived; `pdu` is `None` when the bytes framed correctly
    /// but could not be decoded
    fn received(
        &mut self,
        pdu: Option<&Frame>,
        bytes: &[u8],
        client_id: &str,
    ) -> impl Future<Output = ()> + Send;

    /// A message could not be sent, timed out, was rejected, or lost its
    /// receipt correlation; `log_id` is empty for failures not tied to a
    /// tracked message
    fn send_error(
        &mut self,
        log_id: &str,
        error: &EsmeError,
        client_id: &str,
    ) -> impl Future<Output = ()> + Send;

    /// A delivery receipt arrived and matched an earlier submission;
    /// `log_id` and `extra_data` are the values given at submit time
    fn receipted(
        &mut self,
        receipt: &DeliveryReceipt,
        log_id: &str,
        extra_data: Option<&str>,
        client_id: &str,
    ) -> impl Future<Output = ()> + Send;
}

/// The do-nothing hook
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHook;

impl Hook for NullHook {
    async fn sending(&mut self, _pdu: &Frame, _bytes: &[u8], _client_id: &str) {}

    async fn received(&mut self, _pdu: Option<&Frame>, _bytes: &[u8], _client_id: &str) {}

    async fn send_error(&mut self, _log_id: &str, _error: &EsmeError, _client_id: &str) {}

    async fn receipted(
        &mut self,
        _receipt: &DeliveryReceipt,
        _log_id: &str,
        _extra_data: Option<&str>,
        _client_id: &str,
    ) {
    }
}
