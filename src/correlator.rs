// ABOUTME: Correlation of responses to requests and of delivery receipts to submissions
// ABOUTME: Bounded in-flight window, wrapping sequence numbers, pluggable delivery storage

use std::collections::HashMap;
use std::future::Future;
use std::time::SystemTime;

use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::codec::Frame;
use crate::datatypes::CommandId;
use crate::error::EsmeError;

/// Highest sequence number handed out before wrapping back to 1.
/// Value 0 is reserved by the protocol.
pub const MAX_SEQUENCE: u32 = 0x7FFF_FFFF;

/// An outbound request awaiting its response.
///
/// Destroyed on the matched response, on deadline expiry, or when the
/// session drops; in every case the waker (when present) learns the
/// outcome.
#[derive(Debug)]
pub struct PendingRequest {
    pub sequence_number: u32,
    /// The response command expected for this request
    pub expected: CommandId,
    /// Caller-supplied tracking id; empty for control traffic
    pub log_id: String,
    pub extra_data: Option<String>,
    pub deadline: Instant,
    /// Completion channel for callers awaiting the response inline
    pub waker: Option<oneshot::Sender<Result<Frame, EsmeError>>>,
    /// Whether this request occupies a window slot
    pub windowed: bool,
}

impl PendingRequest {
    pub fn new(
        sequence_number: u32,
        expected: CommandId,
        log_id: impl Into<String>,
        extra_data: Option<String>,
        deadline: Instant,
    ) -> Self {
        Self {
            sequence_number,
            expected,
            log_id: log_id.into(),
            extra_data,
            deadline,
            waker: None,
            windowed: true,
        }
    }

    pub fn with_waker(mut self, waker: oneshot::Sender<Result<Frame, EsmeError>>) -> Self {
        self.waker = Some(waker);
        self
    }

    /// Complete the waker, if any, with the given outcome
    pub fn wake(self, outcome: Result<Frame, EsmeError>) {
        if let Some(waker) = self.waker {
            // the caller may have given up; nothing to do then
            let _ = waker.send(outcome);
        }
    }
}

/// A submitted message awaiting its delivery receipt, keyed by the
/// SMSC-assigned message id. Long lived; evicted only when the receipt
/// arrives or by user-driven cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub log_id: String,
    pub extra_data: Option<String>,
    pub submitted_at: SystemTime,
}

/// The correlation capability of a session.
///
/// The short-lived sequence map and window are synchronous: the session is
/// a single actor and serializes access. The long-lived delivery map is
/// async so implementations can back it with durable storage; those
/// operations may fail with [`EsmeError::Storage`], which the session
/// surfaces through the hook without dying.
pub trait Correlator: Send {
    /// Next sequence number: monotonically increasing from 1, wrapping
    /// back to 1 after [`MAX_SEQUENCE`]
    fn next_sequence(&mut self) -> u32;

    /// Restart sequence numbering for a fresh connection, so the bind PDU
    /// takes sequence number 1
    fn reset_sequence(&mut self);

    /// Register an in-flight windowed request; fails with
    /// [`EsmeError::WindowFull`] when the window is saturated
    fn put(&mut self, pending: PendingRequest) -> Result<(), EsmeError>;

    /// Register control traffic (enquire_link, unbind) outside the window
    fn put_control(&mut self, pending: PendingRequest);

    /// Remove and return the pending matching a response
    fn get(&mut self, sequence_number: u32) -> Option<PendingRequest>;

    /// Whether a window slot is free
    fn window_open(&self) -> bool;

    /// Remove and return every pending whose deadline has passed
    fn expire(&mut self, now: Instant) -> Vec<PendingRequest>;

    /// Remove and return every pending; used at session teardown so each
    /// waiter can be failed with `SessionClosed`
    fn drain(&mut self) -> Vec<PendingRequest>;

    /// Store a receipt-awaiting record under the SMSC message id
    fn put_delivery(
        &mut self,
        smsc_message_id: &str,
        log_id: &str,
        extra_data: Option<&str>,
    ) -> impl Future<Output = Result<(), EsmeError>> + Send;

    /// Remove and return the record for a receipted message id
    fn get_delivery(
        &mut self,
        smsc_message_id: &str,
    ) -> impl Future<Output = Result<Option<DeliveryRecord>, EsmeError>> + Send;
}

/// The in-memory reference correlator.
///
/// Suitable for sessions that tolerate losing submit-to-receipt
/// correlation across restarts; persistent deployments implement
/// [`Correlator`] with the delivery map on durable storage instead.
#[derive(Debug)]
pub struct MemoryCorrelator {
    next: u32,
    window: usize,
    pending: HashMap<u32, PendingRequest>,
    windowed_in_flight: usize,
    delivery: HashMap<String, DeliveryRecord>,
    orphans: u64,
}

impl MemoryCorrelator {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            next: 1,
            window: max_in_flight,
            pending: HashMap::new(),
            windowed_in_flight: 0,
            delivery: HashMap::new(),
            orphans: 0,
        }
    }

    /// Responses that matched no pending request
    pub fn orphans(&self) -> u64 {
        self.orphans
    }

    /// Number of requests currently awaiting a response
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Number of submissions awaiting a delivery receipt
    pub fn awaiting_receipt(&self) -> usize {
        self.delivery.len()
    }

    #[cfg(test)]
    pub(crate) fn set_next_sequence(&mut self, next: u32) {
        self.next = next;
    }
}

impl Correlator for MemoryCorrelator {
    fn next_sequence(&mut self) -> u32 {
        let sequence = self.next;
        self.next = if sequence >= MAX_SEQUENCE { 1 } else { sequence + 1 };
        sequence
    }

    fn reset_sequence(&mut self) {
        self.next = 1;
    }

    fn put(&mut self, pending: PendingRequest) -> Result<(), EsmeError> {
        if self.windowed_in_flight >= self.window {
            return Err(EsmeError::WindowFull);
        }
        debug_assert!(pending.windowed);
        self.windowed_in_flight += 1;
        self.pending.insert(pending.sequence_number, pending);
        Ok(())
    }

    fn put_control(&mut self, mut pending: PendingRequest) {
        pending.windowed = false;
        self.pending.insert(pending.sequence_number, pending);
    }

    fn get(&mut self, sequence_number: u32) -> Option<PendingRequest> {
        match self.pending.remove(&sequence_number) {
            Some(pending) => {
                if pending.windowed {
                    self.windowed_in_flight -= 1;
                }
                Some(pending)
            }
            None => {
                self.orphans += 1;
                None
            }
        }
    }

    fn window_open(&self) -> bool {
        self.windowed_in_flight < self.window
    }

    fn expire(&mut self, now: Instant) -> Vec<PendingRequest> {
        let expired_keys: Vec<u32> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(&seq, _)| seq)
            .collect();

        let mut expired = Vec::with_capacity(expired_keys.len());
        for key in expired_keys {
            if let Some(pending) = self.pending.remove(&key) {
                if pending.windowed {
                    self.windowed_in_flight -= 1;
                }
                expired.push(pending);
            }
        }
        expired
    }

    fn drain(&mut self) -> Vec<PendingRequest> {
        self.windowed_in_flight = 0;
        self.pending.drain().map(|(_, p)| p).collect()
    }

    async fn put_delivery(
        &mut self,
        smsc_message_id: &str,
        log_id: &str,
        extra_data: Option<&str>,
    ) -> Result<(), EsmeError> {
        self.delivery.insert(
            smsc_message_id.to_string(),
            DeliveryRecord {
                log_id: log_id.to_string(),
                extra_data: extra_data.map(str::to_string),
                submitted_at: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn get_delivery(
        &mut self,
        smsc_message_id: &str,
    ) -> Result<Option<DeliveryRecord>, EsmeError> {
        Ok(self.delivery.remove(smsc_message_id))
    }
}
