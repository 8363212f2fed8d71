// ABOUTME: The ESME facade wiring broker, correlator, hook and session together
// ABOUTME: connect() probes one bind; start() runs with reconnect until stop()

pub mod broker;
pub mod config;
pub mod hook;
pub mod message;

pub use broker::{Broker, BrokerHandle, MemoryBroker};
pub use config::{BindMode, EsmeConfig, DEFAULT_SMPP_PORT};
pub use hook::{Hook, NullHook};
pub use message::{OutboundSms, OutboundSmsBuilder, SmsPayload};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::correlator::{Correlator, MemoryCorrelator};
use crate::error::EsmeError;
use crate::session::Session;

static CLIENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// An External Short Messaging Entity: one SMSC peering, its outgoing
/// queue, correlation state and hook callbacks.
///
/// The three collaborators are capabilities chosen at construction:
/// a [`Broker`] supplying outbound messages, a [`Correlator`] matching
/// responses and receipts (possibly storage backed), and a [`Hook`]
/// observing traffic. In-memory reference implementations of all three
/// ship with the crate.
pub struct Esme<B, C, H> {
    config: EsmeConfig,
    client_id: String,
    broker: B,
    correlator: C,
    hook: H,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Cloneable control handle; the only way to stop a running ESME
#[derive(Clone)]
pub struct EsmeHandle {
    shutdown: Arc<watch::Sender<bool>>,
}

impl EsmeHandle {
    /// Request a cooperative stop: the session drains, sends unbind when
    /// bound, closes the socket and fails all pendings with
    /// `SessionClosed`.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

impl Esme<MemoryBroker, MemoryCorrelator, NullHook> {
    /// An ESME with the in-memory broker and correlator and no hook.
    /// Returns the broker handle for enqueueing messages.
    pub fn in_memory(config: EsmeConfig) -> (Self, BrokerHandle) {
        let broker = MemoryBroker::new(config.max_in_flight.max(16));
        let handle = broker.handle();
        let correlator = MemoryCorrelator::new(config.max_in_flight);
        (Self::new(config, broker, correlator, NullHook), handle)
    }
}

impl<B, C, H> Esme<B, C, H>
where
    B: Broker,
    C: Correlator,
    H: Hook,
{
    pub fn new(config: EsmeConfig, broker: B, correlator: C, hook: H) -> Self {
        let client_id = config.client_id.clone().unwrap_or_else(|| {
            format!(
                "{}-{}",
                config.system_id,
                CLIENT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
            )
        });
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            client_id,
            broker,
            correlator,
            hook,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// The identifier handed to hook callbacks
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// A control handle for stopping the ESME from another task
    pub fn handle(&self) -> EsmeHandle {
        EsmeHandle {
            shutdown: Arc::clone(&self.shutdown_tx),
        }
    }

    /// Perform one connect-and-bind attempt, then unbind and close.
    ///
    /// Errors surface synchronously: `BindRejected` for refused
    /// credentials, `BindTimeout` or `Transport` for an unreachable or
    /// unresponsive SMSC.
    pub async fn connect(&mut self) -> crate::Result<()> {
        let mut session = Session::connect(
            &self.config,
            &self.client_id,
            &mut self.broker,
            &mut self.correlator,
            &mut self.hook,
            self.shutdown_rx.clone(),
        )
        .await?;
        session.bind().await?;
        session.graceful_stop().await?;
        self.fail_pendings().await;
        Ok(())
    }

    /// Run until [`EsmeHandle::stop`], reconnecting with exponential
    /// back-off on every connection failure. A rejected bind is fatal and
    /// is not retried: it signals a credentials or configuration problem.
    pub async fn start(&mut self) -> crate::Result<()> {
        let mut backoff =
            ReconnectBackoff::new(self.config.reconnect_initial, self.config.reconnect_max);

        loop {
            if *self.shutdown_rx.borrow() {
                return Ok(());
            }

            let (was_bound, outcome) = self.run_session().await;
            self.fail_pendings().await;
            if was_bound {
                backoff.reset();
            }

            match outcome {
                Ok(()) => return Ok(()),
                Err(e @ EsmeError::BindRejected { .. }) => {
                    error!(client_id = %self.client_id, error = %e, "not retrying");
                    return Err(e);
                }
                Err(e @ EsmeError::InvalidMessage(_)) => {
                    error!(client_id = %self.client_id, error = %e, "configuration error");
                    return Err(e);
                }
                Err(e) => {
                    let delay = backoff.next_delay();
                    warn!(
                        client_id = %self.client_id,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "session ended; reconnecting"
                    );
                    let mut shutdown = self.shutdown_rx.clone();
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = shutdown.changed() => return Ok(()),
                    }
                }
            }
        }
    }

    async fn run_session(&mut self) -> (bool, Result<(), EsmeError>) {
        let mut session = match Session::connect(
            &self.config,
            &self.client_id,
            &mut self.broker,
            &mut self.correlator,
            &mut self.hook,
            self.shutdown_rx.clone(),
        )
        .await
        {
            Ok(session) => session,
            Err(e) => return (false, Err(e)),
        };
        if let Err(e) = session.bind().await {
            return (false, Err(e));
        }
        (true, session.run().await)
    }

    /// Fail every pending request with `SessionClosed`. Requests are
    /// never resent after a rebind: the core cannot know whether the
    /// SMSC processed them.
    async fn fail_pendings(&mut self) {
        let drained = self.correlator.drain();
        if drained.is_empty() {
            return;
        }
        info!(
            client_id = %self.client_id,
            count = drained.len(),
            "failing pending requests with SessionClosed"
        );
        for pending in drained {
            if pending.waker.is_some() {
                pending.wake(Err(EsmeError::SessionClosed));
            } else if !pending.log_id.is_empty() {
                self.hook
                    .send_error(&pending.log_id, &EsmeError::SessionClosed, &self.client_id)
                    .await;
            }
        }
    }
}

/// Reconnect delay: starts at `initial`, doubles per failure, capped at
/// `max`. Unbounded retries; reset after every successfully bound session.
#[derive(Debug)]
struct ReconnectBackoff {
    initial: Duration,
    max: Duration,
    next: Duration,
}

impl ReconnectBackoff {
    fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            next: initial,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(self.max);
        delay
    }

    fn reset(&mut self) {
        self.next = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let mut backoff =
            ReconnectBackoff::new(Duration::from_secs(1), Duration::from_secs(60));
        let delays: Vec<u64> = (0..8).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 32, 60, 60]);

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn client_id_generated_when_unset() {
        let config = EsmeConfig::new("localhost", 2775, "gateway", "pw");
        let (esme, _handle) = Esme::in_memory(config);
        assert!(esme.client_id().starts_with("gateway-"));

        let config = EsmeConfig::new("localhost", 2775, "gateway", "pw").client_id("fixed");
        let (esme, _handle) = Esme::in_memory(config);
        assert_eq!(esme.client_id(), "fixed");
    }
}
