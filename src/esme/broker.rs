// ABOUTME: The outbound message queue capability consumed by the session
// ABOUTME: Ships an mpsc-backed in-memory broker; durable queues implement the trait

use std::future::Future;

use tokio::sync::mpsc;

use crate::error::EsmeError;
use crate::esme::message::OutboundSms;

/// The queue of outgoing messages the session drains.
///
/// `dequeue` must be cancel safe: the session polls it inside a select
/// loop and a message must never be lost when another branch wins the
/// race. An implementation backed by persistent storage may await I/O in
/// either method.
pub trait Broker: Send {
    /// Enqueue a message for submission; resolves once the queue has
    /// accepted it
    fn enqueue(&self, message: OutboundSms) -> impl Future<Output = Result<(), EsmeError>> + Send;

    /// Await the next message. Resolves `None` when the queue has shut
    /// down, which the session treats as a stop request.
    fn dequeue(&mut self) -> impl Future<Output = Option<OutboundSms>> + Send;
}

/// In-memory broker over a bounded tokio mpsc channel.
///
/// Producers enqueue through cloned [`BrokerHandle`]s; the session owns
/// the broker itself.
#[derive(Debug)]
pub struct MemoryBroker {
    tx: mpsc::Sender<OutboundSms>,
    rx: mpsc::Receiver<OutboundSms>,
}

/// Cloneable producer handle onto a [`MemoryBroker`]
#[derive(Debug, Clone)]
pub struct BrokerHandle {
    tx: mpsc::Sender<OutboundSms>,
}

impl MemoryBroker {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self { tx, rx }
    }

    /// A producer handle for application code
    pub fn handle(&self) -> BrokerHandle {
        BrokerHandle {
            tx: self.tx.clone(),
        }
    }
}

impl Broker for MemoryBroker {
    async fn enqueue(&self, message: OutboundSms) -> Result<(), EsmeError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| EsmeError::SessionClosed)
    }

    // mpsc::Receiver::recv is cancel safe
    async fn dequeue(&mut self) -> Option<OutboundSms> {
        self.rx.recv().await
    }
}

impl BrokerHandle {
    /// Hand a message to the broker; awaits when the queue is at capacity
    pub async fn enqueue(&self, message: OutboundSms) -> Result<(), EsmeError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| EsmeError::SessionClosed)
    }
}
