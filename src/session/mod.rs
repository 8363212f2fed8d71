// ABOUTME: The session actor: one TCP connection, reader dispatch, writer, keepalive
// ABOUTME: Single select loop serializes all state; no locks anywhere in the core

pub mod state;
mod throttle;

pub use state::SessionState;
pub(crate) use throttle::Throttle;

use std::time::Duration;

use bytes::Bytes;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::codec::{Encodable, Frame};
use crate::connection::{Connection, Inbound};
use crate::correlator::{Correlator, PendingRequest};
use crate::datatypes::{
    AddressRange, CommandId, CommandStatus, DeliverSm, DeliverSmResp, EnquireLink,
    EnquireLinkResp, GenericNack, Password, RegisteredDelivery, SmBody, SubmitSm, SystemId,
    SystemType, Unbind, UnbindResp,
};
use crate::error::EsmeError;
use crate::esme::{BindMode, EsmeConfig, Hook, OutboundSms, SmsPayload};
use crate::text;

/// Cap on waiting for unbind_resp during graceful shutdown
const UNBIND_TIMEOUT: Duration = Duration::from_secs(5);

/// Granularity of the timekeeper driving expiry and keepalive
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One connection's worth of session. Owns the socket exclusively;
/// borrows the broker, correlator and hook from the ESME for its
/// lifetime, so every session of an ESME shares correlation state and
/// callbacks while the connection itself is disposable.
pub(crate) struct Session<'a, B, C, H> {
    config: &'a EsmeConfig,
    client_id: &'a str,
    broker: &'a mut B,
    correlator: &'a mut C,
    hook: &'a mut H,
    conn: Connection,
    state: SessionState,
    throttle: Throttle,
    last_write: Instant,
    shutdown: watch::Receiver<bool>,
}

/// The resolved branch of one select round. Arm bodies only build this
/// value; all mutation happens afterwards, once the competing futures
/// are gone.
enum Event {
    Inbound(Option<Inbound>),
    Outbound(Option<OutboundSms>),
    Tick,
    Stop,
}

impl<'a, B, C, H> Session<'a, B, C, H>
where
    B: crate::esme::Broker,
    C: Correlator,
    H: Hook,
{
    /// Dial the SMSC. The bind timeout bounds connection establishment.
    pub(crate) async fn connect(
        config: &'a EsmeConfig,
        client_id: &'a str,
        broker: &'a mut B,
        correlator: &'a mut C,
        hook: &'a mut H,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Session<'a, B, C, H>, EsmeError> {
        let addr = config.smsc_addr();
        debug!(%addr, "connecting");
        let stream = match time::timeout(config.bind_timeout, TcpStream::connect(&addr)).await {
            Err(_) => return Err(EsmeError::BindTimeout),
            Ok(Err(e)) => return Err(EsmeError::Transport(e)),
            Ok(Ok(stream)) => stream,
        };

        Ok(Session {
            conn: Connection::new(stream, config.max_pdu_size),
            state: SessionState::Open,
            throttle: Throttle::new(config.throttle_initial, config.throttle_max),
            last_write: Instant::now(),
            config,
            client_id,
            broker,
            correlator,
            hook,
            shutdown,
        })
    }

    /// Perform the bind handshake. The bind PDU always takes sequence
    /// number 1 on a fresh connection.
    pub(crate) async fn bind(&mut self) -> Result<(), EsmeError> {
        self.state = SessionState::Binding;
        self.correlator.reset_sequence();
        let sequence = self.correlator.next_sequence();
        let request = self.make_bind(sequence)?;
        self.send_frame(&request).await?;

        let deadline = Instant::now() + self.config.bind_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                self.state = SessionState::Closed;
                return Err(EsmeError::BindTimeout);
            }

            let inbound = match time::timeout(remaining, self.conn.read_frame()).await {
                Err(_) => {
                    self.state = SessionState::Closed;
                    return Err(EsmeError::BindTimeout);
                }
                Ok(Err(e)) => {
                    self.state = SessionState::Closed;
                    return Err(EsmeError::Transport(e));
                }
                Ok(Ok(None)) => {
                    self.state = SessionState::Closed;
                    return Err(EsmeError::Transport(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "SMSC closed the connection during bind",
                    )));
                }
                Ok(Ok(Some(inbound))) => inbound,
            };

            let frame = match inbound {
                Inbound::Bad {
                    error,
                    sequence_number,
                    bytes,
                } => {
                    warn!(%error, "undecodable frame during bind");
                    self.hook.received(None, &bytes, self.client_id).await;
                    let nack = GenericNack::error(sequence_number, error.nack_status());
                    self.send_frame(&Frame::GenericNack(nack)).await?;
                    continue;
                }
                Inbound::Frame { frame, bytes } => {
                    self.hook.received(Some(&frame), &bytes, self.client_id).await;
                    frame
                }
            };

            let status = match &frame {
                Frame::BindTransmitterResp(r) if r.sequence_number == sequence => {
                    Some(r.command_status)
                }
                Frame::BindReceiverResp(r) if r.sequence_number == sequence => {
                    Some(r.command_status)
                }
                Frame::BindTransceiverResp(r) if r.sequence_number == sequence => {
                    Some(r.command_status)
                }
                Frame::GenericNack(n) if n.sequence_number == sequence => Some(n.command_status),
                _ => None,
            };

            match status {
                Some(status) if status.is_ok() => {
                    self.state = match self.config.bind_mode {
                        BindMode::Transmitter => SessionState::BoundTx,
                        BindMode::Receiver => SessionState::BoundRx,
                        BindMode::Transceiver => SessionState::BoundTrx,
                    };
                    info!(state = %self.state, system_id = %self.config.system_id, "bound");
                    return Ok(());
                }
                Some(status) => {
                    self.state = SessionState::Closed;
                    error!(%status, "bind rejected");
                    return Err(EsmeError::BindRejected { status });
                }
                None => match frame {
                    Frame::EnquireLink(el) => {
                        let resp = EnquireLinkResp::new(el.sequence_number);
                        self.send_frame(&Frame::EnquireLinkResp(resp)).await?;
                    }
                    other => debug!(frame = %other, "ignoring frame during bind"),
                },
            }
        }
    }

    /// The main loop: reader, writer and timekeeper multiplexed over one
    /// execution context. Returns `Ok(())` when stopped on request and
    /// `Err` when the connection should be re-established.
    pub(crate) async fn run(&mut self) -> Result<(), EsmeError> {
        let mut tick = time::interval(TICK_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *self.shutdown.borrow() {
                return self.graceful_stop().await;
            }

            let now = Instant::now();
            let can_submit = self.state.can_transmit()
                && self.correlator.window_open()
                && !self.throttle.is_paused(now);

            let event = tokio::select! {
                result = self.conn.read_frame() => {
                    Event::Inbound(result.map_err(EsmeError::Transport)?)
                }
                message = self.broker.dequeue(), if can_submit => Event::Outbound(message),
                _ = tick.tick() => Event::Tick,
                _ = self.shutdown.changed() => Event::Stop,
            };

            match event {
                Event::Inbound(None) => {
                    info!("SMSC closed the connection");
                    return Err(EsmeError::Transport(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "connection closed by SMSC",
                    )));
                }
                Event::Inbound(Some(inbound)) => self.handle_inbound(inbound).await?,
                Event::Outbound(None) => {
                    info!("broker shut down; stopping session");
                    return self.graceful_stop().await;
                }
                Event::Outbound(Some(message)) => self.submit(message).await?,
                Event::Tick => self.on_tick().await?,
                Event::Stop => return self.graceful_stop().await,
            }
        }
    }

    async fn handle_inbound(&mut self, inbound: Inbound) -> Result<(), EsmeError> {
        match inbound {
            Inbound::Bad {
                error,
                sequence_number,
                bytes,
            } => {
                warn!(%error, sequence_number, "undecodable frame");
                self.hook.received(None, &bytes, self.client_id).await;
                let nack = GenericNack::error(sequence_number, error.nack_status());
                self.send_frame(&Frame::GenericNack(nack)).await
            }
            Inbound::Frame { frame, bytes } => {
                self.hook.received(Some(&frame), &bytes, self.client_id).await;
                match frame {
                    Frame::EnquireLink(el) => {
                        let resp = EnquireLinkResp::new(el.sequence_number);
                        self.send_frame(&Frame::EnquireLinkResp(resp)).await
                    }
                    Frame::Unbind(unbind) => {
                        info!("SMSC requested unbind");
                        let resp = UnbindResp::new(unbind.sequence_number);
                        self.send_frame(&Frame::UnbindResp(resp)).await?;
                        self.state = SessionState::Closed;
                        Err(EsmeError::SessionClosed)
                    }
                    Frame::DeliverSm(pdu) => self.handle_deliver(*pdu).await,
                    Frame::AlertNotification(_) | Frame::Outbind(_) => {
                        // surfaced through the hook above; no reply defined
                        debug!(frame = %frame, "unsolicited notification");
                        Ok(())
                    }
                    frame if frame.is_response() => self.handle_response(frame).await,
                    frame => {
                        warn!(frame = %frame, "request not valid towards an ESME");
                        let nack = GenericNack::invalid_command_id(frame.sequence_number());
                        self.send_frame(&Frame::GenericNack(nack)).await
                    }
                }
            }
        }
    }

    async fn handle_response(&mut self, frame: Frame) -> Result<(), EsmeError> {
        let sequence = frame.sequence_number();
        let status = frame.command_status();

        let Some(pending) = self.correlator.get(sequence) else {
            // late (already timed out) or never ours; dropped by design
            warn!(sequence, frame = %frame, "orphan response dropped");
            return Ok(());
        };

        if status.is_throttling() {
            let now = Instant::now();
            self.throttle.hit(now);
            warn!(%status, "SMSC throttling; pausing submissions");
        } else if status.is_ok() {
            self.throttle.reset();
        }

        if let Frame::SubmitSmResp(ref resp) = frame {
            let message_id = resp.message_id.as_str().unwrap_or_default().to_string();
            if status.is_ok() && !pending.log_id.is_empty() && !message_id.is_empty() {
                if let Err(e) = self
                    .correlator
                    .put_delivery(&message_id, &pending.log_id, pending.extra_data.as_deref())
                    .await
                {
                    warn!(error = %e, log_id = %pending.log_id, "delivery record not stored");
                    self.hook.send_error(&pending.log_id, &e, self.client_id).await;
                }
            }
        }

        // surface failures to the hook when nobody awaits this request
        if !status.is_ok() && pending.waker.is_none() && !pending.log_id.is_empty() {
            let err = if status.is_throttling() {
                EsmeError::Throttled { status }
            } else {
                EsmeError::RequestFailed { status }
            };
            self.hook.send_error(&pending.log_id, &err, self.client_id).await;
        }

        pending.wake(Ok(frame));
        Ok(())
    }

    async fn handle_deliver(&mut self, pdu: DeliverSm) -> Result<(), EsmeError> {
        if !self.state.can_receive() {
            warn!(state = %self.state, "deliver_sm outside a receiver session");
            let resp = DeliverSmResp::error(pdu.sequence_number, CommandStatus::InvalidBindStatus);
            return self.send_frame(&Frame::DeliverSmResp(resp)).await;
        }

        let resp = DeliverSmResp::new(pdu.sequence_number);
        self.send_frame(&Frame::DeliverSmResp(resp)).await?;

        if !pdu.is_delivery_receipt() {
            return Ok(());
        }

        let payload = pdu.body.payload(&pdu.optional);
        let receipt_text = match text::decode(payload, pdu.body.data_coding) {
            Ok(text) => text,
            // receipts are conventionally GSM-7 or ASCII; salvage what we can
            Err(_) => String::from_utf8_lossy(payload).into_owned(),
        };
        let receipt = text::receipt::parse(&receipt_text);

        let message_id = pdu
            .receipted_message_id()
            .or_else(|| receipt.id.clone());
        let Some(message_id) = message_id else {
            debug!("delivery receipt carries no message id");
            return Ok(());
        };

        match self.correlator.get_delivery(&message_id).await {
            Ok(Some(record)) => {
                debug!(%message_id, log_id = %record.log_id, "delivery receipt correlated");
                self.hook
                    .receipted(
                        &receipt,
                        &record.log_id,
                        record.extra_data.as_deref(),
                        self.client_id,
                    )
                    .await;
            }
            Ok(None) => debug!(%message_id, "receipt for an unknown message id"),
            Err(e) => {
                // the correlation is lost but the session keeps running
                warn!(error = %e, %message_id, "delivery lookup failed");
                self.hook.send_error("", &e, self.client_id).await;
            }
        }
        Ok(())
    }

    async fn submit(&mut self, message: OutboundSms) -> Result<(), EsmeError> {
        let encoding = message.encoding.unwrap_or(self.config.default_encoding);
        let payload = match &message.payload {
            SmsPayload::Text(text) => {
                match text::encode(text, encoding, message.lossy_encoding) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let err = EsmeError::Encode(e);
                        warn!(log_id = %message.log_id, error = %err, "message dropped");
                        self.hook.send_error(&message.log_id, &err, self.client_id).await;
                        return Ok(());
                    }
                }
            }
            SmsPayload::Data(data) => data.to_vec(),
        };

        let sequence = self.correlator.next_sequence();
        let submit = SubmitSm::new(
            sequence,
            SmBody {
                source: message.source.clone(),
                destination: message.destination.clone(),
                registered_delivery: if message.registered_delivery {
                    RegisteredDelivery::RECEIPT
                } else {
                    RegisteredDelivery::NONE
                },
                data_coding: encoding,
                short_message: Bytes::from(payload),
                ..Default::default()
            },
        );
        let frame = Frame::SubmitSm(Box::new(submit));

        let bytes = match frame.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = EsmeError::Codec(e);
                warn!(log_id = %message.log_id, error = %err, "message dropped");
                self.hook.send_error(&message.log_id, &err, self.client_id).await;
                return Ok(());
            }
        };

        let pending = PendingRequest::new(
            sequence,
            CommandId::SubmitSmResp,
            &message.log_id,
            message.extra_data.clone(),
            Instant::now() + self.config.request_timeout,
        );
        if let Err(e) = self.correlator.put(pending) {
            // the select guard keeps this from happening; dropped, never requeued
            warn!(log_id = %message.log_id, error = %e, "message dropped");
            self.hook.send_error(&message.log_id, &e, self.client_id).await;
            return Ok(());
        }

        self.hook.sending(&frame, &bytes, self.client_id).await;
        self.conn
            .write_bytes(&bytes)
            .await
            .map_err(EsmeError::Transport)?;
        self.last_write = Instant::now();
        Ok(())
    }

    /// One timekeeper round: expire pendings, then send a keepalive when
    /// the link has been write-idle for the configured interval
    async fn on_tick(&mut self) -> Result<(), EsmeError> {
        let now = Instant::now();

        let mut keepalive_lost = false;
        for pending in self.correlator.expire(now) {
            warn!(
                sequence = pending.sequence_number,
                log_id = %pending.log_id,
                "request timed out"
            );
            if pending.expected == CommandId::EnquireLinkResp {
                keepalive_lost = true;
            }
            if pending.waker.is_some() {
                pending.wake(Err(EsmeError::RequestTimeout));
            } else if !pending.log_id.is_empty() {
                self.hook
                    .send_error(&pending.log_id, &EsmeError::RequestTimeout, self.client_id)
                    .await;
            }
        }
        if keepalive_lost {
            error!("enquire_link unanswered; connection is dead");
            return Err(EsmeError::RequestTimeout);
        }

        if self.state.is_bound()
            && now.duration_since(self.last_write) >= self.config.enquire_link_interval
        {
            let sequence = self.correlator.next_sequence();
            let pending = PendingRequest::new(
                sequence,
                CommandId::EnquireLinkResp,
                "",
                None,
                now + self.config.request_timeout,
            );
            self.correlator.put_control(pending);
            self.send_frame(&Frame::EnquireLink(EnquireLink::new(sequence)))
                .await?;
        }
        Ok(())
    }

    /// Best-effort unbind with a bounded wait for the response, then close
    pub(crate) async fn graceful_stop(&mut self) -> Result<(), EsmeError> {
        if self.state.is_bound() {
            self.state = SessionState::Unbinding;
            let sequence = self.correlator.next_sequence();
            let frame = Frame::Unbind(Unbind::new(sequence));

            if self.send_frame(&frame).await.is_ok() {
                let deadline = Instant::now() + UNBIND_TIMEOUT;
                loop {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        warn!("unbind_resp did not arrive in time");
                        break;
                    }
                    match time::timeout(remaining, self.conn.read_frame()).await {
                        Err(_) => {
                            warn!("unbind_resp did not arrive in time");
                            break;
                        }
                        Ok(Err(_)) | Ok(Ok(None)) => break,
                        Ok(Ok(Some(Inbound::Frame { frame, bytes }))) => {
                            self.hook.received(Some(&frame), &bytes, self.client_id).await;
                            if matches!(
                                frame,
                                Frame::UnbindResp(ref r) if r.sequence_number == sequence
                            ) {
                                break;
                            }
                        }
                        Ok(Ok(Some(Inbound::Bad { bytes, .. }))) => {
                            self.hook.received(None, &bytes, self.client_id).await;
                        }
                    }
                }
            }
        }
        self.state = SessionState::Closed;
        info!("session closed");
        Ok(())
    }

    async fn send_frame(&mut self, frame: &Frame) -> Result<(), EsmeError> {
        let bytes = frame.to_bytes().map_err(EsmeError::Codec)?;
        self.hook.sending(frame, &bytes, self.client_id).await;
        self.conn
            .write_bytes(&bytes)
            .await
            .map_err(EsmeError::Transport)?;
        self.last_write = Instant::now();
        Ok(())
    }

    fn make_bind(&self, sequence_number: u32) -> Result<Frame, EsmeError> {
        let system_id = SystemId::new(self.config.system_id.as_bytes())
            .map_err(|e| EsmeError::InvalidMessage(format!("system_id: {e}")))?;
        let password = Password::new(self.config.password.as_bytes())
            .map_err(|e| EsmeError::InvalidMessage(format!("password: {e}")))?;
        let system_type =
            SystemType::new(self.config.system_type.as_deref().unwrap_or("").as_bytes())
                .map_err(|e| EsmeError::InvalidMessage(format!("system_type: {e}")))?;
        let address_range =
            AddressRange::new(self.config.address_range.as_deref().unwrap_or("").as_bytes())
                .map_err(|e| EsmeError::InvalidMessage(format!("address_range: {e}")))?;

        macro_rules! bind_fields {
            ($ty:ident) => {
                crate::datatypes::$ty {
                    sequence_number,
                    system_id,
                    password,
                    system_type,
                    interface_version: self.config.interface_version,
                    addr_ton: self.config.addr_ton,
                    addr_npi: self.config.addr_npi,
                    address_range,
                }
            };
        }

        Ok(match self.config.bind_mode {
            BindMode::Transmitter => Frame::BindTransmitter(bind_fields!(BindTransmitter)),
            BindMode::Receiver => Frame::BindReceiver(bind_fields!(BindReceiver)),
            BindMode::Transceiver => Frame::BindTransceiver(bind_fields!(BindTransceiver)),
        })
    }
}
