// ABOUTME: ESME session configuration with protocol defaults
// ABOUTME: Covers bind credentials, timers, window size and reconnect tuning

use std::time::Duration;

use crate::datatypes::{DataCoding, InterfaceVersion, NumericPlanIndicator, TypeOfNumber};
use crate::macros::builder_setters;

/// The bind mode requested at session establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
    /// bind_transmitter: outbound submissions only
    Transmitter,
    /// bind_receiver: inbound deliveries only
    Receiver,
    /// bind_transceiver: both directions over one session
    #[default]
    Transceiver,
}

/// Configuration of one ESME.
///
/// The defaults follow common SMSC operational practice: an enquire_link
/// just under every minute, a 10-message window, and reconnect back-off
/// from 1 s to 60 s.
#[derive(Debug, Clone)]
pub struct EsmeConfig {
    pub smsc_host: String,
    pub smsc_port: u16,
    pub system_id: String,
    pub password: String,
    pub system_type: Option<String>,
    pub bind_mode: BindMode,
    pub interface_version: InterfaceVersion,
    pub addr_ton: TypeOfNumber,
    pub addr_npi: NumericPlanIndicator,
    pub address_range: Option<String>,
    /// Idle time after which an enquire_link is sent
    pub enquire_link_interval: Duration,
    /// Deadline for every in-flight request
    pub request_timeout: Duration,
    /// Deadline for connection establishment and the bind handshake
    pub bind_timeout: Duration,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
    pub throttle_initial: Duration,
    pub throttle_max: Duration,
    /// Maximum outstanding windowed requests
    pub max_in_flight: usize,
    /// Cap on inbound command_length
    pub max_pdu_size: usize,
    /// Encoding used when an outbound message does not name one
    pub default_encoding: DataCoding,
    /// Identifier handed to hook callbacks; generated when not set
    pub client_id: Option<String>,
}

/// Default SMPP TCP port
pub const DEFAULT_SMPP_PORT: u16 = 2775;

impl EsmeConfig {
    pub fn new(
        smsc_host: impl Into<String>,
        smsc_port: u16,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            smsc_host: smsc_host.into(),
            smsc_port,
            system_id: system_id.into(),
            password: password.into(),
            system_type: None,
            bind_mode: BindMode::Transceiver,
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: None,
            enquire_link_interval: Duration::from_secs(55),
            request_timeout: Duration::from_secs(20),
            bind_timeout: Duration::from_secs(15),
            reconnect_initial: Duration::from_secs(1),
            reconnect_max: Duration::from_secs(60),
            throttle_initial: Duration::from_secs(1),
            throttle_max: Duration::from_secs(30),
            max_in_flight: 10,
            max_pdu_size: crate::codec::DEFAULT_MAX_PDU_SIZE,
            default_encoding: DataCoding::Gsm7,
            client_id: None,
        }
    }

    builder_setters! {
        /// Bind mode; transceiver by default
        bind_mode: BindMode,
        interface_version: InterfaceVersion,
        addr_ton: TypeOfNumber,
        addr_npi: NumericPlanIndicator,
        enquire_link_interval: Duration,
        request_timeout: Duration,
        bind_timeout: Duration,
        reconnect_initial: Duration,
        reconnect_max: Duration,
        throttle_initial: Duration,
        throttle_max: Duration,
        max_in_flight: usize,
        max_pdu_size: usize,
        default_encoding: DataCoding,
    }

    pub fn system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = Some(system_type.into());
        self
    }

    pub fn address_range(mut self, address_range: impl Into<String>) -> Self {
        self.address_range = Some(address_range.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn smsc_addr(&self) -> String {
        format!("{}:{}", self.smsc_host, self.smsc_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_practice() {
        let config = EsmeConfig::new("smsc.example.net", DEFAULT_SMPP_PORT, "sys", "pw");
        assert_eq!(config.bind_mode, BindMode::Transceiver);
        assert_eq!(config.enquire_link_interval, Duration::from_secs(55));
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert_eq!(config.bind_timeout, Duration::from_secs(15));
        assert_eq!(config.max_in_flight, 10);
        assert_eq!(config.max_pdu_size, 256 * 1024);
        assert_eq!(config.default_encoding, DataCoding::Gsm7);
        assert_eq!(config.smsc_addr(), "smsc.example.net:2775");
        assert!(config.client_id.is_none());
    }

    #[test]
    fn builder_setters_chain() {
        let config = EsmeConfig::new("localhost", 2775, "sys", "pw")
            .bind_mode(BindMode::Transmitter)
            .max_in_flight(32)
            .request_timeout(Duration::from_secs(5))
            .system_type("SMS-GW")
            .client_id("gw-1");
        assert_eq!(config.bind_mode, BindMode::Transmitter);
        assert_eq!(config.max_in_flight, 32);
        assert_eq!(config.system_type.as_deref(), Some("SMS-GW"));
        assert_eq!(config.client_id.as_deref(), Some("gw-1"));
    }
}
