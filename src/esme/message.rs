// ABOUTME: The trackable outbound message handed from the broker to the session
// ABOUTME: Carries log_id and extra_data which never reach the wire

use bytes::Bytes;

use crate::datatypes::{DataCoding, PhoneNumber};

/// Message payload: text to be encoded per the data coding scheme, or
/// pre-encoded octets sent verbatim
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SmsPayload {
    Text(String),
    Data(Bytes),
}

/// An outbound short message.
///
/// `log_id` and `extra_data` never appear on the wire: the correlator
/// carries them so the response, any timeout, and the eventual delivery
/// receipt all surface the same identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundSms {
    /// Caller-supplied tracking id; required, non-empty
    pub log_id: String,
    /// Opaque caller data echoed alongside every correlated event
    pub extra_data: Option<String>,
    pub source: PhoneNumber,
    pub destination: PhoneNumber,
    pub payload: SmsPayload,
    /// Encoding override; the session's default applies when `None`
    pub encoding: Option<DataCoding>,
    /// Request an SMSC delivery receipt
    pub registered_delivery: bool,
    /// Substitute `?` for unencodable characters instead of failing
    pub lossy_encoding: bool,
}

impl OutboundSms {
    pub fn builder() -> OutboundSmsBuilder {
        OutboundSmsBuilder::default()
    }
}

/// Fluent builder for [`OutboundSms`]
#[derive(Debug, Default)]
pub struct OutboundSmsBuilder {
    log_id: Option<String>,
    extra_data: Option<String>,
    source: Option<PhoneNumber>,
    destination: Option<PhoneNumber>,
    payload: Option<SmsPayload>,
    encoding: Option<DataCoding>,
    registered_delivery: bool,
    lossy_encoding: bool,
}

impl OutboundSmsBuilder {
    pub fn log_id(mut self, log_id: impl Into<String>) -> Self {
        self.log_id = Some(log_id.into());
        self
    }

    pub fn extra_data(mut self, extra_data: impl Into<String>) -> Self {
        self.extra_data = Some(extra_data.into());
        self
    }

    pub fn from(mut self, source: PhoneNumber) -> Self {
        self.source = Some(source);
        self
    }

    pub fn to(mut self, destination: PhoneNumber) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.payload = Some(SmsPayload::Text(text.into()));
        self
    }

    /// Pre-encoded payload octets, sent as-is
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.payload = Some(SmsPayload::Data(data.into()));
        self
    }

    pub fn encoding(mut self, encoding: DataCoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_delivery_receipt(mut self) -> Self {
        self.registered_delivery = true;
        self
    }

    pub fn lossy(mut self) -> Self {
        self.lossy_encoding = true;
        self
    }

    pub fn build(self) -> Result<OutboundSms, String> {
        let log_id = self.log_id.ok_or("log_id is required")?;
        if log_id.is_empty() {
            return Err("log_id must not be empty".to_string());
        }
        let source = self.source.ok_or("source address is required")?;
        let destination = self.destination.ok_or("destination address is required")?;
        let payload = self.payload.ok_or("message text or data is required")?;

        Ok(OutboundSms {
            log_id,
            extra_data: self.extra_data,
            source,
            destination,
            payload,
            encoding: self.encoding,
            registered_delivery: self.registered_delivery,
            lossy_encoding: self.lossy_encoding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(s: &str) -> PhoneNumber {
        PhoneNumber::international(s).unwrap()
    }

    #[test]
    fn builder_happy_path() {
        let sms = OutboundSms::builder()
            .log_id("order-42")
            .extra_data("campaign=summer")
            .from(number("1234567890"))
            .to(number("0987654321"))
            .text("Hello")
            .with_delivery_receipt()
            .build()
            .unwrap();

        assert_eq!(sms.log_id, "order-42");
        assert_eq!(sms.extra_data.as_deref(), Some("campaign=summer"));
        assert_eq!(sms.payload, SmsPayload::Text("Hello".into()));
        assert!(sms.registered_delivery);
        assert!(sms.encoding.is_none());
    }

    #[test]
    fn log_id_is_mandatory() {
        let result = OutboundSms::builder()
            .from(number("1"))
            .to(number("2"))
            .text("x")
            .build();
        assert_eq!(result.unwrap_err(), "log_id is required");

        let result = OutboundSms::builder()
            .log_id("")
            .from(number("1"))
            .to(number("2"))
            .text("x")
            .build();
        assert_eq!(result.unwrap_err(), "log_id must not be empty");
    }

    #[test]
    fn binary_payload() {
        let sms = OutboundSms::builder()
            .log_id("bin-1")
            .from(number("1"))
            .to(number("2"))
            .data(Bytes::from_static(&[0x01, 0x02]))
            .encoding(DataCoding::Binary)
            .build()
            .unwrap();
        assert_eq!(sms.payload, SmsPayload::Data(Bytes::from_static(&[1, 2])));
        assert_eq!(sms.encoding, Some(DataCoding::Binary));
    }
}
