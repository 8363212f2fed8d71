// ABOUTME: alert_notification PDU (Section 4.12.1)
// ABOUTME: SMSC notice that a previously unavailable mobile subscriber is reachable

use bytes::BytesMut;
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{tags, CommandId, CommandStatus, OptionalParams, PhoneNumber, Tlv};

/// alert_notification PDU (Section 4.12.1).
///
/// Sent by the SMSC when `esme_addr` becomes available; carries no
/// response PDU. The only defined TLV is `ms_availability_status`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlertNotification {
    pub sequence_number: u32,
    pub source: PhoneNumber,
    pub esme_addr: PhoneNumber,
    pub optional: OptionalParams,
}

impl AlertNotification {
    /// ms_availability_status TLV value, when present
    /// (0 available, 1 denied, 2 unavailable)
    pub fn ms_availability_status(&self) -> Option<u8> {
        self.optional
            .get(tags::MS_AVAILABILITY_STATUS)
            .and_then(Tlv::as_u8)
    }
}

impl Encodable for AlertNotification {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::AlertNotification,
            CommandStatus::Ok,
            self.sequence_number,
        );
        self.source.encode(buf);
        self.esme_addr.encode(buf);
        self.optional.encode(buf);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for AlertNotification {
    fn command_id() -> CommandId {
        CommandId::AlertNotification
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let source = PhoneNumber::decode(buf, 65, "source_addr")?;
        let esme_addr = PhoneNumber::decode(buf, 65, "esme_addr")?;
        let optional = OptionalParams::decode_all(buf)?;
        Ok(Self {
            sequence_number: header.sequence_number,
            source,
            esme_addr,
            optional,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut original = AlertNotification {
            sequence_number: 77,
            source: PhoneNumber::international("447700900123").unwrap(),
            esme_addr: PhoneNumber::international("1234").unwrap(),
            optional: OptionalParams::new(),
        };
        original
            .optional
            .set(Tlv::from_u8(tags::MS_AVAILABILITY_STATUS, 0));

        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = AlertNotification::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.ms_availability_status(), Some(0));
    }
}
