// ABOUTME: deliver_sm and deliver_sm_resp PDUs for SMSC-originated delivery (Section 4.6)
// ABOUTME: Classifies delivery receipts and extracts the receipted message id

use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{tags, CommandId, CommandStatus, OptionalParams, SmBody, Tlv};

/// deliver_sm PDU (Section 4.6.1): an inbound message or delivery receipt.
///
/// The body layout is identical to submit_sm. When `esm_class` marks a
/// delivery receipt, the SMSC message id is carried either in the
/// `receipted_message_id` TLV or in the conventional receipt text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeliverSm {
    pub sequence_number: u32,
    pub body: SmBody,
    pub optional: OptionalParams,
}

/// deliver_sm_resp PDU (Section 4.6.2); its message_id field is unused and
/// always carried as a single NUL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliverSmResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl DeliverSm {
    /// True when esm_class marks this PDU as an SMSC delivery receipt
    pub fn is_delivery_receipt(&self) -> bool {
        self.body.esm_class.is_delivery_receipt()
    }

    /// The receipted message id from the dedicated TLV, when present.
    /// Receipts without the TLV carry the id in the receipt text instead.
    pub fn receipted_message_id(&self) -> Option<String> {
        self.optional
            .get(tags::RECEIPTED_MESSAGE_ID)
            .and_then(Tlv::as_cstring)
    }
}

impl Encodable for DeliverSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::DeliverSm,
            CommandStatus::Ok,
            self.sequence_number,
        );
        let params = self.body.encode(buf, &self.optional)?;
        params.encode(buf);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for DeliverSm {
    fn command_id() -> CommandId {
        CommandId::DeliverSm
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let body = SmBody::decode(buf)?;
        let optional = OptionalParams::decode_all(buf)?;
        Ok(Self {
            sequence_number: header.sequence_number,
            body,
            optional,
        })
    }
}

impl DeliverSmResp {
    pub fn new(sequence_number: u32) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            sequence_number,
        }
    }
}

impl Encodable for DeliverSmResp {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::DeliverSmResp,
            self.command_status,
            self.sequence_number,
        );
        // message_id is unused and set to NULL (Section 4.6.2)
        buf.put_u8(0);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for DeliverSmResp {
    fn command_id() -> CommandId {
        CommandId::DeliverSmResp
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.has_remaining() {
            let _ = codec::get_cstring(buf, 65, "message_id")?;
        }
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{EsmClass, PhoneNumber};
    use bytes::Bytes;

    fn receipt() -> DeliverSm {
        let mut pdu = DeliverSm {
            sequence_number: 9,
            body: SmBody {
                source: PhoneNumber::international("0987654321").unwrap(),
                destination: PhoneNumber::international("1234567890").unwrap(),
                esm_class: EsmClass::delivery_receipt(),
                short_message: Bytes::from_static(
                    b"id:abc123 sub:001 dlvrd:001 submit date:2408011200 \
                      done date:2408011201 stat:DELIVRD err:000 text:Hello",
                ),
                ..Default::default()
            },
            optional: OptionalParams::new(),
        };
        pdu.optional
            .set(Tlv::from_cstring(tags::RECEIPTED_MESSAGE_ID, "abc123"));
        pdu
    }

    #[test]
    fn roundtrip() {
        let original = receipt();
        let bytes = original.to_bytes().unwrap();

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = DeliverSm::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn receipt_classification_and_id() {
        let pdu = receipt();
        assert!(pdu.is_delivery_receipt());
        assert_eq!(pdu.receipted_message_id().as_deref(), Some("abc123"));

        let plain = DeliverSm {
            body: SmBody {
                short_message: Bytes::from_static(b"MO message"),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!plain.is_delivery_receipt());
        assert_eq!(plain.receipted_message_id(), None);
    }

    #[test]
    fn resp_wire_format() {
        let resp = DeliverSmResp::new(9);
        let bytes = resp.to_bytes().unwrap();
        // 16-octet header plus the single NUL message_id
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[16], 0);

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = DeliverSmResp::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, resp);
    }
}
