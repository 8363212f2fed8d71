// ABOUTME: submit_sm and submit_sm_resp PDUs for message submission (Section 4.4)
// ABOUTME: Delegates the mandatory body to SmBody and carries the TLV tail

use bytes::{Buf, BytesMut};
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{CommandId, CommandStatus, MessageId, OptionalParams, SmBody};

/// submit_sm PDU (Section 4.4.1), the ESME-originated message submission.
///
/// Payloads longer than 254 octets are moved into the `message_payload`
/// TLV during encoding; see [`SmBody`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmitSm {
    pub sequence_number: u32,
    pub body: SmBody,
    pub optional: OptionalParams,
}

/// submit_sm_resp PDU (Section 4.4.2) carrying the SMSC-assigned message id
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: MessageId,
}

impl SubmitSm {
    pub fn new(sequence_number: u32, body: SmBody) -> Self {
        Self {
            sequence_number,
            body,
            optional: OptionalParams::new(),
        }
    }
}

impl Encodable for SubmitSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::SubmitSm,
            CommandStatus::Ok,
            self.sequence_number,
        );
        let params = self.body.encode(buf, &self.optional)?;
        params.encode(buf);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for SubmitSm {
    fn command_id() -> CommandId {
        CommandId::SubmitSm
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

impl SubmitSmResp {
    pub fn new(sequence_number: u32, message_id: MessageId) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id,
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            sequence_number,
            message_id: MessageId::default(),
        }
    }
}

impl Encodable for SubmitSmResp {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::SubmitSmResp,
            self.command_status,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.message_id.as_str_bytes());
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for SubmitSmResp {
    fn command_id() -> CommandId {
        CommandId::SubmitSmResp
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        // error responses from some SMSCs omit the message_id entirely
        let message_id = if buf.has_remaining() {
            codec::get_fixed_string(buf, "message_id")?
        } else {
            MessageId::default()
        };
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{tags, DataCoding, PhoneNumber, RegisteredDelivery};
    use bytes::Bytes;

    fn sample() -> SubmitSm {
        SubmitSm::new(
            42,
            SmBody {
                source: PhoneNumber::international("1234567890").unwrap(),
                destination: PhoneNumber::international("0987654321").unwrap(),
                registered_delivery: RegisteredDelivery::RECEIPT,
                short_message: Bytes::from_static(b"Hello, world!"),
                ..Default::default()
            },
        )
    }

    #[test]
    fn roundtrip() {
        let original = sample();
        let bytes = original.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_be_bytes());

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = SubmitSm::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn long_payload_travels_as_tlv() {
        let mut original = sample();
        original.body.data_coding = DataCoding::Ucs2;
        original.body.short_message = Bytes::from(vec![0x30u8; 300]);

        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = SubmitSm::decode(&header, &mut cursor).unwrap();

        // on the wire the mandatory field is empty and the TLV holds the data
        assert!(decoded.body.short_message.is_empty());
        let payload = decoded.optional.get(tags::MESSAGE_PAYLOAD).unwrap();
        assert_eq!(payload.value.len(), 300);
        assert_eq!(decoded.body.payload(&decoded.optional).len(), 300);
    }

    #[test]
    fn resp_roundtrip() {
        let original = SubmitSmResp::new(42, MessageId::from("msg_id_0001"));
        let bytes = original.to_bytes().unwrap();

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = SubmitSmResp::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.message_id, "msg_id_0001");
    }

    #[test]
    fn resp_error_without_body() {
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x10, // command_length
            0x80, 0x00, 0x00, 0x04, // command_id (submit_sm_resp)
            0x00, 0x00, 0x00, 0x58, // command_status (ESME_RTHROTTLED)
            0x00, 0x00, 0x00, 0x07, // sequence_number
        ];
        let mut cursor = Cursor::new(&data[..]);
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = SubmitSmResp::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded.command_status, CommandStatus::ThrottlingError);
        assert!(decoded.message_id.is_empty());
    }
}
