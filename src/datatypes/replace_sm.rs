// ABOUTME: replace_sm and replace_sm_resp PDUs (Section 4.10)
// ABOUTME: Replaces a previously submitted message identified by message_id

use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{
    CommandId, CommandStatus, MessageId, PhoneNumber, RegisteredDelivery, TimeString,
};
use crate::macros::impl_complete_header_only_pdu;

/// replace_sm PDU (Section 4.10.1)
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceSm {
    pub sequence_number: u32,
    pub message_id: MessageId,
    pub source: PhoneNumber,
    pub schedule_delivery_time: TimeString,
    pub validity_period: TimeString,
    pub registered_delivery: RegisteredDelivery,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
}

/// replace_sm_resp PDU (Section 4.10.2)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceSmResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(ReplaceSmResp, CommandId::ReplaceSmResp);

impl Encodable for ReplaceSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::ReplaceSm,
            CommandStatus::Ok,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.message_id.as_str_bytes());
        self.source.encode(buf);
        codec::put_cstring(buf, self.schedule_delivery_time.as_str_bytes());
        codec::put_cstring(buf, self.validity_period.as_str_bytes());
        buf.put_u8(self.registered_delivery.to_byte());
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.short_message.len() as u8);
        buf.extend_from_slice(&self.short_message);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for ReplaceSm {
    fn command_id() -> CommandId {
        CommandId::ReplaceSm
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let message_id = codec::get_fixed_string(buf, "message_id")?;
        let source = PhoneNumber::decode(buf, 21, "source_addr")?;
        let schedule_delivery_time = codec::get_fixed_string(buf, "schedule_delivery_time")?;
        let validity_period = codec::get_fixed_string(buf, "validity_period")?;
        let registered_delivery = RegisteredDelivery::from_byte(codec::get_u8(buf)?);
        let sm_default_msg_id = codec::get_u8(buf)?;
        let sm_length = codec::get_u8(buf)? as usize;
        let short_message = codec::get_octets(buf, sm_length, "short_message")?;
        Ok(Self {
            sequence_number: header.sequence_number,
            message_id,
            source,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            sm_default_msg_id,
            short_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;

    #[test]
    fn roundtrip() {
        let original = ReplaceSm {
            sequence_number: 11,
            message_id: MessageId::from("to-replace"),
            source: PhoneNumber::international("1234").unwrap(),
            schedule_delivery_time: TimeString::default(),
            validity_period: TimeString::default(),
            registered_delivery: RegisteredDelivery::RECEIPT,
            sm_default_msg_id: 0,
            short_message: Bytes::from_static(b"replacement text"),
        };
        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = ReplaceSm::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
        assert!(!cursor.has_remaining());
    }
}
