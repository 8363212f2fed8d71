// ABOUTME: query_sm and query_sm_resp PDUs for message status queries (Section 4.8)
// ABOUTME: Defines the message_state values reported by the SMSC

use bytes::{BufMut, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{CommandId, CommandStatus, MessageId, PhoneNumber, TimeString};

/// Message states returned by query_sm_resp (Section 5.2.28)
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageState {
    Enroute = 1,
    Delivered = 2,
    Expired = 3,
    Deleted = 4,
    Undeliverable = 5,
    Accepted = 6,
    Unknown = 7,
    Rejected = 8,
}

/// query_sm PDU (Section 4.8.1)
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySm {
    pub sequence_number: u32,
    pub message_id: MessageId,
    pub source: PhoneNumber,
}

/// query_sm_resp PDU (Section 4.8.2)
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySmResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: MessageId,
    /// Final date, empty while the message is still pending
    pub final_date: TimeString,
    pub message_state: MessageState,
    /// Network-specific error code, 0 when not applicable
    pub error_code: u8,
}

impl Encodable for QuerySm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::QuerySm,
            CommandStatus::Ok,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.message_id.as_str_bytes());
        self.source.encode(buf);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for QuerySm {
    fn command_id() -> CommandId {
        CommandId::QuerySm
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let message_id = codec::get_fixed_string(buf, "message_id")?;
        let source = PhoneNumber::decode(buf, 21, "source_addr")?;
        Ok(Self {
            sequence_number: header.sequence_number,
            message_id,
            source,
        })
    }
}

impl Encodable for QuerySmResp {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::QuerySmResp,
            self.command_status,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.message_id.as_str_bytes());
        codec::put_cstring(buf, self.final_date.as_str_bytes());
        buf.put_u8(self.message_state.into());
        buf.put_u8(self.error_code);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for QuerySmResp {
    fn command_id() -> CommandId {
        CommandId::QuerySmResp
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let message_id = codec::get_fixed_string(buf, "message_id")?;
        let final_date = codec::get_fixed_string(buf, "final_date")?;
        let state_raw = codec::get_u8(buf)?;
        let message_state =
            MessageState::try_from(state_raw).map_err(|_| CodecError::MalformedPdu {
                reason: format!("invalid message_state {state_raw:#04x}"),
                offset: buf.position(),
            })?;
        let error_code = codec::get_u8(buf)?;
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
            final_date,
            message_state,
            error_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let query = QuerySm {
            sequence_number: 5,
            message_id: MessageId::from("msg42"),
            source: PhoneNumber::international("1234567890").unwrap(),
        };
        let bytes = query.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        assert_eq!(QuerySm::decode(&header, &mut cursor).unwrap(), query);

        let resp = QuerySmResp {
            command_status: CommandStatus::Ok,
            sequence_number: 5,
            message_id: MessageId::from("msg42"),
            final_date: TimeString::default(),
            message_state: MessageState::Enroute,
            error_code: 0,
        };
        let bytes = resp.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        assert_eq!(QuerySmResp::decode(&header, &mut cursor).unwrap(), resp);
    }
}
