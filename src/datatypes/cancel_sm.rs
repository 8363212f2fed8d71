// ABOUTME: cancel_sm and cancel_sm_resp PDUs (Section 4.9)
// ABOUTME: Cancels pending messages by message_id or by address pair

use bytes::BytesMut;
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{CommandId, CommandStatus, MessageId, PhoneNumber, ServiceType};
use crate::macros::impl_complete_header_only_pdu;

/// cancel_sm PDU (Section 4.9.1).
///
/// Either `message_id` names one message, or it is empty and the
/// service_type/source/destination triple selects the messages to cancel.
#[derive(Clone, Debug, PartialEq)]
pub struct CancelSm {
    pub sequence_number: u32,
    pub service_type: ServiceType,
    pub message_id: MessageId,
    pub source: PhoneNumber,
    pub destination: PhoneNumber,
}

/// cancel_sm_resp PDU (Section 4.9.2)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancelSmResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(CancelSmResp, CommandId::CancelSmResp);

impl Encodable for CancelSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::CancelSm,
            CommandStatus::Ok,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.service_type.as_str_bytes());
        codec::put_cstring(buf, self.message_id.as_str_bytes());
        self.source.encode(buf);
        self.destination.encode(buf);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for CancelSm {
    fn command_id() -> CommandId {
        CommandId::CancelSm
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let service_type = codec::get_fixed_string(buf, "service_type")?;
        let message_id = codec::get_fixed_string(buf, "message_id")?;
        let source = PhoneNumber::decode(buf, 21, "source_addr")?;
        let destination = PhoneNumber::decode(buf, 21, "destination_addr")?;
        Ok(Self {
            sequence_number: header.sequence_number,
            service_type,
            message_id,
            source,
            destination,
        })
    }
}
