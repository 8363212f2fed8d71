// ABOUTME: data_sm and data_sm_resp PDUs (Section 4.7)
// ABOUTME: Interactive-style messaging where the payload travels only in TLVs

use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{
    CommandId, CommandStatus, DataCoding, EsmClass, MessageId, OptionalParams, PhoneNumber,
    RegisteredDelivery, ServiceType,
};

/// data_sm PDU (Section 4.7.1).
///
/// Unlike submit_sm there is no mandatory short_message field; the payload
/// always travels in the `message_payload` TLV.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSm {
    pub sequence_number: u32,
    pub service_type: ServiceType,
    pub source: PhoneNumber,
    pub destination: PhoneNumber,
    pub esm_class: EsmClass,
    pub registered_delivery: RegisteredDelivery,
    pub data_coding: DataCoding,
    pub optional: OptionalParams,
}

/// data_sm_resp PDU (Section 4.7.2)
#[derive(Clone, Debug, PartialEq)]
pub struct DataSmResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: MessageId,
    pub optional: OptionalParams,
}

impl Encodable for DataSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::DataSm,
            CommandStatus::Ok,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.service_type.as_str_bytes());
        self.source.encode(buf);
        self.destination.encode(buf);
        buf.put_u8(self.esm_class.to_byte());
        buf.put_u8(self.registered_delivery.to_byte());
        buf.put_u8(self.data_coding.to_byte());
        self.optional.encode(buf);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for DataSm {
    fn command_id() -> CommandId {
        CommandId::DataSm
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let service_type = codec::get_fixed_string(buf, "service_type")?;
        let source = PhoneNumber::decode(buf, 65, "source_addr")?;
        let destination = PhoneNumber::decode(buf, 65, "destination_addr")?;
        let esm_class = EsmClass::from_byte(codec::get_u8(buf)?);
        let registered_delivery = RegisteredDelivery::from_byte(codec::get_u8(buf)?);
        let data_coding = DataCoding::from_byte(codec::get_u8(buf)?);
        let optional = OptionalParams::decode_all(buf)?;
        Ok(Self {
            sequence_number: header.sequence_number,
            service_type,
            source,
            destination,
            esm_class,
            registered_delivery,
            data_coding,
            optional,
        })
    }
}

impl Encodable for DataSmResp {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::DataSmResp,
            self.command_status,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.message_id.as_str_bytes());
        self.optional.encode(buf);
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for DataSmResp {
    fn command_id() -> CommandId {
        CommandId::DataSmResp
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let message_id = if buf.has_remaining() {
            codec::get_fixed_string(buf, "message_id")?
        } else {
            MessageId::default()
        };
        let optional = OptionalParams::decode_all(buf)?;
        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
            optional,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{tags, Tlv};
    use bytes::Bytes;

    #[test]
    fn roundtrip_with_payload_tlv() {
        let mut original = DataSm {
            sequence_number: 17,
            source: PhoneNumber::international("123").unwrap(),
            destination: PhoneNumber::international("456").unwrap(),
            data_coding: DataCoding::Binary,
            ..Default::default()
        };
        original.optional.set(Tlv::new(
            tags::MESSAGE_PAYLOAD,
            Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]),
        ));

        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = DataSm::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn resp_roundtrip() {
        let original = DataSmResp {
            command_status: CommandStatus::Ok,
            sequence_number: 17,
            message_id: MessageId::from("d1"),
            optional: OptionalParams::new(),
        };
        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        assert_eq!(DataSmResp::decode(&header, &mut cursor).unwrap(), original);
    }
}
