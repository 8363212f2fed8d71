// ABOUTME: The three SMPP bind operations and their responses (Section 4.1)
// ABOUTME: One macro stamps out the identical wire layout per bind mode

use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{
    tags, AddressRange, CommandId, CommandStatus, InterfaceVersion, NumericPlanIndicator,
    OptionalParams, Password, SystemId, SystemType, Tlv, TypeOfNumber,
};

/// The three bind request PDUs share one body layout (Section 4.1.1):
/// system_id, password, system_type, interface_version, addr_ton,
/// addr_npi, address_range. Their responses likewise share system_id plus
/// an optional sc_interface_version TLV.
macro_rules! bind_pdu {
    ($req:ident, $resp:ident, $req_id:expr, $resp_id:expr) => {
        #[derive(Clone, Debug, PartialEq, Eq, Default)]
        pub struct $req {
            pub sequence_number: u32,
            pub system_id: SystemId,
            pub password: Password,
            pub system_type: SystemType,
            pub interface_version: InterfaceVersion,
            pub addr_ton: TypeOfNumber,
            pub addr_npi: NumericPlanIndicator,
            pub address_range: AddressRange,
        }

        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $resp {
            pub command_status: CommandStatus,
            pub sequence_number: u32,
            pub system_id: SystemId,
            /// sc_interface_version TLV, when the SMSC advertises one
            pub sc_interface_version: Option<InterfaceVersion>,
        }

        impl Encodable for $req {
            fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
                let start = buf.len();
                codec::write_header(buf, $req_id, CommandStatus::Ok, self.sequence_number);
                codec::put_cstring(buf, self.system_id.as_str_bytes());
                codec::put_cstring(buf, self.password.as_str_bytes());
                codec::put_cstring(buf, self.system_type.as_str_bytes());
                buf.put_u8(self.interface_version.into());
                buf.put_u8(self.addr_ton.into());
                buf.put_u8(self.addr_npi.into());
                codec::put_cstring(buf, self.address_range.as_str_bytes());
                codec::finish_length(buf, start);
                Ok(())
            }
        }

        impl Decodable for $req {
            fn command_id() -> CommandId {
                $req_id
            }

            fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
                let system_id = codec::get_fixed_string(buf, "system_id")?;
                let password = codec::get_fixed_string(buf, "password")?;
                let system_type = codec::get_fixed_string(buf, "system_type")?;
                let version_raw = codec::get_u8(buf)?;
                let interface_version = InterfaceVersion::try_from(version_raw).map_err(|_| {
                    CodecError::MalformedPdu {
                        reason: format!("invalid interface_version {version_raw:#04x}"),
                        offset: buf.position(),
                    }
                })?;
                let ton_raw = codec::get_u8(buf)?;
                let addr_ton =
                    TypeOfNumber::try_from(ton_raw).map_err(|_| CodecError::MalformedPdu {
                        reason: format!("invalid addr_ton {ton_raw:#04x}"),
                        offset: buf.position(),
                    })?;
                let npi_raw = codec::get_u8(buf)?;
                let addr_npi = NumericPlanIndicator::try_from(npi_raw).map_err(|_| {
                    CodecError::MalformedPdu {
                        reason: format!("invalid addr_npi {npi_raw:#04x}"),
                        offset: buf.position(),
                    }
                })?;
                let address_range = codec::get_fixed_string(buf, "address_range")?;

                Ok(Self {
                    sequence_number: header.sequence_number,
                    system_id,
                    password,
                    system_type,
                    interface_version,
                    addr_ton,
                    addr_npi,
                    address_range,
                })
            }
        }

        impl $resp {
            pub fn new(sequence_number: u32, system_id: SystemId) -> Self {
                Self {
                    command_status: CommandStatus::Ok,
                    sequence_number,
                    system_id,
                    sc_interface_version: None,
                }
            }
        }

        impl Encodable for $resp {
            fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
                let start = buf.len();
                codec::write_header(buf, $resp_id, self.command_status, self.sequence_number);
                codec::put_cstring(buf, self.system_id.as_str_bytes());
                if let Some(version) = self.sc_interface_version {
                    Tlv::from_u8(tags::SC_INTERFACE_VERSION, version.into()).encode(buf);
                }
                codec::finish_length(buf, start);
                Ok(())
            }
        }

        impl Decodable for $resp {
            fn command_id() -> CommandId {
                $resp_id
            }

            fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
                // rejected binds may carry an empty body
                let system_id = if buf.has_remaining() {
                    codec::get_fixed_string(buf, "system_id")?
                } else {
                    SystemId::default()
                };
                let params = OptionalParams::decode_all(buf)?;
                let sc_interface_version = params
                    .get(tags::SC_INTERFACE_VERSION)
                    .and_then(Tlv::as_u8)
                    .and_then(|v| InterfaceVersion::try_from(v).ok());

                Ok(Self {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                    system_id,
                    sc_interface_version,
                })
            }
        }
    };
}

bind_pdu!(
    BindTransmitter,
    BindTransmitterResp,
    CommandId::BindTransmitter,
    CommandId::BindTransmitterResp
);
bind_pdu!(
    BindReceiver,
    BindReceiverResp,
    CommandId::BindReceiver,
    CommandId::BindReceiverResp
);
bind_pdu!(
    BindTransceiver,
    BindTransceiverResp,
    CommandId::BindTransceiver,
    CommandId::BindTransceiverResp
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bind_transmitter_wire_bytes() {
        let data: Vec<u8> = vec![
            // Header:
            0x00, 0x00, 0x00, 0x2F, // command_length
            0x00, 0x00, 0x00, 0x02, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x01, // sequence_number
            // Body:
            0x53, 0x4D, 0x50, 0x50, 0x33, 0x54, 0x45, 0x53, 0x54, 0x00, // system_id
            0x73, 0x65, 0x63, 0x72, 0x65, 0x74, 0x30, 0x38, 0x00, // password
            0x53, 0x55, 0x42, 0x4D, 0x49, 0x54, 0x31, 0x00, // system_type
            0x34, // interface_version
            0x01, // addr_ton
            0x01, // addr_npi
            0x00, // address_range
        ];

        let mut cursor = Cursor::new(&data[..]);
        let header = PduHeader::decode(&mut cursor).unwrap();
        let pdu = BindTransmitter::decode(&header, &mut cursor).unwrap();

        assert_eq!(pdu.sequence_number, 1);
        assert_eq!(pdu.system_id, "SMPP3TEST");
        assert_eq!(pdu.password, "secret08");
        assert_eq!(pdu.system_type, "SUBMIT1");
        assert_eq!(pdu.interface_version, InterfaceVersion::SmppV34);
        assert_eq!(pdu.addr_ton, TypeOfNumber::International);
        assert_eq!(pdu.addr_npi, NumericPlanIndicator::Isdn);
        assert!(pdu.address_range.is_empty());
    }

    #[test]
    fn bind_request_roundtrip() {
        let original = BindTransceiver {
            sequence_number: 1,
            system_id: SystemId::from("test"),
            password: Password::from("test"),
            system_type: SystemType::default(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: AddressRange::default(),
        };

        let bytes = original.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_be_bytes());

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = BindTransceiver::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn bind_response_roundtrip_with_tlv() {
        let original = BindTransceiverResp {
            command_status: CommandStatus::Ok,
            sequence_number: 1,
            system_id: SystemId::from("SMSC"),
            sc_interface_version: Some(InterfaceVersion::SmppV34),
        };

        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = BindTransceiverResp::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn rejected_bind_with_empty_body() {
        // header-only response as some SMSCs send on auth failure
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x10, // command_length
            0x80, 0x00, 0x00, 0x09, // command_id (bind_transceiver_resp)
            0x00, 0x00, 0x00, 0x0E, // command_status (ESME_RINVPASWD)
            0x00, 0x00, 0x00, 0x01, // sequence_number
        ];
        let mut cursor = Cursor::new(&data[..]);
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = BindTransceiverResp::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded.command_status, CommandStatus::InvalidPassword);
        assert!(decoded.system_id.is_empty());
        assert!(decoded.sc_interface_version.is_none());
    }
}
