// ABOUTME: Shared mandatory body of the submit_sm and deliver_sm PDUs
// ABOUTME: Handles sm_length accounting and message_payload TLV promotion

use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

use crate::codec::{self, CodecError};
use crate::datatypes::{
    tags, DataCoding, EsmClass, OptionalParams, PhoneNumber, PriorityFlag, ServiceType,
    TimeString, Tlv, Udh,
};

/// Largest short message carried in the mandatory `short_message` field.
/// Longer payloads travel in the `message_payload` TLV.
pub const MAX_SHORT_MESSAGE: usize = 254;

/// SMPP v3.4 registered_delivery field (Section 5.2.17)
///
/// Bits 1-0 select SMSC delivery receipt behavior; the other bit groups
/// (SME acknowledgements, intermediate notifications) pass through.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct RegisteredDelivery(u8);

impl RegisteredDelivery {
    /// No receipt requested
    pub const NONE: Self = Self(0x00);
    /// Receipt requested for final delivery success or failure
    pub const RECEIPT: Self = Self(0x01);
    /// Receipt requested only on delivery failure
    pub const RECEIPT_ON_FAILURE: Self = Self(0x02);

    pub const fn from_byte(value: u8) -> Self {
        Self(value)
    }

    pub const fn to_byte(self) -> u8 {
        self.0
    }

    pub const fn receipt_requested(self) -> bool {
        self.0 & 0x03 != 0
    }
}

/// The mandatory fields shared by `submit_sm` and `deliver_sm`.
///
/// Both PDUs carry the identical field sequence of SMPP v3.4 Sections
/// 4.4.1 and 4.6.1; only the direction and the legal field values differ.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmBody {
    pub service_type: ServiceType,
    pub source: PhoneNumber,
    pub destination: PhoneNumber,
    pub esm_class: EsmClass,
    pub protocol_id: u8,
    pub priority_flag: PriorityFlag,
    pub schedule_delivery_time: TimeString,
    pub validity_period: TimeString,
    pub registered_delivery: RegisteredDelivery,
    pub replace_if_present: u8,
    pub data_coding: DataCoding,
    pub sm_default_msg_id: u8,
    /// Raw payload octets; `sm_length` on the wire is derived from this
    pub short_message: Bytes,
}

impl SmBody {
    /// Encode the mandatory fields. When the payload exceeds
    /// [`MAX_SHORT_MESSAGE`] it is moved into the `message_payload` TLV of
    /// `params` and `sm_length` is written as zero.
    pub(crate) fn encode(
        &self,
        buf: &mut BytesMut,
        params: &OptionalParams,
    ) -> Result<OptionalParams, CodecError> {
        codec::put_cstring(buf, self.service_type.as_str_bytes());
        self.source.encode(buf);
        self.destination.encode(buf);
        buf.put_u8(self.esm_class.to_byte());
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag.into());
        codec::put_cstring(buf, self.schedule_delivery_time.as_str_bytes());
        codec::put_cstring(buf, self.validity_period.as_str_bytes());
        buf.put_u8(self.registered_delivery.to_byte());
        buf.put_u8(self.replace_if_present);
        buf.put_u8(self.data_coding.to_byte());
        buf.put_u8(self.sm_default_msg_id);

        let mut params = params.clone();
        if self.short_message.len() > MAX_SHORT_MESSAGE {
            if params.contains(tags::MESSAGE_PAYLOAD) {
                return Err(CodecError::MalformedPdu {
                    reason: "short_message and message_payload are mutually exclusive".into(),
                    offset: buf.len() as u64,
                });
            }
            buf.put_u8(0);
            params.set(Tlv::new(tags::MESSAGE_PAYLOAD, self.short_message.clone()));
        } else {
            buf.put_u8(self.short_message.len() as u8);
            buf.extend_from_slice(&self.short_message);
        }
        Ok(params)
    }

    /// Decode the mandatory fields; the caller decodes the TLV tail.
    pub(crate) fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let service_type = codec::get_fixed_string(buf, "service_type")?;
        let source = PhoneNumber::decode(buf, 21, "source_addr")?;
        let destination = PhoneNumber::decode(buf, 21, "destination_addr")?;
        let esm_class = EsmClass::from_byte(codec::get_u8(buf)?);
        let protocol_id = codec::get_u8(buf)?;
        let priority_raw = codec::get_u8(buf)?;
        let priority_flag =
            PriorityFlag::try_from(priority_raw).map_err(|_| CodecError::MalformedPdu {
                reason: format!("invalid priority_flag {priority_raw:#04x}"),
                offset: buf.position(),
            })?;
        let schedule_delivery_time = codec::get_fixed_string(buf, "schedule_delivery_time")?;
        let validity_period = codec::get_fixed_string(buf, "validity_period")?;
        let registered_delivery = RegisteredDelivery::from_byte(codec::get_u8(buf)?);
        let replace_if_present = codec::get_u8(buf)?;
        let data_coding = DataCoding::from_byte(codec::get_u8(buf)?);
        let sm_default_msg_id = codec::get_u8(buf)?;
        let sm_length = codec::get_u8(buf)? as usize;
        if sm_length > MAX_SHORT_MESSAGE {
            return Err(CodecError::MalformedPdu {
                reason: format!("sm_length {sm_length} exceeds {MAX_SHORT_MESSAGE}"),
                offset: buf.position(),
            });
        }
        let short_message = codec::get_octets(buf, sm_length, "short_message")?;

        Ok(Self {
            service_type,
            source,
            destination,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present,
            data_coding,
            sm_default_msg_id,
            short_message,
        })
    }

    /// The effective payload: `message_payload` TLV when present, else the
    /// mandatory `short_message` field.
    pub fn payload<'a>(&'a self, params: &'a OptionalParams) -> &'a [u8] {
        match params.get(tags::MESSAGE_PAYLOAD) {
            Some(tlv) => &tlv.value,
            None => &self.short_message,
        }
    }

    /// Split off the User Data Header when UDHI is set; returns the parsed
    /// header and the remaining user data. `Ok(None)` when UDHI is clear.
    pub fn udh(&self, params: &OptionalParams) -> Result<Option<(Udh, Bytes)>, CodecError> {
        if !self.esm_class.has_udhi() {
            return Ok(None);
        }
        Udh::split(self.payload(params)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;

    fn body(message: &[u8]) -> SmBody {
        SmBody {
            source: PhoneNumber::international("1234567890").unwrap(),
            destination: PhoneNumber::international("0987654321").unwrap(),
            short_message: Bytes::copy_from_slice(message),
            ..Default::default()
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let original = body(b"Hello World");
        let mut buf = BytesMut::new();
        let params = original.encode(&mut buf, &OptionalParams::new()).unwrap();
        assert!(params.is_empty());

        let mut cursor = Cursor::new(&buf[..]);
        let decoded = SmBody::decode(&mut cursor).unwrap();
        assert_eq!(decoded, original);
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn long_message_promoted_to_payload_tlv() {
        let original = body(&[0x41u8; 300]);
        let mut buf = BytesMut::new();
        let params = original.encode(&mut buf, &OptionalParams::new()).unwrap();

        // sm_length is the final mandatory octet and must be zero
        assert_eq!(buf[buf.len() - 1], 0);
        let payload = params.get(tags::MESSAGE_PAYLOAD).unwrap();
        assert_eq!(payload.value.len(), 300);
    }

    #[test]
    fn promotion_conflict_rejected() {
        let original = body(&[0x41u8; 300]);
        let mut params = OptionalParams::new();
        params.set(Tlv::new(tags::MESSAGE_PAYLOAD, Bytes::from_static(b"x")));
        let mut buf = BytesMut::new();
        assert!(original.encode(&mut buf, &params).is_err());
    }

    #[test]
    fn payload_tlv_supersedes_short_message() {
        let body = body(b"mandatory");
        let mut params = OptionalParams::new();
        params.set(Tlv::new(
            tags::MESSAGE_PAYLOAD,
            Bytes::from_static(b"from the TLV"),
        ));
        assert_eq!(body.payload(&params), b"from the TLV");
        assert_eq!(body.payload(&OptionalParams::new()), b"mandatory");
    }

    #[test]
    fn udh_exposed_when_udhi_set() {
        let mut b = body(&[0x05, 0x00, 0x03, 0x01, 0x02, 0x01, b'h', b'i']);
        b.esm_class = EsmClass::default_mode().with_udhi();
        let (udh, data) = b.udh(&OptionalParams::new()).unwrap().unwrap();
        assert_eq!(udh.concat().unwrap().total, 2);
        assert_eq!(data.as_ref(), b"hi");

        b.esm_class = EsmClass::default_mode();
        assert!(b.udh(&OptionalParams::new()).unwrap().is_none());
    }

    #[test]
    fn oversized_sm_length_rejected() {
        let original = body(b"x");
        let mut buf = BytesMut::new();
        original.encode(&mut buf, &OptionalParams::new()).unwrap();
        // corrupt sm_length to 255
        let idx = buf.len() - 2;
        buf[idx] = 0xFF;
        let mut cursor = Cursor::new(&buf[..]);
        assert!(SmBody::decode(&mut cursor).is_err());
    }
}
