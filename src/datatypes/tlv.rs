// ABOUTME: SMPP optional parameter (TLV) encoding with a data-driven tag table
// ABOUTME: Provides an insertion-ordered parameter collection carried at PDU tails

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

use crate::codec::CodecError;

/// Standard TLV tag constants per SMPP v3.4 specification, Section 5.3.2
pub mod tags {
    pub const DEST_ADDR_SUBUNIT: u16 = 0x0005;
    pub const SOURCE_ADDR_SUBUNIT: u16 = 0x000D;
    pub const SC_INTERFACE_VERSION: u16 = 0x0010;
    pub const QOS_TIME_TO_LIVE: u16 = 0x0017;
    pub const PAYLOAD_TYPE: u16 = 0x0019;
    pub const ADDITIONAL_STATUS_INFO_TEXT: u16 = 0x001D;
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const PRIVACY_INDICATOR: u16 = 0x0201;
    pub const SOURCE_SUBADDRESS: u16 = 0x0202;
    pub const DEST_SUBADDRESS: u16 = 0x0203;
    pub const USER_MESSAGE_REFERENCE: u16 = 0x0204;
    pub const USER_RESPONSE_CODE: u16 = 0x0205;
    pub const SOURCE_PORT: u16 = 0x020A;
    pub const DESTINATION_PORT: u16 = 0x020C;
    pub const SAR_MSG_REF_NUM: u16 = 0x020E;
    pub const SAR_TOTAL_SEGMENTS: u16 = 0x020F;
    pub const SAR_SEGMENT_SEQNUM: u16 = 0x0210;
    pub const MESSAGE_STATE: u16 = 0x0427;
    pub const NETWORK_ERROR_CODE: u16 = 0x0423;
    pub const MESSAGE_PAYLOAD: u16 = 0x0424;
    pub const DELIVERY_FAILURE_REASON: u16 = 0x0425;
    pub const MORE_MESSAGES_TO_SEND: u16 = 0x0426;
    pub const DPF_RESULT: u16 = 0x0420;
    pub const SET_DPF: u16 = 0x0421;
    pub const MS_AVAILABILITY_STATUS: u16 = 0x0422;
    pub const CALLBACK_NUM: u16 = 0x0381;
    pub const USSD_SERVICE_OP: u16 = 0x0501;
    pub const DISPLAY_TIME: u16 = 0x1201;
    pub const SMS_SIGNAL: u16 = 0x1203;
    pub const MS_VALIDITY: u16 = 0x1204;
    pub const ALERT_ON_MESSAGE_DELIVERY: u16 = 0x130C;
    pub const ITS_REPLY_TYPE: u16 = 0x1380;
    pub const ITS_SESSION_INFO: u16 = 0x1383;
}

/// Semantic value kind of a known optional parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlvKind {
    U8,
    U16,
    U32,
    CString,
    Octets,
}

/// Known-tag table: (tag, name, kind). Tags not listed here are carried as
/// opaque octets and round-trip unchanged.
pub const KNOWN_TAGS: &[(u16, &str, TlvKind)] = &[
    (tags::DEST_ADDR_SUBUNIT, "dest_addr_subunit", TlvKind::U8),
    (tags::SOURCE_ADDR_SUBUNIT, "source_addr_subunit", TlvKind::U8),
    (tags::SC_INTERFACE_VERSION, "sc_interface_version", TlvKind::U8),
    (tags::QOS_TIME_TO_LIVE, "qos_time_to_live", TlvKind::U32),
    (tags::PAYLOAD_TYPE, "payload_type", TlvKind::U8),
    (
        tags::ADDITIONAL_STATUS_INFO_TEXT,
        "additional_status_info_text",
        TlvKind::CString,
    ),
    (tags::RECEIPTED_MESSAGE_ID, "receipted_message_id", TlvKind::CString),
    (tags::PRIVACY_INDICATOR, "privacy_indicator", TlvKind::U8),
    (tags::SOURCE_SUBADDRESS, "source_subaddress", TlvKind::Octets),
    (tags::DEST_SUBADDRESS, "dest_subaddress", TlvKind::Octets),
    (tags::USER_MESSAGE_REFERENCE, "user_message_reference", TlvKind::U16),
    (tags::USER_RESPONSE_CODE, "user_response_code", TlvKind::U8),
    (tags::SOURCE_PORT, "source_port", TlvKind::U16),
    (tags::DESTINATION_PORT, "destination_port", TlvKind::U16),
    (tags::SAR_MSG_REF_NUM, "sar_msg_ref_num", TlvKind::U16),
    (tags::SAR_TOTAL_SEGMENTS, "sar_total_segments", TlvKind::U8),
    (tags::SAR_SEGMENT_SEQNUM, "sar_segment_seqnum", TlvKind::U8),
    (tags::MESSAGE_STATE, "message_state", TlvKind::U8),
    (tags::NETWORK_ERROR_CODE, "network_error_code", TlvKind::Octets),
    (tags::MESSAGE_PAYLOAD, "message_payload", TlvKind::Octets),
    (
        tags::DELIVERY_FAILURE_REASON,
        "delivery_failure_reason",
        TlvKind::U8,
    ),
    (tags::MORE_MESSAGES_TO_SEND, "more_messages_to_send", TlvKind::U8),
    (tags::DPF_RESULT, "dpf_result", TlvKind::U8),
    (tags::SET_DPF, "set_dpf", TlvKind::U8),
    (
        tags::MS_AVAILABILITY_STATUS,
        "ms_availability_status",
        TlvKind::U8,
    ),
    (tags::CALLBACK_NUM, "callback_num", TlvKind::Octets),
    (tags::USSD_SERVICE_OP, "ussd_service_op", TlvKind::U8),
    (tags::DISPLAY_TIME, "display_time", TlvKind::U8),
    (tags::SMS_SIGNAL, "sms_signal", TlvKind::U16),
    (tags::MS_VALIDITY, "ms_validity", TlvKind::U8),
    (
        tags::ALERT_ON_MESSAGE_DELIVERY,
        "alert_on_message_delivery",
        TlvKind::Octets,
    ),
    (tags::ITS_REPLY_TYPE, "its_reply_type", TlvKind::U8),
    (tags::ITS_SESSION_INFO, "its_session_info", TlvKind::Octets),
];

/// Look up the name and value kind of a known tag
pub fn tag_info(tag: u16) -> Option<(&'static str, TlvKind)> {
    KNOWN_TAGS
        .iter()
        .find(|(t, _, _)| *t == tag)
        .map(|(_, name, kind)| (*name, *kind))
}

/// A single optional parameter: 2-octet tag, 2-octet length, value octets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tlv {
    pub tag: u16,
    pub value: Bytes,
}

impl Tlv {
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn from_u8(tag: u16, value: u8) -> Self {
        Self::new(tag, Bytes::copy_from_slice(&[value]))
    }

    pub fn from_u16(tag: u16, value: u16) -> Self {
        Self::new(tag, Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    pub fn from_u32(tag: u16, value: u32) -> Self {
        Self::new(tag, Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    /// A C-octet string value: content plus terminating NUL
    pub fn from_cstring(tag: u16, value: &str) -> Self {
        let mut bytes = Vec::with_capacity(value.len() + 1);
        bytes.extend_from_slice(value.as_bytes());
        bytes.push(0);
        Self::new(tag, bytes)
    }

    pub fn as_u8(&self) -> Option<u8> {
        (self.value.len() == 1).then(|| self.value[0])
    }

    pub fn as_u16(&self) -> Option<u16> {
        (self.value.len() == 2).then(|| u16::from_be_bytes([self.value[0], self.value[1]]))
    }

    pub fn as_u32(&self) -> Option<u32> {
        (self.value.len() == 4).then(|| {
            u32::from_be_bytes([self.value[0], self.value[1], self.value[2], self.value[3]])
        })
    }

    /// Value interpreted as a NUL-terminated string (terminator optional,
    /// vendors differ)
    pub fn as_cstring(&self) -> Option<String> {
        let end = self
            .value
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.value.len());
        String::from_utf8(self.value[..end].to_vec()).ok()
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.tag);
        buf.put_u16(self.value.len() as u16);
        buf.extend_from_slice(&self.value);
    }

    pub fn encoded_size(&self) -> usize {
        4 + self.value.len()
    }

    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < 4 {
            return Err(CodecError::MalformedPdu {
                reason: "truncated TLV header".into(),
                offset: buf.position(),
            });
        }
        let tag = buf.get_u16();
        let length = buf.get_u16() as usize;
        if buf.remaining() < length {
            return Err(CodecError::MalformedPdu {
                reason: format!("TLV {tag:#06x} declares {length} octets beyond PDU end"),
                offset: buf.position(),
            });
        }
        let value = buf.copy_to_bytes(length);
        Ok(Self { tag, value })
    }
}

/// The optional parameters of a PDU, in user-insertion order.
///
/// Encoders emit parameters in the order they were inserted; decoders never
/// rely on ordering. `set` on an existing tag replaces the value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionalParams {
    items: Vec<Tlv>,
}

impl OptionalParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Insert or replace a parameter. A replaced parameter keeps its
    /// original position.
    pub fn set(&mut self, tlv: Tlv) {
        match self.items.iter_mut().find(|t| t.tag == tlv.tag) {
            Some(existing) => *existing = tlv,
            None => self.items.push(tlv),
        }
    }

    pub fn get(&self, tag: u16) -> Option<&Tlv> {
        self.items.iter().find(|t| t.tag == tag)
    }

    pub fn contains(&self, tag: u16) -> bool {
        self.get(tag).is_some()
    }

    pub fn remove(&mut self, tag: u16) -> Option<Tlv> {
        let index = self.items.iter().position(|t| t.tag == tag)?;
        Some(self.items.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tlv> {
        self.items.iter()
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        for tlv in &self.items {
            tlv.encode(buf);
        }
    }

    pub fn encoded_size(&self) -> usize {
        self.items.iter().map(Tlv::encoded_size).sum()
    }

    /// Consume all remaining bytes of a PDU body as TLVs
    pub fn decode_all(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let mut params = Self::new();
        while buf.has_remaining() {
            let tlv = Tlv::decode(buf)?;
            if tag_info(tlv.tag).is_none() {
                tracing::trace!(tag = tlv.tag, "unknown TLV tag");
            }
            params.items.push(tlv);
        }
        Ok(params)
    }
}

impl FromIterator<Tlv> for OptionalParams {
    fn from_iter<I: IntoIterator<Item = Tlv>>(iter: I) -> Self {
        let mut params = Self::new();
        for tlv in iter {
            params.set(tlv);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tlv_wire_format() {
        let tlv = Tlv::new(0x0010, Bytes::from_static(&[0x34]));
        let mut buf = BytesMut::new();
        tlv.encode(&mut buf);
        assert_eq!(buf.as_ref(), &[0x00, 0x10, 0x00, 0x01, 0x34]);
        assert_eq!(tlv.encoded_size(), 5);
    }

    #[test]
    fn tlv_decode_roundtrip() {
        let original = Tlv::from_u16(tags::SOURCE_PORT, 8080);
        let mut buf = BytesMut::new();
        original.encode(&mut buf);

        let mut cursor = Cursor::new(&buf[..]);
        let decoded = Tlv::decode(&mut cursor).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.as_u16(), Some(8080));
    }

    #[test]
    fn tlv_decode_rejects_overrun() {
        // declares 4 octets of value, supplies 2
        let data = [0x04u8, 0x24, 0x00, 0x04, 0xAA, 0xBB];
        let mut cursor = Cursor::new(&data[..]);
        assert!(Tlv::decode(&mut cursor).is_err());
    }

    #[test]
    fn params_preserve_insertion_order() {
        let mut params = OptionalParams::new();
        params.set(Tlv::from_u16(tags::USER_MESSAGE_REFERENCE, 1));
        params.set(Tlv::from_u16(tags::SOURCE_PORT, 80));
        params.set(Tlv::from_u16(tags::USER_MESSAGE_REFERENCE, 2));

        let tags_seen: Vec<u16> = params.iter().map(|t| t.tag).collect();
        assert_eq!(
            tags_seen,
            vec![tags::USER_MESSAGE_REFERENCE, tags::SOURCE_PORT]
        );
        assert_eq!(
            params.get(tags::USER_MESSAGE_REFERENCE).unwrap().as_u16(),
            Some(2)
        );
    }

    #[test]
    fn unknown_tags_roundtrip() {
        let mut params = OptionalParams::new();
        params.set(Tlv::new(0x1503, Bytes::from_static(&[1, 2, 3])));

        let mut buf = BytesMut::new();
        params.encode(&mut buf);

        let mut cursor = Cursor::new(&buf[..]);
        let decoded = OptionalParams::decode_all(&mut cursor).unwrap();
        assert_eq!(decoded, params);
    }

    #[test]
    fn cstring_values() {
        let tlv = Tlv::from_cstring(tags::RECEIPTED_MESSAGE_ID, "abc123");
        assert_eq!(tlv.value.as_ref(), b"abc123\0");
        assert_eq!(tlv.as_cstring().as_deref(), Some("abc123"));

        // a vendor TLV without the terminator still reads back
        let bare = Tlv::new(tags::RECEIPTED_MESSAGE_ID, Bytes::from_static(b"abc123"));
        assert_eq!(bare.as_cstring().as_deref(), Some("abc123"));
    }

    #[test]
    fn tag_table_lookup() {
        assert_eq!(
            tag_info(tags::MESSAGE_PAYLOAD),
            Some(("message_payload", TlvKind::Octets))
        );
        assert_eq!(tag_info(0x1503), None);
    }
}
