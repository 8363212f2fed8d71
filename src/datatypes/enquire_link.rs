use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_complete_header_only_pdu;

/// enquire_link PDU (Section 4.11.1), the link keepalive probe.
///
/// Either peer may send it at any time; the other side answers with
/// enquire_link_resp carrying the same sequence number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnquireLink {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

/// enquire_link_resp PDU (Section 4.11.2)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnquireLinkResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(EnquireLink, CommandId::EnquireLink);
impl_complete_header_only_pdu!(EnquireLinkResp, CommandId::EnquireLinkResp);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Decodable, Encodable, PduHeader};
    use std::io::Cursor;

    #[test]
    fn roundtrip() {
        let original = EnquireLink::new(42);
        let bytes = original.to_bytes().unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &16u32.to_be_bytes());

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = EnquireLink::decode(&header, &mut cursor).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn body_bytes_rejected() {
        let mut bytes = EnquireLink::new(7).to_bytes().unwrap().to_vec();
        bytes.push(0xAA);
        bytes[3] = 17; // fix up command_length
        let mut cursor = Cursor::new(&bytes[..]);
        let header = PduHeader::decode(&mut cursor).unwrap();
        assert!(EnquireLink::decode(&header, &mut cursor).is_err());
    }
}
