// ABOUTME: User Data Header parsing for payloads whose esm_class carries UDHI
// ABOUTME: Exposes concatenation information elements used for multipart SMS

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::CodecError;

/// A parsed User Data Header.
///
/// When `esm_class` carries the UDHI flag, the short message (or
/// `message_payload` TLV) begins with a length-prefixed header of
/// information elements; the remainder is the user data. The codec only
/// splits and exposes the elements, it does not reassemble multipart
/// messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Udh {
    pub elements: Vec<InformationElement>,
}

/// A single information element: identifier octet plus data octets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InformationElement {
    pub id: u8,
    pub data: Bytes,
}

/// Concatenation parameters from an 8-bit (IE 0x00) or 16-bit (IE 0x08)
/// concatenation element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConcatInfo {
    pub reference: u16,
    pub total: u8,
    pub sequence: u8,
}

impl InformationElement {
    /// 8-bit reference concatenated short message
    pub const CONCAT_8BIT: u8 = 0x00;
    /// 16-bit reference concatenated short message
    pub const CONCAT_16BIT: u8 = 0x08;
    /// Application port addressing, 16-bit
    pub const PORT_16BIT: u8 = 0x05;
}

impl Udh {
    /// Split a UDHI-flagged payload into its header and user data.
    ///
    /// The first octet is the header length (excluding itself); the header
    /// must fit inside the payload and every element inside the header.
    pub fn split(payload: &[u8]) -> Result<(Udh, Bytes), CodecError> {
        let malformed = |reason: &str, offset: usize| CodecError::MalformedPdu {
            reason: format!("user data header: {reason}"),
            offset: offset as u64,
        };

        let Some((&udhl, rest)) = payload.split_first() else {
            return Err(malformed("empty payload", 0));
        };
        let udhl = udhl as usize;
        if rest.len() < udhl {
            return Err(malformed("declared length exceeds payload", 0));
        }

        let mut elements = Vec::new();
        let mut header = &rest[..udhl];
        let mut offset = 1usize;
        while !header.is_empty() {
            if header.len() < 2 {
                return Err(malformed("truncated information element", offset));
            }
            let id = header[0];
            let len = header[1] as usize;
            if header.len() < 2 + len {
                return Err(malformed("information element data overrun", offset));
            }
            elements.push(InformationElement {
                id,
                data: Bytes::copy_from_slice(&header[2..2 + len]),
            });
            offset += 2 + len;
            header = &header[2 + len..];
        }

        let user_data = Bytes::copy_from_slice(&rest[udhl..]);
        Ok((Udh { elements }, user_data))
    }

    /// Serialized length including the leading UDHL octet
    pub fn encoded_len(&self) -> usize {
        1 + self
            .elements
            .iter()
            .map(|ie| 2 + ie.data.len())
            .sum::<usize>()
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8((self.encoded_len() - 1) as u8);
        for ie in &self.elements {
            buf.put_u8(ie.id);
            buf.put_u8(ie.data.len() as u8);
            buf.extend_from_slice(&ie.data);
        }
    }

    fn element(&self, id: u8) -> Option<&InformationElement> {
        self.elements.iter().find(|ie| ie.id == id)
    }

    /// Concatenation info from an 8-bit or 16-bit concatenation element,
    /// whichever is present
    pub fn concat(&self) -> Option<ConcatInfo> {
        if let Some(ie) = self.element(InformationElement::CONCAT_8BIT) {
            if ie.data.len() == 3 {
                return Some(ConcatInfo {
                    reference: ie.data[0] as u16,
                    total: ie.data[1],
                    sequence: ie.data[2],
                });
            }
        }
        if let Some(ie) = self.element(InformationElement::CONCAT_16BIT) {
            if ie.data.len() == 4 {
                return Some(ConcatInfo {
                    reference: u16::from_be_bytes([ie.data[0], ie.data[1]]),
                    total: ie.data[2],
                    sequence: ie.data[3],
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_concat_8bit() {
        // UDHL=5, IE 0x00 len 3: ref 0x42, 3 parts, part 2; then "Hi"
        let payload = [0x05u8, 0x00, 0x03, 0x42, 0x03, 0x02, b'H', b'i'];
        let (udh, data) = Udh::split(&payload).unwrap();

        assert_eq!(udh.elements.len(), 1);
        assert_eq!(data.as_ref(), b"Hi");
        assert_eq!(
            udh.concat(),
            Some(ConcatInfo {
                reference: 0x42,
                total: 3,
                sequence: 2
            })
        );
    }

    #[test]
    fn split_concat_16bit() {
        let payload = [0x06u8, 0x08, 0x04, 0x01, 0x02, 0x05, 0x01, b'X'];
        let (udh, data) = Udh::split(&payload).unwrap();
        assert_eq!(data.as_ref(), b"X");
        assert_eq!(
            udh.concat(),
            Some(ConcatInfo {
                reference: 0x0102,
                total: 5,
                sequence: 1
            })
        );
    }

    #[test]
    fn encode_roundtrip() {
        let udh = Udh {
            elements: vec![InformationElement {
                id: InformationElement::CONCAT_8BIT,
                data: Bytes::from_static(&[0x10, 0x02, 0x01]),
            }],
        };
        let mut buf = BytesMut::new();
        udh.encode(&mut buf);
        buf.extend_from_slice(b"payload");

        let (decoded, data) = Udh::split(&buf).unwrap();
        assert_eq!(decoded, udh);
        assert_eq!(data.as_ref(), b"payload");
        assert_eq!(udh.encoded_len(), 6);
    }

    #[test]
    fn rejects_overruns() {
        // UDHL claims 9 octets but only 2 follow
        assert!(Udh::split(&[0x09, 0x00, 0x03]).is_err());
        // element data longer than header
        assert!(Udh::split(&[0x03, 0x00, 0x07, 0x01]).is_err());
        assert!(Udh::split(&[]).is_err());
    }

    #[test]
    fn no_concat_element() {
        let payload = [0x04u8, 0x05, 0x02, 0x0B, 0x84, b'd'];
        let (udh, _) = Udh::split(&payload).unwrap();
        assert_eq!(udh.concat(), None);
        assert!(udh.element(InformationElement::PORT_16BIT).is_some());
    }
}
