// ABOUTME: Validated SMPP address triple of digits, type of number and numbering plan
// ABOUTME: Provides wire encode/decode for the ton/npi/addr field sequences in PDU bodies

use crate::codec::{self, CodecError};
use crate::datatypes::{NumericPlanIndicator, TypeOfNumber};
use bytes::BytesMut;
use std::fmt;
use std::io::Cursor;

/// A validated phone number with its type of number and numbering plan.
///
/// Used for the source and destination addresses of messaging PDUs, which
/// appear on the wire as the three-field sequence `addr_ton`, `addr_npi`,
/// `addr` (C-octet string).
///
/// Numeric addresses carry at most [`PhoneNumber::MAX_DIGITS`] digits;
/// alphanumeric senders carry at most eleven characters.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct PhoneNumber {
    address: String,
    pub ton: TypeOfNumber,
    pub npi: NumericPlanIndicator,
}

/// Address validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must not be empty")]
    Empty,
    #[error("address too long: {actual} characters exceeds maximum of {max}")]
    TooLong { actual: usize, max: usize },
    #[error("invalid character {ch:?} in address")]
    InvalidCharacter { ch: char },
}

impl PhoneNumber {
    /// Maximum number of digits in a numeric address (20 plus NUL = the
    /// 21-octet wire field of submit_sm and deliver_sm)
    pub const MAX_DIGITS: usize = 20;

    /// Maximum characters in an alphanumeric sender address
    pub const MAX_ALPHANUMERIC: usize = 11;

    pub fn new(
        address: impl Into<String>,
        ton: TypeOfNumber,
        npi: NumericPlanIndicator,
    ) -> Result<Self, AddressError> {
        let address = address.into();
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        if ton == TypeOfNumber::Alphanumeric {
            if address.len() > Self::MAX_ALPHANUMERIC {
                return Err(AddressError::TooLong {
                    actual: address.len(),
                    max: Self::MAX_ALPHANUMERIC,
                });
            }
            if let Some(ch) = address.chars().find(|c| !c.is_ascii()) {
                return Err(AddressError::InvalidCharacter { ch });
            }
        } else {
            if address.len() > Self::MAX_DIGITS {
                return Err(AddressError::TooLong {
                    actual: address.len(),
                    max: Self::MAX_DIGITS,
                });
            }
            if let Some(ch) = address.chars().find(|c| !c.is_ascii_digit() && *c != '+') {
                return Err(AddressError::InvalidCharacter { ch });
            }
        }
        Ok(Self { address, ton, npi })
    }

    /// An international ISDN number, the common case
    pub fn international(address: impl Into<String>) -> Result<Self, AddressError> {
        Self::new(
            address,
            TypeOfNumber::International,
            NumericPlanIndicator::Isdn,
        )
    }

    /// An alphanumeric sender id such as "COMPANY"
    pub fn alphanumeric(address: impl Into<String>) -> Result<Self, AddressError> {
        Self::new(
            address,
            TypeOfNumber::Alphanumeric,
            NumericPlanIndicator::Unknown,
        )
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
    }

    /// Decode the ton/npi/addr field sequence. Inbound PDUs may legally
    /// carry an empty address, so no content validation is applied here.
    pub(crate) fn decode(
        buf: &mut Cursor<&[u8]>,
        max_len: usize,
        field: &'static str,
    ) -> Result<Self, CodecError> {
        let ton_raw = codec::get_u8(buf)?;
        let ton = TypeOfNumber::try_from(ton_raw).map_err(|_| CodecError::MalformedPdu {
            reason: format!("{field}: invalid type of number {ton_raw:#04x}"),
            offset: buf.position(),
        })?;
        let npi_raw = codec::get_u8(buf)?;
        let npi = NumericPlanIndicator::try_from(npi_raw).map_err(|_| CodecError::MalformedPdu {
            reason: format!("{field}: invalid numbering plan {npi_raw:#04x}"),
            offset: buf.position(),
        })?;
        let address = codec::get_cstring(buf, max_len, field)?;
        Ok(Self { address, ton, npi })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        use bytes::BufMut;
        buf.put_u8(self.ton.into());
        buf.put_u8(self.npi.into());
        codec::put_cstring(buf, self.address.as_bytes());
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PhoneNumber({:?}, {:?}, {:?})",
            self.address, self.ton, self.npi
        )
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_numbers() {
        let pn = PhoneNumber::international("1234567890").unwrap();
        assert_eq!(pn.address(), "1234567890");
        assert_eq!(pn.ton, TypeOfNumber::International);
        assert_eq!(pn.npi, NumericPlanIndicator::Isdn);

        // 20 digits is the limit
        assert!(PhoneNumber::international("1".repeat(20)).is_ok());
        assert_eq!(
            PhoneNumber::international("1".repeat(21)),
            Err(AddressError::TooLong {
                actual: 21,
                max: 20
            })
        );
    }

    #[test]
    fn rejects_empty_and_nondigits() {
        assert_eq!(
            PhoneNumber::international(""),
            Err(AddressError::Empty)
        );
        assert_eq!(
            PhoneNumber::international("12a4"),
            Err(AddressError::InvalidCharacter { ch: 'a' })
        );
    }

    #[test]
    fn alphanumeric_sender() {
        let pn = PhoneNumber::alphanumeric("COMPANY").unwrap();
        assert_eq!(pn.ton, TypeOfNumber::Alphanumeric);
        assert!(PhoneNumber::alphanumeric("TWELVECHARSX").is_err());
    }

    #[test]
    fn wire_roundtrip() {
        let pn = PhoneNumber::international("447700900123").unwrap();
        let mut buf = BytesMut::new();
        pn.encode(&mut buf);
        // ton + npi + 12 digits + NUL
        assert_eq!(buf.len(), 2 + 12 + 1);

        let mut cursor = Cursor::new(&buf[..]);
        let decoded = PhoneNumber::decode(&mut cursor, 21, "source_addr").unwrap();
        assert_eq!(decoded, pn);
    }

    #[test]
    fn decode_allows_empty_address() {
        let data = [0x00u8, 0x00, 0x00];
        let mut cursor = Cursor::new(&data[..]);
        let decoded = PhoneNumber::decode(&mut cursor, 21, "source_addr").unwrap();
        assert!(decoded.is_empty());
    }
}
