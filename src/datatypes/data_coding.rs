// ABOUTME: SMPP data_coding scheme classification with bijective byte mapping
// ABOUTME: Selects the text codec used for short_message and message_payload content

use std::fmt;

/// SMPP v3.4 data_coding field (Section 5.2.19)
///
/// Identifies the encoding of the short message payload. Values without a
/// named variant round-trip through [`DataCoding::Other`] so inbound PDUs
/// with vendor or reserved schemes are preserved byte for byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataCoding {
    /// SMSC default alphabet (GSM 03.38 7-bit)
    #[default]
    Gsm7,
    /// IA5 (CCITT T.50) / ASCII
    Ascii,
    /// Octet, unspecified (8-bit binary), value 2
    OctetUnspecified,
    /// Latin-1 (ISO-8859-1)
    Latin1,
    /// Octet, unspecified (8-bit binary), value 4
    Binary,
    /// UCS-2 (ISO/IEC-10646), big endian
    Ucs2,
    /// Any other data_coding value, preserved verbatim
    Other(u8),
}

impl DataCoding {
    pub fn from_byte(value: u8) -> Self {
        match value {
            0x00 => DataCoding::Gsm7,
            0x01 => DataCoding::Ascii,
            0x02 => DataCoding::OctetUnspecified,
            0x03 => DataCoding::Latin1,
            0x04 => DataCoding::Binary,
            0x08 => DataCoding::Ucs2,
            other => DataCoding::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            DataCoding::Gsm7 => 0x00,
            DataCoding::Ascii => 0x01,
            DataCoding::OctetUnspecified => 0x02,
            DataCoding::Latin1 => 0x03,
            DataCoding::Binary => 0x04,
            DataCoding::Ucs2 => 0x08,
            DataCoding::Other(value) => value,
        }
    }

    /// True when the payload is opaque octets rather than encoded text
    pub fn is_binary(self) -> bool {
        matches!(self, DataCoding::OctetUnspecified | DataCoding::Binary)
    }

    /// True when the payload is 16-bit UCS-2
    pub fn is_ucs2(self) -> bool {
        matches!(self, DataCoding::Ucs2)
    }
}

impl fmt::Debug for DataCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataCoding::Gsm7 => write!(f, "Gsm7"),
            DataCoding::Ascii => write!(f, "Ascii"),
            DataCoding::OctetUnspecified => write!(f, "OctetUnspecified"),
            DataCoding::Latin1 => write!(f, "Latin1"),
            DataCoding::Binary => write!(f, "Binary"),
            DataCoding::Ucs2 => write!(f, "Ucs2"),
            DataCoding::Other(value) => write!(f, "Other({value:#04x})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_mapping_is_bijective() {
        for value in 0u8..=255 {
            assert_eq!(DataCoding::from_byte(value).to_byte(), value);
        }
    }

    #[test]
    fn classification() {
        assert!(DataCoding::OctetUnspecified.is_binary());
        assert!(DataCoding::Binary.is_binary());
        assert!(!DataCoding::Gsm7.is_binary());
        assert!(DataCoding::Ucs2.is_ucs2());
    }

    #[test]
    fn unknown_values_preserved() {
        assert_eq!(DataCoding::from_byte(0xF3), DataCoding::Other(0xF3));
    }
}
