// ABOUTME: Conversion between application strings and DCS-indexed byte encodings
// ABOUTME: Dispatches on data_coding: GSM-7, ASCII, Latin-1, UCS-2BE or passthrough

pub mod gsm7;
pub mod receipt;

pub use receipt::{DeliveryReceipt, ReceiptStatus, ReceiptTimestamp};

use crate::datatypes::DataCoding;
use thiserror::Error;

/// A character that cannot be represented in the selected encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("character {ch:?} at offset {offset} cannot be encoded")]
pub struct EncodeError {
    pub ch: char,
    pub offset: usize,
}

/// Payload bytes that are not valid in the selected encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid payload at offset {offset}: {reason}")]
pub struct DecodeError {
    pub reason: &'static str,
    pub offset: usize,
}

/// Encode `text` for the given data_coding scheme.
///
/// With `lossy` set, unrepresentable characters become `?` (GSM-7, ASCII,
/// Latin-1) or UTF-16 surrogate pairs (UCS-2 beyond the BMP) instead of
/// failing. Binary schemes pass the UTF-8 bytes through untouched.
pub fn encode(text: &str, coding: DataCoding, lossy: bool) -> Result<Vec<u8>, EncodeError> {
    match coding {
        DataCoding::Gsm7 => gsm7::encode(text, lossy),
        DataCoding::Ascii => {
            let mut out = Vec::with_capacity(text.len());
            for (offset, ch) in text.chars().enumerate() {
                if ch.is_ascii() {
                    out.push(ch as u8);
                } else if lossy {
                    out.push(b'?');
                } else {
                    return Err(EncodeError { ch, offset });
                }
            }
            Ok(out)
        }
        DataCoding::Latin1 => {
            let mut out = Vec::with_capacity(text.len());
            for (offset, ch) in text.chars().enumerate() {
                let code = ch as u32;
                if code <= 0xFF {
                    out.push(code as u8);
                } else if lossy {
                    out.push(b'?');
                } else {
                    return Err(EncodeError { ch, offset });
                }
            }
            Ok(out)
        }
        DataCoding::Ucs2 => {
            let mut out = Vec::with_capacity(text.len() * 2);
            for (offset, ch) in text.chars().enumerate() {
                if (ch as u32) > 0xFFFF && !lossy {
                    return Err(EncodeError { ch, offset });
                }
                // BMP characters encode to one unit; beyond-BMP characters
                // become a surrogate pair in the lossy mode
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            Ok(out)
        }
        // opaque octet schemes and unknown values pass through
        _ => Ok(text.as_bytes().to_vec()),
    }
}

/// Decode payload bytes for the given data_coding scheme
pub fn decode(data: &[u8], coding: DataCoding) -> Result<String, DecodeError> {
    match coding {
        DataCoding::Gsm7 => gsm7::decode(data),
        DataCoding::Ascii => data
            .iter()
            .enumerate()
            .map(|(offset, &b)| {
                if b < 0x80 {
                    Ok(b as char)
                } else {
                    Err(DecodeError {
                        reason: "octet above 0x7F in ASCII payload",
                        offset,
                    })
                }
            })
            .collect(),
        DataCoding::Latin1 => Ok(data.iter().map(|&b| b as char).collect()),
        DataCoding::Ucs2 => {
            if data.len() % 2 != 0 {
                return Err(DecodeError {
                    reason: "odd octet count in UCS-2 payload",
                    offset: data.len(),
                });
            }
            let units: Vec<u16> = data
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).map_err(|_| DecodeError {
                reason: "unpaired surrogate in UCS-2 payload",
                offset: 0,
            })
        }
        _ => String::from_utf8(data.to_vec()).map_err(|e| DecodeError {
            reason: "octet payload is not valid UTF-8",
            offset: e.utf8_error().valid_up_to(),
        }),
    }
}
