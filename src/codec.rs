// ABOUTME: SMPP v3.4 PDU codec: header handling, field primitives and frame dispatch
// ABOUTME: Encoding patches command_length last; decoding is bounded by the declared length

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

use crate::datatypes::{
    AlertNotification, BindReceiver, BindReceiverResp, BindTransceiver, BindTransceiverResp,
    BindTransmitter, BindTransmitterResp, CancelSm, CancelSmResp, CommandId, CommandStatus,
    DataSm, DataSmResp, DeliverSm, DeliverSmResp, EnquireLink, EnquireLinkResp, FixedString,
    GenericNack, Outbind, QuerySm, QuerySmResp, ReplaceSm, ReplaceSmResp, SubmitSm, SubmitSmResp,
    Unbind, UnbindResp,
};

/// Default cap on command_length, guarding against memory exhaustion from
/// a hostile or broken peer. Overridable through the session configuration.
pub const DEFAULT_MAX_PDU_SIZE: usize = 256 * 1024;

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame violates the SMPP wire format
    #[error("malformed PDU at offset {offset}: {reason}")]
    MalformedPdu { reason: String, offset: u64 },

    /// command_length exceeds the configured cap
    #[error("frame of {length} octets exceeds the {max} octet limit")]
    FrameTooLarge { length: u32, max: u32 },

    /// A request PDU with a command_id this implementation does not know.
    /// The session answers it with generic_nack(ESME_RINVCMDID).
    #[error("unknown command_id {command_id:#010x} (sequence {sequence_number})")]
    UnknownCommand {
        command_id: u32,
        sequence_number: u32,
    },
}

impl CodecError {
    /// The command_status a generic_nack reply should carry for this error
    pub fn nack_status(&self) -> CommandStatus {
        match self {
            CodecError::FrameTooLarge { .. } => CommandStatus::InvalidCommandLength,
            CodecError::MalformedPdu { offset, .. } if *offset < PduHeader::SIZE as u64 => {
                CommandStatus::InvalidCommandLength
            }
            CodecError::UnknownCommand { .. } => CommandStatus::InvalidCommandId,
            CodecError::MalformedPdu { .. } => CommandStatus::SystemError,
        }
    }
}

/// SMPP v3.4 PDU header (16 octets, common to all PDUs)
#[derive(Debug, Clone, PartialEq)]
pub struct PduHeader {
    pub command_length: u32,
    /// Raw command identifier; known values map through [`CommandId`]
    pub command_id: u32,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::MalformedPdu {
                reason: format!("{} octets is too short for a PDU header", buf.remaining()),
                offset: buf.position(),
            });
        }

        let command_length = buf.get_u32();
        let command_id = buf.get_u32();
        let command_status = CommandStatus::from(buf.get_u32());
        let sequence_number = buf.get_u32();

        if (command_length as usize) < Self::SIZE {
            return Err(CodecError::MalformedPdu {
                reason: format!("command_length {command_length} below header size"),
                offset: 0,
            });
        }

        Ok(PduHeader {
            command_length,
            command_id,
            command_status,
            sequence_number,
        })
    }
}

/// Write a PDU header with a zero command_length placeholder; the caller
/// patches the real length with [`finish_length`] once the body is done.
pub(crate) fn write_header(
    buf: &mut BytesMut,
    command_id: CommandId,
    command_status: CommandStatus,
    sequence_number: u32,
) {
    buf.put_u32(0);
    buf.put_u32(command_id.into());
    buf.put_u32(command_status.into());
    buf.put_u32(sequence_number);
}

/// Patch the command_length of the frame starting at `start`
pub(crate) fn finish_length(buf: &mut BytesMut, start: usize) {
    let length = (buf.len() - start) as u32;
    buf[start..start + 4].copy_from_slice(&length.to_be_bytes());
}

pub(crate) fn get_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if !buf.has_remaining() {
        return Err(CodecError::MalformedPdu {
            reason: "truncated integer field".into(),
            offset: buf.position(),
        });
    }
    Ok(buf.get_u8())
}

/// Read a variable-length C-octet string: content plus terminating NUL,
/// at most `max_len` octets including the NUL. An empty field is a single
/// NUL; a field without a NUL inside the window is malformed.
pub(crate) fn get_cstring(
    buf: &mut Cursor<&[u8]>,
    max_len: usize,
    field: &'static str,
) -> Result<String, CodecError> {
    let start = buf.position() as usize;
    let data: &[u8] = buf.get_ref();
    let window_end = data.len().min(start + max_len);

    let Some(nul) = data[start..window_end].iter().position(|&b| b == 0) else {
        return Err(CodecError::MalformedPdu {
            reason: format!("{field}: no NUL terminator within {max_len} octets"),
            offset: window_end as u64,
        });
    };

    let content = std::str::from_utf8(&data[start..start + nul])
        .map_err(|e| CodecError::MalformedPdu {
            reason: format!("{field}: invalid UTF-8 ({e})"),
            offset: start as u64,
        })?
        .to_string();

    buf.set_position((start + nul + 1) as u64);
    Ok(content)
}

/// Decode a C-octet string straight into a fixed-capacity field type
pub(crate) fn get_fixed_string<const N: usize>(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
) -> Result<FixedString<N>, CodecError> {
    let content = get_cstring(buf, N, field)?;
    FixedString::new(content.as_bytes()).map_err(|e| CodecError::MalformedPdu {
        reason: format!("{field}: {e}"),
        offset: buf.position(),
    })
}

pub(crate) fn get_octets(
    buf: &mut Cursor<&[u8]>,
    len: usize,
    field: &'static str,
) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::MalformedPdu {
            reason: format!("{field}: {len} octets declared, {} available", buf.remaining()),
            offset: buf.position(),
        });
    }
    Ok(buf.copy_to_bytes(len))
}

/// Write a C-octet string: content octets plus the terminating NUL
pub(crate) fn put_cstring(buf: &mut BytesMut, value: &[u8]) {
    buf.put_slice(value);
    buf.put_u8(0);
}

/// Types that can be encoded as a complete PDU frame
pub trait Encodable {
    /// Append the full frame (header and body) to `buf`. Implementations
    /// patch command_length before returning, so the output is final.
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Encode into a fresh buffer and freeze it
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// Types that can be decoded from a PDU body
pub trait Decodable: Sized {
    /// The command_id this PDU type answers to
    fn command_id() -> CommandId;

    /// Decode the body; `buf` covers exactly the octets between the header
    /// and the end of the frame.
    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;
}

/// A decoded SMPP frame: one variant per supported command.
///
/// Large message PDUs are boxed to keep the enum small for the common
/// control-traffic variants.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    BindTransmitter(BindTransmitter),
    BindTransmitterResp(BindTransmitterResp),
    BindReceiver(BindReceiver),
    BindReceiverResp(BindReceiverResp),
    BindTransceiver(BindTransceiver),
    BindTransceiverResp(BindTransceiverResp),
    Unbind(Unbind),
    UnbindResp(UnbindResp),
    SubmitSm(Box<SubmitSm>),
    SubmitSmResp(SubmitSmResp),
    DeliverSm(Box<DeliverSm>),
    DeliverSmResp(DeliverSmResp),
    DataSm(Box<DataSm>),
    DataSmResp(DataSmResp),
    QuerySm(QuerySm),
    QuerySmResp(QuerySmResp),
    ReplaceSm(Box<ReplaceSm>),
    ReplaceSmResp(ReplaceSmResp),
    CancelSm(CancelSm),
    CancelSmResp(CancelSmResp),
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResp),
    GenericNack(GenericNack),
    AlertNotification(AlertNotification),
    Outbind(Outbind),
}

macro_rules! frame_dispatch {
    ($self:expr, $pdu:ident => $action:expr) => {
        match $self {
            Frame::BindTransmitter($pdu) => $action,
            Frame::BindTransmitterResp($pdu) => $action,
            Frame::BindReceiver($pdu) => $action,
            Frame::BindReceiverResp($pdu) => $action,
            Frame::BindTransceiver($pdu) => $action,
            Frame::BindTransceiverResp($pdu) => $action,
            Frame::Unbind($pdu) => $action,
            Frame::UnbindResp($pdu) => $action,
            Frame::SubmitSm($pdu) => $action,
            Frame::SubmitSmResp($pdu) => $action,
            Frame::DeliverSm($pdu) => $action,
            Frame::DeliverSmResp($pdu) => $action,
            Frame::DataSm($pdu) => $action,
            Frame::DataSmResp($pdu) => $action,
            Frame::QuerySm($pdu) => $action,
            Frame::QuerySmResp($pdu) => $action,
            Frame::ReplaceSm($pdu) => $action,
            Frame::ReplaceSmResp($pdu) => $action,
            Frame::CancelSm($pdu) => $action,
            Frame::CancelSmResp($pdu) => $action,
            Frame::EnquireLink($pdu) => $action,
            Frame::EnquireLinkResp($pdu) => $action,
            Frame::GenericNack($pdu) => $action,
            Frame::AlertNotification($pdu) => $action,
            Frame::Outbind($pdu) => $action,
        }
    };
}

impl Frame {
    /// Decode one frame from the front of `src` using the default size cap.
    ///
    /// Returns the frame and the number of octets consumed; trailing bytes
    /// in `src` are untouched.
    pub fn decode(src: &[u8]) -> Result<(Frame, usize), CodecError> {
        Self::decode_with_limit(src, DEFAULT_MAX_PDU_SIZE)
    }

    /// Decode one frame from the front of `src`, rejecting frames whose
    /// command_length exceeds `max_pdu_size`.
    pub fn decode_with_limit(
        src: &[u8],
        max_pdu_size: usize,
    ) -> Result<(Frame, usize), CodecError> {
        let mut cursor = Cursor::new(src);
        let header = PduHeader::decode(&mut cursor)?;
        let total = header.command_length as usize;

        if total > max_pdu_size {
            return Err(CodecError::FrameTooLarge {
                length: header.command_length,
                max: max_pdu_size as u32,
            });
        }
        if src.len() < total {
            return Err(CodecError::MalformedPdu {
                reason: format!(
                    "command_length {total} exceeds the {} octets supplied",
                    src.len()
                ),
                offset: src.len() as u64,
            });
        }

        let body = &src[PduHeader::SIZE..total];
        let mut buf = Cursor::new(body);

        let frame = match CommandId::try_from(header.command_id) {
            Ok(id) => Self::decode_body(id, &header, &mut buf)?,
            // Unknown command with a non-zero status decodes as a
            // generic_nack equivalent: status and sequence preserved, body
            // discarded. With status zero it is a request we cannot answer
            // in kind, surfaced for the session to nack.
            Err(_) if !header.command_status.is_ok() => Frame::GenericNack(GenericNack {
                command_status: header.command_status,
                sequence_number: header.sequence_number,
            }),
            Err(_) => {
                return Err(CodecError::UnknownCommand {
                    command_id: header.command_id,
                    sequence_number: header.sequence_number,
                });
            }
        };

        Ok((frame, total))
    }

    fn decode_body(
        id: CommandId,
        header: &PduHeader,
        buf: &mut Cursor<&[u8]>,
    ) -> Result<Frame, CodecError> {
        let frame = match id {
            CommandId::BindTransmitter => {
                Frame::BindTransmitter(BindTransmitter::decode(header, buf)?)
            }
            CommandId::BindTransmitterResp => {
                Frame::BindTransmitterResp(BindTransmitterResp::decode(header, buf)?)
            }
            CommandId::BindReceiver => Frame::BindReceiver(BindReceiver::decode(header, buf)?),
            CommandId::BindReceiverResp => {
                Frame::BindReceiverResp(BindReceiverResp::decode(header, buf)?)
            }
            CommandId::BindTransceiver => {
                Frame::BindTransceiver(BindTransceiver::decode(header, buf)?)
            }
            CommandId::BindTransceiverResp => {
                Frame::BindTransceiverResp(BindTransceiverResp::decode(header, buf)?)
            }
            CommandId::Unbind => Frame::Unbind(Unbind::decode(header, buf)?),
            CommandId::UnbindResp => Frame::UnbindResp(UnbindResp::decode(header, buf)?),
            CommandId::SubmitSm => Frame::SubmitSm(Box::new(SubmitSm::decode(header, buf)?)),
            CommandId::SubmitSmResp => Frame::SubmitSmResp(SubmitSmResp::decode(header, buf)?),
            CommandId::DeliverSm => Frame::DeliverSm(Box::new(DeliverSm::decode(header, buf)?)),
            CommandId::DeliverSmResp => Frame::DeliverSmResp(DeliverSmResp::decode(header, buf)?),
            CommandId::DataSm => Frame::DataSm(Box::new(DataSm::decode(header, buf)?)),
            CommandId::DataSmResp => Frame::DataSmResp(DataSmResp::decode(header, buf)?),
            CommandId::QuerySm => Frame::QuerySm(QuerySm::decode(header, buf)?),
            CommandId::QuerySmResp => Frame::QuerySmResp(QuerySmResp::decode(header, buf)?),
            CommandId::ReplaceSm => Frame::ReplaceSm(Box::new(ReplaceSm::decode(header, buf)?)),
            CommandId::ReplaceSmResp => Frame::ReplaceSmResp(ReplaceSmResp::decode(header, buf)?),
            CommandId::CancelSm => Frame::CancelSm(CancelSm::decode(header, buf)?),
            CommandId::CancelSmResp => Frame::CancelSmResp(CancelSmResp::decode(header, buf)?),
            CommandId::EnquireLink => Frame::EnquireLink(EnquireLink::decode(header, buf)?),
            CommandId::EnquireLinkResp => {
                Frame::EnquireLinkResp(EnquireLinkResp::decode(header, buf)?)
            }
            CommandId::GenericNack => Frame::GenericNack(GenericNack::decode(header, buf)?),
            CommandId::AlertNotification => {
                Frame::AlertNotification(AlertNotification::decode(header, buf)?)
            }
            CommandId::Outbind => Frame::Outbind(Outbind::decode(header, buf)?),
        };
        Ok(frame)
    }

    pub fn command_id(&self) -> CommandId {
        match self {
            Frame::BindTransmitter(_) => CommandId::BindTransmitter,
            Frame::BindTransmitterResp(_) => CommandId::BindTransmitterResp,
            Frame::BindReceiver(_) => CommandId::BindReceiver,
            Frame::BindReceiverResp(_) => CommandId::BindReceiverResp,
            Frame::BindTransceiver(_) => CommandId::BindTransceiver,
            Frame::BindTransceiverResp(_) => CommandId::BindTransceiverResp,
            Frame::Unbind(_) => CommandId::Unbind,
            Frame::UnbindResp(_) => CommandId::UnbindResp,
            Frame::SubmitSm(_) => CommandId::SubmitSm,
            Frame::SubmitSmResp(_) => CommandId::SubmitSmResp,
            Frame::DeliverSm(_) => CommandId::DeliverSm,
            Frame::DeliverSmResp(_) => CommandId::DeliverSmResp,
            Frame::DataSm(_) => CommandId::DataSm,
            Frame::DataSmResp(_) => CommandId::DataSmResp,
            Frame::QuerySm(_) => CommandId::QuerySm,
            Frame::QuerySmResp(_) => CommandId::QuerySmResp,
            Frame::ReplaceSm(_) => CommandId::ReplaceSm,
            Frame::ReplaceSmResp(_) => CommandId::ReplaceSmResp,
            Frame::CancelSm(_) => CommandId::CancelSm,
            Frame::CancelSmResp(_) => CommandId::CancelSmResp,
            Frame::EnquireLink(_) => CommandId::EnquireLink,
            Frame::EnquireLinkResp(_) => CommandId::EnquireLinkResp,
            Frame::GenericNack(_) => CommandId::GenericNack,
            Frame::AlertNotification(_) => CommandId::AlertNotification,
            Frame::Outbind(_) => CommandId::Outbind,
        }
    }

    pub fn sequence_number(&self) -> u32 {
        frame_dispatch!(self, pdu => pdu.sequence_number)
    }

    /// The command_status of response frames; requests always report Ok
    pub fn command_status(&self) -> CommandStatus {
        match self {
            Frame::BindTransmitterResp(pdu) => pdu.command_status,
            Frame::BindReceiverResp(pdu) => pdu.command_status,
            Frame::BindTransceiverResp(pdu) => pdu.command_status,
            Frame::UnbindResp(pdu) => pdu.command_status,
            Frame::SubmitSmResp(pdu) => pdu.command_status,
            Frame::DeliverSmResp(pdu) => pdu.command_status,
            Frame::DataSmResp(pdu) => pdu.command_status,
            Frame::QuerySmResp(pdu) => pdu.command_status,
            Frame::ReplaceSmResp(pdu) => pdu.command_status,
            Frame::CancelSmResp(pdu) => pdu.command_status,
            Frame::EnquireLinkResp(pdu) => pdu.command_status,
            Frame::GenericNack(pdu) => pdu.command_status,
            _ => CommandStatus::Ok,
        }
    }

    pub fn is_response(&self) -> bool {
        self.command_id().is_response()
    }
}

impl Encodable for Frame {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        frame_dispatch!(self, pdu => pdu.encode(buf))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} seq={}",
            self.command_id(),
            self.sequence_number()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{PhoneNumber, SmBody};

    fn sample_submit() -> Frame {
        Frame::SubmitSm(Box::new(SubmitSm::new(
            7,
            SmBody {
                source: PhoneNumber::international("1234567890").unwrap(),
                destination: PhoneNumber::international("0987654321").unwrap(),
                short_message: bytes::Bytes::from_static(b"Hello"),
                ..Default::default()
            },
        )))
    }

    #[test]
    fn header_decode() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x10, // command_length
            0x00, 0x00, 0x00, 0x15, // command_id (enquire_link)
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x2A, // sequence_number
        ];
        let mut cursor = Cursor::new(data);
        let header = PduHeader::decode(&mut cursor).unwrap();
        assert_eq!(header.command_length, 16);
        assert_eq!(header.command_id, 0x15);
        assert_eq!(header.command_status, CommandStatus::Ok);
        assert_eq!(header.sequence_number, 42);
    }

    #[test]
    fn header_rejects_short_lengths() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x0C, // command_length 12, below header size
            0x00, 0x00, 0x00, 0x15, //
            0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x01, //
        ];
        let mut cursor = Cursor::new(data);
        let err = PduHeader::decode(&mut cursor).unwrap_err();
        assert_eq!(err.nack_status(), CommandStatus::InvalidCommandLength);
    }

    #[test]
    fn frame_roundtrip_consumes_exact_length() {
        let frame = sample_submit();
        let bytes = frame.to_bytes().unwrap();

        // length self-consistency
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_be_bytes());

        let (decoded, consumed) = Frame::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, frame);
    }

    #[test]
    fn frame_independent_of_trailing_garbage() {
        let frame = sample_submit();
        let mut wire = frame.to_bytes().unwrap().to_vec();
        let frame_len = wire.len();
        wire.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x42]);

        let (decoded, consumed) = Frame::decode(&wire).unwrap();
        assert_eq!(consumed, frame_len);
        assert_eq!(decoded, frame);
    }

    #[test]
    fn oversized_frame_rejected() {
        let mut data = vec![0u8; 16];
        data[0..4].copy_from_slice(&(1024u32 * 1024).to_be_bytes());
        data[4..8].copy_from_slice(&0x15u32.to_be_bytes());
        let err = Frame::decode(&data).unwrap_err();
        assert!(matches!(err, CodecError::FrameTooLarge { .. }));
        assert_eq!(err.nack_status(), CommandStatus::InvalidCommandLength);
    }

    #[test]
    fn unknown_request_command_surfaces_for_nack() {
        let mut data = vec![0u8; 16];
        data[0..4].copy_from_slice(&16u32.to_be_bytes());
        data[4..8].copy_from_slice(&0x0000_00EEu32.to_be_bytes());
        data[12..16].copy_from_slice(&9u32.to_be_bytes());

        match Frame::decode(&data).unwrap_err() {
            CodecError::UnknownCommand {
                command_id,
                sequence_number,
            } => {
                assert_eq!(command_id, 0xEE);
                assert_eq!(sequence_number, 9);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_response_command_decodes_as_nack_equivalent() {
        let mut data = vec![0u8; 20];
        data[0..4].copy_from_slice(&20u32.to_be_bytes());
        data[4..8].copy_from_slice(&0x8000_00EEu32.to_be_bytes());
        data[8..12].copy_from_slice(&0x08u32.to_be_bytes()); // ESME_RSYSERR
        data[12..16].copy_from_slice(&9u32.to_be_bytes());
        // body octets are discarded
        data[16..20].copy_from_slice(&[1, 2, 3, 4]);

        let (frame, consumed) = Frame::decode(&data).unwrap();
        assert_eq!(consumed, 20);
        match frame {
            Frame::GenericNack(nack) => {
                assert_eq!(nack.command_status, CommandStatus::SystemError);
                assert_eq!(nack.sequence_number, 9);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn truncated_frame_is_malformed() {
        let frame = sample_submit();
        let bytes = frame.to_bytes().unwrap();
        let err = Frame::decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPdu { .. }));
    }

    #[test]
    fn cstring_helpers() {
        let data = b"hello\0world\0";
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(get_cstring(&mut cursor, 16, "a").unwrap(), "hello");
        assert_eq!(cursor.position(), 6);
        assert_eq!(get_cstring(&mut cursor, 16, "b").unwrap(), "world");

        // empty field is a single NUL
        let data = b"\0";
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(get_cstring(&mut cursor, 16, "c").unwrap(), "");

        // missing terminator within the window
        let data = b"toolongfield";
        let mut cursor = Cursor::new(&data[..]);
        assert!(get_cstring(&mut cursor, 6, "d").is_err());

        let mut buf = BytesMut::new();
        put_cstring(&mut buf, b"abc");
        assert_eq!(buf.as_ref(), b"abc\0");
    }

    #[test]
    fn frame_accessors() {
        let frame = Frame::EnquireLink(EnquireLink::new(42));
        assert_eq!(frame.command_id(), CommandId::EnquireLink);
        assert_eq!(frame.sequence_number(), 42);
        assert!(!frame.is_response());
        assert_eq!(frame.to_string(), "EnquireLink seq=42");

        let frame = Frame::SubmitSmResp(SubmitSmResp::error(
            43,
            CommandStatus::ThrottlingError,
        ));
        assert!(frame.is_response());
        assert_eq!(frame.command_status(), CommandStatus::ThrottlingError);
    }
}
