// ABOUTME: Framed TCP transport for one SMPP session
// ABOUTME: Accumulates reads in a BytesMut buffer and resyncs past undecodable frames

use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

use crate::codec::{CodecError, Frame, PduHeader};

/// One frame's worth of input from the peer.
///
/// A frame that arrived complete but could not be decoded is surfaced as
/// [`Inbound::Bad`] with the raw bytes and the sequence number when one
/// could be recovered, so the session can reply with a generic_nack and
/// keep the connection alive.
#[derive(Debug)]
pub enum Inbound {
    Frame { frame: Frame, bytes: Bytes },
    Bad {
        error: CodecError,
        sequence_number: u32,
        bytes: Bytes,
    },
}

/// The TCP transport of a session: a buffered writer over the socket and
/// a read buffer from which complete frames are sliced.
///
/// Reading is cancel safe: a partially received frame stays in the buffer
/// and the next call resumes where the previous one left off.
#[derive(Debug)]
pub struct Connection {
    stream: BufWriter<TcpStream>,
    buffer: BytesMut,
    max_pdu_size: usize,
    /// Remaining octets of an oversized frame still to be swallowed
    discard: usize,
}

impl Connection {
    pub fn new(socket: TcpStream, max_pdu_size: usize) -> Connection {
        Connection {
            stream: BufWriter::new(socket),
            buffer: BytesMut::with_capacity(4 * 1024),
            max_pdu_size,
            discard: 0,
        }
    }

    /// Read the next frame from the stream.
    ///
    /// Returns `Ok(None)` on a clean end of stream. A peer that closes
    /// mid-frame is a transport error, as is framing so broken that no
    /// resynchronization point exists.
    pub async fn read_frame(&mut self) -> std::io::Result<Option<Inbound>> {
        loop {
            if let Some(inbound) = self.parse_frame()? {
                return Ok(Some(inbound));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() && self.discard == 0 {
                    return Ok(None);
                }
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection reset by peer mid-frame",
                ));
            }
        }
    }

    /// Try to slice one frame out of the read buffer. `Ok(None)` means
    /// more data is needed.
    fn parse_frame(&mut self) -> std::io::Result<Option<Inbound>> {
        // finish swallowing an oversized frame first
        if self.discard > 0 {
            let take = self.discard.min(self.buffer.len());
            self.buffer.advance(take);
            self.discard -= take;
            if self.discard > 0 {
                return Ok(None);
            }
        }

        if self.buffer.len() < 4 {
            return Ok(None);
        }

        let declared =
            u32::from_be_bytes([self.buffer[0], self.buffer[1], self.buffer[2], self.buffer[3]])
                as usize;

        if declared < 4 {
            // the length field cannot even cover itself; there is no way
            // to find the next frame boundary
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unrecoverable framing: command_length {declared}"),
            ));
        }

        if declared > self.max_pdu_size {
            // keep whatever prefix we have for diagnostics, swallow the rest
            let have = self.buffer.len().min(declared);
            let sequence_number = self.peek_sequence_number();
            let bytes = self.buffer.split_to(have.min(PduHeader::SIZE)).freeze();
            let consumed = bytes.len();
            let remaining_buffered = have - consumed;
            self.buffer.advance(remaining_buffered);
            self.discard = declared - have;
            return Ok(Some(Inbound::Bad {
                error: CodecError::FrameTooLarge {
                    length: declared as u32,
                    max: self.max_pdu_size as u32,
                },
                sequence_number,
                bytes,
            }));
        }

        if declared < PduHeader::SIZE {
            // runt frame, e.g. command_length 12; consumable but invalid
            if self.buffer.len() < declared {
                return Ok(None);
            }
            let bytes = self.buffer.split_to(declared).freeze();
            return Ok(Some(Inbound::Bad {
                error: CodecError::MalformedPdu {
                    reason: format!("command_length {declared} below header size"),
                    offset: 0,
                },
                sequence_number: 0,
                bytes,
            }));
        }

        if self.buffer.len() < declared {
            return Ok(None);
        }

        let sequence_number = self.peek_sequence_number();
        let bytes = self.buffer.split_to(declared).freeze();
        match Frame::decode_with_limit(&bytes, self.max_pdu_size) {
            Ok((frame, consumed)) => {
                debug_assert_eq!(consumed, bytes.len());
                Ok(Some(Inbound::Frame { frame, bytes }))
            }
            Err(error) => Ok(Some(Inbound::Bad {
                error,
                sequence_number,
                bytes,
            })),
        }
    }

    /// The sequence number field of the frame at the front of the buffer,
    /// or 0 when too little of the header has arrived
    fn peek_sequence_number(&self) -> u32 {
        if self.buffer.len() >= PduHeader::SIZE {
            u32::from_be_bytes([
                self.buffer[12],
                self.buffer[13],
                self.buffer[14],
                self.buffer[15],
            ])
        } else {
            0
        }
    }

    /// Write pre-encoded frame bytes and flush them to the socket
    pub async fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Encodable;
    use crate::datatypes::EnquireLink;
    use tokio::net::TcpListener;

    async fn pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        (client, server)
    }

    #[tokio::test]
    async fn frame_roundtrip_over_socket() {
        let (client, server) = pair().await;
        let mut client = Connection::new(client, crate::codec::DEFAULT_MAX_PDU_SIZE);
        let mut server = Connection::new(server, crate::codec::DEFAULT_MAX_PDU_SIZE);

        let frame = Frame::EnquireLink(EnquireLink::new(5));
        client.write_bytes(&frame.to_bytes().unwrap()).await.unwrap();

        match server.read_frame().await.unwrap().unwrap() {
            Inbound::Frame { frame: got, bytes } => {
                assert_eq!(got, frame);
                assert_eq!(bytes.len(), 16);
            }
            other => panic!("unexpected inbound: {other:?}"),
        }
    }

    #[tokio::test]
    async fn split_writes_reassemble() {
        let (client, server) = pair().await;
        let mut server = Connection::new(server, crate::codec::DEFAULT_MAX_PDU_SIZE);

        let frame = Frame::EnquireLink(EnquireLink::new(6));
        let bytes = frame.to_bytes().unwrap();
        let (mut client, half) = {
            let mut stream = client;
            stream.write_all(&bytes[..7]).await.unwrap();
            stream.flush().await.unwrap();
            (stream, 7)
        };

        // give the reader the partial frame, then the rest
        let read = tokio::spawn(async move { server.read_frame().await });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        client.write_all(&bytes[half..]).await.unwrap();
        client.flush().await.unwrap();

        match read.await.unwrap().unwrap().unwrap() {
            Inbound::Frame { frame: got, .. } => assert_eq!(got, frame),
            other => panic!("unexpected inbound: {other:?}"),
        }
    }

    #[tokio::test]
    async fn runt_frame_surfaces_as_bad() {
        let (mut client, server) = pair().await;
        let mut server = Connection::new(server, crate::codec::DEFAULT_MAX_PDU_SIZE);

        // 12-octet frame: command_length 12
        let runt: &[u8] = &[
            0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x00,
        ];
        client.write_all(runt).await.unwrap();
        client.flush().await.unwrap();

        match server.read_frame().await.unwrap().unwrap() {
            Inbound::Bad {
                error,
                sequence_number,
                bytes,
            } => {
                assert_eq!(
                    error.nack_status(),
                    crate::datatypes::CommandStatus::InvalidCommandLength
                );
                assert_eq!(sequence_number, 0);
                assert_eq!(bytes.len(), 12);
            }
            other => panic!("unexpected inbound: {other:?}"),
        }

        // the connection survives: a valid frame parses next
        let frame = Frame::EnquireLink(EnquireLink::new(7));
        client
            .write_all(&frame.to_bytes().unwrap())
            .await
            .unwrap();
        client.flush().await.unwrap();
        match server.read_frame().await.unwrap().unwrap() {
            Inbound::Frame { frame: got, .. } => assert_eq!(got, frame),
            other => panic!("unexpected inbound: {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_frame_swallowed_and_resyncs() {
        let (mut client, server) = pair().await;
        let mut server = Connection::new(server, 64);

        // declare a 200-octet frame against a 64-octet cap
        let mut huge = vec![0u8; 200];
        huge[0..4].copy_from_slice(&200u32.to_be_bytes());
        huge[4..8].copy_from_slice(&0x15u32.to_be_bytes());
        huge[12..16].copy_from_slice(&11u32.to_be_bytes());
        client.write_all(&huge).await.unwrap();

        let frame = Frame::EnquireLink(EnquireLink::new(12));
        client.write_all(&frame.to_bytes().unwrap()).await.unwrap();
        client.flush().await.unwrap();

        match server.read_frame().await.unwrap().unwrap() {
            Inbound::Bad {
                error,
                sequence_number,
                ..
            } => {
                assert!(matches!(error, CodecError::FrameTooLarge { .. }));
                assert_eq!(sequence_number, 11);
            }
            other => panic!("unexpected inbound: {other:?}"),
        }
        match server.read_frame().await.unwrap().unwrap() {
            Inbound::Frame { frame: got, .. } => assert_eq!(got, frame),
            other => panic!("unexpected inbound: {other:?}"),
        }
    }

    #[tokio::test]
    async fn clean_eof_returns_none() {
        let (client, server) = pair().await;
        let mut server = Connection::new(server, crate::codec::DEFAULT_MAX_PDU_SIZE);
        drop(client);
        assert!(server.read_frame().await.unwrap().is_none());
    }
}
