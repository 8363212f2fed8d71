// ABOUTME: outbind PDU (Section 4.1.7)
// ABOUTME: SMSC request that the ESME originate a bind_receiver

use bytes::BytesMut;
use std::io::Cursor;

use crate::codec::{self, CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{CommandId, CommandStatus, Password, SystemId};

/// outbind PDU (Section 4.1.7), sent by an SMSC over a connection the
/// ESME accepted, asking it to bind as receiver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outbind {
    pub sequence_number: u32,
    pub system_id: SystemId,
    pub password: Password,
}

impl Encodable for Outbind {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let start = buf.len();
        codec::write_header(
            buf,
            CommandId::Outbind,
            CommandStatus::Ok,
            self.sequence_number,
        );
        codec::put_cstring(buf, self.system_id.as_str_bytes());
        codec::put_cstring(buf, self.password.as_str_bytes());
        codec::finish_length(buf, start);
        Ok(())
    }
}

impl Decodable for Outbind {
    fn command_id() -> CommandId {
        CommandId::Outbind
    }

    fn decode(header: &PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let system_id = codec::get_fixed_string(buf, "system_id")?;
        let password = codec::get_fixed_string(buf, "password")?;
        Ok(Self {
            sequence_number: header.sequence_number,
            system_id,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let original = Outbind {
            sequence_number: 3,
            system_id: SystemId::from("SMSC01"),
            password: Password::from("secret"),
        };
        let bytes = original.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        assert_eq!(Outbind::decode(&header, &mut cursor).unwrap(), original);
    }
}
