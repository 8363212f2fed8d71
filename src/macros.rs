// ABOUTME: Macros reducing boilerplate across the PDU datatype implementations
// ABOUTME: Covers header-only PDU codecs, constructors and builder setter methods

/// Implements `Encodable`/`Decodable` for PDUs that carry no body beyond
/// the standard 16-octet header.
///
/// The generated decoder rejects trailing body bytes; the encoder emits a
/// bare header with the correct command_length.
macro_rules! impl_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        impl $crate::codec::Decodable for $pdu_type {
            fn command_id() -> $crate::datatypes::CommandId {
                $command_id
            }

            fn decode(
                header: &$crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                use bytes::Buf;

                if buf.has_remaining() {
                    return Err($crate::codec::CodecError::MalformedPdu {
                        reason: concat!(
                            stringify!($pdu_type),
                            " carries unexpected body octets"
                        )
                        .to_string(),
                        offset: buf.position(),
                    });
                }

                Ok($pdu_type {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                })
            }
        }

        impl $crate::codec::Encodable for $pdu_type {
            fn encode(
                &self,
                buf: &mut bytes::BytesMut,
            ) -> Result<(), $crate::codec::CodecError> {
                let start = buf.len();
                $crate::codec::write_header(
                    buf,
                    $command_id,
                    self.command_status,
                    self.sequence_number,
                );
                $crate::codec::finish_length(buf, start);
                Ok(())
            }
        }
    };
}

/// Generates the `new`/`error` constructors shared by header-only PDUs
macro_rules! impl_header_only_constructors {
    ($pdu_type:ident) => {
        impl $pdu_type {
            /// Create a new PDU with Ok status
            pub fn new(sequence_number: u32) -> Self {
                Self {
                    command_status: $crate::datatypes::CommandStatus::Ok,
                    sequence_number,
                }
            }

            /// Create a PDU with an error status
            pub fn error(
                sequence_number: u32,
                status: $crate::datatypes::CommandStatus,
            ) -> Self {
                Self {
                    command_status: status,
                    sequence_number,
                }
            }
        }
    };
}

/// Codec traits plus constructors for the complete header-only pattern
macro_rules! impl_complete_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        $crate::macros::impl_header_only_pdu!($pdu_type, $command_id);
        $crate::macros::impl_header_only_constructors!($pdu_type);
    };
}

/// Generates fluent builder setter methods, one per field
macro_rules! builder_setters {
    ($($(#[$meta:meta])* $field:ident: $type:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $field(mut self, $field: $type) -> Self {
                self.$field = $field;
                self
            }
        )*
    };
}

pub(crate) use {
    builder_setters, impl_complete_header_only_pdu, impl_header_only_constructors,
    impl_header_only_pdu,
};
