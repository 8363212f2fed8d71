use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::{impl_header_only_constructors, impl_header_only_pdu};

/// generic_nack PDU (Section 4.3.1)
///
/// Sent in response to a PDU that could not be decoded or whose command id
/// is unknown. When the offending PDU's sequence number could not be
/// determined, sequence number 0 is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericNack {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_header_only_pdu!(GenericNack, CommandId::GenericNack);
impl_header_only_constructors!(GenericNack);

impl GenericNack {
    pub fn invalid_command_id(sequence_number: u32) -> Self {
        Self::error(sequence_number, CommandStatus::InvalidCommandId)
    }

    pub fn invalid_command_length(sequence_number: u32) -> Self {
        Self::error(sequence_number, CommandStatus::InvalidCommandLength)
    }
}
