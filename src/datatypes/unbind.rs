use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_complete_header_only_pdu;

/// unbind PDU (Section 4.2.1), the graceful session teardown request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unbind {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

/// unbind_resp PDU (Section 4.2.2)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnbindResp {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(Unbind, CommandId::Unbind);
impl_complete_header_only_pdu!(UnbindResp, CommandId::UnbindResp);
