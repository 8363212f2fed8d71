// ABOUTME: Defines SMPP v3.4 command_status error codes per specification Table 5-2
// ABOUTME: Preserves vendor-defined status values through a catch-all variant

use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt;

/// SMPP v3.4 Command Status (Table 5-2)
///
/// Carried in every response PDU header; requests always carry `Ok`.
/// SMSC vendors define additional codes above 0x400, so unknown values are
/// preserved verbatim in [`CommandStatus::Vendor`] rather than rejected.
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u32)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub enum CommandStatus {
    /// ESME_ROK - No error
    Ok = 0x0000_0000,
    /// ESME_RINVMSGLEN - Message length is invalid
    InvalidMsgLength = 0x0000_0001,
    /// ESME_RINVCMDLEN - Command length is invalid
    InvalidCommandLength = 0x0000_0002,
    /// ESME_RINVCMDID - Invalid command ID
    InvalidCommandId = 0x0000_0003,
    /// ESME_RINVBNDSTS - Incorrect bind status for given command
    InvalidBindStatus = 0x0000_0004,
    /// ESME_RALYBND - ESME already in bound state
    AlreadyBound = 0x0000_0005,
    /// ESME_RINVPRTFLG - Invalid priority flag
    InvalidPriorityFlag = 0x0000_0006,
    /// ESME_RINVREGDLVFLG - Invalid registered delivery flag
    InvalidRegisteredDeliveryFlag = 0x0000_0007,
    /// ESME_RSYSERR - System error
    SystemError = 0x0000_0008,
    /// ESME_RINVSRCADR - Invalid source address
    InvalidSourceAddress = 0x0000_000A,
    /// ESME_RINVDSTADR - Invalid destination address
    InvalidDestAddress = 0x0000_000B,
    /// ESME_RINVMSGID - Message ID is invalid
    InvalidMessageId = 0x0000_000C,
    /// ESME_RBINDFAIL - Bind failed
    BindFailed = 0x0000_000D,
    /// ESME_RINVPASWD - Invalid password
    InvalidPassword = 0x0000_000E,
    /// ESME_RINVSYSID - Invalid system ID
    InvalidSystemId = 0x0000_000F,
    /// ESME_RCANCELFAIL - Cancel SM failed
    CancelFailed = 0x0000_0011,
    /// ESME_RREPLACEFAIL - Replace SM failed
    ReplaceFailed = 0x0000_0013,
    /// ESME_RMSGQFUL - Message queue full
    MessageQueueFull = 0x0000_0014,
    /// ESME_RINVSERTYP - Invalid service type
    InvalidServiceType = 0x0000_0015,
    /// ESME_RINVNUMDESTS - Invalid number of destinations
    InvalidNumDestinations = 0x0000_0033,
    /// ESME_RINVDLNAME - Invalid distribution list name
    InvalidDistListName = 0x0000_0034,
    /// ESME_RINVDESTFLAG - Destination flag is invalid
    InvalidDestFlag = 0x0000_0040,
    /// ESME_RINVSUBREP - Invalid submit with replace request
    InvalidSubmitWithReplace = 0x0000_0042,
    /// ESME_RINVESMCLASS - Invalid esm_class field data
    InvalidEsmClass = 0x0000_0043,
    /// ESME_RCNTSUBDL - Cannot submit to distribution list
    CannotSubmitToDistList = 0x0000_0044,
    /// ESME_RSUBMITFAIL - submit_sm or submit_multi failed
    SubmitFailed = 0x0000_0045,
    /// ESME_RINVSRCTON - Invalid source address TON
    InvalidSourceTon = 0x0000_0048,
    /// ESME_RINVSRCNPI - Invalid source address NPI
    InvalidSourceNpi = 0x0000_0049,
    /// ESME_RINVDSTTON - Invalid destination address TON
    InvalidDestTon = 0x0000_0050,
    /// ESME_RINVDSTNPI - Invalid destination address NPI
    InvalidDestNpi = 0x0000_0051,
    /// ESME_RINVSYSTYP - Invalid system_type field
    InvalidSystemType = 0x0000_0053,
    /// ESME_RINVREPFLAG - Invalid replace_if_present flag
    InvalidReplaceFlag = 0x0000_0054,
    /// ESME_RINVNUMMSGS - Invalid number of messages
    InvalidNumMessages = 0x0000_0055,
    /// ESME_RTHROTTLED - Throttling error (ESME exceeded message limits)
    ThrottlingError = 0x0000_0058,
    /// ESME_RINVSCHED - Invalid scheduled delivery time
    InvalidScheduledDeliveryTime = 0x0000_0061,
    /// ESME_RINVEXPIRY - Invalid message validity period
    InvalidValidityPeriod = 0x0000_0062,
    /// ESME_RINVDFTMSGID - Predefined message is invalid or not found
    InvalidDefaultMsgId = 0x0000_0063,
    /// ESME_RX_T_APPN - ESME receiver temporary app error
    ReceiverTemporaryError = 0x0000_0064,
    /// ESME_RX_P_APPN - ESME receiver permanent app error
    ReceiverPermanentError = 0x0000_0065,
    /// ESME_RX_R_APPN - ESME receiver reject message error
    ReceiverRejected = 0x0000_0066,
    /// ESME_RQUERYFAIL - query_sm request failed
    QueryFailed = 0x0000_0067,
    /// ESME_RINVOPTPARSTREAM - Error in the optional part of the PDU body
    InvalidOptionalPart = 0x0000_00C0,
    /// ESME_ROPTPARNOTALLWD - Optional parameter not allowed
    OptionalParamNotAllowed = 0x0000_00C1,
    /// ESME_RINVPARLEN - Invalid parameter length
    InvalidParamLength = 0x0000_00C2,
    /// ESME_RMISSINGOPTPARAM - Expected optional parameter missing
    MissingOptionalParam = 0x0000_00C3,
    /// ESME_RINVOPTPARAMVAL - Invalid optional parameter value
    InvalidOptionalParamValue = 0x0000_00C4,
    /// ESME_RDELIVERYFAILURE - Delivery failure (used for data_sm_resp)
    DeliveryFailure = 0x0000_00FE,
    /// ESME_RUNKNOWNERR - Unknown error
    UnknownError = 0x0000_00FF,

    /// Reserved or SMSC vendor specific status, preserved verbatim
    #[num_enum(catch_all)]
    Vendor(u32),
}

impl CommandStatus {
    pub fn is_ok(&self) -> bool {
        *self == CommandStatus::Ok
    }

    /// Statuses that signal the SMSC wants the ESME to slow down
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            CommandStatus::ThrottlingError | CommandStatus::MessageQueueFull
        )
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Vendor(code) => write!(f, "vendor status {code:#010x}"),
            other => write!(f, "{other:?} ({:#010x})", u32::from(*other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_roundtrip() {
        assert_eq!(CommandStatus::from(0u32), CommandStatus::Ok);
        assert_eq!(CommandStatus::from(0x58u32), CommandStatus::ThrottlingError);
        assert_eq!(u32::from(CommandStatus::MessageQueueFull), 0x14);
    }

    #[test]
    fn vendor_codes_preserved() {
        let status = CommandStatus::from(0x0000_0412u32);
        assert_eq!(status, CommandStatus::Vendor(0x412));
        assert_eq!(u32::from(status), 0x412);
    }

    #[test]
    fn throttling_classification() {
        assert!(CommandStatus::ThrottlingError.is_throttling());
        assert!(CommandStatus::MessageQueueFull.is_throttling());
        assert!(!CommandStatus::SystemError.is_throttling());
        assert!(!CommandStatus::Ok.is_throttling());
    }
}
