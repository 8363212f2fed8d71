// ABOUTME: Defines SMPP v3.4 command identifiers per specification Table 4-1
// ABOUTME: Implements command_id field validation and response bit handling

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// SMPP v3.4 Command Identifiers (Table 4-1)
///
/// The command_id field identifies the SMPP PDU type. Per SMPP v3.4
/// specification Section 2.2.1, this is a 4-octet field in the PDU header.
///
/// Bit 31 is the response indicator: requests have it clear, responses have
/// it set. Identifiers outside this enum are either reserved or vendor
/// specific; the decoder keeps them as raw `u32` values.
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub enum CommandId {
    /// generic_nack PDU (Section 4.3.1) - Error response for invalid PDUs
    GenericNack = 0x8000_0000,

    /// bind_receiver PDU (Section 4.1.3)
    BindReceiver = 0x0000_0001,
    /// bind_receiver_resp PDU (Section 4.1.4)
    BindReceiverResp = 0x8000_0001,
    /// bind_transmitter PDU (Section 4.1.1)
    BindTransmitter = 0x0000_0002,
    /// bind_transmitter_resp PDU (Section 4.1.2)
    BindTransmitterResp = 0x8000_0002,

    /// query_sm PDU (Section 4.8.1)
    QuerySm = 0x0000_0003,
    /// query_sm_resp PDU (Section 4.8.2)
    QuerySmResp = 0x8000_0003,

    /// submit_sm PDU (Section 4.4.1)
    SubmitSm = 0x0000_0004,
    /// submit_sm_resp PDU (Section 4.4.2)
    SubmitSmResp = 0x8000_0004,

    /// deliver_sm PDU (Section 4.6.1)
    DeliverSm = 0x0000_0005,
    /// deliver_sm_resp PDU (Section 4.6.2)
    DeliverSmResp = 0x8000_0005,

    /// unbind PDU (Section 4.2.1)
    Unbind = 0x0000_0006,
    /// unbind_resp PDU (Section 4.2.2)
    UnbindResp = 0x8000_0006,

    /// replace_sm PDU (Section 4.10.1)
    ReplaceSm = 0x0000_0007,
    /// replace_sm_resp PDU (Section 4.10.2)
    ReplaceSmResp = 0x8000_0007,
    /// cancel_sm PDU (Section 4.9.1)
    CancelSm = 0x0000_0008,
    /// cancel_sm_resp PDU (Section 4.9.2)
    CancelSmResp = 0x8000_0008,

    /// bind_transceiver PDU (Section 4.1.5)
    BindTransceiver = 0x0000_0009,
    /// bind_transceiver_resp PDU (Section 4.1.6)
    BindTransceiverResp = 0x8000_0009,

    /// outbind PDU (Section 4.1.7) - SMSC initiated bind request
    Outbind = 0x0000_000B,

    /// enquire_link PDU (Section 4.11.1)
    EnquireLink = 0x0000_0015,
    /// enquire_link_resp PDU (Section 4.11.2)
    EnquireLinkResp = 0x8000_0015,

    /// alert_notification PDU (Section 4.12.1) - no response PDU exists
    AlertNotification = 0x0000_0102,
    /// data_sm PDU (Section 4.7.1)
    DataSm = 0x0000_0103,
    /// data_sm_resp PDU (Section 4.7.2)
    DataSmResp = 0x8000_0103,
}

impl CommandId {
    /// Check if this command_id represents a response PDU
    pub fn is_response(&self) -> bool {
        u32::from(*self) & 0x8000_0000 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_bit() {
        assert!(!CommandId::SubmitSm.is_response());
        assert!(CommandId::SubmitSmResp.is_response());
        assert!(!CommandId::EnquireLink.is_response());
        assert!(CommandId::EnquireLinkResp.is_response());
        // generic_nack is classified as a response
        assert!(CommandId::GenericNack.is_response());
    }

    #[test]
    fn reserved_ids_rejected() {
        assert!(CommandId::try_from(0x0000_000Au32).is_err());
        assert!(CommandId::try_from(0x0000_0111u32).is_err());
        assert_eq!(
            CommandId::try_from(0x8000_0005u32),
            Ok(CommandId::DeliverSmResp)
        );
    }
}
