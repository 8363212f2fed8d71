mod address;
mod alert_notification;
mod bind;
mod cancel_sm;
mod command_id;
mod command_status;
mod data_coding;
mod data_sm;
mod deliver_sm;
mod enquire_link;
mod esm_class;
mod fixed_string;
mod generic_nack;
mod interface_version;
mod numeric_plan_indicator;
mod outbind;
mod priority_flag;
mod query_sm;
mod replace_sm;
mod sm;
mod submit_sm;
mod tlv;
mod type_of_number;
mod udh;
mod unbind;

pub use address::{AddressError, PhoneNumber};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_coding::DataCoding;
pub use esm_class::EsmClass;
pub use fixed_string::{
    AddressRange, FixedString, FixedStringError, MessageId, Password, ServiceType, SystemId,
    SystemType, TimeString,
};
pub use interface_version::InterfaceVersion;
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use priority_flag::PriorityFlag;
pub use sm::{RegisteredDelivery, SmBody, MAX_SHORT_MESSAGE};
pub use tlv::{tag_info, tags, OptionalParams, Tlv, TlvKind, KNOWN_TAGS};
pub use type_of_number::TypeOfNumber;
pub use udh::{ConcatInfo, InformationElement, Udh};

pub use alert_notification::AlertNotification;
pub use bind::{
    BindReceiver, BindReceiverResp, BindTransceiver, BindTransceiverResp, BindTransmitter,
    BindTransmitterResp,
};
pub use cancel_sm::{CancelSm, CancelSmResp};
pub use data_sm::{DataSm, DataSmResp};
pub use deliver_sm::{DeliverSm, DeliverSmResp};
pub use enquire_link::{EnquireLink, EnquireLinkResp};
pub use generic_nack::GenericNack;
pub use outbind::Outbind;
pub use query_sm::{MessageState, QuerySm, QuerySmResp};
pub use replace_sm::{ReplaceSm, ReplaceSmResp};
pub use submit_sm::{SubmitSm, SubmitSmResp};
pub use unbind::{Unbind, UnbindResp};

// SMPP v3.4 field length limits shared across PDU types
// (octets excluding the terminating NUL)
pub const MAX_SYSTEM_ID_LENGTH: usize = 15;
pub const MAX_PASSWORD_LENGTH: usize = 8;
pub const MAX_SYSTEM_TYPE_LENGTH: usize = 12;
