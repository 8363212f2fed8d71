// ABOUTME: Defines SMPP v3.4 Type of Number (TON) field values per specification
// ABOUTME: Implements address type classification for source and destination addresses

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// SMPP v3.4 Type of Number (TON) Field
///
/// Specifies the number format for source, destination and ESME addresses.
/// Used together with the Numbering Plan Indicator (NPI) to define the
/// complete addressing scheme.
///
/// Typical combinations: International + ISDN for E.164 numbers
/// ("+1234567890"), Alphanumeric + Unknown for sender names ("COMPANY").
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TypeOfNumber {
    /// Unknown type - use when TON is not specified or applicable
    #[default]
    Unknown = 0b0000_0000,
    /// International number (ITU-T E.164), country code + national number
    International = 0b0000_0001,
    /// National number without country code
    National = 0b0000_0010,
    /// Network-specific, operator-defined addressing scheme
    NetworkSpecific = 0b0000_0011,
    /// Direct subscriber addressing within a network
    SubscriberNumber = 0b0000_0100,
    /// Alphanumeric identifier, e.g. "COMPANY" (max 11 GSM-7 characters)
    Alphanumeric = 0b0000_0101,
    /// Abbreviated number, e.g. short dial codes like "911"
    Abbreviated = 0b0000_0110,
}
