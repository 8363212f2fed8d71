// ABOUTME: Defines SMPP v3.4 Numbering Plan Indicator (NPI) field values
// ABOUTME: Identifies the numbering plan governing an address field

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// SMPP v3.4 Numbering Plan Indicator (NPI) Field
///
/// Identifies the numbering plan of an address. ISDN (E.163/E.164) is the
/// common case for telephone numbers.
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum NumericPlanIndicator {
    /// Unknown numbering plan
    #[default]
    Unknown = 0b0000_0000,
    /// ISDN (E.163/E.164) telephone numbering plan
    Isdn = 0b0000_0001,
    /// Data numbering plan (X.121)
    Data = 0b0000_0011,
    /// Telex numbering plan (F.69)
    Telex = 0b0000_0100,
    /// Land mobile (E.212)
    LandMobile = 0b0000_0110,
    /// National numbering plan
    National = 0b0000_1000,
    /// Private numbering plan
    Private = 0b0000_1001,
    /// ERMES numbering plan (ETSI DE/PS 3 01-3)
    Ermes = 0b0000_1010,
    /// Internet (IP) addressing
    Internet = 0b0000_1110,
    /// WAP client id, to be defined by WAP forum
    WapClientId = 0b0001_0010,
}
