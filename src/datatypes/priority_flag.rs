// ABOUTME: Defines SMPP v3.4 priority_flag field values for message submission
// ABOUTME: Maps priority levels onto network-specific delivery treatment

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// SMPP v3.4 priority_flag (Section 5.2.14)
///
/// The meaning of each level is network specific: in GSM, 0 is
/// non-priority and 1-3 are priority; other network types grade the
/// levels differently.
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PriorityFlag {
    #[default]
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
}
