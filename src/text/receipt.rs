// ABOUTME: Parser for the conventional delivery-receipt text of deliver_sm PDUs
// ABOUTME: Tolerates vendor deviations; absent fields stay absent, unknown keys are kept

use std::fmt;
use std::str::FromStr;

/// Final message states reported in the `stat` field of a receipt
/// (SMPP v3.4 Appendix B)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReceiptStatus {
    Delivered,
    Expired,
    Deleted,
    Undeliverable,
    Accepted,
    Unknown,
    Rejected,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Delivered => "DELIVRD",
            ReceiptStatus::Expired => "EXPIRED",
            ReceiptStatus::Deleted => "DELETED",
            ReceiptStatus::Undeliverable => "UNDELIV",
            ReceiptStatus::Accepted => "ACCEPTD",
            ReceiptStatus::Unknown => "UNKNOWN",
            ReceiptStatus::Rejected => "REJECTD",
        }
    }
}

impl FromStr for ReceiptStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELIVRD" => Ok(ReceiptStatus::Delivered),
            "EXPIRED" => Ok(ReceiptStatus::Expired),
            "DELETED" => Ok(ReceiptStatus::Deleted),
            "UNDELIV" => Ok(ReceiptStatus::Undeliverable),
            "ACCEPTD" => Ok(ReceiptStatus::Accepted),
            "UNKNOWN" => Ok(ReceiptStatus::Unknown),
            "REJECTD" => Ok(ReceiptStatus::Rejected),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A receipt timestamp in the conventional `YYMMDDhhmm` or `YYMMDDhhmmss`
/// form. Two-digit years are interpreted as 2000-2099.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReceiptTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ReceiptTimestamp {
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 10 && s.len() != 12 {
            return None;
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let field = |from: usize| s[from..from + 2].parse::<u8>().ok();

        let ts = Self {
            year: 2000 + field(0)? as u16,
            month: field(2)?,
            day: field(4)?,
            hour: field(6)?,
            minute: field(8)?,
            second: if s.len() == 12 { field(10)? } else { 0 },
        };
        let valid = (1..=12).contains(&ts.month)
            && (1..=31).contains(&ts.day)
            && ts.hour < 24
            && ts.minute < 60
            && ts.second < 60;
        valid.then_some(ts)
    }
}

/// The parsed fields of a conventional delivery receipt.
///
/// Every field is optional: the receipt text format is a convention, not
/// part of the wire protocol, and SMSC vendors diverge. Key/value pairs
/// outside the conventional set are kept in `extra` under their literal
/// keys; conventional fields whose values fail to parse land there too.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// SMSC message id of the receipted message
    pub id: Option<String>,
    /// Number of messages originally submitted
    pub sub: Option<u32>,
    /// Number of messages delivered
    pub dlvrd: Option<u32>,
    pub submit_date: Option<ReceiptTimestamp>,
    pub done_date: Option<ReceiptTimestamp>,
    pub stat: Option<ReceiptStatus>,
    /// Network-specific error field, conventionally three digits
    pub err: Option<String>,
    /// First characters of the original message, at most 20
    pub text: Option<String>,
    /// Unrecognized or unparseable key/value pairs, in order of appearance
    pub extra: Vec<(String, String)>,
}

/// Parse a conventional receipt text such as
/// `id:IIII sub:001 dlvrd:001 submit date:2408011200 done date:2408011205
/// stat:DELIVRD err:000 text:....`
///
/// The `text` key consumes the remainder of the input, since the message
/// excerpt may itself contain spaces and colons.
pub fn parse(input: &str) -> DeliveryReceipt {
    let mut receipt = DeliveryReceipt::default();

    let mut rest = input.trim_start();
    while !rest.is_empty() {
        // "text" takes everything to the end of the input
        if let Some(value) = rest.strip_prefix("text:") {
            receipt.text = Some(value.trim_end().to_string());
            break;
        }

        // a key runs up to the next ':'; "submit date" and "done date"
        // contain a space, so the key is whatever precedes the colon
        let Some(colon) = rest.find(':') else { break };
        let key = rest[..colon].trim();
        rest = &rest[colon + 1..];

        // the value runs to the next whitespace
        let end = rest
            .find(char::is_whitespace)
            .unwrap_or(rest.len());
        let value = &rest[..end];
        rest = rest[end..].trim_start();

        match key {
            "id" => receipt.id = Some(value.to_string()),
            "sub" => match value.parse() {
                Ok(n) => receipt.sub = Some(n),
                Err(_) => receipt.extra.push((key.into(), value.into())),
            },
            "dlvrd" => match value.parse() {
                Ok(n) => receipt.dlvrd = Some(n),
                Err(_) => receipt.extra.push((key.into(), value.into())),
            },
            "submit date" => match ReceiptTimestamp::parse(value) {
                Some(ts) => receipt.submit_date = Some(ts),
                None => receipt.extra.push((key.into(), value.into())),
            },
            "done date" => match ReceiptTimestamp::parse(value) {
                Some(ts) => receipt.done_date = Some(ts),
                None => receipt.extra.push((key.into(), value.into())),
            },
            "stat" => match value.parse() {
                Ok(stat) => receipt.stat = Some(stat),
                Err(()) => receipt.extra.push((key.into(), value.into())),
            },
            "err" => receipt.err = Some(value.to_string()),
            _ => receipt.extra.push((key.into(), value.into())),
        }
    }

    receipt
}
