// ABOUTME: Fixed-capacity C-octet-string types for SMPP protocol fields
// ABOUTME: Provides newtype wrappers over byte arrays with Display/Debug traits

use std::fmt;
use std::str;
use std::str::FromStr;

/// A fixed-capacity NUL-terminated string with compile-time size validation.
///
/// `N` is the wire capacity including the terminating NUL, so the content is
/// at most `N - 1` octets. Unused capacity exists only in memory; on the
/// wire these fields are variable length (content plus a single NUL).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> FixedString<N> {
    /// Creates a new FixedString from a byte slice
    pub fn new(s: &[u8]) -> Result<Self, FixedStringError> {
        if s.len() >= N {
            return Err(FixedStringError::TooLong {
                max_len: N - 1,
                actual_len: s.len(),
            });
        }
        if s.contains(&0) {
            return Err(FixedStringError::EmbeddedNul);
        }

        let mut data = [0u8; N];
        data[..s.len()].copy_from_slice(s);
        Ok(Self { data })
    }

    /// Returns the string content as a byte slice, excluding null padding
    pub fn as_str_bytes(&self) -> &[u8] {
        let len = self.data.iter().position(|&b| b == 0).unwrap_or(N);
        &self.data[..len]
    }

    /// Returns the string content as a str, excluding null padding
    pub fn as_str(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(self.as_str_bytes())
    }

    /// Returns the length of the string content
    pub fn len(&self) -> usize {
        self.as_str_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "<invalid UTF-8>"),
        }
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Ok(s) => write!(f, "FixedString<{N}>(\"{s}\")"),
            Err(_) => write!(f, "FixedString<{}>({:?})", N, self.as_str_bytes()),
        }
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self { data: [0u8; N] }
    }
}

impl<const N: usize> From<&str> for FixedString<N> {
    fn from(s: &str) -> Self {
        s.parse().expect("string too long for FixedString")
    }
}

impl<const N: usize> TryFrom<String> for FixedString<N> {
    type Error = FixedStringError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl<const N: usize> FromStr for FixedString<N> {
    type Err = FixedStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl<const N: usize> AsRef<[u8]> for FixedString<N> {
    fn as_ref(&self) -> &[u8] {
        self.as_str_bytes()
    }
}

impl<const N: usize> PartialEq<str> for FixedString<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Ok(other)
    }
}

impl<const N: usize> PartialEq<&str> for FixedString<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Ok(*other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixedStringError {
    #[error("string too long: {actual_len} octets exceeds maximum of {max_len}")]
    TooLong { max_len: usize, actual_len: usize },
    #[error("string contains an embedded NUL octet")]
    EmbeddedNul,
}

// SMPP v3.4 field capacities (octets including the terminating NUL)

/// system_id field for bind operations (max 15 characters)
pub type SystemId = FixedString<16>;
/// password field for bind operations (max 8 characters)
pub type Password = FixedString<9>;
/// system_type field for bind operations (max 12 characters)
pub type SystemType = FixedString<13>;
/// address_range field for bind operations (max 40 characters)
pub type AddressRange = FixedString<41>;
/// service_type field for messaging operations (max 5 characters)
pub type ServiceType = FixedString<6>;
/// SMSC-assigned message id (max 64 characters)
pub type MessageId = FixedString<65>;
/// schedule_delivery_time / validity_period / final_date time string
pub type TimeString = FixedString<17>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_and_capacity() {
        let id = SystemId::from("SMPP3TEST");
        assert_eq!(id, "SMPP3TEST");
        assert_eq!(id.len(), 9);
        assert!(!id.is_empty());

        // 15 characters fit, 16 do not
        assert!(SystemId::new(&[b'A'; 15]).is_ok());
        assert!(matches!(
            SystemId::new(&[b'A'; 16]),
            Err(FixedStringError::TooLong {
                max_len: 15,
                actual_len: 16
            })
        ));
    }

    #[test]
    fn rejects_embedded_nul() {
        assert_eq!(
            SystemId::new(b"AB\0CD"),
            Err(FixedStringError::EmbeddedNul)
        );
    }

    #[test]
    fn default_is_empty() {
        let s = Password::default();
        assert!(s.is_empty());
        assert_eq!(s.as_str_bytes(), b"");
    }
}
