//! Account names (64-bit, base-32 text form)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters of the base-32 name alphabet, indexed by symbol value
const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Account name parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountNameError {
    /// Name longer than 13 characters
    #[error("account name too long: expected at most 13 characters, got {0}")]
    TooLong(usize),
    /// Character outside the name alphabet
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter {
        /// Offending character
        character: char,
        /// Zero-based position in the input
        position: usize,
    },
}

/// On-chain account identifier
///
/// Names pack up to 13 characters into a `u64`: the first 12 characters use
/// five bits each, the 13th only the low four bits, so it is restricted to
/// `.12345abcdefghij`. Ordering follows the packed value, which matches the
/// lexicographic order of the text form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountName(u64);

impl AccountName {
    /// Maximum length of the text form
    pub const MAX_LEN: usize = 13;

    /// The empty name
    pub const EMPTY: AccountName = AccountName(0);

    /// Create from the packed value
    pub const fn from_u64(value: u64) -> Self {
        AccountName(value)
    }

    /// Get the packed value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Check if this is the empty name
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Parse a name from its text form
    pub fn parse(s: &str) -> Result<Self, AccountNameError> {
        let len = s.chars().count();
        if len > Self::MAX_LEN {
            return Err(AccountNameError::TooLong(len));
        }

        let mut value = 0u64;
        for (position, character) in s.chars().enumerate() {
            let symbol = symbol_of(character)
                .ok_or(AccountNameError::InvalidCharacter { character, position })?;
            if position < 12 {
                value |= (symbol & 0x1f) << (64 - 5 * (position + 1));
            } else {
                if symbol > 0x0f {
                    return Err(AccountNameError::InvalidCharacter { character, position });
                }
                value |= symbol;
            }
        }
        Ok(AccountName(value))
    }

    /// Render the text form (trailing dots are not significant)
    pub fn to_name_string(&self) -> String {
        let mut chars = [b'.'; 13];
        let mut tmp = self.0;
        for i in 0..=12 {
            let mask = if i == 0 { 0x0f } else { 0x1f };
            chars[12 - i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= if i == 0 { 4 } else { 5 };
        }
        let end = chars.iter().rposition(|c| *c != b'.').map_or(0, |p| p + 1);
        String::from_utf8_lossy(&chars[..end]).into_owned()
    }
}

fn symbol_of(c: char) -> Option<u64> {
    match c {
        'a'..='z' => Some(c as u64 - 'a' as u64 + 6),
        '1'..='5' => Some(c as u64 - '1' as u64 + 1),
        '.' => Some(0),
        _ => None,
    }
}

impl FromStr for AccountName {
    type Err = AccountNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountName({})", self.to_name_string())
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_name_string())
    }
}

impl From<u64> for AccountName {
    fn from(value: u64) -> Self {
        AccountName(value)
    }
}

impl From<AccountName> for u64 {
    fn from(name: AccountName) -> Self {
        name.0
    }
}

// Serde implementation (behind feature flag)
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for AccountName {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_name_string())
        }
    }

    impl<'de> Deserialize<'de> for AccountName {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            AccountName::parse(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Parsing ====================

    #[test]
    fn test_parse_known_values() {
        assert_eq!(AccountName::parse("eosio").unwrap().as_u64(), 0x5530ea0000000000);
        assert_eq!(AccountName::parse("alice").unwrap().as_u64(), 0x345c850000000000);
        assert_eq!(AccountName::parse("bob").unwrap().as_u64(), 0x3d0e000000000000);
        assert_eq!(AccountName::parse("1").unwrap().as_u64(), 0x0800000000000000);
    }

    #[test]
    fn test_parse_empty() {
        let name = AccountName::parse("").unwrap();
        assert!(name.is_empty());
        assert_eq!(name, AccountName::EMPTY);
        assert_eq!(name.to_string(), "");
    }

    #[test]
    fn test_parse_max_name() {
        let name = AccountName::parse("zzzzzzzzzzzzj").unwrap();
        assert_eq!(name.as_u64(), u64::MAX);
        assert_eq!(name.to_string(), "zzzzzzzzzzzzj");
    }

    #[test]
    fn test_parse_too_long() {
        let err = AccountName::parse("abcdefghijklmn").unwrap_err();
        assert_eq!(err, AccountNameError::TooLong(14));
    }

    #[test]
    fn test_parse_invalid_character() {
        let err = AccountName::parse("Alice").unwrap_err();
        assert_eq!(
            err,
            AccountNameError::InvalidCharacter { character: 'A', position: 0 }
        );

        let err = AccountName::parse("bob6").unwrap_err();
        assert_eq!(
            err,
            AccountNameError::InvalidCharacter { character: '6', position: 3 }
        );
    }

    #[test]
    fn test_parse_thirteenth_character_limited() {
        assert!(AccountName::parse("aaaaaaaaaaaaj").is_ok());
        let err = AccountName::parse("aaaaaaaaaaaak").unwrap_err();
        assert_eq!(
            err,
            AccountNameError::InvalidCharacter { character: 'k', position: 12 }
        );
    }

    // ==================== Rendering ====================

    #[test]
    fn test_display_roundtrip() {
        for s in ["eosio", "alice", "bob", "a.b", "tessera.code", "12345"] {
            let name: AccountName = s.parse().unwrap();
            assert_eq!(name.to_string(), s);
        }
    }

    #[test]
    fn test_trailing_dots_not_significant() {
        let a = AccountName::parse("alice").unwrap();
        let b = AccountName::parse("alice..").unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_string(), "alice");
    }

    #[test]
    fn test_debug_format() {
        let name = AccountName::parse("alice").unwrap();
        assert_eq!(format!("{:?}", name), "AccountName(alice)");
    }

    #[test]
    fn test_ordering_matches_text() {
        let a = AccountName::parse("alice").unwrap();
        let b = AccountName::parse("bob").unwrap();
        let c = AccountName::parse("carol").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_u64_conversions() {
        let name = AccountName::from(42u64);
        assert_eq!(u64::from(name), 42);
        assert_eq!(AccountName::from_u64(42), name);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_string() {
        let name = AccountName::parse("alice").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"alice\"");
        let back: AccountName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
        assert!(serde_json::from_str::<AccountName>("\"Bad\"").is_err());
    }
}
