use std::{fmt::Display, str::FromStr};

use super::InventoryError;

/// Short uppercase code identifying a category. Used verbatim as tag prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PreCode(String);

impl PreCode {
    pub const MAX_LEN: usize = 4;

    /// Derives a pre-code from a category name.
    ///
    /// Only ASCII letters count. A single word gives its first three letters,
    /// two words give the first two letters of the first word and the first
    /// letter of the second, more words give the initials of the first three.
    pub fn derive(name: &str) -> Result<Self, InventoryError> {
        let words: Vec<Vec<char>> = name
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .filter(char::is_ascii_alphabetic)
                    .map(|c| c.to_ascii_uppercase())
                    .collect::<Vec<_>>()
            })
            .filter(|letters| !letters.is_empty())
            .collect();

        let code: String = match words.as_slice() {
            [] => String::new(),
            [single] => single.iter().take(3).collect(),
            [first, second] => first.iter().take(2).chain(second.first()).collect(),
            more => more.iter().take(3).filter_map(|word| word.first()).collect(),
        };

        code.parse().map_err(|_| InventoryError::InvalidPreCode(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PreCode {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if (1..=Self::MAX_LEN).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(s.to_string()))
        } else {
            Err(InventoryError::InvalidPreCode(s.to_string()))
        }
    }
}

impl Display for PreCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PreCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
