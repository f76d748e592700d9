use std::{fmt::Display, num::NonZeroU64};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SequenceNumber(NonZeroU64);

impl SequenceNumber {
    pub const FIRST: Self = Self(NonZeroU64::MIN);
    /// Highest sequence number SQLite can store as an integer.
    pub const MAX: Self = Self(NonZeroU64::MIN.saturating_add(i64::MAX.unsigned_abs() - 1));

    pub fn get(self) -> u64 {
        self.0.get()
    }

    pub fn checked_add(self, rhs: u64) -> Option<Self> {
        self.0
            .checked_add(rhs)
            .filter(|sum| *sum <= Self::MAX.0)
            .map(Self)
    }

    /// Sequence number following the highest suffix seen so far.
    pub fn after(highest: u64) -> Option<Self> {
        highest
            .checked_add(1)
            .and_then(NonZeroU64::new)
            .filter(|next| *next <= Self::MAX.0)
            .map(Self)
    }
}

impl TryFrom<u64> for SequenceNumber {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let value = NonZeroU64::new(value).ok_or("Cannot convert u64 to nonzero")?;
        if value > Self::MAX.0 {
            return Err("Sequence number exceeds storage range");
        }
        Ok(Self(value))
    }
}

impl TryFrom<i64> for SequenceNumber {
    type Error = &'static str;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map_err(|_| "Cannot convert negative i64 to sequence number")
            .and_then(Self::try_from)
    }
}

impl From<SequenceNumber> for i64 {
    fn from(value: SequenceNumber) -> Self {
        i64::try_from(value.get()).unwrap_or(i64::MAX)
    }
}

impl From<SequenceNumber> for u64 {
    fn from(value: SequenceNumber) -> Self {
        value.get()
    }
}

impl Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
