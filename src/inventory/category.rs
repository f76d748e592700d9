use std::{fmt::Display, str::FromStr};

use derive_getters::Getters;

use super::PreCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CategoryId(i64);

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CategoryId> for i64 {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PurchaseLotId(i64);

impl From<i64> for PurchaseLotId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<PurchaseLotId> for i64 {
    fn from(value: PurchaseLotId) -> Self {
        value.0
    }
}

impl FromStr for PurchaseLotId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Display for PurchaseLotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An asset type. The pre-code is fixed at creation and shared by generation
/// and matching of tags.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Category {
    #[getter(skip)]
    id: CategoryId,
    name: String,
    pre_code: PreCode,
}

impl Category {
    pub fn new(id: CategoryId, name: String, pre_code: PreCode) -> Self {
        Self { id, name, pre_code }
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.id, self.pre_code, self.name)
    }
}
